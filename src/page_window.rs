//! Page-tagged text and windowing.
//!
//! Extraction produces one block `"[Page N]\n{text}\n\n"` per page,
//! concatenated in order with N starting at 1. This is the crate's only
//! structured text format: `tag_pages` produces it and `page_window`
//! consumes it. If marker text ever appears ambiguously inside page content,
//! windowing falls back to slicing to the end of the document rather than
//! failing.

use crate::error::{Error, Result};

/// Inline marker that opens page `page`.
pub fn page_marker(page: usize) -> String {
    format!("[Page {}]", page)
}

/// Concatenate per-page text into page-tagged form.
pub fn tag_pages<I, S>(pages: I) -> String
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    let mut tagged = String::new();
    for (i, page) in pages.into_iter().enumerate() {
        tagged.push_str(&format!("[Page {}]\n{}\n\n", i + 1, page.as_ref()));
    }
    tagged
}

/// Slice the inclusive page range `[start, end]` out of tagged text.
///
/// The range is clamped to `[1, page_count]` first. After clamping,
/// `start > end` (which includes every range over a zero-page document)
/// fails with `InvalidRange`. A missing start marker fails with
/// `RangeNotFound`; a missing end marker means the slice runs to the end of
/// the document.
pub fn page_window(text: &str, page_count: usize, start: usize, end: usize) -> Result<&str> {
    let start = start.max(1);
    let end = end.min(page_count);
    if page_count == 0 || start > end {
        return Err(Error::InvalidRange { start, end });
    }

    let start_marker = page_marker(start);
    let start_idx = match text.find(&start_marker) {
        Some(idx) => idx,
        None => return Err(Error::RangeNotFound { page: start }),
    };

    let end_marker = page_marker(end + 1);
    let end_idx = text[start_idx..]
        .find(&end_marker)
        .map(|idx| start_idx + idx)
        .unwrap_or(text.len());

    Ok(&text[start_idx..end_idx])
}

/// `page_window` plus the minimum-content policy: a window whose trimmed
/// length is below `min_chars` is unusable and must not be forwarded as
/// generation context.
pub fn context_window(
    text: &str,
    page_count: usize,
    start: usize,
    end: usize,
    min_chars: usize,
) -> Result<&str> {
    let window = page_window(text, page_count, start, end)?;
    let chars = window.trim().chars().count();
    if chars < min_chars {
        return Err(Error::InsufficientContent { chars, min_chars });
    }
    Ok(window)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tagged(pages: usize) -> String {
        tag_pages((1..=pages).map(|n| format!("content of page {}", n)))
    }

    #[test]
    fn windows_are_disjoint_and_ordered() {
        let text = tagged(6);
        let first = page_window(&text, 6, 1, 2).unwrap();
        let second = page_window(&text, 6, 3, 4).unwrap();
        let third = page_window(&text, 6, 5, 6).unwrap();

        assert!(first.contains("content of page 1"));
        assert!(first.contains("content of page 2"));
        assert!(!first.contains("content of page 3"));
        assert!(second.starts_with("[Page 3]"));
        assert!(third.ends_with("content of page 6\n\n"));

        // Non-overlapping ranges concatenate back in page order.
        assert_eq!(format!("{}{}{}", first, second, third), text);
    }

    #[test]
    fn range_is_clamped_to_document_bounds() {
        let text = tagged(3);
        let window = page_window(&text, 3, 0, 99).unwrap();
        assert_eq!(window, text);
    }

    #[test]
    fn start_after_end_is_invalid() {
        let text = tagged(5);
        assert!(matches!(
            page_window(&text, 5, 4, 2),
            Err(Error::InvalidRange { start: 4, end: 2 })
        ));
    }

    #[test]
    fn any_range_over_zero_pages_is_invalid() {
        assert!(matches!(page_window("", 0, 1, 1), Err(Error::InvalidRange { .. })));
        assert!(matches!(page_window("", 0, 1, 10), Err(Error::InvalidRange { .. })));
    }

    #[test]
    fn missing_start_marker_is_range_not_found() {
        // page_count claims more pages than the text actually carries
        let text = tagged(2);
        assert!(matches!(
            page_window(&text, 5, 4, 5),
            Err(Error::RangeNotFound { page: 4 })
        ));
    }

    #[test]
    fn window_ending_at_last_page_slices_to_document_end() {
        let text = tagged(4);
        let window = page_window(&text, 4, 3, 4).unwrap();
        assert!(window.starts_with("[Page 3]"));
        assert!(window.ends_with("content of page 4\n\n"));
    }

    #[test]
    fn near_empty_window_is_insufficient() {
        let text = tag_pages(["ok", "x"]);
        let err = context_window(&text, 2, 2, 2, 100).unwrap_err();
        assert!(matches!(err, Error::InsufficientContent { min_chars: 100, .. }));
    }

    #[test]
    fn window_above_threshold_is_usable() {
        let text = tagged(10);
        let window = context_window(&text, 10, 1, 10, 100).unwrap();
        assert!(window.trim().chars().count() >= 100);
    }
}
