#![forbid(unsafe_code)]

//! Display-width helpers shared by frame construction.

use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

#[inline]
fn is_control(c: char) -> bool {
    let u = c as u32;
    matches!(u, 0x0000..=0x001F | 0x007F..=0x009F)
}

/// Replace characters that would move the cursor or change terminal state.
///
/// Tabs become a single space; every other C0/C1 control (including ESC,
/// CR and LF) is dropped.
pub(crate) fn sanitize(text: &str) -> String {
    if !text.chars().any(is_control) {
        return text.to_string();
    }
    text.chars()
        .filter_map(|c| match c {
            '\t' => Some(' '),
            c if is_control(c) => None,
            c => Some(c),
        })
        .collect()
}

/// Display width of a single grapheme cluster.
#[inline]
pub(crate) fn grapheme_width(grapheme: &str) -> usize {
    if grapheme.is_ascii() {
        return grapheme.len();
    }
    UnicodeWidthStr::width(grapheme)
}

/// Display width of sanitized text.
#[inline]
pub(crate) fn display_width(text: &str) -> usize {
    if text.is_ascii() {
        return text.len();
    }
    text.graphemes(true).map(grapheme_width).sum()
}

/// Split `text` so the head fits in `max` columns.
///
/// Splits only on grapheme boundaries; a wide grapheme that straddles the
/// limit goes to the tail. Returns `(head, head_width, tail)`.
pub(crate) fn split_at_width(text: &str, max: usize) -> (&str, usize, &str) {
    let mut used = 0;
    for (idx, grapheme) in text.grapheme_indices(true) {
        let w = grapheme_width(grapheme);
        if used + w > max {
            return (&text[..idx], used, &text[idx..]);
        }
        used += w;
    }
    (text, used, "")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_drops_controls() {
        assert_eq!(sanitize("a\tb"), "a b");
        assert_eq!(sanitize("a\x1b[2Jb"), "a[2Jb");
        assert_eq!(sanitize("line\r\n"), "line");
        assert_eq!(sanitize("plain"), "plain");
    }

    #[test]
    fn width_counts_wide_graphemes() {
        assert_eq!(display_width("abc"), 3);
        assert_eq!(display_width("日本"), 4);
        assert_eq!(display_width("e\u{301}"), 1);
    }

    #[test]
    fn split_respects_wide_boundary() {
        assert_eq!(split_at_width("abcdef", 4), ("abcd", 4, "ef"));
        assert_eq!(split_at_width("日本語", 3), ("日", 2, "本語"));
        assert_eq!(split_at_width("ab", 10), ("ab", 2, ""));
        assert_eq!(split_at_width("ab", 0), ("", 0, "ab"));
    }
}
