//! Short, printable excerpts of flat text.

use crate::colors;

/// Returns `text` on one line, with newlines shown as `⏎`, cut to `max` characters.
pub fn preview(text: &str, max: usize) -> String {
    let mut out: String = text
        .chars()
        .take(max)
        .map(|c| if c == '\n' { '⏎' } else { c })
        .collect();
    if text.chars().nth(max).is_some() {
        out.push('…');
    }
    out
}

/// Returns `text` with the character range `[start, start + len)` in reverse video.
///
/// Ranges past the end are clipped.
pub fn mark_span(text: &str, start: usize, len: usize) -> String {
    let before: String = text.chars().take(start).collect();
    let marked: String = text.chars().skip(start).take(len).collect();
    let after: String = text.chars().skip(start.saturating_add(len)).collect();
    format!(
        "{before}{}{marked}{}{after}",
        colors::REVERSE,
        colors::RESET
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preview() {
        assert_eq!(preview("Titre\nCorps", 20), "Titre⏎Corps");
        assert_eq!(preview("Été brûlant", 3), "Été…");
        assert_eq!(preview("abc", 3), "abc");
    }

    #[test]
    fn test_mark_span_counts_chars() {
        assert_eq!(
            mark_span("Été une fois", 4, 3),
            "Été \x1b[7mune\x1b[0m fois"
        );
        assert_eq!(mark_span("ab", 1, 10), "a\x1b[7mb\x1b[0m");
        assert_eq!(mark_span("ab", 1, usize::MAX), "a\x1b[7mb\x1b[0m");
    }
}
