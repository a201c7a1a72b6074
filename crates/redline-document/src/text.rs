//! Character-offset helpers.
//!
//! Every offset and length handled by this crate counts Unicode scalar values, not bytes.
//! These helpers translate between the two and perform bounds-checked splices.

/// Returns the length of `s` in characters.
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Converts a character offset into a byte offset.
///
/// An offset equal to the character length maps to `s.len()`. Returns `None` past the end.
pub fn byte_offset(s: &str, char_offset: usize) -> Option<usize> {
    if char_offset == 0 {
        return Some(0);
    }
    let mut chars = 0;
    for (byte, _) in s.char_indices() {
        if chars == char_offset {
            return Some(byte);
        }
        chars += 1;
    }
    (chars == char_offset).then_some(s.len())
}

/// Returns the substring covering `len` characters starting at character `start`.
pub fn slice_chars(s: &str, start: usize, len: usize) -> Option<&str> {
    let from = byte_offset(s, start)?;
    let to = from + byte_offset(&s[from..], len)?;
    Some(&s[from..to])
}

/// Replaces `len` characters at character `start` with `replacement`.
///
/// Returns `None` without allocating when the range does not fit inside `s`.
pub fn splice(s: &str, start: usize, len: usize, replacement: &str) -> Option<String> {
    let from = byte_offset(s, start)?;
    let to = from + byte_offset(&s[from..], len)?;
    let mut out = String::with_capacity(s.len() - (to - from) + replacement.len());
    out.push_str(&s[..from]);
    out.push_str(replacement);
    out.push_str(&s[to..]);
    Some(out)
}

/// Returns the character offset of the first occurrence of `needle` in `haystack`.
pub fn find_chars(haystack: &str, needle: &str) -> Option<usize> {
    let byte = haystack.find(needle)?;
    Some(char_len(&haystack[..byte]))
}

/// Returns the character offsets of every occurrence of `needle`, overlapping ones included.
///
/// An empty needle matches nowhere.
pub fn find_all_chars(haystack: &str, needle: &str) -> Vec<usize> {
    if needle.is_empty() {
        return Vec::new();
    }
    haystack
        .char_indices()
        .enumerate()
        .filter(|(_, (byte, _))| haystack[*byte..].starts_with(needle))
        .map(|(chars, _)| chars)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_byte_offset_multibyte() {
        let s = "déjà vu";
        assert_eq!(byte_offset(s, 0), Some(0));
        assert_eq!(byte_offset(s, 2), Some(3));
        assert_eq!(byte_offset(s, 7), Some(s.len()));
        assert_eq!(byte_offset(s, 8), None);
    }

    #[test]
    fn test_slice_chars() {
        assert_eq!(slice_chars("Ceci est une test.", 9, 3), Some("une"));
        assert_eq!(slice_chars("été", 1, 2), Some("té"));
        assert_eq!(slice_chars("abc", 2, 2), None);
        assert_eq!(slice_chars("abc", 3, 0), Some(""));
    }

    #[test]
    fn test_splice_replaces_range() {
        assert_eq!(
            splice("Ceci est une test.", 9, 3, "un").as_deref(),
            Some("Ceci est un test.")
        );
        assert_eq!(splice("été", 0, 1, "e").as_deref(), Some("eté"));
    }

    #[test]
    fn test_splice_out_of_range() {
        assert_eq!(splice("short", 3, 5, "x"), None);
        assert_eq!(splice("short", 9, 0, "x"), None);
    }

    #[test]
    fn test_find_chars_counts_characters() {
        assert_eq!(find_chars("ça va, ça va", "va"), Some(3));
        assert_eq!(find_chars("abc", "z"), None);
    }

    #[test]
    fn test_find_all_chars_overlapping() {
        assert_eq!(find_all_chars("aaa", "aa"), vec![0, 1]);
        assert_eq!(find_all_chars("un chat, un chien", "un"), vec![0, 9]);
        assert!(find_all_chars("abc", "").is_empty());
    }
}
