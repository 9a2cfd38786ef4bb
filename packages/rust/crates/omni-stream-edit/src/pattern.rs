//! Shared regex construction.

use regex::Regex;

/// Compile a hardcoded pattern, falling back to a never-matching regex.
pub(crate) fn compile_regex(pattern: &str) -> Regex {
    match Regex::new(pattern) {
        Ok(regex) => regex,
        Err(compile_err) => {
            tracing::error!(pattern, error = %compile_err, "hardcoded regex failed to compile");
            match Regex::new(r"$^") {
                Ok(fallback) => fallback,
                Err(fallback_err) => panic!("hardcoded fallback regex must compile: {fallback_err}"),
            }
        }
    }
}

/// First `len` characters of `text`.
pub(crate) fn char_prefix(text: &str, len: usize) -> &str {
    match text.char_indices().nth(len) {
        Some((idx, _)) => &text[..idx],
        None => text,
    }
}

/// Largest char boundary at or below `pos`.
pub(crate) fn floor_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

/// Smallest char boundary at or above `pos`.
pub(crate) fn ceil_char_boundary(text: &str, pos: usize) -> usize {
    let mut pos = pos.min(text.len());
    while !text.is_char_boundary(pos) {
        pos += 1;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_prefix_is_utf8_safe() {
        assert_eq!(char_prefix("héllo", 2), "hé");
        assert_eq!(char_prefix("ab", 10), "ab");
    }

    #[test]
    fn test_char_boundaries() {
        let text = "aé";
        assert_eq!(floor_char_boundary(text, 2), 1);
        assert_eq!(ceil_char_boundary(text, 2), 3);
        assert_eq!(floor_char_boundary(text, 99), 3);
    }
}
