//! User-facing message recovered from a turn's full text.

use crate::fence::scan_fences;
use crate::guard::has_full_file_marker;
use crate::markers::{is_marker_line, starts_with_marker};
use crate::settings::ExtractorSettings;

/// Strip code fences and edit markers, leaving the prose.
///
/// Uses the default length threshold and fallback message.
#[must_use]
pub fn extract_clean_response(text: &str) -> String {
    extract_clean_response(text)
}

/// [`extract_clean_response`] with caller-supplied settings.
///
/// Degenerate results (shorter than `min_clean_response_len` characters, or
/// still starting with a raw marker) are replaced by
/// `clean_response_fallback`.
#[must_use]
pub fn extract_clean_response_with(text: &str, settings: &ExtractorSettings) -> String {
    let mut prose = String::with_capacity(text.len());
    let mut cursor = 0;
    for fence in scan_fences(text) {
        prose.push_str(&text[cursor..fence.start]);
        prose.push('\n');
        cursor = fence.end;
    }
    prose.push_str(&text[cursor..]);

    let mut cleaned = String::with_capacity(prose.len());
    let mut blank_run = 0usize;
    for line in prose.lines() {
        if is_marker_line(line) || has_full_file_marker(line) {
            continue;
        }
        let line = line.trim_end();
        if line.trim().is_empty() {
            blank_run += 1;
            if blank_run > 1 {
                continue;
            }
        } else {
            blank_run = 0;
        }
        cleaned.push_str(line);
        cleaned.push('\n');
    }
    let cleaned = cleaned.trim();

    if cleaned.chars().count() < settings.min_clean_response_len || starts_with_marker(cleaned) {
        return settings.clean_response_fallback.clone();
    }
    cleaned.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_marker_only_input_falls_back() {
        let settings = ExtractorSettings::default();
        assert_eq!(
            extract_clean_response_with("Replace with:\n\n", &settings),
            settings.clean_response_fallback
        );
    }

    #[test]
    fn test_prose_survives() {
        let text = "I'll update the validateInput function in utils.ts.\nFind this code:\n```\nfunction validateInput(x) { return x; }\n```\nReplace with:\n```\nfunction validateInput(x) { return x > 0; }\n```\nThis rejects non-positive input.";
        assert_eq!(
            extract_clean_response(text),
            "I'll update the validateInput function in utils.ts.\n\nThis rejects non-positive input."
        );
    }

    #[test]
    fn test_unclosed_fence_is_stripped() {
        let text = "Here is the new helper for the parser module.\n```rust\nfn helper() {";
        assert_eq!(
            extract_clean_response(text),
            "Here is the new helper for the parser module."
        );
    }
}
