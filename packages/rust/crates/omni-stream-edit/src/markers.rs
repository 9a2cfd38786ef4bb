//! Find/replace marker grammar.
//!
//! Producers phrase the pair contract loosely: "Find this code:",
//! "**Search for:**", "Replace with:", "Change it to:" and so on. Markers are
//! line-anchored and ignored when they fall inside a code fence.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::{FENCE, Fence, inside_fence, next_fence_from};
use crate::pattern::{ceil_char_boundary, compile_regex};

static FIND_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?im)^[ \t>]*(?:[*_#]+[ \t]*)?(?:find(?:[ \t]+this|[ \t]+the[ \t]+following)?(?:[ \t]+code)?|search[ \t]+for(?:[ \t]+this)?(?:[ \t]+code)?|locate(?:[ \t]+this)?(?:[ \t]+code)?|original[ \t]+code|old[ \t]+code|current[ \t]+code)(?:[ \t]+(?:in|from)[ \t]+[^\n:]{1,80})?[ \t]*:[ \t]*(?:[*_]+)?",
    )
});

static REPLACE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?im)^[ \t>]*(?:[*_#]+[ \t]*)?(?:replace(?:[ \t]+(?:it|this|that))?(?:[ \t]+code)?[ \t]+with|change(?:[ \t]+it)?[ \t]+to|update(?:[ \t]+it)?[ \t]+to|new[ \t]+code|updated[ \t]+code|with)(?:[ \t]+(?:this|the[ \t]+following))?(?:[ \t]+code)?[ \t]*:[ \t]*(?:[*_]+)?",
    )
});

/// Which side of the pair a marker introduces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    /// "Find this code:" and friends.
    Find,
    /// "Replace with:" and friends.
    Replace,
}

/// A marker occurrence outside any fence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Marker {
    /// Find or replace.
    pub kind: MarkerKind,
    /// Byte offset where the marker line starts.
    pub start: usize,
    /// Byte offset just past the marker text.
    pub end: usize,
}

/// All find markers outside fences, in order.
#[must_use]
pub fn find_markers(text: &str, fences: &[Fence<'_>]) -> Vec<Marker> {
    collect(&FIND_MARKER, MarkerKind::Find, text, fences)
}

/// All replace markers outside fences, in order.
#[must_use]
pub fn replace_markers(text: &str, fences: &[Fence<'_>]) -> Vec<Marker> {
    collect(&REPLACE_MARKER, MarkerKind::Replace, text, fences)
}

/// Whether a single line is nothing but a marker.
#[must_use]
pub fn is_marker_line(line: &str) -> bool {
    let stripped = line.trim();
    [&*FIND_MARKER, &*REPLACE_MARKER]
        .iter()
        .any(|re| re.find(stripped).is_some_and(|m| m.start() == 0 && m.end() == stripped.len()))
}

/// Whether `text` starts with a raw marker token.
#[must_use]
pub fn starts_with_marker(text: &str) -> bool {
    let stripped = text.trim_start();
    stripped.starts_with(FENCE)
        || [&*FIND_MARKER, &*REPLACE_MARKER]
            .iter()
            .any(|re| re.find(stripped).is_some_and(|m| m.start() == 0))
}

/// Report replace markers with no code fence inside the lookahead window.
///
/// A marker followed only by whitespace (or the start of a delimiter) is still
/// streaming and is not reported.
#[must_use]
pub fn malformed_pairs(text: &str, fences: &[Fence<'_>], lookahead: usize) -> Vec<String> {
    replace_markers(text, fences)
        .into_iter()
        .filter_map(|marker| {
            let window_end = ceil_char_boundary(text, marker.end.saturating_add(lookahead));
            if next_fence_from(fences, marker.end).is_some_and(|fence| fence.start <= window_end) {
                return None;
            }
            let pending = text[marker.end..window_end].trim();
            if pending.is_empty() || FENCE.starts_with(pending) {
                return None;
            }
            Some(format!(
                "Malformed edit pair: replace marker at byte {} has no code block within {lookahead} bytes",
                marker.start
            ))
        })
        .collect()
}

fn collect(re: &Regex, kind: MarkerKind, text: &str, fences: &[Fence<'_>]) -> Vec<Marker> {
    re.find_iter(text)
        .filter(|m| !inside_fence(fences, m.start()))
        .map(|m| Marker {
            kind,
            start: m.start(),
            end: m.end(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fence::scan_fences;

    #[test]
    fn test_marker_phrasings() {
        for text in [
            "Find this code:",
            "**Find this code:**",
            "Find:",
            "Search for:",
            "### Original code:",
            "Find this code in utils.ts:",
        ] {
            assert_eq!(find_markers(text, &[]).len(), 1, "{text}");
        }
        for text in ["Replace with:", "**Replace it with:**", "Change to:", "With:", "Updated code:"] {
            assert_eq!(replace_markers(text, &[]).len(), 1, "{text}");
        }
    }

    #[test]
    fn test_markers_inside_fences_are_ignored() {
        let text = "```\nconst obj = {\nfind: x,\n};\n```\n";
        let fences = scan_fences(text);
        assert!(find_markers(text, &fences).is_empty());
    }

    #[test]
    fn test_malformed_pair() {
        let text = "Replace with:\nsomething that is not code\n";
        let fences = scan_fences(text);
        assert_eq!(malformed_pairs(text, &fences, 200).len(), 1);
    }

    #[test]
    fn test_streaming_marker_is_not_malformed() {
        for text in ["Replace with:\n\n", "Replace with:\n``"] {
            let fences = scan_fences(text);
            assert!(malformed_pairs(text, &fences, 200).is_empty(), "{text}");
        }
    }

    #[test]
    fn test_fence_beyond_lookahead() {
        let text = format!("Replace with:\n{}\n```\nx\n```", "words ".repeat(20));
        let fences = scan_fences(&text);
        assert_eq!(malformed_pairs(&text, &fences, 40).len(), 1);
        assert!(malformed_pairs(&text, &fences, 400).is_empty());
    }

    #[test]
    fn test_marker_line_helpers() {
        assert!(is_marker_line("  Replace with:  "));
        assert!(!is_marker_line("Replace with: the new value"));
        assert!(starts_with_marker("Replace with:\n"));
        assert!(!starts_with_marker("I updated the function."));
    }
}
