//! Full-file marker guard.
//!
//! Producers are asked for targeted edits. A "Complete file: X" comment
//! anywhere in the turn means the producer dumped a whole file instead, and
//! the caller is expected to reject the turn.

use std::sync::LazyLock;

use regex::Regex;

use crate::pattern::compile_regex;

/// Comment-style "Complete file:" markers (`//`, `#`, `/*`, `<!--`, `--`, `;`).
static FULL_FILE_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?i)(?://+|#+|/\*+|<!--|--|;+)[ \t]*complete[ \t]+file[ \t]*:[ \t]*([^\s*>]+)?",
    )
});

/// One full-file marker occurrence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FullFileMarker {
    /// Byte offset of the marker.
    pub offset: usize,
    /// File named by the marker, when present.
    pub file_path: Option<String>,
}

impl FullFileMarker {
    /// Diagnostic recorded for this violation.
    #[must_use]
    pub fn diagnostic(&self) -> String {
        match &self.file_path {
            Some(path) => format!(
                "Full file replacement detected for `{path}`: only targeted edits are allowed"
            ),
            None => "Full file replacement detected: only targeted edits are allowed".to_string(),
        }
    }
}

/// Find every full-file marker in `text`.
#[must_use]
pub fn find_full_file_markers(text: &str) -> Vec<FullFileMarker> {
    FULL_FILE_MARKER
        .captures_iter(text)
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            Some(FullFileMarker {
                offset: whole.start(),
                file_path: caps.get(1).map(|m| m.as_str().to_string()),
            })
        })
        .collect()
}

/// Whether `text` contains any full-file marker.
#[must_use]
pub fn has_full_file_marker(text: &str) -> bool {
    FULL_FILE_MARKER.is_match(text)
}
