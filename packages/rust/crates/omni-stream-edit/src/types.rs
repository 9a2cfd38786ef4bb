//! Core types for edit extraction.
//!
//! Defines the data structures that flow from the strategies through the
//! tracker and ledger to the caller.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::diff::generate_unified_diff;

/// Kind of change an [`EditOperation`] describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditKind {
    /// Swap located old code for new code.
    Replace,
    /// Add new code near the located target.
    Insert,
    /// Remove the located code.
    Delete,
    /// Rewrite a symbol located by name only.
    Update,
}

/// Inclusive 1-indexed line span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct LineRange {
    /// First line (1-indexed).
    pub start: usize,
    /// Last line (inclusive).
    pub end: usize,
}

/// Locator used by the patch applier to find the original code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditTarget {
    /// Function, component or symbol identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Short excerpt used for matching.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_snippet: Option<String>,
    /// Line span mentioned by the producer.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub line_range: Option<LineRange>,
    /// Path inside a structured-data file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub json_path: Option<String>,
}

/// One targeted code change recovered from the response text.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EditOperation {
    /// What the change does.
    pub kind: EditKind,
    /// File the change applies to, or the configured unknown sentinel.
    pub file_path: String,
    /// How to locate the original code.
    pub target: EditTarget,
    /// Snippet to find.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_code: Option<String>,
    /// Replacement text. Empty while the replacement block is still streaming.
    pub new_code: String,
    /// Short summary harvested from the surrounding prose.
    pub description: String,
    /// Reliability of the strategy that produced this operation (0-100).
    pub confidence: u8,
    /// Byte offset in the buffer where the edit's source text begins.
    ///
    /// The buffer only grows, so the offset of a marker or fence never moves
    /// and identifies the same edit across parses.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_offset: Option<usize>,
}

impl EditOperation {
    /// Whether the operation carries enough to be applied.
    ///
    /// Either both sides of the pair are present, or the target is named
    /// and the replacement is present.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        if self.new_code.is_empty() {
            return false;
        }
        let has_old = self.old_code.as_deref().is_some_and(|code| !code.is_empty());
        let has_name = self.target.name.as_deref().is_some_and(|name| !name.is_empty());
        has_old || has_name
    }

    /// Whether at least one side of the pair has been captured.
    #[must_use]
    pub fn has_code(&self) -> bool {
        !self.new_code.is_empty() || self.old_code.as_deref().is_some_and(|code| !code.is_empty())
    }

    /// Unified diff from `old_code` to `new_code` for display.
    #[must_use]
    pub fn preview_diff(&self) -> String {
        generate_unified_diff(self.old_code.as_deref().unwrap_or_default(), &self.new_code)
    }
}

/// Lifecycle of one logical edit within a turn.
///
/// Variants are ordered by progress, so `max` picks the most advanced state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditState {
    /// Seen, nothing captured yet.
    Detected,
    /// Some code captured, not yet complete.
    Writing,
    /// Complete. Terminal.
    Complete,
}

impl EditState {
    /// Wire name of the state.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Detected => "detected",
            Self::Writing => "writing",
            Self::Complete => "complete",
        }
    }
}

/// Output of a single parse over the accumulated buffer.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseResult {
    /// Every operation found in this parse, in any state.
    pub operations: Vec<EditOperation>,
    /// Whether any diagnostic was recorded.
    pub has_errors: bool,
    /// Diagnostics such as full-file violations or malformed pairs.
    pub errors: Vec<String>,
}

impl ParseResult {
    pub(crate) fn push_error(&mut self, message: impl Into<String>) {
        self.has_errors = true;
        self.errors.push(message.into());
    }
}

/// What a session reports back after each chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamUpdate {
    /// Edits whose key was first seen during this call.
    pub detected_edits: Vec<EditOperation>,
    /// Edits currently in the `Writing` state.
    pub in_progress_edits: Vec<EditOperation>,
    /// Every edit completed so far this turn, deduplicated.
    pub complete_edits: Vec<EditOperation>,
    /// Most advanced state per file path.
    pub file_states: BTreeMap<String, EditState>,
    /// Raw parse output for this call.
    pub parse: ParseResult,
}
