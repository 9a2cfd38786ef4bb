//! Append-only record of completed edits for one turn.

use std::collections::HashSet;

use crate::observability::ExtractEvent;
use crate::pattern::char_prefix;
use crate::types::EditOperation;

/// Content identity of a completed edit.
///
/// File path, then the target name (or a snippet prefix), then a prefix of
/// the new code. Whitespace runs are collapsed first, so two strategies that
/// converge on the same change produce the same signature even when their
/// lifecycle keys differ in spacing.
#[must_use]
pub fn content_signature(
    operation: &EditOperation,
    snippet_prefix: usize,
    new_code_prefix: usize,
) -> String {
    let target = &operation.target;
    let locator = target
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .or_else(|| {
            target
                .code_snippet
                .as_deref()
                .map(|snippet| squash(snippet, snippet_prefix))
        })
        .unwrap_or_default();
    format!(
        "{}\u{1f}{locator}\u{1f}{}",
        operation.file_path,
        squash(&operation.new_code, new_code_prefix)
    )
}

fn squash(text: &str, len: usize) -> String {
    let joined = text.split_whitespace().collect::<Vec<_>>().join(" ");
    char_prefix(&joined, len).to_string()
}

/// Completed edits, deduplicated by [`content_signature`].
#[derive(Debug, Clone)]
pub struct CompletedLedger {
    snippet_prefix: usize,
    new_code_prefix: usize,
    entries: Vec<EditOperation>,
    signatures: HashSet<String>,
}

impl CompletedLedger {
    /// Empty ledger with the given signature prefixes.
    #[must_use]
    pub fn new(snippet_prefix: usize, new_code_prefix: usize) -> Self {
        Self {
            snippet_prefix,
            new_code_prefix,
            entries: Vec::new(),
            signatures: HashSet::new(),
        }
    }

    /// Add a completed edit. Returns `false` if its signature is already present.
    pub fn record(&mut self, operation: &EditOperation) -> bool {
        let signature = content_signature(operation, self.snippet_prefix, self.new_code_prefix);
        if !self.signatures.insert(signature) {
            tracing::debug!(
                event = ExtractEvent::LedgerDuplicate.as_str(),
                file_path = %operation.file_path,
                "completed edit already recorded"
            );
            return false;
        }
        self.entries.push(operation.clone());
        true
    }

    /// Every recorded edit, in completion order.
    #[must_use]
    pub fn entries(&self) -> &[EditOperation] {
        &self.entries
    }

    /// Number of recorded edits.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing has completed yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Drop every entry. Only a session reset does this.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.signatures.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{EditKind, EditTarget};

    fn op(name: Option<&str>, snippet: Option<&str>, new: &str, confidence: u8) -> EditOperation {
        EditOperation {
            kind: EditKind::Replace,
            file_path: "a.py".to_string(),
            target: EditTarget {
                name: name.map(str::to_string),
                code_snippet: snippet.map(str::to_string),
                ..EditTarget::default()
            },
            old_code: None,
            new_code: new.to_string(),
            description: String::new(),
            confidence,
            source_offset: None,
        }
    }

    #[test]
    fn test_duplicate_from_other_strategy_is_dropped() {
        let mut ledger = CompletedLedger::new(50, 100);
        assert!(ledger.record(&op(Some("run"), None, "def run(): pass", 80)));
        assert!(!ledger.record(&op(Some("run"), Some("def run():"), "def run(): pass", 75)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.entries()[0].confidence, 80);
    }

    #[test]
    fn test_new_code_prefix_bounds_signature() {
        let long = "x".repeat(120);
        let a = op(None, Some("s"), &format!("{long}a"), 60);
        let b = op(None, Some("s"), &format!("{long}b"), 60);
        assert_eq!(content_signature(&a, 50, 100), content_signature(&b, 50, 100));
        assert_ne!(content_signature(&a, 50, 200), content_signature(&b, 50, 200));
    }

    #[test]
    fn test_spacing_does_not_split_signature() {
        let a = op(None, Some("x = 1"), "x = 2", 75);
        let b = op(None, Some("x  =  1"), "x =\n  2", 60);
        assert_eq!(content_signature(&a, 50, 100), content_signature(&b, 50, 100));
    }

    #[test]
    fn test_clear() {
        let mut ledger = CompletedLedger::new(50, 100);
        ledger.record(&op(Some("f"), None, "y", 70));
        ledger.clear();
        assert!(ledger.is_empty());
        assert!(ledger.record(&op(Some("f"), None, "y", 70)));
    }
}
