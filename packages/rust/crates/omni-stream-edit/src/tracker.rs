//! Per-edit lifecycle tracking across repeated parses.
//!
//! Every parse of the growing buffer yields a fresh list of operations. The
//! tracker folds them into one `Detected -> Writing -> Complete` state per
//! logical edit and notifies an [`EditObserver`] exactly once per edit for
//! detection and once for completion.
//!
//! An edit is first matched by its source offset, then by lifecycle key. The
//! key of a streaming edit can still shift (a path comment or a declared name
//! arrives late); every key it has carried stays an alias of the same entry.

use std::collections::{BTreeMap, HashMap};

use crate::observability::ExtractEvent;
use crate::pattern::char_prefix;
use crate::types::{EditOperation, EditState};

/// Receives lifecycle notifications. Both hooks default to no-ops.
pub trait EditObserver {
    /// A lifecycle key was seen for the first time.
    fn on_edit_detected(&mut self, _operation: &EditOperation, _file_path: &str) {}

    /// A lifecycle key reached [`EditState::Complete`].
    fn on_edit_complete(&mut self, _operation: &EditOperation, _file_path: &str) {}
}

/// Observer that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopObserver;

impl EditObserver for NoopObserver {}

/// Observer that keeps every notification, for tests and the CLI.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    /// Operations passed to `on_edit_detected`, in order.
    pub detected: Vec<EditOperation>,
    /// Operations passed to `on_edit_complete`, in order.
    pub completed: Vec<EditOperation>,
}

impl EditObserver for RecordingObserver {
    fn on_edit_detected(&mut self, operation: &EditOperation, _file_path: &str) {
        self.detected.push(operation.clone());
    }

    fn on_edit_complete(&mut self, operation: &EditOperation, _file_path: &str) {
        self.completed.push(operation.clone());
    }
}

/// Identity of one logical edit across parses.
///
/// Built from the file path and the target name, or failing that a prefix of
/// the code snippet. The old code itself never takes part, so a revised
/// `old_code` keeps the same key. Returns `None` while nothing identifies the
/// edit yet.
#[must_use]
pub fn lifecycle_key(operation: &EditOperation, snippet_prefix: usize) -> Option<String> {
    let target = &operation.target;
    let locator = target
        .name
        .as_deref()
        .filter(|name| !name.is_empty())
        .map(|name| format!("name:{name}"))
        .or_else(|| {
            target
                .code_snippet
                .as_deref()
                .filter(|snippet| !snippet.is_empty())
                .map(|snippet| format!("snippet:{}", char_prefix(snippet, snippet_prefix)))
        })?;
    Some(format!("{}#{locator}", operation.file_path))
}

/// What one [`EditTracker::observe`] call changed.
#[derive(Debug, Clone, Default)]
pub struct Observation {
    /// Operations whose key was new.
    pub detected: Vec<EditOperation>,
    /// Operations whose key just became complete.
    pub completed: Vec<EditOperation>,
}

#[derive(Debug, Clone)]
struct TrackedEdit {
    key: String,
    state: EditState,
    latest: EditOperation,
}

/// Key to state map for one session, in first-seen order.
#[derive(Debug, Clone)]
pub struct EditTracker {
    snippet_prefix: usize,
    edits: Vec<TrackedEdit>,
    index: HashMap<String, usize>,
    offsets: HashMap<usize, usize>,
}

impl EditTracker {
    /// Tracker keying unnamed edits by `snippet_prefix` characters.
    #[must_use]
    pub fn new(snippet_prefix: usize) -> Self {
        Self {
            snippet_prefix,
            edits: Vec::new(),
            index: HashMap::new(),
            offsets: HashMap::new(),
        }
    }

    /// Fold one parse's operations into the lifecycle map.
    pub fn observe(
        &mut self,
        operations: &[EditOperation],
        observer: &mut dyn EditObserver,
    ) -> Observation {
        let mut observation = Observation::default();

        for operation in operations {
            let Some(key) = lifecycle_key(operation, self.snippet_prefix) else {
                continue;
            };
            let known = operation
                .source_offset
                .and_then(|offset| self.offsets.get(&offset).copied())
                .or_else(|| self.index.get(&key).copied());
            let idx = match known {
                Some(idx) => {
                    if !self.index.contains_key(&key) {
                        tracing::debug!(
                            event = ExtractEvent::EditRekeyed.as_str(),
                            from = %self.edits[idx].key,
                            to = %key,
                            "edit key shifted while streaming"
                        );
                        self.index.insert(key, idx);
                    }
                    idx
                }
                None => {
                    tracing::debug!(
                        event = ExtractEvent::EditDetected.as_str(),
                        key = %key,
                        file_path = %operation.file_path,
                        confidence = operation.confidence,
                        "edit detected"
                    );
                    observer.on_edit_detected(operation, &operation.file_path);
                    observation.detected.push(operation.clone());
                    self.index.insert(key.clone(), self.edits.len());
                    self.edits.push(TrackedEdit {
                        key,
                        state: EditState::Detected,
                        latest: operation.clone(),
                    });
                    self.edits.len() - 1
                }
            };
            if let Some(offset) = operation.source_offset {
                self.offsets.entry(offset).or_insert(idx);
            }

            let entry = &mut self.edits[idx];
            if entry.state == EditState::Complete {
                continue;
            }
            entry.latest = operation.clone();
            if operation.is_complete() {
                entry.state = EditState::Complete;
                tracing::debug!(
                    event = ExtractEvent::EditCompleted.as_str(),
                    key = %entry.key,
                    file_path = %operation.file_path,
                    "edit completed"
                );
                observer.on_edit_complete(operation, &operation.file_path);
                observation.completed.push(operation.clone());
            } else if operation.has_code() {
                entry.state = EditState::Writing;
            }
        }

        observation
    }

    /// Current state of a lifecycle key.
    #[must_use]
    pub fn state_of(&self, key: &str) -> Option<EditState> {
        self.index.get(key).map(|&idx| self.edits[idx].state)
    }

    /// Current state of the edit `operation` belongs to, matched the same way
    /// [`EditTracker::observe`] matches it.
    #[must_use]
    pub fn state_of_operation(&self, operation: &EditOperation) -> Option<EditState> {
        operation
            .source_offset
            .and_then(|offset| self.offsets.get(&offset))
            .or_else(|| {
                lifecycle_key(operation, self.snippet_prefix).and_then(|key| self.index.get(&key))
            })
            .map(|&idx| self.edits[idx].state)
    }

    /// Latest operation for every key currently in `Writing`.
    #[must_use]
    pub fn writing(&self) -> Vec<EditOperation> {
        self.edits
            .iter()
            .filter(|edit| edit.state == EditState::Writing)
            .map(|edit| edit.latest.clone())
            .collect()
    }

    /// Most advanced state per file path.
    #[must_use]
    pub fn file_states(&self) -> BTreeMap<String, EditState> {
        let mut states = BTreeMap::new();
        for edit in &self.edits {
            states
                .entry(edit.latest.file_path.clone())
                .and_modify(|state: &mut EditState| *state = (*state).max(edit.state))
                .or_insert(edit.state);
        }
        states
    }

    /// Number of tracked keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.edits.len()
    }

    /// Whether no key has been seen.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edits.is_empty()
    }

    /// Forget every key.
    pub fn clear(&mut self) {
        self.edits.clear();
        self.index.clear();
        self.offsets.clear();
    }
}
