//! Per-turn extraction session.
//!
//! A session owns everything that changes during one streamed response: the
//! buffer, the lifecycle map and the completed-edit ledger. It is not shared
//! between turns; call [`EditStreamSession::reset`] or build a new one.

use crate::buffer::StreamBuffer;
use crate::cleaner::CodeCleaner;
use crate::extractor::Extractor;
use crate::ledger::CompletedLedger;
use crate::observability::ExtractEvent;
use crate::settings::ExtractorSettings;
use crate::strategy::StrategyChain;
use crate::tracker::{EditObserver, EditTracker};
use crate::types::{EditOperation, EditState, ParseResult, StreamUpdate};

/// Incremental edit extraction for one streamed turn.
#[derive(Debug)]
pub struct EditStreamSession {
    extractor: Extractor,
    buffer: StreamBuffer,
    tracker: EditTracker,
    ledger: CompletedLedger,
}

impl Default for EditStreamSession {
    fn default() -> Self {
        Self::new()
    }
}

impl EditStreamSession {
    /// Session with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::with_extractor(Extractor::default())
    }

    /// Session with custom settings and the standard chain.
    #[must_use]
    pub fn with_settings(settings: ExtractorSettings) -> Self {
        Self::with_extractor(Extractor::new(settings))
    }

    /// Session with custom settings, chain and cleaner.
    #[must_use]
    pub fn with_parts(
        settings: ExtractorSettings,
        chain: StrategyChain,
        cleaner: CodeCleaner,
    ) -> Self {
        Self::with_extractor(Extractor::new(settings).with_chain(chain).with_cleaner(cleaner))
    }

    fn with_extractor(extractor: Extractor) -> Self {
        let settings = extractor.settings();
        let tracker = EditTracker::new(settings.snippet_key_prefix);
        let ledger = CompletedLedger::new(
            settings.snippet_key_prefix,
            settings.signature_new_code_prefix,
        );
        Self {
            extractor,
            buffer: StreamBuffer::new(),
            tracker,
            ledger,
        }
    }

    /// Clear buffer, lifecycle state and ledger for a new turn.
    pub fn reset(&mut self) {
        tracing::debug!(
            event = ExtractEvent::SessionReset.as_str(),
            buffered = self.buffer.len(),
            tracked = self.tracker.len(),
            completed = self.ledger.len(),
            "session reset"
        );
        self.buffer.clear();
        self.tracker.clear();
        self.ledger.clear();
    }

    /// Append a chunk and re-parse the whole buffer.
    pub fn append(&mut self, chunk: &str, observer: &mut dyn EditObserver) -> StreamUpdate {
        self.buffer.append(chunk);
        tracing::debug!(
            event = ExtractEvent::ChunkAppended.as_str(),
            chunk_len = chunk.len(),
            buffer_len = self.buffer.len(),
            chunks = self.buffer.chunk_count(),
            "chunk appended"
        );
        self.refresh(observer)
    }

    /// Re-parse the current buffer without appending.
    ///
    /// Repeating this yields the same operations and fires no callback twice.
    pub fn refresh(&mut self, observer: &mut dyn EditObserver) -> StreamUpdate {
        let parse = self.extractor.parse(self.buffer.as_str());
        let observation = self.tracker.observe(&parse.operations, observer);
        for operation in &observation.completed {
            self.ledger.record(operation);
        }

        StreamUpdate {
            detected_edits: observation.detected,
            in_progress_edits: self.tracker.writing(),
            complete_edits: self.ledger.entries().to_vec(),
            file_states: self.tracker.file_states(),
            parse,
        }
    }

    /// Parse the current buffer without touching lifecycle state.
    #[must_use]
    pub fn parse(&self) -> ParseResult {
        self.extractor.parse(self.buffer.as_str())
    }

    /// Lifecycle state of the edit `operation` belongs to.
    #[must_use]
    pub fn state_of(&self, operation: &EditOperation) -> Option<EditState> {
        self.tracker.state_of_operation(operation)
    }

    /// Text accumulated so far.
    #[must_use]
    pub fn buffer(&self) -> &str {
        self.buffer.as_str()
    }

    /// Completed edits recorded this turn.
    #[must_use]
    pub fn completed(&self) -> &[EditOperation] {
        self.ledger.entries()
    }

    /// Active settings.
    #[must_use]
    pub fn settings(&self) -> &ExtractorSettings {
        self.extractor.settings()
    }
}
