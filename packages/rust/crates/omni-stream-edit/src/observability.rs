//! Structured event ids for tracing.

/// Event ids emitted as the `event` field of every tracing record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractEvent {
    /// Session buffer and state were cleared.
    SessionReset,
    /// A chunk was appended to the buffer.
    ChunkAppended,
    /// A strategy produced operations.
    StrategyMatched,
    /// A strategy returned an error.
    StrategyFailed,
    /// A full-file marker was seen.
    FullFileDetected,
    /// A replace marker had no code block in range.
    PairMalformed,
    /// A new edit key was first seen.
    EditDetected,
    /// A tracked edit picked up an additional lifecycle key.
    EditRekeyed,
    /// An edit reached the complete state.
    EditCompleted,
    /// A completed edit matched an existing ledger entry.
    LedgerDuplicate,
}

impl ExtractEvent {
    /// Every event, in declaration order.
    pub const ALL: [Self; 10] = [
        Self::SessionReset,
        Self::ChunkAppended,
        Self::StrategyMatched,
        Self::StrategyFailed,
        Self::FullFileDetected,
        Self::PairMalformed,
        Self::EditDetected,
        Self::EditRekeyed,
        Self::EditCompleted,
        Self::LedgerDuplicate,
    ];

    /// Stable id used in logs.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SessionReset => "stream_edit.session.reset",
            Self::ChunkAppended => "stream_edit.chunk.appended",
            Self::StrategyMatched => "stream_edit.strategy.matched",
            Self::StrategyFailed => "stream_edit.strategy.failed",
            Self::FullFileDetected => "stream_edit.guard.full_file_detected",
            Self::PairMalformed => "stream_edit.pair.malformed",
            Self::EditDetected => "stream_edit.edit.detected",
            Self::EditRekeyed => "stream_edit.edit.rekeyed",
            Self::EditCompleted => "stream_edit.edit.completed",
            Self::LedgerDuplicate => "stream_edit.ledger.duplicate",
        }
    }
}
