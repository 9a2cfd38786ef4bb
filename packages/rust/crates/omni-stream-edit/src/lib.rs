#![allow(clippy::doc_markdown)]

//! omni-stream-edit - Incremental edit extraction for Omni DevEnv
//!
//! Recovers targeted find/replace edits from an assistant's streamed text.
//! The whole buffer is re-parsed on every chunk so that markers and fences
//! split across chunks still pair up, while a per-edit lifecycle makes sure
//! detection and completion are reported once each.
//!
//! # Features
//!
//! - **Strategy Chain**: strict pair, relaxed pair, single block, naive two-block
//! - **Streaming Aware**: unclosed trailing fences are tracked but never applied
//! - **Full-File Guard**: "Complete file:" dumps are flagged for rejection
//! - **Code Cleaner**: prose that leaked into fences is removed by a pluggable classifier
//! - **Lifecycle Tracking**: Detected -> Writing -> Complete, callbacks fire once per edit
//! - **Completed Ledger**: append-only, deduplicated by content signature
//!
//! # Architecture (ODF-REP Compliant)
//!
//! ```text
//! omni-stream-edit/src/
//! ├── lib.rs           # Re-exports (this file)
//! ├── error.rs         # ExtractError enum (thiserror)
//! ├── types.rs         # EditOperation, EditState, ParseResult, StreamUpdate
//! ├── settings.rs      # ExtractorSettings, YAML system/user merge
//! ├── observability.rs # ExtractEvent ids for tracing
//! ├── buffer.rs        # StreamBuffer
//! ├── fence.rs         # Code-fence scanner
//! ├── markers.rs       # Find/replace marker grammar, malformed pairs
//! ├── guard.rs         # Full-file marker guard
//! ├── context.rs       # File path, name and description recovery
//! ├── cleaner.rs       # CodeCleaner + LineClassifier
//! ├── strategy/        # StrategyChain and the four strategies
//! ├── extractor.rs     # One stateless parse
//! ├── tracker.rs       # Lifecycle map + EditObserver
//! ├── ledger.rs        # CompletedLedger
//! ├── session.rs       # EditStreamSession
//! ├── response.rs      # extract_clean_response
//! └── diff.rs          # Diff preview
//! ```
//!
//! # Example
//!
//! ```rust,ignore
//! use omni_stream_edit::{EditStreamSession, RecordingObserver};
//!
//! let mut session = EditStreamSession::new();
//! let mut observer = RecordingObserver::default();
//! for chunk in chunks {
//!     let update = session.append(chunk, &mut observer);
//!     if update.parse.has_errors {
//!         // reject the turn on a full-file violation
//!     }
//! }
//! session.reset();
//! ```

// ============================================================================
// Module Declarations (ODF-REP: Atomic Structure)
// ============================================================================

mod buffer;
mod cleaner;
mod context;
mod diff;
mod error;
mod extractor;
mod fence;
mod guard;
mod ledger;
mod markers;
mod observability;
mod pattern;
mod response;
mod session;
mod settings;
mod strategy;
mod tracker;
mod types;

// ============================================================================
// Public Re-exports
// ============================================================================

pub use buffer::StreamBuffer;
pub use cleaner::{CodeCleaner, CodeShapeClassifier, LineClassifier, LineVerdict};
pub use error::ExtractError;
pub use extractor::Extractor;
pub use guard::{FullFileMarker, find_full_file_markers, has_full_file_marker};
pub use ledger::{CompletedLedger, content_signature};
pub use observability::ExtractEvent;
pub use response::{extract_clean_response, extract_clean_response_with};
pub use session::EditStreamSession;
pub use settings::{
    DEFAULT_CLEAN_RESPONSE_FALLBACK, ExtractorSettings, SettingsFile, UNKNOWN_FILE_PATH,
    load_settings, load_settings_from_paths, settings_paths,
};
pub use strategy::{ChainOutcome, Strategy, StrategyChain, StrategyFn, StrategyInput};
pub use tracker::{
    EditObserver, EditTracker, NoopObserver, Observation, RecordingObserver, lifecycle_key,
};
pub use types::{
    EditKind, EditOperation, EditState, EditTarget, LineRange, ParseResult, StreamUpdate,
};

// Scanning helpers, for callers building their own strategies
pub use context::{ProseContext, recover_prose, window_before};
pub use fence::{Fence, scan_fences};
pub use markers::{Marker, MarkerKind, find_markers, malformed_pairs, replace_markers};

// Re-export diff utility for external use
pub use diff::generate_unified_diff;
