//! Last resort: two bare fences read as before/after.
//!
//! Used when the producer wrote no markers at all. The first fence is the
//! original code and the second its replacement; any further fences are
//! ignored.

use crate::error::ExtractError;
use crate::types::{EditKind, EditOperation};

use super::{Block, Candidate, StrategyInput, build_operation};

pub(super) const NAME: &str = "naive_two_block";
pub(super) const CONFIDENCE: u8 = 60;

pub(super) fn extract(input: &StrategyInput<'_>) -> Result<Vec<EditOperation>, ExtractError> {
    if !input.find_markers.is_empty() || !input.replace_markers.is_empty() {
        return Ok(Vec::new());
    }
    let [old, new, ..] = input.fences else {
        return Ok(Vec::new());
    };

    Ok(vec![build_operation(
        input,
        Candidate {
            origin: old.start,
            anchor: old.start,
            old: Block::from_fence(Some(old)),
            new: Block::from_fence(Some(new)),
            confidence: CONFIDENCE,
            default_kind: EditKind::Replace,
        },
    )])
}
