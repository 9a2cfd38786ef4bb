//! Loose find/replace pairs.
//!
//! Same contract as the strict pair, but prose may sit between a marker and
//! its fence or between the two halves. Each find marker claims the nearest
//! fence after it, then the nearest replace marker and fence after that, all
//! before the next find marker.

use crate::error::ExtractError;
use crate::fence::next_fence_from;
use crate::types::{EditKind, EditOperation};

use super::{Block, Candidate, StrategyInput, build_operation};

pub(super) const NAME: &str = "relaxed_pair";
pub(super) const CONFIDENCE: u8 = 75;

pub(super) fn extract(input: &StrategyInput<'_>) -> Result<Vec<EditOperation>, ExtractError> {
    let mut operations = Vec::new();

    for (idx, find) in input.find_markers.iter().enumerate() {
        let limit = input
            .find_markers
            .get(idx + 1)
            .map_or(input.text.len(), |next| next.start);

        let Some(old_fence) =
            next_fence_from(input.fences, find.end).filter(|fence| fence.start < limit)
        else {
            continue;
        };

        let new = if old_fence.closed {
            let replace = input
                .replace_markers
                .iter()
                .find(|marker| marker.start >= old_fence.end && marker.start < limit);
            let new_fence = replace.and_then(|marker| {
                next_fence_from(input.fences, marker.end).filter(|fence| fence.start < limit)
            });
            if let Some(fence) = new_fence.filter(|fence| fence.start < old_fence.end) {
                return Err(ExtractError::strategy(
                    NAME,
                    format!(
                        "replacement block at byte {} overlaps the original block",
                        fence.start
                    ),
                ));
            }
            Block::from_fence(new_fence)
        } else {
            Block::Missing
        };

        operations.push(build_operation(
            input,
            Candidate {
                origin: find.start,
                anchor: find.end,
                old: Block::from_fence(Some(old_fence)),
                new,
                confidence: CONFIDENCE,
                default_kind: EditKind::Replace,
            },
        ));
    }

    Ok(operations)
}
