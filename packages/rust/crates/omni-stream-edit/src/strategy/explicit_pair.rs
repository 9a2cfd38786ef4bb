//! Strict find/replace pairs.
//!
//! ````text
//! Find this code:
//! ```lang
//! <old>
//! ```
//! Replace with:
//! ```lang
//! <new>
//! ```
//! ````
//!
//! Only whitespace may separate the marker, the fences and the second marker.
//! A pair cut off by the end of the buffer is reported with whatever has
//! streamed so far.

use crate::error::ExtractError;
use crate::types::{EditKind, EditOperation};

use super::{Block, Candidate, StrategyInput, build_operation};

pub(super) const NAME: &str = "explicit_pair";
pub(super) const CONFIDENCE: u8 = 80;

pub(super) fn extract(input: &StrategyInput<'_>) -> Result<Vec<EditOperation>, ExtractError> {
    let mut operations = Vec::new();

    for find in input.find_markers {
        let Some(old_fence) = input.fence_right_after(find.end) else {
            continue;
        };
        let candidate = |old, new| Candidate {
            origin: find.start,
            anchor: find.end,
            old,
            new,
            confidence: CONFIDENCE,
            default_kind: EditKind::Replace,
        };

        if !old_fence.closed {
            operations.push(build_operation(
                input,
                candidate(Block::Open(old_fence.body), Block::Missing),
            ));
            continue;
        }

        let replace = input.replace_markers.iter().find(|marker| {
            marker.start >= old_fence.end && input.text[old_fence.end..marker.start].trim().is_empty()
        });
        let Some(replace) = replace else {
            if input.tail_is_pending(old_fence.end) {
                operations.push(build_operation(
                    input,
                    candidate(Block::Closed(old_fence.body), Block::Missing),
                ));
            }
            continue;
        };

        let new = match input.fence_right_after(replace.end) {
            Some(new_fence) if new_fence.start < old_fence.end => {
                return Err(ExtractError::strategy(
                    NAME,
                    format!(
                        "replacement block at byte {} starts before the original block ends",
                        new_fence.start
                    ),
                ));
            }
            Some(new_fence) => Block::from_fence(Some(new_fence)),
            None if input.tail_is_pending(replace.end) => Block::Missing,
            None => continue,
        };
        operations.push(build_operation(
            input,
            candidate(Block::Closed(old_fence.body), new),
        ));
    }

    Ok(operations)
}
