//! Fences treated as replacements for named targets.
//!
//! A lone fence always qualifies. Several fences qualify only when the
//! producer wrote edit markers that no find marker paired up (for example a
//! run of "Updated code:" blocks); bare fences without any marker are left to
//! the naive two-block reading. Each fence's target is whatever its own prose
//! or code names, and confidence drops when neither does.

use crate::error::ExtractError;
use crate::types::{EditKind, EditOperation};

use super::{Block, Candidate, StrategyInput, build_operation};

pub(super) const NAME: &str = "single_block";
pub(super) const CONFIDENCE_NAMED: u8 = 70;
pub(super) const CONFIDENCE_UNNAMED: u8 = 50;

pub(super) fn extract(input: &StrategyInput<'_>) -> Result<Vec<EditOperation>, ExtractError> {
    let has_markers = !input.find_markers.is_empty() || !input.replace_markers.is_empty();
    match input.fences {
        [] => return Ok(Vec::new()),
        [_] => {}
        _ if has_markers => {}
        _ => return Ok(Vec::new()),
    }

    let mut operations = Vec::with_capacity(input.fences.len());
    let mut last_path: Option<String> = None;
    for fence in input.fences {
        let mut operation = build_operation(
            input,
            Candidate {
                origin: fence.start,
                anchor: fence.start,
                old: Block::Missing,
                new: Block::from_fence(Some(fence)),
                confidence: CONFIDENCE_UNNAMED,
                default_kind: EditKind::Update,
            },
        );
        if operation.target.name.is_some() {
            operation.confidence = CONFIDENCE_NAMED;
        }
        // Later blocks usually omit the file the first one announced.
        if operation.file_path == input.settings.unknown_file_path {
            if let Some(path) = &last_path {
                operation.file_path.clone_from(path);
            }
        } else {
            last_path = Some(operation.file_path.clone());
        }
        operations.push(operation);
    }
    Ok(operations)
}
