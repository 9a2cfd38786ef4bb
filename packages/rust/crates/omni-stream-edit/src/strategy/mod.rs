//! Extraction strategies and their fixed-priority chain.
//!
//! Each strategy is a plain function from the scanned buffer to zero or more
//! candidate operations. The chain stops at the first strategy that yields
//! anything; results from different strategies are never mixed.

mod explicit_pair;
mod naive_two_block;
mod relaxed_pair;
mod single_block;

use crate::cleaner::CodeCleaner;
use crate::context::{
    choose_name, file_path_comment, recover_prose, snippet_of, strip_file_path_comment,
    window_before,
};
use crate::error::ExtractError;
use crate::fence::{FENCE, Fence, next_fence_from};
use crate::markers::Marker;
use crate::observability::ExtractEvent;
use crate::settings::ExtractorSettings;
use crate::types::{EditKind, EditOperation, EditTarget};

/// Everything a strategy may look at, scanned once per parse.
#[derive(Debug)]
pub struct StrategyInput<'a> {
    /// Whole accumulated buffer.
    pub text: &'a str,
    /// Fences in the buffer, in order.
    pub fences: &'a [Fence<'a>],
    /// Find markers outside fences.
    pub find_markers: &'a [Marker],
    /// Replace markers outside fences.
    pub replace_markers: &'a [Marker],
    /// Active settings.
    pub settings: &'a ExtractorSettings,
    /// Cleaner applied to every captured block.
    pub cleaner: &'a CodeCleaner,
}

impl<'a> StrategyInput<'a> {
    /// Fence opening right after `pos`, with only whitespace in between.
    pub(crate) fn fence_right_after(&self, pos: usize) -> Option<&'a Fence<'a>> {
        next_fence_from(self.fences, pos).filter(|fence| self.text[pos..fence.start].trim().is_empty())
    }

    /// Whether nothing but whitespace (or a half-written delimiter) follows `pos`.
    pub(crate) fn tail_is_pending(&self, pos: usize) -> bool {
        let tail = self.text[pos..].trim();
        tail.is_empty() || FENCE.starts_with(tail)
    }
}

/// Signature shared by every strategy.
pub type StrategyFn = fn(&StrategyInput<'_>) -> Result<Vec<EditOperation>, ExtractError>;

/// One named entry in the chain.
#[derive(Clone, Copy)]
pub struct Strategy {
    /// Stable name used in logs and diagnostics.
    pub name: &'static str,
    /// The matching function.
    pub extract: StrategyFn,
}

impl std::fmt::Debug for Strategy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Strategy").field("name", &self.name).finish()
    }
}

/// Result of running the chain once.
#[derive(Debug, Default)]
pub struct ChainOutcome {
    /// Strategy that produced the operations, if any did.
    pub strategy: Option<&'static str>,
    /// Candidate operations from the winning strategy.
    pub operations: Vec<EditOperation>,
    /// Failures from strategies that errored along the way.
    pub diagnostics: Vec<String>,
}

/// Ordered list of strategies; first non-empty result wins.
#[derive(Debug, Clone)]
pub struct StrategyChain {
    strategies: Vec<Strategy>,
}

impl Default for StrategyChain {
    fn default() -> Self {
        Self::standard()
    }
}

impl StrategyChain {
    /// Explicit pair, relaxed pair, single block, naive two-block.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Strategy {
                name: explicit_pair::NAME,
                extract: explicit_pair::extract,
            },
            Strategy {
                name: relaxed_pair::NAME,
                extract: relaxed_pair::extract,
            },
            Strategy {
                name: single_block::NAME,
                extract: single_block::extract,
            },
            Strategy {
                name: naive_two_block::NAME,
                extract: naive_two_block::extract,
            },
        ])
    }

    /// Chain with a caller-chosen order.
    #[must_use]
    pub fn new(strategies: Vec<Strategy>) -> Self {
        Self { strategies }
    }

    /// Strategy names in priority order.
    #[must_use]
    pub fn names(&self) -> Vec<&'static str> {
        self.strategies.iter().map(|s| s.name).collect()
    }

    /// Run strategies in order until one yields operations.
    ///
    /// A failing strategy is recorded as a diagnostic and the chain moves on.
    #[must_use]
    pub fn run(&self, input: &StrategyInput<'_>) -> ChainOutcome {
        let mut outcome = ChainOutcome::default();
        for strategy in &self.strategies {
            match (strategy.extract)(input) {
                Ok(operations) if !operations.is_empty() => {
                    tracing::debug!(
                        event = ExtractEvent::StrategyMatched.as_str(),
                        strategy = strategy.name,
                        count = operations.len(),
                        "strategy matched"
                    );
                    outcome.strategy = Some(strategy.name);
                    outcome.operations = operations;
                    return outcome;
                }
                Ok(_) => {}
                Err(error) => {
                    tracing::warn!(
                        event = ExtractEvent::StrategyFailed.as_str(),
                        strategy = strategy.name,
                        error = %error,
                        "strategy failed"
                    );
                    outcome.diagnostics.push(error.to_string());
                }
            }
        }
        outcome
    }
}

/// One side of a find/replace pair as seen in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Block<'a> {
    /// No fence yet.
    Missing,
    /// Fence opened, closing delimiter not yet streamed.
    Open(&'a str),
    /// Complete fence body.
    Closed(&'a str),
}

impl<'a> Block<'a> {
    pub(crate) fn from_fence(fence: Option<&Fence<'a>>) -> Self {
        match fence {
            None => Self::Missing,
            Some(fence) if fence.closed => Self::Closed(fence.body),
            Some(fence) => Self::Open(fence.body),
        }
    }

    /// Usable code: only a closed body counts.
    fn code(self) -> Option<&'a str> {
        match self {
            Self::Closed(body) => Some(body),
            _ => None,
        }
    }

    /// Lines that have fully streamed. A half-written line could name the
    /// wrong symbol or path, so it is left out.
    fn settled(self) -> &'a str {
        match self {
            Self::Missing => "",
            Self::Closed(body) => body,
            Self::Open(body) => body.rfind('\n').map_or("", |idx| &body[..idx]),
        }
    }
}

/// How a strategy wants one operation assembled.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Candidate<'a> {
    /// Where the edit's own text starts (marker or fence line).
    pub origin: usize,
    /// Offset the prose window ends at.
    pub anchor: usize,
    /// Code to find.
    pub old: Block<'a>,
    /// Replacement code.
    pub new: Block<'a>,
    /// Strategy confidence.
    pub confidence: u8,
    /// Kind used when the prose implies none.
    pub default_kind: EditKind,
}

/// Assemble an operation: prose context, cleaned code, target and kind.
pub(crate) fn build_operation(input: &StrategyInput<'_>, candidate: Candidate<'_>) -> EditOperation {
    let settings = input.settings;
    let window = window_before(input.text, input.fences, candidate.anchor, settings.context_window);
    let prose = recover_prose(window, settings.max_description_len);

    let comment_path = file_path_comment(candidate.new.settled())
        .or_else(|| file_path_comment(candidate.old.settled()));
    let old_code = input.cleaner.clean_optional(candidate.old.code().map(strip_file_path_comment));
    let new_code = candidate
        .new
        .code()
        .map(|code| input.cleaner.clean(strip_file_path_comment(code)))
        .unwrap_or_default();

    let name = choose_name(
        prose.name_hint.as_deref(),
        &[candidate.old.settled(), candidate.new.settled()],
    );
    let snippet_source = match candidate.old {
        Block::Missing => candidate.new,
        old => old,
    };
    let code_snippet = snippet_of(
        &input
            .cleaner
            .clean(strip_file_path_comment(snippet_source.settled())),
    );

    let description = if prose.description.is_empty() {
        name.as_ref().map(|name| format!("Edit {name}")).unwrap_or_default()
    } else {
        prose.description
    };

    EditOperation {
        kind: prose.kind_hint.unwrap_or(candidate.default_kind),
        file_path: comment_path
            .or(prose.file_path)
            .unwrap_or_else(|| settings.unknown_file_path.clone()),
        target: EditTarget {
            name,
            code_snippet,
            line_range: prose.line_range,
            json_path: prose.json_path,
        },
        old_code,
        new_code,
        description,
        confidence: candidate.confidence,
        source_offset: Some(candidate.origin),
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_standard_order() {
        assert_eq!(
            StrategyChain::standard().names(),
            vec!["explicit_pair", "relaxed_pair", "single_block", "naive_two_block"]
        );
    }

    #[test]
    fn test_failing_strategy_becomes_diagnostic() {
        fn broken(_: &StrategyInput<'_>) -> Result<Vec<EditOperation>, ExtractError> {
            Err(ExtractError::strategy("broken", "span out of order"))
        }
        fn fallback(_: &StrategyInput<'_>) -> Result<Vec<EditOperation>, ExtractError> {
            Ok(Vec::new())
        }
        let chain = StrategyChain::new(vec![
            Strategy {
                name: "broken",
                extract: broken,
            },
            Strategy {
                name: "fallback",
                extract: fallback,
            },
        ]);
        let cleaner = CodeCleaner::new();
        let settings = ExtractorSettings::default();
        let input = StrategyInput {
            text: "",
            fences: &[],
            find_markers: &[],
            replace_markers: &[],
            settings: &settings,
            cleaner: &cleaner,
        };
        let outcome = chain.run(&input);
        assert!(outcome.operations.is_empty());
        assert_eq!(outcome.strategy, None);
        assert_eq!(outcome.diagnostics.len(), 1);
        assert!(outcome.diagnostics[0].contains("span out of order"));
    }

    #[test]
    fn test_open_block_settled_lines() {
        assert_eq!(Block::Open("fn a() {\n  par").settled(), "fn a() {");
        assert_eq!(Block::Open("fn a(").settled(), "");
        assert_eq!(Block::Closed("x").settled(), "x");
    }
}
