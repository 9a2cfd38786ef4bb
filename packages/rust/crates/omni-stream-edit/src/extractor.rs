//! One stateless parse of a whole buffer.
//!
//! Guard, strategy chain and malformed-pair check run over the same scan of
//! fences and markers. Nothing here fails: every problem becomes a diagnostic
//! on the [`ParseResult`].

use crate::cleaner::CodeCleaner;
use crate::fence::scan_fences;
use crate::guard::find_full_file_markers;
use crate::markers::{find_markers, malformed_pairs, replace_markers};
use crate::observability::ExtractEvent;
use crate::settings::ExtractorSettings;
use crate::strategy::{StrategyChain, StrategyInput};
use crate::types::ParseResult;

/// Settings, strategy chain and cleaner bundled for parsing.
#[derive(Debug)]
pub struct Extractor {
    settings: ExtractorSettings,
    chain: StrategyChain,
    cleaner: CodeCleaner,
}

impl Default for Extractor {
    fn default() -> Self {
        Self::new(ExtractorSettings::default())
    }
}

impl Extractor {
    /// Standard chain and cleaner.
    #[must_use]
    pub fn new(settings: ExtractorSettings) -> Self {
        Self {
            settings,
            chain: StrategyChain::standard(),
            cleaner: CodeCleaner::new(),
        }
    }

    /// Replace the strategy chain.
    #[must_use]
    pub fn with_chain(mut self, chain: StrategyChain) -> Self {
        self.chain = chain;
        self
    }

    /// Replace the code cleaner.
    #[must_use]
    pub fn with_cleaner(mut self, cleaner: CodeCleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Active settings.
    #[must_use]
    pub fn settings(&self) -> &ExtractorSettings {
        &self.settings
    }

    /// Parse `text` from scratch.
    #[must_use]
    pub fn parse(&self, text: &str) -> ParseResult {
        let mut result = ParseResult::default();

        for marker in find_full_file_markers(text) {
            tracing::warn!(
                event = ExtractEvent::FullFileDetected.as_str(),
                offset = marker.offset,
                file_path = marker.file_path.as_deref().unwrap_or_default(),
                "full file marker in response"
            );
            result.push_error(marker.diagnostic());
        }

        let fences = scan_fences(text);
        let finds = find_markers(text, &fences);
        let replaces = replace_markers(text, &fences);
        let input = StrategyInput {
            text,
            fences: &fences,
            find_markers: &finds,
            replace_markers: &replaces,
            settings: &self.settings,
            cleaner: &self.cleaner,
        };

        let outcome = self.chain.run(&input);
        for diagnostic in outcome.diagnostics {
            result.push_error(diagnostic);
        }
        result.operations = outcome.operations;

        for diagnostic in malformed_pairs(text, &fences, self.settings.malformed_lookahead) {
            tracing::warn!(
                event = ExtractEvent::PairMalformed.as_str(),
                diagnostic = %diagnostic,
                "malformed edit pair"
            );
            result.push_error(diagnostic);
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_match_is_not_an_error() {
        let result = Extractor::default().parse("Just an explanation, no code.");
        assert!(result.operations.is_empty());
        assert!(!result.has_errors);
    }

    #[test]
    fn test_full_file_marker_does_not_block_extraction() {
        let text = "// Complete file: App.tsx\nFind:\n```\na = 1\n```\nReplace with:\n```\na = 2\n```\n";
        let result = Extractor::default().parse(text);
        assert!(result.has_errors);
        assert!(result.errors[0].contains("App.tsx"));
        assert_eq!(result.operations.len(), 1);
    }

    #[test]
    fn test_malformed_pair_is_diagnostic() {
        let text = "Find:\n```\na = 1\n```\nReplace with: just make it two instead.\n";
        let result = Extractor::default().parse(text);
        assert!(result.has_errors);
        assert!(result.errors.iter().any(|e| e.contains("Malformed edit pair")));
        assert_eq!(result.operations.len(), 1);
    }
}
