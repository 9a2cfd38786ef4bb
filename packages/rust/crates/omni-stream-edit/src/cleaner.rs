//! Removal of narrative prose that leaked into code blocks.
//!
//! Two passes over every captured block:
//! 1. Known narrative lines ("Looking at...", "The issue is...", repeated
//!    markers, headings) are removed outright.
//! 2. Each remaining line goes through a [`LineClassifier`]; only blank or
//!    code-shaped lines survive.
//!
//! This is a heuristic, not a grammar. Unusual but valid lines (prose-like
//! string continuations, template text) can be dropped.

use std::fmt;
use std::sync::LazyLock;

use regex::Regex;

use crate::fence::FENCE;
use crate::markers::is_marker_line;
use crate::pattern::compile_regex;

static NARRATIVE_LINE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?i)^[ \t]*(?:looking at|the (?:issue|problem|bug|fix|error|change) (?:is|was|here)|this (?:change|fix|will|ensures|should|means|way)|here(?:['’]s| is) (?:the|what|how)|now (?:we|i|let['’]s)|note(?: that)?[:,]|i(?:['’]ll| will| have| need)|let me|finally,)",
    )
});

static HEADING_LINE: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"^[ \t]*(?:#{2,6}[ \t]+\S.*|\*\*[^*\n]+\*\*:?)[ \t]*$"));

static ASSIGNMENT: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r"^[\w$.\[\]'\x22]+[ \t]*(?:[-+*/%&|^]|<<|>>|\?\?|\|\||&&)?=[^=]")
});

static DOTTED_ACCESS: LazyLock<Regex> = LazyLock::new(|| compile_regex(r"\w\.\w"));

/// Leading words that mark a line as code.
const CODE_KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "break", "case", "catch", "class", "const", "continue",
    "def", "default", "defer", "del", "do", "elif", "else", "end", "enum", "except", "export",
    "extends", "extern", "final", "finally", "fn", "for", "from", "func", "function", "go",
    "global", "if", "impl", "implements", "import", "in", "include", "interface", "lambda", "let",
    "loop", "match", "mod", "module", "mut", "namespace", "new", "nonlocal", "package", "pass",
    "private", "protected", "pub", "public", "raise", "require", "return", "self", "static",
    "struct", "super", "switch", "this", "throw", "throws", "trait", "try", "type", "typeof",
    "unsafe", "use", "using", "val", "var", "void", "where", "while", "with", "yield",
];

/// Comment openers, checked against the trimmed line.
const COMMENT_MARKERS: &[&str] = &["//", "/*", "*", "#", "--", "<!--", ";"];

/// Characters that may start a code line.
const LEADING_PUNCT: &str = "{}[]()<>.,;:@!&|+-*/=?'\"`$~^%\\";

/// Characters that may end a code line.
const TRAILING_PUNCT: &str = ";{}()[],\\";

/// Tokens whose presence anywhere marks a line as code.
const CODE_TOKENS: &[&str] = &[
    "(", ")", "{", "}", "[", "]", ";", "=", "=>", "->", "::", "&&", "||", "<", ">", "+", "*",
    "%", "\"", "`",
];

/// Decision for one line of a code block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineVerdict {
    /// Keep the line.
    Keep,
    /// Drop the line as prose.
    Drop,
}

/// Classifies one line of a captured block as code or prose.
pub trait LineClassifier: Send + Sync {
    /// Decide whether `line` stays in the cleaned block.
    fn classify(&self, line: &str) -> LineVerdict;
}

impl<F> LineClassifier for F
where
    F: Fn(&str) -> LineVerdict + Send + Sync,
{
    fn classify(&self, line: &str) -> LineVerdict {
        self(line)
    }
}

/// Default classifier: keeps blank lines and anything with a code-like shape.
#[derive(Debug, Clone, Copy, Default)]
pub struct CodeShapeClassifier;

impl LineClassifier for CodeShapeClassifier {
    fn classify(&self, line: &str) -> LineVerdict {
        if is_code_shaped(line.trim()) {
            LineVerdict::Keep
        } else {
            LineVerdict::Drop
        }
    }
}

fn is_code_shaped(line: &str) -> bool {
    if line.is_empty() || !line.contains(char::is_whitespace) {
        return true;
    }
    if COMMENT_MARKERS.iter().any(|marker| line.starts_with(marker)) {
        return true;
    }
    let first_word = line
        .split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '#'))
        .next()
        .unwrap_or_default();
    if CODE_KEYWORDS.contains(&first_word) {
        return true;
    }
    if ASSIGNMENT.is_match(line) || DOTTED_ACCESS.is_match(line) {
        return true;
    }
    if line.starts_with(|c: char| LEADING_PUNCT.contains(c))
        || line.ends_with(|c: char| TRAILING_PUNCT.contains(c))
    {
        return true;
    }
    CODE_TOKENS.iter().any(|token| line.contains(token))
}

/// Strips narrative text out of captured code.
pub struct CodeCleaner {
    classifier: Box<dyn LineClassifier>,
}

impl Default for CodeCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for CodeCleaner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodeCleaner").finish_non_exhaustive()
    }
}

impl CodeCleaner {
    /// Cleaner using [`CodeShapeClassifier`].
    #[must_use]
    pub fn new() -> Self {
        Self::with_classifier(CodeShapeClassifier)
    }

    /// Cleaner using a custom line classifier.
    #[must_use]
    pub fn with_classifier(classifier: impl LineClassifier + 'static) -> Self {
        Self {
            classifier: Box::new(classifier),
        }
    }

    /// Clean one block. Leading and trailing blank lines are removed.
    #[must_use]
    pub fn clean(&self, code: &str) -> String {
        let kept: Vec<&str> = code
            .lines()
            .map(|line| line.strip_suffix('\r').unwrap_or(line))
            .filter(|line| !is_narrative(line))
            .filter(|line| self.classifier.classify(line) == LineVerdict::Keep)
            .collect();

        let first = kept.iter().position(|line| !line.trim().is_empty());
        let last = kept.iter().rposition(|line| !line.trim().is_empty());
        match (first, last) {
            (Some(first), Some(last)) => kept[first..=last].join("\n"),
            _ => String::new(),
        }
    }

    /// Clean an optional block, mapping an all-prose block to `None`.
    #[must_use]
    pub fn clean_optional(&self, code: Option<&str>) -> Option<String> {
        code.map(|code| self.clean(code)).filter(|code| !code.is_empty())
    }
}

fn is_narrative(line: &str) -> bool {
    let stripped = line.trim();
    if stripped.starts_with(FENCE) {
        return true;
    }
    NARRATIVE_LINE.is_match(line) || HEADING_LINE.is_match(line) || is_marker_line(line)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_passes_through() {
        let code = "function validateInput(x) {\n  return x > 0;\n}";
        assert_eq!(CodeCleaner::new().clean(code), code);
    }

    #[test]
    fn test_narrative_lines_removed() {
        let code = "Looking at the code, the guard is missing.\nif (!user) {\n  return null;\n}\nThe issue is that user can be undefined";
        assert_eq!(
            CodeCleaner::new().clean(code),
            "if (!user) {\n  return null;\n}"
        );
    }

    #[test]
    fn test_markers_and_headings_removed() {
        let code = "## Updated version\nReplace with:\nconst a = 1;\n**Result:**";
        assert_eq!(CodeCleaner::new().clean(code), "const a = 1;");
    }

    #[test]
    fn test_prose_sentence_dropped() {
        let code = "def run(self):\nThis makes the run method safer for callers\n    pass";
        assert_eq!(CodeCleaner::new().clean(code), "def run(self):\n    pass");
    }

    #[test]
    fn test_blank_lines_inside_kept() {
        let code = "\n\nlet a = 1;\n\nlet b = 2;\n\n";
        assert_eq!(CodeCleaner::new().clean(code), "let a = 1;\n\nlet b = 2;");
    }

    #[test]
    fn test_custom_classifier() {
        let cleaner = CodeCleaner::with_classifier(|line: &str| {
            if line.contains("TODO") {
                LineVerdict::Drop
            } else {
                LineVerdict::Keep
            }
        });
        assert_eq!(cleaner.clean("a();\n// TODO later\nb();"), "a();\nb();");
    }

    #[test]
    fn test_all_prose_block_is_none() {
        let cleaner = CodeCleaner::new();
        assert_eq!(cleaner.clean_optional(Some("Looking at this again")), None);
        assert_eq!(cleaner.clean_optional(Some("x = 1")).as_deref(), Some("x = 1"));
    }

    #[test]
    fn test_classifier_shapes() {
        let classifier = CodeShapeClassifier;
        for line in ["", "}", "import os", "x += 1", "obj.method arg", "<div>", "# comment", "else"] {
            assert_eq!(classifier.classify(line), LineVerdict::Keep, "{line}");
        }
        for line in ["We validate the input before saving it", "Hello there friend"] {
            assert_eq!(classifier.classify(line), LineVerdict::Drop, "{line}");
        }
    }
}
