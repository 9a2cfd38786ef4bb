//! Tests for cleaner module - prose removal and pluggable classifiers.

use omni_stream_edit::{CodeCleaner, CodeShapeClassifier, LineClassifier, LineVerdict};

/// Keeps only lines a shell script would contain.
struct ShellClassifier;

impl LineClassifier for ShellClassifier {
    fn classify(&self, line: &str) -> LineVerdict {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') || line.starts_with("echo ") {
            LineVerdict::Keep
        } else {
            LineVerdict::Drop
        }
    }
}

#[test]
fn test_python_block_with_leaked_explanation() {
    let block = "Here's the fix for the loop.\nfor item in items:\n    total += item.price\n\nreturn total\nNow we return the sum.";
    assert_eq!(
        CodeCleaner::new().clean(block),
        "for item in items:\n    total += item.price\n\nreturn total"
    );
}

#[test]
fn test_jsx_and_comments_survive() {
    let block = "// Render the list\n<ul>\n  {items.map(i => <li key={i}>{i}</li>)}\n</ul>";
    assert_eq!(CodeCleaner::new().clean(block), block);
}

#[test]
fn test_custom_classifier_struct() {
    let cleaner = CodeCleaner::with_classifier(ShellClassifier);
    let block = "# setup\necho start\nmake all\necho done";
    assert_eq!(cleaner.clean(block), "# setup\necho start\necho done");
}

#[test]
fn test_narrative_pass_runs_before_classifier() {
    let keep_all = |_: &str| LineVerdict::Keep;
    let cleaner = CodeCleaner::with_classifier(keep_all);
    assert_eq!(cleaner.clean("Looking at the code:\nx"), "x");
}

#[test]
fn test_default_classifier_is_code_shape() {
    assert_eq!(
        CodeShapeClassifier.classify("return value;"),
        LineVerdict::Keep
    );
    assert_eq!(
        CodeShapeClassifier.classify("This keeps the totals consistent across pages"),
        LineVerdict::Drop
    );
}
