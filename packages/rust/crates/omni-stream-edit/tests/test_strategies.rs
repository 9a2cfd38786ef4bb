//! Tests for the strategy chain - priority and fallback through the public parser.

use omni_stream_edit::{EditKind, Extractor, ExtractorSettings};

fn parse(text: &str) -> omni_stream_edit::ParseResult {
    Extractor::new(ExtractorSettings::default()).parse(text)
}

#[test]
fn test_two_bare_fences_use_naive_fallback() {
    let text = "Before:\n```\ncount = 0\n```\nAfter:\n```\ncount = 1\n```\n";
    let result = parse(text);
    assert_eq!(result.operations.len(), 1);
    assert_eq!(result.operations[0].confidence, 60);
    assert_eq!(result.operations[0].old_code.as_deref(), Some("count = 0"));
    assert_eq!(result.operations[0].new_code, "count = 1");
    assert!(!result.has_errors);
}

#[test]
fn test_explicit_pair_wins_over_fallbacks() {
    let text = "In lib.rs:\nFind:\n```rust\nfn a() {}\n```\nReplace with:\n```rust\nfn a() { b(); }\n```\n";
    let result = parse(text);
    assert_eq!(result.operations.len(), 1);
    assert_eq!(result.operations[0].confidence, 80);
    assert_eq!(result.operations[0].file_path, "lib.rs");
    assert_eq!(result.operations[0].target.name.as_deref(), Some("a"));
}

#[test]
fn test_relaxed_pair_when_prose_interrupts() {
    let text = "Find this code:\n```\nlet x = 1;\n```\nThis needs a wider range.\nReplace with:\n```\nlet x = 10;\n```\n";
    let result = parse(text);
    assert_eq!(result.operations.len(), 1);
    assert_eq!(result.operations[0].confidence, 75);
    assert_eq!(result.operations[0].new_code, "let x = 10;");
}

#[test]
fn test_single_block_named_by_prose() {
    let text = "Let me add a retry to the fetchUser function in api.ts:\n```ts\nexport async function fetchUser(id: string) {\n  return retry(() => get(`/users/${id}`));\n}\n```\n";
    let result = parse(text);
    assert_eq!(result.operations.len(), 1);
    let op = &result.operations[0];
    assert_eq!(op.confidence, 70);
    assert_eq!(op.kind, EditKind::Insert);
    assert_eq!(op.file_path, "api.ts");
    assert_eq!(op.target.name.as_deref(), Some("fetchUser"));
    assert!(op.is_complete());
}

#[test]
fn test_prose_inside_fence_is_cleaned() {
    let text = "Find this code:\n```\nLooking at this, the check is wrong.\nif (a > b) {\n```\nReplace with:\n```\nif (a >= b) {\nThe issue is the off-by-one.\n```\n";
    let result = parse(text);
    assert_eq!(result.operations[0].old_code.as_deref(), Some("if (a > b) {"));
    assert_eq!(result.operations[0].new_code, "if (a >= b) {");
}

#[test]
fn test_no_fences_no_operations() {
    let result = parse("The function looks fine to me, no change needed.");
    assert!(result.operations.is_empty());
    assert!(!result.has_errors);
}

#[test]
fn test_line_range_and_preview() {
    let text = "In main.py, lines 3-4:\nFind:\n```\nx = 1\ny = 2\n```\nReplace with:\n```\nx = 1\ny = 3\n```\n";
    let result = parse(text);
    let op = &result.operations[0];
    let range = op.target.line_range.expect("line range");
    assert_eq!((range.start, range.end), (3, 4));
    let diff = op.preview_diff();
    assert!(diff.contains("-y = 2"));
    assert!(diff.contains("+y = 3"));
}

#[test]
fn test_unpaired_replace_markers_keep_every_block() {
    let text = "In utils.ts, the updated helpers.\nUpdated code:\n```\nfunction alpha() {\n  return 1;\n}\n```\nUpdated code:\n```\nfunction beta() {\n  return 2;\n}\n```\n";
    let result = parse(text);
    assert!(!result.has_errors, "{:?}", result.errors);
    let names: Vec<_> = result
        .operations
        .iter()
        .map(|op| op.target.name.as_deref())
        .collect();
    assert_eq!(names, vec![Some("alpha"), Some("beta")]);
    assert!(result.operations.iter().all(|op| op.is_complete()));
    assert!(result.operations.iter().all(|op| op.file_path == "utils.ts"));
    assert!(result.operations.iter().all(|op| op.confidence == 70));
}
