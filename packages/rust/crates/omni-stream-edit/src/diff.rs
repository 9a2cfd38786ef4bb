//! Diff preview for extracted edits.
//!
//! Uses the `similar` crate to render `old_code` -> `new_code` line by line.

use similar::{ChangeTag, TextDiff};

/// Lines of unchanged context kept around each change group.
const CONTEXT_LINES: usize = 3;

/// Generate a unified-style diff between two snippets.
///
/// Groups are separated by `...`. A missing trailing newline is normalized so
/// every rendered line ends with `\n`.
#[must_use]
pub fn generate_unified_diff(original: &str, modified: &str) -> String {
    let diff = TextDiff::from_lines(original, modified);
    let mut output = String::new();

    for (idx, group) in diff.grouped_ops(CONTEXT_LINES).iter().enumerate() {
        if idx > 0 {
            output.push_str("...\n");
        }
        for op in group {
            for change in diff.iter_changes(op) {
                output.push(match change.tag() {
                    ChangeTag::Delete => '-',
                    ChangeTag::Insert => '+',
                    ChangeTag::Equal => ' ',
                });
                output.push_str(change.value());
                if change.missing_newline() {
                    output.push('\n');
                }
            }
        }
    }

    output
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changed_body() {
        let diff = generate_unified_diff(
            "function f(x) {\n  return x;\n}",
            "function f(x) {\n  return x > 0;\n}",
        );
        assert!(diff.contains("-  return x;\n"));
        assert!(diff.contains("+  return x > 0;\n"));
        assert!(diff.contains(" function f(x) {\n"));
    }

    #[test]
    fn test_name_only_edit_is_all_insertions() {
        let diff = generate_unified_diff("", "def run():\n    pass\n");
        assert!(diff.lines().all(|line| line.starts_with('+')));
    }

    #[test]
    fn test_identical_is_empty() {
        assert!(generate_unified_diff("same\n", "same\n").is_empty());
    }
}
