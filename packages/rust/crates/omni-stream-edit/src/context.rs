//! Recovery of edit metadata from the prose around a block.
//!
//! The producer names the file, the symbol and the intent in free text
//! ("I'll update the validateInput function in utils.ts."). Everything here
//! is best-effort: a miss leaves the field empty and never fails the parse.

use std::sync::LazyLock;

use regex::Regex;

use crate::fence::Fence;
use crate::pattern::{char_prefix, compile_regex, floor_char_boundary};
use crate::types::{EditKind, LineRange};

macro_rules! file_ext {
    () => {
        r"(?:tsx|ts|jsx|js|mjs|cjs|py|rs|go|java|kt|swift|rb|php|cpp|cc|c|hpp|h|cs|css|scss|sass|less|html|vue|svelte|json|yaml|yml|toml|md|sql|sh|xml)"
    };
}

static FILE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(concat!(
        r"(?im)(?:^|[\s*(])(?:in|file|path|filename)[ \t]*:[ \t]*[*`'\x22]*((?:[\w@.-]+/)*[\w.-]*\w\.",
        file_ext!(),
        r")\b"
    ))
});

static FILE_MENTION: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(concat!(
        r"(?i)(?:^|[\s(`'\x22*])((?:[\w@.-]+/)*[\w.-]*\w\.",
        file_ext!(),
        r")\b"
    ))
});

static FILE_COMMENT: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(concat!(
        r"(?i)^\s*(?://+|#+|/\*+|<!--|--)\s*(?:(?:file(?:name)?|path)\s*:\s*)?((?:[\w@.-]+/)*[\w.-]*\w\.",
        file_ext!(),
        r")\b[^\n]*$"
    ))
});

static ACTION_PHRASE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?im)(?:^|[.!?:][ \t]+)[ \t*_>-]*((?:I['’]ll|I will|I['’]m going to|I am going to|Let me|Let['’]s|We['’]ll|We need to|Now I['’]ll|Next,? I['’]ll|Modifying|Updating|Adding|Fixing|Changing|Refactoring|Removing|Replacing|Renaming|Inserting|Deleting)\b[^\n]*)",
    )
});

static INSERT_VERB: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?i)\b(?:add|adding|insert|inserting|append|appending)\b"));

static DELETE_VERB: LazyLock<Regex> =
    LazyLock::new(|| compile_regex(r"(?i)\b(?:remove|removing|delete|deleting)\b"));

static PROSE_NAME_BEFORE_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?i)\b(?:the[ \t]+)?[`'\x22]?([A-Za-z_$][\w$]*)[`'\x22]?(?:\(\))?[ \t]+(?:function|method|component|class|hook|handler|struct|enum|trait|module|interface|type|constant|variable)\b",
    )
});

static PROSE_NAME_AFTER_NOUN: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(
        r"(?i)\b(?:function|method|component|class|hook|struct|enum|trait|interface)[ \t]+[`'\x22]?([A-Za-z_$][\w$]*)",
    )
});

static LINE_RANGE: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r"(?i)\blines?[ \t]+(\d+)(?:[ \t]*(?:-|–|to|through)[ \t]*(\d+))?")
});

static JSON_PATH: LazyLock<Regex> = LazyLock::new(|| {
    compile_regex(r"(?i)\bjson[ \t_-]*path[ \t]*:?[ \t]*[`'\x22]?([$\w.\[\]-]+)")
});

static CODE_NAME: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"^\s*(?:export\s+)?(?:default\s+)?(?:async\s+)?function\s*\*?\s*([A-Za-z_$][\w$]*)",
        r"^\s*(?:export\s+)?(?:const|let|var)\s+([A-Za-z_$][\w$]*)\s*(?::[^=]+)?=",
        r"^\s*(?:export\s+)?(?:default\s+)?(?:abstract\s+)?class\s+([A-Za-z_$][\w$]*)",
        r"^\s*(?:async\s+)?def\s+([A-Za-z_]\w*)",
        r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:const\s+)?(?:async\s+)?(?:unsafe\s+)?fn\s+([A-Za-z_]\w*)",
        r"^\s*(?:pub(?:\([^)]*\))?\s+)?(?:struct|enum|trait|mod)\s+([A-Za-z_]\w*)",
        r"^\s*(?:export\s+)?(?:interface|type|enum)\s+([A-Za-z_$][\w$]*)",
        r"^\s*func\s+(?:\([^)]*\)\s*)?([A-Za-z_]\w*)",
        r"^\s*(?:(?:public|private|protected|static|async|override)\s+)*([A-Za-z_$][\w$]*)\s*\([^)]*\)\s*(?::\s*[^{]+)?\{",
    ]
    .into_iter()
    .map(compile_regex)
    .collect()
});

/// Words that look like identifiers in prose but never name a symbol.
const PROSE_STOP_WORDS: &[&str] = &[
    "the", "a", "an", "this", "that", "these", "those", "new", "same", "following", "existing",
    "whole", "entire", "each", "every", "its", "our", "your", "my", "another", "other",
    "exported", "default", "async", "arrow", "which", "and", "or", "to", "in", "of", "for",
    "with",
];

/// Control-flow words the method pattern must not report as names.
const CODE_KEYWORDS: &[&str] = &[
    "if", "for", "while", "switch", "catch", "function", "return", "match", "with", "elif",
    "else", "loop", "until", "foreach",
];

/// Dotted names that are frameworks, not files.
const NON_FILE_NAMES: &[&str] = &[
    "node.js", "next.js", "vue.js", "react.js", "three.js", "d3.js", "express.js", "nuxt.js",
    "chart.js", "socket.io",
];

/// Metadata recovered from the prose preceding a block.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProseContext {
    /// File path named in the prose.
    pub file_path: Option<String>,
    /// Action phrase, or the last prose line.
    pub description: String,
    /// Symbol named in the prose.
    pub name_hint: Option<String>,
    /// Kind implied by the verbs in the description.
    pub kind_hint: Option<EditKind>,
    /// Line span mentioned.
    pub line_range: Option<LineRange>,
    /// Structured-data path mentioned.
    pub json_path: Option<String>,
}

/// Bounded slice of prose ending at `pos`.
///
/// Starts at most `window` bytes back and never reaches into the previous
/// fence, so one edit's code cannot leak into the next edit's context.
#[must_use]
pub fn window_before<'a>(text: &'a str, fences: &[Fence<'_>], pos: usize, window: usize) -> &'a str {
    let pos = floor_char_boundary(text, pos);
    let mut start = floor_char_boundary(text, pos.saturating_sub(window));
    if let Some(prev_end) = fences.iter().filter(|f| f.end <= pos).map(|f| f.end).max() {
        start = start.max(prev_end);
    }
    &text[start..pos]
}

/// Recover file path, description, name, kind, line range and JSON path.
#[must_use]
pub fn recover_prose(window: &str, max_description_len: usize) -> ProseContext {
    let description = describe(window, max_description_len);
    ProseContext {
        file_path: file_path_in(window),
        name_hint: name_in_prose(window),
        kind_hint: kind_from(&description),
        line_range: line_range_in(window),
        json_path: JSON_PATH
            .captures_iter(window)
            .last()
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str().trim_end_matches('.').to_string()),
        description,
    }
}

/// File path named in prose; explicit `In:`/`File:` labels win over mentions.
#[must_use]
pub fn file_path_in(text: &str) -> Option<String> {
    let last_match = |re: &Regex| {
        re.captures_iter(text)
            .filter_map(|caps| caps.get(1))
            .map(|m| m.as_str())
            .filter(|path| !NON_FILE_NAMES.contains(&path.to_ascii_lowercase().as_str()))
            .last()
            .map(str::to_string)
    };
    last_match(&*FILE_LABEL).or_else(|| last_match(&*FILE_MENTION))
}

/// File path from a leading `// path/to/file.ts` comment inside a block.
#[must_use]
pub fn file_path_comment(code: &str) -> Option<String> {
    let first = code.lines().find(|line| !line.trim().is_empty())?;
    FILE_COMMENT
        .captures(first)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Drop a leading file-path comment line from a block body.
#[must_use]
pub fn strip_file_path_comment(code: &str) -> &str {
    let trimmed = code.trim_start_matches(['\n', '\r']);
    match trimmed.split_once('\n') {
        Some((first, rest)) if FILE_COMMENT.is_match(first) => rest,
        None if FILE_COMMENT.is_match(trimmed) => "",
        _ => code,
    }
}

/// Symbol name declared in a block of code.
#[must_use]
pub fn name_in_code(code: &str) -> Option<String> {
    code.lines().find_map(|line| {
        CODE_NAME.iter().find_map(|re| {
            let name = re.captures(line)?.get(1)?.as_str();
            (!CODE_KEYWORDS.contains(&name)).then(|| name.to_string())
        })
    })
}

/// Symbol named in prose ("the `Header` component", "function parseArgs").
#[must_use]
pub fn name_in_prose(text: &str) -> Option<String> {
    [&*PROSE_NAME_BEFORE_NOUN, &*PROSE_NAME_AFTER_NOUN]
        .iter()
        .flat_map(|re| re.captures_iter(text).filter_map(|caps| caps.get(1)))
        .map(|m| m.as_str())
        .find(|name| !PROSE_STOP_WORDS.contains(&name.to_ascii_lowercase().as_str()))
        .map(str::to_string)
}

/// Pick the symbol name for an edit.
///
/// A prose name is preferred because it is available before any code has
/// streamed, which keeps the lifecycle key stable. It gives way only when the
/// code declares a different symbol and never mentions the prose one.
#[must_use]
pub fn choose_name(prose_hint: Option<&str>, code: &[&str]) -> Option<String> {
    let code_name = || code.iter().find_map(|body| name_in_code(body));
    match prose_hint {
        Some(hint) if code.iter().any(|body| body.contains(hint)) => Some(hint.to_string()),
        Some(hint) => code_name().or_else(|| Some(hint.to_string())),
        None => code_name(),
    }
}

/// First non-blank line of a block, trimmed.
#[must_use]
pub fn snippet_of(code: &str) -> Option<String> {
    code.lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

fn describe(window: &str, max_len: usize) -> String {
    let phrase = ACTION_PHRASE
        .captures_iter(window)
        .filter_map(|caps| caps.get(1))
        .last()
        .map(|m| first_sentence(m.as_str()));

    let text = phrase.unwrap_or_else(|| {
        window
            .lines()
            .rev()
            .map(|line| line.trim().trim_matches(['*', '_', '#', '>', ' ']))
            .find(|line| !line.is_empty() && !crate::markers::is_marker_line(line))
            .unwrap_or_default()
    });
    char_prefix(text.trim(), max_len).to_string()
}

fn first_sentence(text: &str) -> &str {
    let text = text.trim();
    let end = text
        .match_indices(". ")
        .map(|(idx, _)| idx + 1)
        .next()
        .unwrap_or(text.len());
    text[..end].trim_end_matches(':').trim_end()
}

fn kind_from(description: &str) -> Option<EditKind> {
    let insert = INSERT_VERB.find(description).map(|m| m.start());
    let delete = DELETE_VERB.find(description).map(|m| m.start());
    match (insert, delete) {
        (Some(i), Some(d)) if d < i => Some(EditKind::Delete),
        (Some(_), _) => Some(EditKind::Insert),
        (None, Some(_)) => Some(EditKind::Delete),
        (None, None) => None,
    }
}

fn line_range_in(text: &str) -> Option<LineRange> {
    let caps = LINE_RANGE.captures_iter(text).last()?;
    let start: usize = caps.get(1)?.as_str().parse().ok()?;
    let end = caps
        .get(2)
        .and_then(|m| m.as_str().parse().ok())
        .unwrap_or(start);
    Some(LineRange {
        start: start.min(end),
        end: start.max(end),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_path_from_mention() {
        let text = "I'll update the validateInput function in utils.ts.\n";
        assert_eq!(file_path_in(text).as_deref(), Some("utils.ts"));
    }

    #[test]
    fn test_file_label_wins() {
        let text = "Based on helpers.py, here is the fix.\nFile: `src/app/main.py`\n";
        assert_eq!(file_path_in(text).as_deref(), Some("src/app/main.py"));
    }

    #[test]
    fn test_framework_names_are_not_files() {
        assert_eq!(file_path_in("This uses Node.js streams."), None);
    }

    #[test]
    fn test_description_action_phrase() {
        let ctx = recover_prose("Sure. I'll update the validateInput function in utils.ts.\n", 200);
        assert_eq!(ctx.description, "I'll update the validateInput function in utils.ts.");
        assert_eq!(ctx.name_hint.as_deref(), Some("validateInput"));
        assert_eq!(ctx.kind_hint, None);
    }

    #[test]
    fn test_kind_hint() {
        let ctx = recover_prose("Adding a guard clause to the parser.\n", 200);
        assert_eq!(ctx.kind_hint, Some(EditKind::Insert));
        let ctx = recover_prose("Let me remove the unused import.\n", 200);
        assert_eq!(ctx.kind_hint, Some(EditKind::Delete));
    }

    #[test]
    fn test_line_range_and_json_path() {
        let ctx = recover_prose("Change lines 12-18 of config.json at json path: `server.port`.", 200);
        assert_eq!(ctx.line_range, Some(LineRange { start: 12, end: 18 }));
        assert_eq!(ctx.json_path.as_deref(), Some("server.port"));
    }

    #[test]
    fn test_name_in_code() {
        assert_eq!(name_in_code("export async function load(x) {").as_deref(), Some("load"));
        assert_eq!(name_in_code("const Header = () => {").as_deref(), Some("Header"));
        assert_eq!(name_in_code("    def run(self):").as_deref(), Some("run"));
        assert_eq!(name_in_code("pub fn parse(input: &str) {").as_deref(), Some("parse"));
        assert_eq!(name_in_code("if (x) {\n  render() {").as_deref(), Some("render"));
        assert_eq!(name_in_code("x + 1"), None);
    }

    #[test]
    fn test_choose_name() {
        assert_eq!(choose_name(Some("run"), &[""]).as_deref(), Some("run"));
        assert_eq!(choose_name(Some("run"), &["def run():"]).as_deref(), Some("run"));
        assert_eq!(choose_name(Some("other"), &["def run():"]).as_deref(), Some("run"));
        assert_eq!(
            choose_name(Some("validateInput"), &["// check input", ""]).as_deref(),
            Some("validateInput")
        );
        assert_eq!(choose_name(None, &["", "fn go() {}"]).as_deref(), Some("go"));
    }

    #[test]
    fn test_file_path_comment() {
        let code = "// src/lib/api.ts\nexport const x = 1;";
        assert_eq!(file_path_comment(code).as_deref(), Some("src/lib/api.ts"));
        assert_eq!(strip_file_path_comment(code), "export const x = 1;");
        assert_eq!(strip_file_path_comment("let a = 1;"), "let a = 1;");
    }

    #[test]
    fn test_window_stops_at_previous_fence() {
        let text = "In a.ts:\n```\nold\n```\nthen b.ts\nFind:";
        let fences = crate::fence::scan_fences(text);
        let pos = text.find("Find:").expect("marker");
        let window = window_before(text, &fences, pos, 500);
        assert_eq!(window, "then b.ts\n");
    }
}
