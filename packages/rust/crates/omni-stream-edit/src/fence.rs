//! Markdown code-fence scanner.
//!
//! Walks the buffer line by line and reports every fenced block, including a
//! trailing block whose closing fence has not arrived yet.

/// Fence delimiter.
pub const FENCE: &str = "```";

/// One fenced block located in the buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Fence<'a> {
    /// Byte offset of the opening delimiter line.
    pub start: usize,
    /// Byte offset just past the closing delimiter line (buffer end when open).
    pub end: usize,
    /// Info string after the opening delimiter (language hint).
    pub lang: &'a str,
    /// Text between the delimiters, without the final newline.
    pub body: &'a str,
    /// Whether the closing delimiter has been seen.
    pub closed: bool,
}

impl<'a> Fence<'a> {
    /// Body of a closed fence; `None` while still streaming.
    #[must_use]
    pub fn closed_body(&self) -> Option<&'a str> {
        self.closed.then_some(self.body)
    }
}

/// Find every fenced block in `text`, in order.
#[must_use]
pub fn scan_fences(text: &str) -> Vec<Fence<'_>> {
    let mut fences = Vec::new();
    let mut offset = 0usize;
    // (opener start, body start, lang)
    let mut open: Option<(usize, usize, &str)> = None;

    for line in text.split_inclusive('\n') {
        let line_start = offset;
        offset += line.len();
        let stripped = line.trim();

        match open {
            None => {
                let Some(rest) = stripped.strip_prefix(FENCE) else {
                    continue;
                };
                if let Some(inline_end) = rest.find(FENCE).filter(|_| !rest.starts_with('`')) {
                    // Single-line block: ```code```
                    let body = rest[..inline_end].trim();
                    let body_start = line_start + line.find(body).unwrap_or_default();
                    fences.push(Fence {
                        start: line_start,
                        end: offset,
                        lang: "",
                        body: &text[body_start..body_start + body.len()],
                        closed: true,
                    });
                } else {
                    open = Some((line_start, offset, rest.trim_start_matches('`').trim()));
                }
            }
            Some((start, body_start, lang)) => {
                if stripped.starts_with(FENCE) && stripped.trim_start_matches('`').trim().is_empty() {
                    let body_end = line_start.max(body_start);
                    fences.push(Fence {
                        start,
                        end: offset,
                        lang,
                        body: trim_final_newline(&text[body_start..body_end]),
                        closed: true,
                    });
                    open = None;
                }
            }
        }
    }

    if let Some((start, body_start, lang)) = open {
        fences.push(Fence {
            start,
            end: text.len(),
            lang,
            body: &text[body_start..],
            closed: false,
        });
    }

    fences
}

/// First fence whose opener begins at or after `pos`.
#[must_use]
pub fn next_fence_from<'f, 'a>(fences: &'f [Fence<'a>], pos: usize) -> Option<&'f Fence<'a>> {
    fences.iter().find(|fence| fence.start >= pos)
}

/// Whether `pos` lies inside any fence.
#[must_use]
pub fn inside_fence(fences: &[Fence<'_>], pos: usize) -> bool {
    fences.iter().any(|fence| pos > fence.start && pos < fence.end)
}

fn trim_final_newline(body: &str) -> &str {
    let body = body.strip_suffix('\n').unwrap_or(body);
    body.strip_suffix('\r').unwrap_or(body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_closed_and_open_fences() {
        let text = "intro\n```ts\nconst a = 1;\n```\nmore\n```\nlet b";
        let fences = scan_fences(text);
        assert_eq!(fences.len(), 2);
        assert_eq!(fences[0].lang, "ts");
        assert_eq!(fences[0].body, "const a = 1;");
        assert!(fences[0].closed);
        assert_eq!(fences[1].body, "let b");
        assert!(!fences[1].closed);
        assert_eq!(fences[1].closed_body(), None);
    }

    #[test]
    fn test_empty_body() {
        let fences = scan_fences("```\n```\n");
        assert_eq!(fences.len(), 1);
        assert_eq!(fences[0].body, "");
        assert!(fences[0].closed);
    }

    #[test]
    fn test_inline_fence() {
        let fences = scan_fences("```x = 1```\n");
        assert_eq!(fences.len(), 1);
        assert_eq!(fences[0].body, "x = 1");
    }

    #[test]
    fn test_partial_delimiter_is_not_a_fence() {
        assert!(scan_fences("Replace with:\n``").is_empty());
    }

    #[test]
    fn test_next_fence_from() {
        let text = "```\na\n```\nReplace with:\n```\nb\n```";
        let fences = scan_fences(text);
        let pos = text.find("Replace").expect("marker");
        let next = next_fence_from(&fences, pos).expect("fence");
        assert_eq!(next.body, "b");
        assert!(inside_fence(&fences, 4));
        assert!(!inside_fence(&fences, pos));
    }
}
