//! Response formatting
//!
//! Splits raw model output into narrative text and fenced code segments.
//! Text segments are returned verbatim and are NOT escaped here; the
//! rendering layer must escape them before injecting them into markup.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Shortest triple-backtick region, first match wins at each position.
static FENCE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```(.*?)```").expect("fence pattern is valid"));

/// A bare identifier on the first line of a fence body, read as a language tag.
static LANGUAGE_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Za-z0-9_]+\n").expect("language tag pattern is valid"));

/// A unit of formatted output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum Segment {
    Text(String),
    Code(String),
}

impl Segment {
    pub fn value(&self) -> &str {
        match self {
            Segment::Text(value) | Segment::Code(value) => value,
        }
    }

    pub fn is_code(&self) -> bool {
        matches!(self, Segment::Code(_))
    }
}

/// Split `raw` into text and code segments in source order.
///
/// Only closed fences produce code segments; an unterminated fence stays in
/// the surrounding text. Empty text between pieces is dropped, empty fence
/// bodies are kept as empty code segments.
pub fn format_response(raw: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut cursor = 0;

    for caps in FENCE.captures_iter(raw) {
        let (Some(whole), Some(body)) = (caps.get(0), caps.get(1)) else {
            continue;
        };

        if whole.start() > cursor {
            segments.push(Segment::Text(raw[cursor..whole.start()].to_string()));
        }
        segments.push(Segment::Code(clean_code_body(body.as_str())));
        cursor = whole.end();
    }

    if cursor < raw.len() {
        segments.push(Segment::Text(raw[cursor..].to_string()));
    }

    segments
}

/// Strip a leading language tag line, then trim.
///
/// The tag is stripped even when the line is really code (`x\n...`).
pub fn clean_code_body(body: &str) -> String {
    LANGUAGE_TAG.replace(body, "").trim().to_string()
}

/// Concatenate the code segments, separated by blank lines.
pub fn code_only(segments: &[Segment]) -> String {
    segments
        .iter()
        .filter(|segment| segment.is_code())
        .map(Segment::value)
        .collect::<Vec<_>>()
        .join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Segment {
        Segment::Text(s.to_string())
    }

    fn code(s: &str) -> Segment {
        Segment::Code(s.to_string())
    }

    // ============================================================================
    // Fixtures
    // ============================================================================

    #[test]
    fn test_tagged_fence_between_text() {
        let segments = format_response("Here:\n```python\nprint(1)\n```\nDone");
        assert_eq!(
            segments,
            vec![text("Here:\n"), code("print(1)"), text("\nDone")]
        );
    }

    #[test]
    fn test_unterminated_fence_is_text() {
        assert_eq!(format_response("a ```b"), vec![text("a ```b")]);
    }

    #[test]
    fn test_plain_text_only() {
        assert_eq!(
            format_response("No code here.\n  Indented too."),
            vec![text("No code here.\n  Indented too.")]
        );
    }

    #[test]
    fn test_empty_input() {
        assert!(format_response("").is_empty());
    }

    // ============================================================================
    // Fence bodies
    // ============================================================================

    #[test]
    fn test_untagged_fence_is_trimmed() {
        assert_eq!(
            format_response("```\n  let x = 1;\n```"),
            vec![code("let x = 1;")]
        );
    }

    #[test]
    fn test_empty_fence_kept() {
        assert_eq!(format_response("``````"), vec![code("")]);
        assert_eq!(
            format_response("before```rust\n```after"),
            vec![text("before"), code(""), text("after")]
        );
    }

    #[test]
    fn test_tag_requires_newline() {
        // A single-line body has no tag line to strip
        assert_eq!(format_response("```ls -la```"), vec![code("ls -la")]);
        assert_eq!(format_response("```npm```"), vec![code("npm")]);
    }

    #[test]
    fn test_non_word_first_line_kept() {
        assert_eq!(
            format_response("```c++\nint x;\n```"),
            vec![code("c++\nint x;")]
        );
    }

    #[test]
    fn test_identifier_statement_is_stripped_as_tag() {
        assert_eq!(format_response("```foo\nbar()\n```"), vec![code("bar()")]);
    }

    #[test]
    fn test_leading_newline_means_no_tag() {
        assert_eq!(
            format_response("```\nfoo\nbar()\n```"),
            vec![code("foo\nbar()")]
        );
    }

    #[test]
    fn test_only_first_line_is_considered() {
        assert_eq!(
            format_response("```js\nconst a = 1;\nrust\n```"),
            vec![code("const a = 1;\nrust")]
        );
    }

    // ============================================================================
    // Multiple fences
    // ============================================================================

    #[test]
    fn test_adjacent_fences_pair_left_to_right() {
        assert_eq!(
            format_response("```a\n1\n``````b\n2\n```"),
            vec![code("1"), code("2")]
        );
    }

    #[test]
    fn test_odd_fence_count_leaves_tail_as_text() {
        assert_eq!(
            format_response("x ```one``` y ```two"),
            vec![text("x "), code("one"), text(" y ```two")]
        );
    }

    #[test]
    fn test_whitespace_in_text_preserved() {
        let segments = format_response("  lead\n\n```\ncode\n```\n\n  trail  ");
        assert_eq!(
            segments,
            vec![text("  lead\n\n"), code("code"), text("\n\n  trail  ")]
        );
    }

    #[test]
    fn test_markup_is_not_escaped() {
        assert_eq!(
            format_response("<b>bold</b>```\n<T>\n```"),
            vec![text("<b>bold</b>"), code("<T>")]
        );
    }

    #[test]
    fn test_deterministic() {
        let input = "Intro\n```rust\nfn main() {}\n```\nmid ```x``` end ```";
        assert_eq!(format_response(input), format_response(input));
    }

    // ============================================================================
    // Helpers
    // ============================================================================

    #[test]
    fn test_code_only() {
        let segments = format_response("a```\none\n```b```\ntwo\n```c");
        assert_eq!(code_only(&segments), "one\n\ntwo");
        assert_eq!(code_only(&format_response("no code")), "");
    }

    #[test]
    fn test_segment_json_shape() {
        let value = serde_json::to_value(code("x")).unwrap();
        assert_eq!(value, serde_json::json!({ "kind": "code", "value": "x" }));
        let value = serde_json::to_value(text("y")).unwrap();
        assert_eq!(value, serde_json::json!({ "kind": "text", "value": "y" }));
    }
}
