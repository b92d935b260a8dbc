//! Inline markup for card text.
//!
//! Study material arrives with a small markdown subset: `**bold**`, `*italic*` and
//! `__underline__`. `to_rich_text` rewrites it into the tag vocabulary the text flow
//! understands (`<b>`, `<i>`, `<u>`, `<br/>`), and `parse_rich_text` reads that back
//! into styled spans. Unmatched delimiters stay literal; nesting is not supported.

use regex::Regex;
use std::sync::OnceLock;

/// Rewrites markdown emphasis into rich-text tags.
///
/// Single pass per delimiter, in a fixed order (bold, italic, underline),
/// each match as short as possible.
pub fn to_rich_text(text: &str) -> String {
    static BOLD_RE: OnceLock<Regex> = OnceLock::new();
    static ITALIC_RE: OnceLock<Regex> = OnceLock::new();
    static UNDERLINE_RE: OnceLock<Regex> = OnceLock::new();

    let bold_re = BOLD_RE.get_or_init(|| Regex::new(r"\*\*(.*?)\*\*").unwrap());
    let italic_re = ITALIC_RE.get_or_init(|| Regex::new(r"\*(.*?)\*").unwrap());
    let underline_re = UNDERLINE_RE.get_or_init(|| Regex::new(r"__(.*?)__").unwrap());

    let text = bold_re.replace_all(text, "<b>$1</b>");
    let text = italic_re.replace_all(&text, "<i>$1</i>");
    let text = underline_re.replace_all(&text, "<u>$1</u>");
    text.into_owned()
}

/// A run of text sharing one style.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Span {
    pub text: String,
    pub bold: bool,
    pub italic: bool,
    pub underline: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(Span),
    LineBreak,
}

#[derive(Default)]
struct StyleDepth {
    bold: u32,
    italic: u32,
    underline: u32,
}

const TAGS: [&str; 7] = ["<b>", "</b>", "<i>", "</i>", "<u>", "</u>", "<br/>"];

/// Splits tagged text into styled spans and line breaks.
///
/// Only the exact tags in `TAGS` are markup; any other `<` is printed as-is.
/// Unbalanced closing tags are ignored.
pub fn parse_rich_text(text: &str) -> Vec<Inline> {
    let mut out = Vec::new();
    let mut depth = StyleDepth::default();
    let mut buf = String::new();
    let mut rest = text;

    let flush = |buf: &mut String, depth: &StyleDepth, out: &mut Vec<Inline>| {
        if !buf.is_empty() {
            out.push(Inline::Text(Span {
                text: std::mem::take(buf),
                bold: depth.bold > 0,
                italic: depth.italic > 0,
                underline: depth.underline > 0,
            }));
        }
    };

    while let Some(pos) = rest.find('<') {
        buf.push_str(&rest[..pos]);
        let candidate = &rest[pos..];
        match TAGS.iter().find(|tag| candidate.starts_with(**tag)) {
            Some(tag) => {
                flush(&mut buf, &depth, &mut out);
                match *tag {
                    "<b>" => depth.bold += 1,
                    "</b>" => depth.bold = depth.bold.saturating_sub(1),
                    "<i>" => depth.italic += 1,
                    "</i>" => depth.italic = depth.italic.saturating_sub(1),
                    "<u>" => depth.underline += 1,
                    "</u>" => depth.underline = depth.underline.saturating_sub(1),
                    _ => out.push(Inline::LineBreak),
                }
                rest = &candidate[tag.len()..];
            }
            None => {
                buf.push('<');
                rest = &candidate[1..];
            }
        }
    }
    buf.push_str(rest);
    flush(&mut buf, &depth, &mut out);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn span(text: &str, bold: bool, italic: bool, underline: bool) -> Inline {
        Inline::Text(Span {
            text: text.to_string(),
            bold,
            italic,
            underline,
        })
    }

    #[test]
    fn test_plain_text_unchanged() {
        let text = "The mitochondria is the powerhouse of the cell (since 1890).";
        assert_eq!(to_rich_text(text), text);
    }

    #[test]
    fn test_bold_italic_underline() {
        assert_eq!(to_rich_text("**ATP** synthase"), "<b>ATP</b> synthase");
        assert_eq!(to_rich_text("an *enzyme*"), "an <i>enzyme</i>");
        assert_eq!(to_rich_text("__key__ term"), "<u>key</u> term");
    }

    #[test]
    fn test_matching_is_non_greedy() {
        assert_eq!(
            to_rich_text("**a** and **b**"),
            "<b>a</b> and <b>b</b>"
        );
        assert_eq!(to_rich_text("*x* y *z*"), "<i>x</i> y <i>z</i>");
    }

    #[test]
    fn test_unmatched_delimiters_stay_literal() {
        assert_eq!(to_rich_text("5 * 3 = 15"), "5 * 3 = 15");
        assert_eq!(to_rich_text("snake__case"), "snake__case");
    }

    #[test]
    fn test_parse_plain_text_is_one_span() {
        assert_eq!(parse_rich_text("hello"), vec![span("hello", false, false, false)]);
    }

    #[test]
    fn test_parse_styled_runs() {
        let parsed = parse_rich_text("a <b>bold</b> and <i><u>both</u></i>");
        assert_eq!(
            parsed,
            vec![
                span("a ", false, false, false),
                span("bold", true, false, false),
                span(" and ", false, false, false),
                span("both", false, true, true),
            ]
        );
    }

    #[test]
    fn test_parse_line_break() {
        let parsed = parse_rich_text("one<br/>two");
        assert_eq!(
            parsed,
            vec![
                span("one", false, false, false),
                Inline::LineBreak,
                span("two", false, false, false),
            ]
        );
    }

    #[test]
    fn test_parse_keeps_unknown_angle_brackets() {
        let parsed = parse_rich_text("x < y and <tag>");
        assert_eq!(parsed, vec![span("x < y and <tag>", false, false, false)]);
    }

    #[test]
    fn test_parse_ignores_stray_closing_tag() {
        let parsed = parse_rich_text("</b>plain");
        assert_eq!(parsed, vec![span("plain", false, false, false)]);
    }

    #[test]
    fn test_markdown_round_into_spans() {
        let parsed = parse_rich_text(&to_rich_text("**Krebs** cycle"));
        assert_eq!(
            parsed,
            vec![span("Krebs", true, false, false), span(" cycle", false, false, false)]
        );
    }
}
