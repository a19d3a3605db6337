//! The small slice of markdown DiceCloud text fields use: paragraphs and inline links.

use std::sync::OnceLock;

use regex_lite::Regex;

static PARAGRAPH_BREAK: OnceLock<Regex> = OnceLock::new();
static INLINE_LINK: OnceLock<Regex> = OnceLock::new();

pub const LINE_BREAK: &str = "<br>";
const LINK_EMOJI: &str = "\u{1F517}";

fn paragraph_break() -> &'static Regex {
    PARAGRAPH_BREAK.get_or_init(|| {
        Regex::new(r"\n[ \t]*\n\s*").expect("PARAGRAPH_BREAK pattern is invalid")
    })
}

fn inline_link() -> &'static Regex {
    INLINE_LINK.get_or_init(|| {
        Regex::new(r"\[([^\]]*)\]\(([^)\s]*)\)").expect("INLINE_LINK pattern is invalid")
    })
}

/// Multi-paragraph text: blank lines become [`LINE_BREAK`], links become anchors.
pub fn body_text(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n");
    let trimmed = normalized.trim();
    let with_breaks = paragraph_break().replace_all(trimmed, LINE_BREAK);
    inline_link()
        .replace_all(&with_breaks, r#"<a href="${2}">${1}</a>"#)
        .into_owned()
}

/// Single-line text: links collapse to their label, a leading link emoji is dropped.
pub fn single_line(raw: &str) -> String {
    let replaced = inline_link().replace_all(raw.trim(), "${1}");
    let text = replaced.trim_start();
    let text = match text.strip_prefix(LINK_EMOJI) {
        Some(rest) => rest.strip_prefix(' ').unwrap_or(rest),
        None => text,
    };
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_text_marks_paragraphs_and_anchors_links() {
        let out = body_text("Raised by [wolves](https://example.com/wolves).\n\nLeft home at 16.");
        assert_eq!(
            out,
            "Raised by <a href=\"https://example.com/wolves\">wolves</a>.<br>Left home at 16."
        );
    }

    #[test]
    fn body_text_collapses_runs_of_blank_lines_and_keeps_single_newlines() {
        let out = body_text("one\r\n\r\n\r\ntwo\nthree");
        assert_eq!(out, "one<br>two\nthree");
    }

    #[test]
    fn single_line_strips_link_syntax_and_emoji() {
        assert_eq!(
            single_line("\u{1F517} [Chaotic Good](https://example.com/alignments)"),
            "Chaotic Good"
        );
        assert_eq!(single_line("[\u{1F517} Hill Dwarf](https://x.test/dwarf)"), "Hill Dwarf");
        assert_eq!(single_line("  Neutral "), "Neutral");
    }
}
