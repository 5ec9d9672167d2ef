//! # Line Breaking
//!
//! Greedy line breaking for the notes body. Break opportunities come from
//! the Unicode line breaking algorithm (UAX#14) via `unicode-linebreak`, so
//! hyphens, slashes and explicit newlines behave the way readers expect.

use unicode_linebreak::{linebreaks, BreakOpportunity};

use crate::font::{FontContext, FontKey};

/// Break `text` into lines no wider than `max_width` points.
///
/// Lines are filled greedily. A mandatory break (newline) always ends the
/// current line. A single word wider than the line is split by characters.
/// Trailing whitespace is stripped from every line.
pub fn break_into_lines(
    font_context: &FontContext,
    text: &str,
    max_width: f64,
    key: &FontKey,
    font_size: f64,
) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let measure = |s: &str| font_context.measure_string(s, key, font_size);

    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0.0;
    let mut start = 0;

    for (end, opp) in linebreaks(text) {
        let segment = text[start..end].trim_end_matches(is_newline);
        start = end;

        let visible_width = measure(segment.trim_end());
        if !line.is_empty() && line_width + visible_width > max_width {
            lines.push(line.trim_end().to_string());
            line.clear();
            line_width = 0.0;
        }

        if visible_width > max_width {
            // Hard-split a word that can't fit on any line.
            for ch in segment.chars() {
                let w = font_context.char_width(ch, key, font_size);
                if !line.is_empty() && line_width + w > max_width && !ch.is_whitespace() {
                    lines.push(line.trim_end().to_string());
                    line.clear();
                    line_width = 0.0;
                }
                line.push(ch);
                line_width += w;
            }
        } else {
            line.push_str(segment);
            line_width += measure(segment);
        }

        if matches!(opp, BreakOpportunity::Mandatory) {
            lines.push(line.trim_end().to_string());
            line.clear();
            line_width = 0.0;
        }
    }

    if !line.trim_end().is_empty() {
        lines.push(line.trim_end().to_string());
    }

    lines
}

fn is_newline(ch: char) -> bool {
    matches!(ch, '\n' | '\r' | '\u{2028}' | '\u{2029}')
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str, max_width: f64) -> Vec<String> {
        break_into_lines(&FontContext::new(), text, max_width, &FontKey::helvetica(), 10.0)
    }

    #[test]
    fn test_empty_text_has_no_lines() {
        assert!(lines("", 100.0).is_empty());
    }

    #[test]
    fn test_short_text_single_line() {
        assert_eq!(lines("Net 30", 200.0), vec!["Net 30"]);
    }

    #[test]
    fn test_wraps_at_spaces() {
        let result = lines("Payment is due within fifteen days of the invoice date", 100.0);
        assert!(result.len() > 1);
        let ctx = FontContext::new();
        for line in &result {
            assert!(!line.ends_with(' '));
            assert!(ctx.measure_string(line, &FontKey::helvetica(), 10.0) <= 100.0);
        }
        assert_eq!(
            result.join(" "),
            "Payment is due within fifteen days of the invoice date"
        );
    }

    #[test]
    fn test_newline_forces_break() {
        assert_eq!(lines("Line one\nLine two", 500.0), vec!["Line one", "Line two"]);
    }

    #[test]
    fn test_overlong_word_is_split() {
        let result = lines("Supercalifragilisticexpialidocious", 50.0);
        assert!(result.len() > 1);
        assert_eq!(result.concat(), "Supercalifragilisticexpialidocious");
    }
}
