//! Pure text wrapping helpers shared by panes and the entry box.
//!
//! These are stateless helpers with no dependency on any pane or editor.

use std::borrow::Cow;

/// textwrap options for a message column of `width` cells.
///
/// Words wider than the column are split; continuation rows get `indent`.
pub fn wrap_options(width: u16, indent: &str) -> textwrap::Options<'_> {
    textwrap::Options::new(width as usize)
        .break_words(true)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .subsequent_indent(indent)
}

/// Wrap one message into display rows. An empty message is one empty row.
///
/// If the indent leaves no room for text on continuation rows it is dropped.
pub fn wrap_message(message: &str, width: u16, indent: &str) -> Vec<String> {
    if width == 0 {
        return Vec::new();
    }
    let indent = if unicode_width::UnicodeWidthStr::width(indent) >= width as usize {
        ""
    } else {
        indent
    };
    let rows: Vec<String> = message
        .split('\n')
        .flat_map(|line| textwrap::wrap(line, wrap_options(width, indent)))
        .map(Cow::into_owned)
        .collect();
    if rows.is_empty() { vec![String::new()] } else { rows }
}

/// Strip what a chat line can't carry: newlines, control characters and
/// surrounding whitespace.
pub fn sanitize_input(line: &str) -> String {
    line.chars()
        .filter(|c| !c.is_control())
        .collect::<String>()
        .trim()
        .to_string()
}

/// Find the byte offset of the previous character boundary before `pos` in `text`.
pub fn prev_char_boundary(text: &str, pos: usize) -> usize {
    text[..pos]
        .char_indices()
        .next_back()
        .map(|(i, _)| i)
        .unwrap_or(0)
}

/// Find the byte offset of the next character boundary after `pos` in `text`.
pub fn next_char_boundary(text: &str, pos: usize) -> usize {
    text[pos..]
        .char_indices()
        .nth(1)
        .map(|(i, _)| pos + i)
        .unwrap_or(text.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    // -- wrap_message ----------------------------------------------------

    #[test]
    fn wrap_short_message_is_one_row() {
        assert_eq!(wrap_message("hello", 80, "  "), vec!["hello"]);
    }

    #[test]
    fn wrap_indents_continuation_rows() {
        assert_eq!(
            wrap_message("Me: the quick brown fox", 12, "  "),
            vec!["Me: the", "  quick", "  brown fox"]
        );
    }

    #[test]
    fn wrap_splits_words_wider_than_the_column() {
        let rows = wrap_message("abcdefghij", 4, "");
        assert_eq!(rows, vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn wrap_empty_message_is_one_empty_row() {
        assert_eq!(wrap_message("", 10, "  "), vec![""]);
    }

    #[test]
    fn wrap_zero_width_is_nothing() {
        assert!(wrap_message("hello", 0, "  ").is_empty());
    }

    #[test]
    fn wrap_drops_indent_wider_than_column() {
        assert_eq!(wrap_message("abcd", 2, "   "), vec!["ab", "cd"]);
    }

    // -- sanitize_input --------------------------------------------------

    #[test]
    fn sanitize_removes_newlines_and_controls() {
        assert_eq!(sanitize_input("  hel\nlo\u{7}  "), "hello");
    }

    #[test]
    fn sanitize_keeps_inner_spaces() {
        assert_eq!(sanitize_input("a  b"), "a  b");
    }

    // -- char boundaries -------------------------------------------------

    #[test]
    fn prev_char_boundary_multibyte() {
        // "café" = [99, 97, 102, 195, 169]; 'é' starts at byte 3, len 2
        let s = "café";
        assert_eq!(prev_char_boundary(s, 5), 3);
        assert_eq!(prev_char_boundary(s, 3), 2);
    }

    #[test]
    fn next_char_boundary_multibyte() {
        let s = "café";
        assert_eq!(next_char_boundary(s, 3), 5);
        assert_eq!(next_char_boundary(s, 2), 3);
    }

    #[test]
    fn next_char_boundary_at_end() {
        assert_eq!(next_char_boundary("abc", 2), 3);
    }
}
