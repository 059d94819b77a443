//! Interface elements drawn on top of every phase, in screen coordinates.

use crate::constants::FONT_WIDTH;

pub mod dialog;
pub mod hint;
pub mod text;

pub use dialog::Dialog;
pub use hint::BlinkingHint;
pub use text::TextEngine;

/// Greedy word wrap to lines no wider than `width` pixels.
///
/// Explicit newlines are kept. A single word longer than a line gets a line of its own and
/// overflows.
pub fn wrap_text(text: &str, width: i32) -> Vec<String> {
    let columns = (width / FONT_WIDTH).max(1) as usize;
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let needed = if line.is_empty() { word.len() } else { line.len() + 1 + word.len() };
            if needed > columns && !line.is_empty() {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(word);
        }
        lines.push(line);
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn wraps_on_word_boundaries() {
        let lines = wrap_text("the quick brown fox jumps", 10 * FONT_WIDTH);
        assert_eq!(lines, vec!["the quick", "brown fox", "jumps"]);
    }

    #[test]
    fn keeps_explicit_newlines() {
        let lines = wrap_text("one\ntwo three", 40 * FONT_WIDTH);
        assert_eq!(lines, vec!["one", "two three"]);
    }

    #[test]
    fn long_words_overflow_on_their_own_line() {
        let lines = wrap_text("a supercalifragilistic b", 5 * FONT_WIDTH);
        assert_eq!(lines, vec!["a", "supercalifragilistic", "b"]);
    }
}
