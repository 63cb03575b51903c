//! Message log
//!
//! Colored game messages with stacking of repeats, plus word wrapping for
//! fixed-size panes.

use serde::{Deserialize, Serialize};
use crate::ecs::Rgb;

/// A message to display in the game log
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub text: String,
    pub fg: Rgb,
    /// How many times in a row this text was logged
    pub count: u32,
}

impl Message {
    pub fn new(text: impl Into<String>, fg: Rgb) -> Self {
        Self {
            text: text.into(),
            fg,
            count: 1,
        }
    }

    /// Text with a repeat counter when stacked
    pub fn full_text(&self) -> String {
        if self.count > 1 {
            format!("{} (x{})", self.text, self.count)
        } else {
            self.text.clone()
        }
    }
}

/// Ordered history of messages
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageLog {
    messages: Vec<Message>,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a message, stacking it onto the last one if the text repeats
    pub fn add_message(&mut self, text: impl Into<String>, fg: Rgb) {
        let text = text.into();
        if let Some(last) = self.messages.last_mut() {
            if last.text == text {
                last.count += 1;
                return;
            }
        }
        self.messages.push(Message::new(text, fg));
    }

    /// Get all messages, oldest first
    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn len(&self) -> usize {
        self.messages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }
}

/// Greedy word wrap. Words longer than `width` are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut line = String::new();
        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();
            while word.len() > width {
                if !line.is_empty() {
                    lines.push(std::mem::take(&mut line));
                }
                lines.push(word.drain(..width).collect());
            }
            if word.is_empty() {
                continue;
            }
            let word: String = word.into_iter().collect();
            let needed = if line.is_empty() { word.chars().count() } else { line.chars().count() + 1 + word.chars().count() };
            if needed > width {
                lines.push(std::mem::take(&mut line));
            }
            if !line.is_empty() {
                line.push(' ');
            }
            line.push_str(&word);
        }
        lines.push(line);
    }

    lines
}

/// The last `height` wrapped lines of `messages`, top to bottom, so the newest
/// message sits on the bottom row
pub fn render_lines(messages: &[Message], width: usize, height: usize) -> Vec<(String, Rgb)> {
    let mut lines: Vec<(String, Rgb)> = Vec::new();
    for message in messages.iter().rev() {
        for line in wrap(&message.full_text(), width).into_iter().rev() {
            if lines.len() == height {
                break;
            }
            lines.push((line, message.fg));
        }
        if lines.len() == height {
            break;
        }
    }
    lines.reverse();
    lines
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = (255, 255, 255);
    const GREY: Rgb = (128, 128, 128);

    #[test]
    fn test_repeats_are_stacked() {
        let mut log = MessageLog::new();
        log.add_message("That way is blocked.", GREY);
        log.add_message("That way is blocked.", GREY);
        log.add_message("You wait.", WHITE);
        log.add_message("That way is blocked.", GREY);

        assert_eq!(log.len(), 3);
        assert_eq!(log.messages()[0].full_text(), "That way is blocked. (x2)");
        assert_eq!(log.messages()[2].full_text(), "That way is blocked.");
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("the quick brown fox", 10), vec!["the quick", "brown fox"]);
        assert_eq!(wrap("abcdefghij", 4), vec!["abcd", "efgh", "ij"]);
        assert_eq!(wrap("", 5), vec![""]);
    }

    #[test]
    fn test_render_lines_bottom_anchored() {
        let mut log = MessageLog::new();
        log.add_message("first", WHITE);
        log.add_message("second message here", GREY);
        log.add_message("third", WHITE);

        let lines = render_lines(log.messages(), 10, 3);
        let texts: Vec<&str> = lines.iter().map(|(t, _)| t.as_str()).collect();
        assert_eq!(texts, vec!["message", "here", "third"]);
        assert_eq!(lines[0].1, GREY);

        let few = render_lines(log.messages(), 40, 10);
        assert_eq!(few.len(), 3);
        assert_eq!(few[0].0, "first");
    }
}
