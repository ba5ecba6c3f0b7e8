//! # Textbox
//!
//! Word wrapping and the modal message box.
//!
//! Messages wait in a FIFO queue. The head is wrapped into lines when it
//! becomes active, and each confirm press reveals one more line. All lines
//! up to the reveal counter are shown at once.

use log::trace;
use std::collections::VecDeque;

/// Measures the rendered width of a string.
///
/// The renderer supplies the real implementation; the engine only needs widths.
pub trait TextMeasure {
    /// Width of `text` in pixels.
    fn text_width(&self, text: &str) -> f32;
}

/// Fixed-advance measurement: every character is equally wide.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MonospaceMetrics {
    pub char_width: f32,
}

impl MonospaceMetrics {
    /// Creates metrics with the given per-character advance.
    pub fn new(char_width: f32) -> Self {
        Self { char_width }
    }
}

impl TextMeasure for MonospaceMetrics {
    fn text_width(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.char_width
    }
}

/// Greedily wraps a message into lines no wider than `max_width`.
///
/// Words are accumulated while `line + " " + word` still fits. A single word
/// wider than the limit gets a line of its own. The final line is always
/// emitted, so an empty message yields one empty line.
///
/// # Examples
///
/// ```
/// use redemu::{wrap_text, MonospaceMetrics};
///
/// let metrics = MonospaceMetrics::new(1.0);
/// let lines = wrap_text("It's water. You can't walk on it.", &metrics, 12.0);
/// assert_eq!(lines, vec!["It's water.", "You can't", "walk on it."]);
/// ```
pub fn wrap_text(message: &str, measure: &dyn TextMeasure, max_width: f32) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in message.split_whitespace() {
        if current.is_empty() {
            current.push_str(word);
            continue;
        }
        let candidate = format!("{} {}", current, word);
        if measure.text_width(&candidate) <= max_width {
            current = candidate;
        } else {
            lines.push(std::mem::replace(&mut current, word.to_string()));
        }
    }
    lines.push(current);

    lines
}

/// The message currently on screen.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMessage {
    /// Wrapped lines of the message
    pub lines: Vec<String>,
    /// Index of the last revealed line
    pub revealed: usize,
}

impl ActiveMessage {
    /// Lines currently visible: everything up to and including the reveal counter.
    pub fn visible_lines(&self) -> &[String] {
        let end = (self.revealed + 1).min(self.lines.len());
        &self.lines[..end]
    }

    /// Returns true once the last line is showing.
    pub fn is_fully_revealed(&self) -> bool {
        self.revealed + 1 >= self.lines.len()
    }
}

/// What a confirm press did to the textbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextboxAdvance {
    /// Another line of the same message was revealed
    Revealed,
    /// The message finished and the next queued one is now active
    NextMessage,
    /// The message finished and the queue is empty
    Closed,
    /// Nothing was showing
    Idle,
}

/// Message queue plus the active message.
#[derive(Debug, Clone)]
pub struct Textbox {
    queue: VecDeque<String>,
    active: Option<ActiveMessage>,
    wrap_width: f32,
}

impl Textbox {
    /// Creates an empty textbox that wraps at `wrap_width` pixels.
    pub fn new(wrap_width: f32) -> Self {
        Self {
            queue: VecDeque::new(),
            active: None,
            wrap_width,
        }
    }

    /// Appends a message. Returns true if it became active immediately.
    pub fn enqueue(&mut self, message: impl Into<String>, measure: &dyn TextMeasure) -> bool {
        self.queue.push_back(message.into());
        if self.active.is_none() {
            self.activate_next(measure)
        } else {
            false
        }
    }

    /// Pops the next queued message into the active slot.
    ///
    /// Returns false and clears the active slot when the queue is empty.
    pub fn activate_next(&mut self, measure: &dyn TextMeasure) -> bool {
        match self.queue.pop_front() {
            Some(message) => {
                let lines = wrap_text(&message, measure, self.wrap_width);
                trace!("Textbox showing {} line(s): {:?}", lines.len(), message);
                self.active = Some(ActiveMessage { lines, revealed: 0 });
                true
            }
            None => {
                self.active = None;
                false
            }
        }
    }

    /// Reveals the next line, moving on to the next message after the last one.
    pub fn advance(&mut self, measure: &dyn TextMeasure) -> TextboxAdvance {
        let Some(active) = self.active.as_mut() else {
            return TextboxAdvance::Idle;
        };

        active.revealed += 1;
        if active.revealed < active.lines.len() {
            return TextboxAdvance::Revealed;
        }

        if self.activate_next(measure) {
            TextboxAdvance::NextMessage
        } else {
            TextboxAdvance::Closed
        }
    }

    /// The message on screen, if any.
    pub fn active(&self) -> Option<&ActiveMessage> {
        self.active.as_ref()
    }

    /// Returns true while a message is on screen.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Number of messages waiting behind the active one.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const METRICS: MonospaceMetrics = MonospaceMetrics { char_width: 1.0 };

    #[test]
    fn test_wrap_fits_on_one_line() {
        assert_eq!(wrap_text("Hello there", &METRICS, 40.0), vec!["Hello there"]);
    }

    #[test]
    fn test_wrap_empty_message_yields_one_empty_line() {
        assert_eq!(wrap_text("", &METRICS, 10.0), vec![""]);
    }

    #[test]
    fn test_wrap_exact_fit_stays_on_line() {
        assert_eq!(wrap_text("abc def", &METRICS, 7.0), vec!["abc def"]);
        assert_eq!(wrap_text("abc def", &METRICS, 6.0), vec!["abc", "def"]);
    }

    #[test]
    fn test_wrap_overlong_word_gets_own_line() {
        assert_eq!(
            wrap_text("a supercalifragilistic b", &METRICS, 5.0),
            vec!["a", "supercalifragilistic", "b"]
        );
    }

    #[test]
    fn test_wrap_collapses_repeated_spaces() {
        assert_eq!(wrap_text("a   b", &METRICS, 10.0), vec!["a b"]);
    }

    #[test]
    fn test_enqueue_activates_when_idle() {
        let mut textbox = Textbox::new(100.0);
        assert!(textbox.enqueue("first", &METRICS));
        assert!(!textbox.enqueue("second", &METRICS));
        assert_eq!(textbox.active().unwrap().lines, vec!["first"]);
        assert_eq!(textbox.pending(), 1);
    }

    #[test]
    fn test_advance_reveals_cumulatively_then_moves_on() {
        let mut textbox = Textbox::new(5.0);
        textbox.enqueue("one two three", &METRICS);
        textbox.enqueue("next", &METRICS);

        let active = textbox.active().unwrap();
        assert_eq!(active.visible_lines(), ["one"]);

        assert_eq!(textbox.advance(&METRICS), TextboxAdvance::Revealed);
        assert_eq!(textbox.active().unwrap().visible_lines(), ["one", "two"]);

        assert_eq!(textbox.advance(&METRICS), TextboxAdvance::Revealed);
        assert!(textbox.active().unwrap().is_fully_revealed());

        assert_eq!(textbox.advance(&METRICS), TextboxAdvance::NextMessage);
        assert_eq!(textbox.active().unwrap().lines, vec!["next"]);

        assert_eq!(textbox.advance(&METRICS), TextboxAdvance::Closed);
        assert!(!textbox.is_active());
        assert_eq!(textbox.advance(&METRICS), TextboxAdvance::Idle);
    }
}
