//! Search input line
//!
//! Wraps a reedline [`LineBuffer`] as the single-line search field of the
//! interactive session and maps key events onto it.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use reedline::LineBuffer;

/// Effect a key event had on the input line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputChange {
    /// The text changed; the suggestion query must be refreshed
    Edited,

    /// Only the cursor moved
    CursorMoved,

    /// The key did not concern the input line
    Ignored,
}

/// Single-line search input
pub struct SearchInput {
    /// Edit buffer with grapheme-aware cursor handling
    buffer: LineBuffer,
}

impl SearchInput {
    /// Create an empty input line
    pub fn new() -> Self {
        Self {
            buffer: LineBuffer::new(),
        }
    }

    /// Get the current text
    pub fn text(&self) -> &str {
        self.buffer.get_buffer()
    }

    /// Check whether the input is empty
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Get the cursor position in characters from the start
    ///
    /// Used for terminal cursor placement after the prompt.
    pub fn cursor_chars(&self) -> usize {
        let point = self.buffer.insertion_point();
        self.buffer.get_buffer()[..point].chars().count()
    }

    /// Clear the input line
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Apply a key event to the input line
    ///
    /// # Arguments
    /// * `key` - Key event (already filtered to presses by the caller)
    ///
    /// # Returns
    /// * `InputChange` - Whether the text or cursor changed
    pub fn handle_key(&mut self, key: &KeyEvent) -> InputChange {
        let at_start = self.buffer.insertion_point() == 0;
        let at_end = self.buffer.insertion_point() == self.buffer.get_buffer().len();

        match (key.code, key.modifiers) {
            (KeyCode::Char('u'), KeyModifiers::CONTROL) => {
                if self.buffer.is_empty() {
                    InputChange::Ignored
                } else {
                    self.buffer.clear();
                    InputChange::Edited
                }
            }
            (KeyCode::Char(c), mods)
                if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) =>
            {
                self.buffer.insert_char(c);
                InputChange::Edited
            }
            (KeyCode::Backspace, _) => {
                if at_start {
                    InputChange::Ignored
                } else {
                    self.buffer.delete_left_grapheme();
                    InputChange::Edited
                }
            }
            (KeyCode::Delete, _) => {
                if at_end {
                    InputChange::Ignored
                } else {
                    self.buffer.delete_right_grapheme();
                    InputChange::Edited
                }
            }
            (KeyCode::Left, _) => {
                if at_start {
                    InputChange::Ignored
                } else {
                    self.buffer.move_left();
                    InputChange::CursorMoved
                }
            }
            (KeyCode::Right, _) => {
                if at_end {
                    InputChange::Ignored
                } else {
                    self.buffer.move_right();
                    InputChange::CursorMoved
                }
            }
            (KeyCode::Home, _) => {
                self.buffer.move_to_start();
                InputChange::CursorMoved
            }
            (KeyCode::End, _) => {
                self.buffer.move_to_end();
                InputChange::CursorMoved
            }
            _ => InputChange::Ignored,
        }
    }
}

impl Default for SearchInput {
    fn default() -> Self {
        Self::new()
    }
}
