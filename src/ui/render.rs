//! Widget rendering for the interactive session
//!
//! Draws the search line and the dropdown below it with crossterm commands.
//! The whole widget area is cleared and redrawn on every change, so exactly
//! one dropdown is ever on screen. Drawing targets any writer, which keeps
//! the renderer testable against an in-memory buffer.

use std::io::{self, Write};

use crossterm::{
    cursor::{Hide, MoveTo, Show},
    queue,
    style::Print,
    terminal::{Clear, ClearType, ScrollUp},
};
use nu_ansi_term::{Color, Style};

use crate::suggest::dropdown::{Dropdown, Row};

/// Renderer for the search widget
pub struct Renderer {
    /// Prompt shown before the input text
    prompt: String,

    /// Enable colored output
    color_enabled: bool,

    /// Maximum number of dropdown rows drawn
    max_rows: usize,
}

impl Renderer {
    /// Create a new renderer
    ///
    /// # Arguments
    /// * `prompt` - Prompt shown before the input text
    /// * `color_enabled` - Enable colored output
    /// * `max_rows` - Maximum number of dropdown rows drawn
    ///
    /// # Returns
    /// * `Self` - New renderer
    pub fn new(prompt: impl Into<String>, color_enabled: bool, max_rows: usize) -> Self {
        Self {
            prompt: prompt.into(),
            color_enabled,
            max_rows,
        }
    }

    /// Draw the widget
    ///
    /// Scrolls the terminal when the widget would not fit below the origin
    /// row, then clears from the origin downwards and redraws the input
    /// line and dropdown.
    ///
    /// # Arguments
    /// * `out` - Writer to draw to
    /// * `area` - Terminal size as (columns, rows)
    /// * `origin_row` - Row of the input line
    /// * `input` - Current input text
    /// * `cursor_chars` - Cursor position in characters within the input
    /// * `dropdown` - Dropdown to draw, if open
    ///
    /// # Returns
    /// * `io::Result<(u16, u16)>` - Possibly adjusted origin row and the
    ///   number of dropdown rows drawn
    pub fn draw(
        &self,
        out: &mut impl Write,
        area: (u16, u16),
        origin_row: u16,
        input: &str,
        cursor_chars: usize,
        dropdown: Option<&Dropdown>,
    ) -> io::Result<(u16, u16)> {
        let (columns, rows) = area;
        let dropdown_rows = dropdown
            .map(|d| d.rows().len().min(self.max_rows))
            .unwrap_or(0) as u16;

        // Make room below the input line, scrolling if necessary
        let needed = 1 + dropdown_rows;
        let mut origin = origin_row.min(rows.saturating_sub(1));
        if origin + needed > rows {
            let delta = origin + needed - rows;
            queue!(out, ScrollUp(delta))?;
            origin = origin.saturating_sub(delta);
        }

        queue!(out, Hide, MoveTo(0, origin), Clear(ClearType::FromCursorDown))?;
        queue!(
            out,
            Print(self.paint_prompt()),
            Print(fit(input, columns as usize))
        )?;

        if let Some(dropdown) = dropdown {
            for (offset, row) in dropdown.rows().iter().take(self.max_rows).enumerate() {
                queue!(out, MoveTo(0, origin + 1 + offset as u16))?;
                queue!(out, Print(self.paint_row(row, dropdown, columns as usize)))?;
            }
        }

        let cursor_col = (self.prompt.chars().count() + cursor_chars) as u16;
        queue!(
            out,
            MoveTo(cursor_col.min(columns.saturating_sub(1)), origin),
            Show
        )?;
        out.flush()?;

        Ok((origin, dropdown_rows))
    }

    /// Render the prompt with styling
    fn paint_prompt(&self) -> String {
        if self.color_enabled {
            Color::Cyan.bold().paint(&self.prompt).to_string()
        } else {
            self.prompt.clone()
        }
    }

    /// Render one dropdown row with styling
    fn paint_row(&self, row: &Row, dropdown: &Dropdown, width: usize) -> String {
        match row {
            Row::Header(title) => {
                if self.color_enabled {
                    Color::DarkGray.bold().paint(title.as_str()).to_string()
                } else {
                    title.clone()
                }
            }
            Row::Item { label, index } => {
                let active = dropdown.active() == Some(*index);
                let prefix = if active { "> " } else { "  " };
                let text = fit(label, width.saturating_sub(prefix.len()));
                if active && self.color_enabled {
                    format!("{prefix}{}", Style::new().reverse().paint(text))
                } else {
                    format!("{prefix}{text}")
                }
            }
        }
    }
}

/// Truncate a string to a maximum display width in characters
fn fit(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let keep = width.saturating_sub(1);
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push('…');
    truncated
}
