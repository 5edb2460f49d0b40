//! # TextField Component
//!
//! Single-line text input used by the search box and the auth forms.
//!
//! ## State Management
//!
//! The buffer and cursor are internal state. `focused` is a prop set by the
//! parent every frame. The cursor is a byte offset that always sits on a
//! char boundary; display columns are computed with `unicode-width` so
//! umlauts and wide characters line up.

use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

const MASK_CHAR: char = '•';

/// High-level events emitted by a TextField
#[derive(Debug, Clone, PartialEq)]
pub enum FieldEvent {
    /// Buffer content changed
    Changed,
    /// Enter pressed
    Submit,
}

#[derive(Debug, Clone)]
pub struct TextField {
    pub label: String,
    /// Render bullets instead of the text (passwords).
    pub masked: bool,
    /// Prop: whether this field has keyboard focus.
    pub focused: bool,
    buffer: String,
    cursor: usize,
}

impl TextField {
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            masked: false,
            focused: false,
            buffer: String::new(),
            cursor: 0,
        }
    }

    pub fn masked(label: impl Into<String>) -> Self {
        Self {
            masked: true,
            ..Self::new(label)
        }
    }

    pub fn value(&self) -> &str {
        &self.buffer
    }

    pub fn clear(&mut self) {
        self.buffer.clear();
        self.cursor = 0;
    }

    fn display_text(&self) -> String {
        if self.masked {
            MASK_CHAR.to_string().repeat(self.buffer.chars().count())
        } else {
            self.buffer.clone()
        }
    }

    /// Display column of the cursor within the (unscrolled) text.
    pub fn cursor_column(&self) -> u16 {
        let before = &self.buffer[..self.cursor];
        let width = if self.masked {
            before.chars().count()
        } else {
            before.width()
        };
        width as u16
    }

    fn insert_str(&mut self, text: &str) {
        self.buffer.insert_str(self.cursor, text);
        self.cursor += text.len();
    }

    fn prev_boundary(&self) -> usize {
        self.buffer[..self.cursor]
            .char_indices()
            .next_back()
            .map(|(i, _)| i)
            .unwrap_or(0)
    }

    fn next_boundary(&self) -> usize {
        self.buffer[self.cursor..]
            .chars()
            .next()
            .map(|c| self.cursor + c.len_utf8())
            .unwrap_or(self.cursor)
    }
}

impl EventHandler for TextField {
    type Event = FieldEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<FieldEvent> {
        match event {
            TuiEvent::InputChar(c) => {
                let mut buf = [0u8; 4];
                self.insert_str(c.encode_utf8(&mut buf));
                Some(FieldEvent::Changed)
            }
            TuiEvent::Paste(text) => {
                // Single line: newlines become spaces.
                let flat: String = text
                    .chars()
                    .map(|c| if c == '\n' || c == '\r' { ' ' } else { c })
                    .collect();
                if flat.is_empty() {
                    return None;
                }
                self.insert_str(&flat);
                Some(FieldEvent::Changed)
            }
            TuiEvent::Backspace => {
                if self.cursor == 0 {
                    return None;
                }
                let start = self.prev_boundary();
                self.buffer.replace_range(start..self.cursor, "");
                self.cursor = start;
                Some(FieldEvent::Changed)
            }
            TuiEvent::Delete => {
                if self.cursor >= self.buffer.len() {
                    return None;
                }
                let end = self.next_boundary();
                self.buffer.replace_range(self.cursor..end, "");
                Some(FieldEvent::Changed)
            }
            TuiEvent::CursorLeft => {
                self.cursor = self.prev_boundary();
                None
            }
            TuiEvent::CursorRight => {
                self.cursor = self.next_boundary();
                None
            }
            TuiEvent::Home => {
                self.cursor = 0;
                None
            }
            TuiEvent::End => {
                self.cursor = self.buffer.len();
                None
            }
            TuiEvent::Submit => Some(FieldEvent::Submit),
            _ => None,
        }
    }
}

impl Component for TextField {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.focused {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        let block = Block::bordered()
            .title(format!(" {} ", self.label))
            .border_style(border_style);

        // Scroll horizontally so the cursor stays inside the box.
        let inner_width = area.width.saturating_sub(2);
        let cursor_col = self.cursor_column();
        let offset = cursor_col.saturating_sub(inner_width.saturating_sub(1));

        let paragraph = Paragraph::new(self.display_text())
            .block(block)
            .scroll((0, offset));
        frame.render_widget(paragraph, area);

        if self.focused && area.height >= 3 {
            frame.set_cursor_position(Position::new(
                area.x + 1 + cursor_col - offset,
                area.y + 1,
            ));
        }
    }
}
