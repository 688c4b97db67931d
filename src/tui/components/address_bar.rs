//! # AddressBar Component
//!
//! Single-line path editor at the bottom of the screen. Shows the current
//! path while browsing; Ctrl+L focuses it for editing and Enter navigates.
//!
//! The buffer and cursor are internal state. `editing` is a prop owned by
//! the TUI's input mode.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, BorderType, Paragraph};
use unicode_width::UnicodeWidthStr;

use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, PartialEq)]
pub enum AddressEvent {
    /// Navigate to the typed path.
    Submit(String),
    /// Leave editing without navigating.
    Cancel,
    ContentChanged,
}

pub struct AddressBar {
    pub buffer: String,
    /// Byte offset into `buffer`, always on a char boundary.
    cursor: usize,
    pub editing: bool,
}

impl AddressBar {
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            cursor: 0,
            editing: false,
        }
    }

    /// Replaces the buffer (used to mirror the current path) and moves the cursor to the end.
    pub fn set(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
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
            .unwrap_or(self.buffer.len())
    }

    /// Display column of the cursor within the buffer.
    fn cursor_column(&self) -> u16 {
        self.buffer[..self.cursor].width() as u16
    }
}

impl Default for AddressBar {
    fn default() -> Self {
        Self::new()
    }
}

impl Component for AddressBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let (title, style) = if self.editing {
            (" Go to (Enter navigate, Esc cancel) ", Style::default().fg(Color::Green))
        } else {
            (" Address (Ctrl+L) ", Style::default().fg(Color::DarkGray))
        };
        let block = Block::bordered()
            .border_type(BorderType::Rounded)
            .title(title);
        frame.render_widget(Paragraph::new(self.buffer.as_str()).block(block).style(style), area);

        if self.editing {
            let max_x = area.x + area.width.saturating_sub(2);
            let x = (area.x + 1 + self.cursor_column()).min(max_x);
            frame.set_cursor_position((x, area.y + 1));
        }
    }
}

impl EventHandler for AddressBar {
    type Event = AddressEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<Self::Event> {
        match event {
            TuiEvent::InputChar(c) => {
                self.buffer.insert(self.cursor, *c);
                self.cursor += c.len_utf8();
                Some(AddressEvent::ContentChanged)
            }
            TuiEvent::Paste(text) => {
                // Paths are single-line.
                let text: String = text.chars().filter(|c| !c.is_control()).collect();
                self.buffer.insert_str(self.cursor, &text);
                self.cursor += text.len();
                Some(AddressEvent::ContentChanged)
            }
            TuiEvent::Backspace if self.cursor > 0 => {
                let prev = self.prev_boundary();
                self.buffer.drain(prev..self.cursor);
                self.cursor = prev;
                Some(AddressEvent::ContentChanged)
            }
            TuiEvent::Delete if self.cursor < self.buffer.len() => {
                let next = self.next_boundary();
                self.buffer.drain(self.cursor..next);
                Some(AddressEvent::ContentChanged)
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
            TuiEvent::Submit => {
                let path = self.buffer.trim().to_string();
                if path.is_empty() {
                    Some(AddressEvent::Cancel)
                } else {
                    Some(AddressEvent::Submit(path))
                }
            }
            TuiEvent::Escape => Some(AddressEvent::Cancel),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    fn typed(text: &str) -> AddressBar {
        let mut bar = AddressBar::new();
        for c in text.chars() {
            bar.handle_event(&TuiEvent::InputChar(c));
        }
        bar
    }

    #[test]
    fn test_typing_and_submit() {
        let mut bar = typed("/users/kody");
        assert_eq!(
            bar.handle_event(&TuiEvent::Submit),
            Some(AddressEvent::Submit("/users/kody".to_string()))
        );
    }

    #[test]
    fn test_blank_submit_cancels() {
        let mut bar = typed("  ");
        assert_eq!(bar.handle_event(&TuiEvent::Submit), Some(AddressEvent::Cancel));
    }

    #[test]
    fn test_backspace_and_cursor_movement() {
        let mut bar = typed("/usres");
        bar.handle_event(&TuiEvent::CursorLeft);
        bar.handle_event(&TuiEvent::CursorLeft);
        bar.handle_event(&TuiEvent::Backspace);
        bar.handle_event(&TuiEvent::CursorRight);
        bar.handle_event(&TuiEvent::InputChar('r'));
        assert_eq!(bar.buffer, "/users");
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut bar = typed("/");
        bar.handle_event(&TuiEvent::Home);
        assert_eq!(bar.handle_event(&TuiEvent::Backspace), None);
        assert_eq!(bar.buffer, "/");
    }

    #[test]
    fn test_multibyte_editing() {
        let mut bar = typed("/café");
        assert_eq!(bar.cursor_column(), 5);
        bar.handle_event(&TuiEvent::Backspace);
        assert_eq!(bar.buffer, "/caf");
    }

    #[test]
    fn test_paste_strips_newlines() {
        let mut bar = AddressBar::new();
        bar.handle_event(&TuiEvent::Paste("/users\n/jake".to_string()));
        assert_eq!(bar.buffer, "/users/jake");
    }

    #[test]
    fn test_render_shows_buffer() {
        let backend = TestBackend::new(40, 3);
        let mut terminal = Terminal::new(backend).unwrap();
        let mut bar = AddressBar::new();
        bar.set("/users/jake");
        terminal.draw(|f| bar.render(f, f.area())).unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("/users/jake"));
        assert!(text.contains("Address"));
    }
}
