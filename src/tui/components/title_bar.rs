//! # TitleBar Component
//!
//! Top status bar: current path, status message and a spinner while any
//! mounted route is still loading.
//!
//! Stateless. All fields are props:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(app.navigator.path().to_string(), app.status_message.clone(), None);
//! title_bar.render(frame, area);
//! ```

use crate::tui::component::Component;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};

const SPINNER: [&str; 4] = ["⠋", "⠙", "⠸", "⠴"];

pub struct TitleBar {
    pub path: String,
    pub status_message: String,
    /// Spinner frame while loads are pending, `None` when idle.
    pub spinner_frame: Option<usize>,
}

impl TitleBar {
    pub fn new(path: String, status_message: String, spinner_frame: Option<usize>) -> Self {
        Self {
            path,
            status_message,
            spinner_frame,
        }
    }

    fn text(&self) -> String {
        let mut text = format!("Outlet | {}", self.path);
        if !self.status_message.is_empty() && self.status_message != self.path {
            text.push_str(" | ");
            text.push_str(&self.status_message);
        }
        if let Some(frame) = self.spinner_frame {
            text.push(' ');
            text.push_str(SPINNER[frame % SPINNER.len()]);
        }
        text
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let line = Line::from(Span::styled(
            self.text(),
            Style::default().add_modifier(Modifier::BOLD).fg(Color::White),
        ));
        frame.render_widget(line, area);
    }
}
