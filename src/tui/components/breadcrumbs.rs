//! # Breadcrumbs Component
//!
//! One-line view of the mounted chain: each route with its instance id and
//! load state. Makes prefix preservation visible: a kept ancestor keeps its
//! `#n` across navigations.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::routing::{LoadState, MountedRoute};
use crate::tui::component::Component;

pub struct Breadcrumbs<'a> {
    pub mounted: &'a [MountedRoute],
}

impl<'a> Breadcrumbs<'a> {
    pub fn new(mounted: &'a [MountedRoute]) -> Self {
        Self { mounted }
    }

    fn spans(&self) -> Vec<Span<'static>> {
        let mut spans = Vec::new();
        for (i, route) in self.mounted.iter().enumerate() {
            if i > 0 {
                spans.push(Span::styled(" › ", Style::default().fg(Color::DarkGray)));
            }
            let (marker, color) = match route.load {
                LoadState::Idle => ("", Color::Gray),
                LoadState::Pending => (" …", Color::Yellow),
                LoadState::Ready(_) => (" ✓", Color::Green),
                LoadState::Failed(_) => (" ✗", Color::Red),
            };
            let label = if route.value.is_empty() {
                route.route.to_string()
            } else {
                route.value.clone()
            };
            spans.push(Span::styled(
                format!("{label}{}{marker}", route.instance),
                Style::default().fg(color),
            ));
        }
        spans
    }
}

impl Component for Breadcrumbs<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        frame.render_widget(Line::from(self.spans()), area);
    }
}
