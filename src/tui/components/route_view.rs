//! # RouteView Component
//!
//! Scrollable rendering of the composed view for the current chain.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `RouteViewState` (scroll position) lives in `TuiState`
//! - `RouteView` is created each frame with the view and borrowed state

use ratatui::Frame;
use ratatui::layout::{Rect, Size};
use ratatui::widgets::{Block, Borders, Padding, Paragraph, Wrap};
use tui_scrollview::{ScrollView, ScrollViewState, ScrollbarVisibility};

use crate::routing::ViewTree;
use crate::tui::component::{Component, EventHandler};
use crate::tui::event::TuiEvent;
use crate::tui::view_lines;

#[derive(Default)]
pub struct RouteViewState {
    pub scroll_state: ScrollViewState,
}

impl RouteViewState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Back to the top, after a navigation.
    pub fn reset(&mut self) {
        self.scroll_state.scroll_to_top();
    }
}

impl EventHandler for RouteViewState {
    type Event = ();

    fn handle_event(&mut self, event: &TuiEvent) -> Option<()> {
        match event {
            TuiEvent::ScrollUp => self.scroll_state.scroll_up(),
            TuiEvent::ScrollDown => self.scroll_state.scroll_down(),
            TuiEvent::ScrollPageUp => self.scroll_state.scroll_page_up(),
            TuiEvent::ScrollPageDown => self.scroll_state.scroll_page_down(),
            _ => return None,
        }
        Some(())
    }
}

pub struct RouteView<'a> {
    view: &'a ViewTree,
    focused_link: Option<usize>,
    state: &'a mut RouteViewState,
}

impl<'a> RouteView<'a> {
    pub fn new(view: &'a ViewTree, focused_link: Option<usize>, state: &'a mut RouteViewState) -> Self {
        Self {
            view,
            focused_link,
            state,
        }
    }
}

impl Component for RouteView<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        // One column is reserved for the scrollbar.
        let content_width = area.width.saturating_sub(1);
        let paragraph = Paragraph::new(view_lines::to_lines(self.view, self.focused_link))
            .block(Block::default().borders(Borders::NONE).padding(Padding::horizontal(1)))
            .wrap(Wrap { trim: false });
        let height = paragraph.line_count(content_width) as u16;

        let mut scroll_view = ScrollView::new(Size::new(content_width, height))
            .vertical_scrollbar_visibility(ScrollbarVisibility::Automatic)
            .horizontal_scrollbar_visibility(ScrollbarVisibility::Never);
        scroll_view.render_widget(paragraph, Rect::new(0, 0, content_width, height));

        frame.render_stateful_widget(scroll_view, area, &mut self.state.scroll_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_renders_composed_view() {
        let view = ViewTree::element("main")
            .child(ViewTree::element("h1").child(ViewTree::text("Epic Notes")))
            .child(ViewTree::element("p").child(ViewTree::link("/users", "Users")));
        let mut state = RouteViewState::new();

        let backend = TestBackend::new(40, 10);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| RouteView::new(&view, Some(0), &mut state).render(f, f.area()))
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("Epic Notes"));
        assert!(text.contains("Users"));
    }

    #[test]
    fn test_scroll_events_are_consumed() {
        let mut state = RouteViewState::new();
        assert_eq!(state.handle_event(&TuiEvent::ScrollDown), Some(()));
        assert_eq!(state.handle_event(&TuiEvent::Submit), None);
    }
}
