//! # History Panel Component
//!
//! Overlay listing the history stack, newest last, with the current entry
//! marked. Opened with Ctrl+H, dismissed with Esc. Enter navigates to the
//! selected entry (pushing it, like following a link to it).
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `HistoryPanelState` lives in `TuiState`
//! - `HistoryPanel` is created each frame with borrowed state and entries

use chrono::{DateTime, Local, Utc};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Padding};

use crate::routing::HistoryEntry;
use crate::tui::event::TuiEvent;

pub struct HistoryPanelState {
    pub selected: usize,
    pub list_state: ListState,
    len: usize,
}

impl HistoryPanelState {
    /// Opens with the current entry selected.
    pub fn new(len: usize, position: usize) -> Self {
        let selected = position.min(len.saturating_sub(1));
        let mut list_state = ListState::default();
        if len > 0 {
            list_state.select(Some(selected));
        }
        Self {
            selected,
            list_state,
            len,
        }
    }

    pub fn handle_event(&mut self, event: &TuiEvent) -> Option<HistoryEvent> {
        match event {
            TuiEvent::Escape | TuiEvent::ToggleHistory => Some(HistoryEvent::Dismiss),
            TuiEvent::ScrollUp => {
                self.selected = self.selected.saturating_sub(1);
                self.list_state.select(Some(self.selected));
                None
            }
            TuiEvent::ScrollDown => {
                if self.len > 0 {
                    self.selected = (self.selected + 1).min(self.len - 1);
                    self.list_state.select(Some(self.selected));
                }
                None
            }
            TuiEvent::Submit if self.len > 0 => Some(HistoryEvent::Open(self.selected)),
            _ => None,
        }
    }
}

pub enum HistoryEvent {
    /// Navigate to the entry at this index.
    Open(usize),
    Dismiss,
}

pub struct HistoryPanel<'a> {
    state: &'a mut HistoryPanelState,
    entries: &'a [HistoryEntry],
    position: usize,
}

impl<'a> HistoryPanel<'a> {
    pub fn new(state: &'a mut HistoryPanelState, entries: &'a [HistoryEntry], position: usize) -> Self {
        Self {
            state,
            entries,
            position,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect) {
        let overlay = centered_rect(70, 60, area);
        frame.render_widget(Clear, overlay);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray))
            .title(" History ")
            .title_alignment(Alignment::Left)
            .title_bottom(Line::from(" Enter Open  Esc Back ").centered())
            .padding(Padding::horizontal(1));

        let items: Vec<ListItem> = self
            .entries
            .iter()
            .enumerate()
            .map(|(i, entry)| {
                let marker = if i == self.position { "●" } else { " " };
                let style = if i == self.state.selected {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD | Modifier::REVERSED)
                } else {
                    Style::default().fg(Color::Gray)
                };
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{marker} "), style),
                    Span::styled(format_time(entry.pushed_at), style),
                    Span::styled("  ", style),
                    Span::styled(entry.path.clone(), style),
                ]))
            })
            .collect();

        frame.render_stateful_widget(List::new(items).block(block), overlay, &mut self.state.list_state);
    }
}

/// Local wall-clock time of a history push.
fn format_time(at: DateTime<Utc>) -> String {
    at.with_timezone(&Local).format("%H:%M:%S").to_string()
}

/// Compute a centered rect using percentage of the outer rect.
fn centered_rect(percent_x: u16, percent_y: u16, outer: Rect) -> Rect {
    let [_, center_v, _] = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .areas(outer);
    let [_, center, _] = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .areas(center_v);
    center
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{History, MemoryHistory};
    use ratatui::Terminal;
    use ratatui::backend::TestBackend;

    #[test]
    fn test_selection_is_clamped() {
        let mut state = HistoryPanelState::new(2, 1);
        state.handle_event(&TuiEvent::ScrollDown);
        assert_eq!(state.selected, 1);
        state.handle_event(&TuiEvent::ScrollUp);
        state.handle_event(&TuiEvent::ScrollUp);
        assert_eq!(state.selected, 0);
    }

    #[test]
    fn test_enter_opens_selected() {
        let mut state = HistoryPanelState::new(3, 2);
        state.handle_event(&TuiEvent::ScrollUp);
        assert!(matches!(state.handle_event(&TuiEvent::Submit), Some(HistoryEvent::Open(1))));
        assert!(matches!(state.handle_event(&TuiEvent::Escape), Some(HistoryEvent::Dismiss)));
    }

    #[test]
    fn test_render_lists_paths() {
        let mut history = MemoryHistory::new("/");
        history.push("/users/kody");
        let mut state = HistoryPanelState::new(history.entries().len(), history.position());

        let backend = TestBackend::new(60, 20);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal
            .draw(|f| {
                HistoryPanel::new(&mut state, history.entries(), history.position())
                    .render(f, f.area())
            })
            .unwrap();

        let text: String = terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("History"));
        assert!(text.contains("/users/kody"));
    }
}
