use ratatui::Frame;
use ratatui::layout::{Constraint, Layout};

use crate::core::state::App;
use crate::routing::History;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{Breadcrumbs, HistoryPanel, RouteView, TitleBar};

/// ```text
/// ┌ title bar (1) ───────────────────────┐
/// │ route view (rest)                     │
/// ├ breadcrumbs (1) ─────────────────────┤
/// └ address bar (3) ─────────────────────┘
/// ```
pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState, spinner_frame: usize) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1), Length(3)]);
    let [title_area, main_area, crumbs_area, address_area] = layout.areas(frame.area());

    let navigator = &app.navigator;
    let spinner = navigator.is_pending().then_some(spinner_frame);
    TitleBar::new(
        navigator.path().to_string(),
        app.status_message.clone(),
        spinner,
    )
    .render(frame, title_area);

    let view = navigator.view();
    RouteView::new(&view, app.focused_link, &mut tui.route_view).render(frame, main_area);

    Breadcrumbs::new(navigator.mounted()).render(frame, crumbs_area);

    if !tui.address_bar.editing {
        tui.address_bar.set(navigator.path());
    }
    tui.address_bar.render(frame, address_area);

    if let Some(state) = tui.history_panel.as_mut() {
        let history = navigator.history();
        HistoryPanel::new(state, history.entries(), history.position()).render(frame, frame.area());
    }
}
