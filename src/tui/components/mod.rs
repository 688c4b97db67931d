//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! - `TitleBar`: path, status and loading spinner
//! - `Breadcrumbs`: mounted chain with instance ids and load states
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `AddressBar`: single-line path editor
//! - `RouteView`: scrollable composed view, with `RouteViewState`
//! - `HistoryPanel`: history overlay, with `HistoryPanelState`
//!
//! Components receive external data as props, never by reaching into `App`:
//!
//! ```rust,ignore
//! TitleBar::new(app.navigator.path().to_string(), app.status_message.clone(), None).render(frame, area);
//! ```

pub mod address_bar;
pub mod breadcrumbs;
pub mod history_panel;
pub mod route_view;
mod title_bar;

pub use address_bar::{AddressBar, AddressEvent};
pub use breadcrumbs::Breadcrumbs;
pub use history_panel::{HistoryEvent, HistoryPanel, HistoryPanelState};
pub use route_view::{RouteView, RouteViewState};
pub use title_bar::TitleBar;
