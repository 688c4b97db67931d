//! # Application State
//!
//! Core state for Outlet. Domain logic only, no TUI-specific types.
//! Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── navigator: Navigator        // history, active chain, mounted routes
//! ├── status_message: String      // status bar text
//! ├── focused_link: Option<usize> // index into the current view's links
//! └── loader_timeout: Duration    // per-load deadline handed to the runtime
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::sync::Arc;
use std::time::Duration;

use crate::core::config::ResolvedConfig;
use crate::routing::{MemoryHistory, Navigator, RouteTree};

pub struct App {
    pub navigator: Navigator,
    pub status_message: String,
    pub focused_link: Option<usize>,
    pub loader_timeout: Duration,
}

impl App {
    pub fn new(tree: Arc<RouteTree>, initial_path: &str) -> Self {
        Self {
            navigator: Navigator::new(tree, MemoryHistory::new(initial_path)),
            status_message: String::from("Welcome to Outlet!"),
            focused_link: None,
            loader_timeout: Duration::from_millis(crate::core::config::DEFAULT_TIMEOUT_MS),
        }
    }

    pub fn from_config(tree: Arc<RouteTree>, config: &ResolvedConfig) -> Self {
        let mut app = Self::new(tree, &config.initial_path);
        app.loader_timeout = config.loader_timeout;
        app
    }

    /// `(label, href)` of the link that currently has focus.
    pub fn focused(&self) -> Option<(String, String)> {
        let index = self.focused_link?;
        self.navigator.links().into_iter().nth(index)
    }
}
