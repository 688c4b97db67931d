//! # Headless Rendering
//!
//! Resolves one path without a terminal: match, run every load the chain
//! needs, settle, compose. Backs `outlet render <path>`.

use std::sync::Arc;
use std::time::Duration;

use log::info;

use crate::routing::loader::load_all;
use crate::routing::{MemoryHistory, Navigator, RouteTree, Settlement};

/// Navigates a fresh navigator to `path` and waits for its loads.
pub async fn render(tree: Arc<RouteTree>, path: &str, timeout: Duration) -> Navigator {
    let mut navigator = Navigator::new(tree, MemoryHistory::new(path));
    let transition = navigator.start();

    let outcomes = load_all(transition.loads, timeout).await;
    let committed = outcomes
        .into_iter()
        .map(|o| navigator.settle(o.generation, o.instance, o.result))
        .filter(|s| *s == Settlement::Committed)
        .count();
    info!(
        "Rendered {} ({} load(s) committed, outcome {:?})",
        navigator.path(),
        committed,
        navigator.outcome()
    );
    navigator
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::Outcome;
    use crate::test_support::demo_tree;
    use crate::tui::view_lines::plain_text;

    #[tokio::test]
    async fn test_render_waits_for_loads() {
        let navigator = render(demo_tree(), "/users/jake/notes", Duration::from_secs(1)).await;
        assert!(!navigator.is_pending());

        let text = plain_text(&navigator.view(), 80);
        assert!(text.contains("Epic Notes"));
        assert!(text.contains("Jake's notes"));
        assert!(text.contains("Groceries"));
        assert!(text.contains("Profile </users/jake>"));
    }

    #[tokio::test]
    async fn test_render_unknown_path() {
        let navigator = render(demo_tree(), "/users/kody/settings", Duration::from_secs(1)).await;
        assert!(matches!(navigator.outcome(), Outcome::NotFound { .. }));
        let text = plain_text(&navigator.view(), 80);
        assert!(text.contains("No user page at /users/kody/settings"));
    }
}
