//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use std::sync::Arc;
use std::time::Duration;

use crate::core::state::App;
use crate::routes::{self, LoaderSource};
use crate::routing::loader::load_all;
use crate::routing::{LoadRequest, MemoryHistory, Navigator, RouteTree};

/// The demo route table with zero-latency fixture loaders.
pub fn demo_tree() -> Arc<RouteTree> {
    Arc::new(routes::tree(&LoaderSource::fixtures()).expect("demo routes are valid"))
}

/// A navigator over the demo tree whose history starts at `path`. Not started.
pub fn demo_navigator(path: &str) -> Navigator {
    Navigator::new(demo_tree(), MemoryHistory::new(path))
}

/// Runs `loads` to completion and settles every result, in order.
pub fn settle_all(navigator: &mut Navigator, loads: Vec<LoadRequest>) {
    let outcomes = tokio_test::block_on(load_all(loads, Duration::from_secs(1)));
    for outcome in outcomes {
        navigator.settle(outcome.generation, outcome.instance, outcome.result);
    }
}

/// Creates a test App over the demo tree. Not started.
pub fn test_app(path: &str) -> App {
    App::new(demo_tree(), path)
}
