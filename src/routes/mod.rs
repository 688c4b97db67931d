//! # Demo Routes
//!
//! The route table the binary ships with:
//!
//! ```text
//! /                      root layout (header, nav, outlet)
//! ├── (index)            routes/_index
//! └── users              routes/users+            layout, not-found
//!     ├── (index)        routes/users+/_index     user directory
//!     ├── kody           routes/users+/kody       static profile
//!     │   └── notes      routes/users+/kody.notes loader
//!     └── $username      routes/users+/$username  loader, error boundary
//!         └── notes      routes/users+/$username.notes  loader
//! ```
//!
//! Loaders read either the in-process fixtures or an HTTP API, depending on
//! the `LoaderSource`.

pub mod fixtures;
mod users;

use std::sync::Arc;
use std::time::Duration;

use serde_json::Value;

use crate::routing::{
    FixtureLoader, HttpLoader, LoadContext, Loader, LoaderFailure, RegistrationError, RouteEntry,
    RouteRegistry, RouteTree, ViewTree,
};

/// Where route loaders get their data.
#[derive(Debug, Clone)]
pub enum LoaderSource {
    Fixtures { latency: Duration },
    Http { base_url: String, client: reqwest::Client },
}

impl LoaderSource {
    pub fn fixtures() -> Self {
        LoaderSource::Fixtures {
            latency: Duration::ZERO,
        }
    }

    pub fn http(base_url: &str) -> Self {
        LoaderSource::Http {
            base_url: base_url.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn loader<F>(&self, name: &str, fixture: F) -> Arc<dyn Loader>
    where
        F: Fn(&LoadContext) -> Result<Value, LoaderFailure> + Send + Sync + 'static,
    {
        match self {
            LoaderSource::Fixtures { latency } => {
                Arc::new(FixtureLoader::new(name, fixture).with_latency(*latency))
            }
            LoaderSource::Http { base_url, client } => {
                Arc::new(HttpLoader::with_client(name, base_url, client.clone()))
            }
        }
    }
}

pub fn registry(source: &LoaderSource) -> RouteRegistry {
    let registry = RouteRegistry::with_root(RouteEntry::root(|_| root_layout()))
        .route(RouteEntry::index("routes/_index", |_| home()));
    users::register(registry, source)
}

/// Builds and validates the demo tree.
pub fn tree(source: &LoaderSource) -> Result<RouteTree, RegistrationError> {
    registry(source).build()
}

fn root_layout() -> ViewTree {
    ViewTree::element("main")
        .child(
            ViewTree::element("header")
                .child(ViewTree::element("h1").child(ViewTree::text("Epic Notes")))
                .child(
                    ViewTree::element("nav")
                        .child(ViewTree::link("/", "Home"))
                        .child(ViewTree::link("/users", "Users")),
                ),
        )
        .child(ViewTree::outlet())
}

fn home() -> ViewTree {
    ViewTree::element("section")
        .child(ViewTree::element("p").child(ViewTree::text("Notes for everyone.")))
        .child(ViewTree::link("users", "Browse users"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_tree_builds() {
        let tree = tree(&LoaderSource::fixtures()).unwrap();
        assert_eq!(tree.len(), 7);
        assert!(tree.find("routes/users+/$username").is_some());
    }

    #[test]
    fn test_listing_shows_nesting() {
        let tree = tree(&LoaderSource::fixtures()).unwrap();
        let listing = tree.to_string();
        assert!(listing.contains("[routes/users+/kody.notes]"));
        assert!(listing.contains("$username"));
    }

    #[test]
    fn test_http_source_uses_http_loaders() {
        let tree = tree(&LoaderSource::http("http://localhost:3000")).unwrap();
        let node = tree.find("routes/users+/$username").unwrap();
        assert_eq!(node.loader().map(|l| l.name()), Some("user"));
    }
}
