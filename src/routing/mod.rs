//! # Routing Core
//!
//! Nested route resolution and navigation. Knows nothing about terminals,
//! HTTP servers or how a `ViewTree` ends up on screen.
//!
//! ```text
//!   RouteRegistry ──build()──▶ RouteTree (Arc, read-only)
//!                                  │
//!   path ──────────match_path()────┤
//!                                  ▼
//!                             ActiveChain ──compose()──▶ ViewTree
//!                                  ▲
//!   LinkTarget ──resolve()─────────┘
//! ```
//!
//! The `Navigator` ties these together: it owns the history stack, the
//! current chain and the mounted instances, and hands out `LoadRequest`s for
//! the runtime to execute.
//!
//! ## Modules
//!
//! - [`node`]: `RouteNode`, `Segment`, render/boundary function types
//! - [`registry`]: startup registration table and the validated `RouteTree`
//! - [`matcher`]: path → `ActiveChain`
//! - [`chain`]: the matched root-to-leaf sequence
//! - [`link`]: `LinkTarget` and relative/absolute resolution
//! - [`view`]: `ViewTree` builder and outlet composition
//! - [`loader`]: per-route data loaders
//! - [`history`]: push/back/forward surface
//! - [`navigator`]: the navigation controller

pub mod chain;
pub mod error;
pub mod history;
pub mod link;
pub mod loader;
pub mod matcher;
pub mod navigator;
pub mod node;
pub mod path;
pub mod registry;
pub mod view;

pub use chain::{ActiveChain, ChainEntry, RouteParams};
pub use error::{LoaderFailure, NoMatch, RegistrationError};
pub use history::{History, HistoryEntry, MemoryHistory};
pub use link::{LinkTarget, resolve, resolve_from};
pub use loader::{FixtureLoader, HttpLoader, LoadContext, LoadRequest, Loader};
pub use matcher::match_path;
pub use navigator::{
    Fallbacks, InstanceId, LoadState, MountedRoute, Navigator, Outcome, Settlement, Transition,
};
pub use node::{RenderContext, RouteId, RouteNode, Segment};
pub use registry::{RouteEntry, RouteRegistry, RouteTree};
pub use view::{ViewTree, compose};
