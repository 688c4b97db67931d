//! # Route Nodes
//!
//! A `RouteNode` is one addressable unit of the tree: a segment, a render
//! function, optional loader and boundaries, and its ordered children.
//! Nodes are built once by the registry and shared behind `Arc`.

use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use super::chain::RouteParams;
use super::error::LoaderFailure;
use super::loader::Loader;
use super::view::ViewTree;

/// Stable identifier of a registered route (e.g. `"routes/users+/kody"`).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RouteId(Arc<str>);

impl RouteId {
    pub fn new(id: &str) -> Self {
        Self(Arc::from(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RouteId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for RouteId {
    fn from(value: &str) -> Self {
        RouteId::new(value)
    }
}

/// What a node matches at its level.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// The synthetic tree root. Consumes nothing.
    Root,
    /// Matches exactly this segment.
    Literal(String),
    /// Matches any single segment and binds it under this name.
    Param(String),
    /// Selected when the parent is matched with no path left. Consumes nothing.
    Index,
}

impl Segment {
    /// Parses a registry segment: `$name` / `:name` are params, anything else literal.
    ///
    /// Returns `None` for segments no normalized path can contain: empty,
    /// `.`/`..`, or anything with `/`, `?` or `#`.
    pub fn parse(raw: &str) -> Option<Segment> {
        if matches!(raw, "" | "." | "..") || raw.contains(['/', '?', '#']) {
            return None;
        }
        match raw.strip_prefix('$').or_else(|| raw.strip_prefix(':')) {
            Some("") => None,
            Some(name) => Some(Segment::Param(name.to_string())),
            None => Some(Segment::Literal(raw.to_string())),
        }
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::Root => f.write_str("/"),
            Segment::Literal(s) => f.write_str(s),
            Segment::Param(name) => write!(f, "${name}"),
            Segment::Index => f.write_str("(index)"),
        }
    }
}

/// Everything a render function may read about its matched position.
pub struct RenderContext<'a> {
    /// Absolute path accumulated up to and including this node.
    pub path: &'a str,
    /// Params bound by this node and its ancestors.
    pub params: &'a RouteParams,
    /// Loader output for this node, if it has a loader that settled.
    pub data: Option<&'a Value>,
}

impl RenderContext<'_> {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Convenience lookup of a string field in the loader data.
    pub fn data_str(&self, key: &str) -> Option<&str> {
        self.data.and_then(|d| d.get(key)).and_then(Value::as_str)
    }
}

pub type RenderFn = Arc<dyn Fn(&RenderContext<'_>) -> ViewTree + Send + Sync>;
pub type ErrorViewFn = Arc<dyn Fn(&LoaderFailure) -> ViewTree + Send + Sync>;
pub type NotFoundFn = Arc<dyn Fn(&str) -> ViewTree + Send + Sync>;

pub struct RouteNode {
    pub(crate) id: RouteId,
    pub(crate) segment: Segment,
    pub(crate) render: RenderFn,
    pub(crate) loader: Option<Arc<dyn Loader>>,
    pub(crate) error_boundary: Option<ErrorViewFn>,
    pub(crate) not_found: Option<NotFoundFn>,
    pub(crate) children: Vec<Arc<RouteNode>>,
}

impl RouteNode {
    pub fn id(&self) -> &RouteId {
        &self.id
    }

    pub fn segment(&self) -> &Segment {
        &self.segment
    }

    pub fn is_index(&self) -> bool {
        self.segment == Segment::Index
    }

    pub fn children(&self) -> &[Arc<RouteNode>] {
        &self.children
    }

    pub fn loader(&self) -> Option<&Arc<dyn Loader>> {
        self.loader.as_ref()
    }

    pub fn has_error_boundary(&self) -> bool {
        self.error_boundary.is_some()
    }

    pub fn has_not_found(&self) -> bool {
        self.not_found.is_some()
    }

    pub fn render(&self, ctx: &RenderContext<'_>) -> ViewTree {
        (self.render)(ctx)
    }

    pub fn render_error(&self, failure: &LoaderFailure) -> Option<ViewTree> {
        self.error_boundary.as_ref().map(|f| f(failure))
    }

    pub fn render_not_found(&self, path: &str) -> Option<ViewTree> {
        self.not_found.as_ref().map(|f| f(path))
    }

    pub fn literal_child(&self, segment: &str) -> Option<&Arc<RouteNode>> {
        self.children
            .iter()
            .find(|c| matches!(&c.segment, Segment::Literal(s) if s == segment))
    }

    pub fn param_child(&self) -> Option<&Arc<RouteNode>> {
        self.children
            .iter()
            .find(|c| matches!(c.segment, Segment::Param(_)))
    }

    pub fn index_child(&self) -> Option<&Arc<RouteNode>> {
        self.children.iter().find(|c| c.is_index())
    }
}

impl fmt::Debug for RouteNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteNode")
            .field("id", &self.id)
            .field("segment", &self.segment)
            .field("loader", &self.loader.as_ref().map(|l| l.name().to_string()))
            .field("error_boundary", &self.error_boundary.is_some())
            .field("not_found", &self.not_found.is_some())
            .field("children", &self.children)
            .finish()
    }
}
