//! # Active Chain
//!
//! The root-to-leaf sequence of matched nodes for one path, each paired with
//! the path segment it consumed. Root and index entries consume nothing and
//! carry an empty value.
//!
//! Chains are recomputed on every navigation and never edited in place. Two
//! chains are compared entry by entry (same route, same value) to find the
//! prefix that survives a transition.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use super::node::{RouteId, RouteNode, Segment};
use super::path;

/// Params bound by dynamic segments, keyed by param name.
pub type RouteParams = BTreeMap<String, String>;

#[derive(Clone)]
pub struct ChainEntry {
    node: Arc<RouteNode>,
    value: String,
}

impl ChainEntry {
    pub fn new(node: Arc<RouteNode>, value: impl Into<String>) -> Self {
        Self {
            node,
            value: value.into(),
        }
    }

    pub fn node(&self) -> &Arc<RouteNode> {
        &self.node
    }

    pub fn id(&self) -> &RouteId {
        self.node.id()
    }

    /// The path segment this entry consumed (empty for root and index routes).
    pub fn value(&self) -> &str {
        &self.value
    }
}

impl PartialEq for ChainEntry {
    fn eq(&self, other: &Self) -> bool {
        self.node.id() == other.node.id() && self.value == other.value
    }
}

impl Eq for ChainEntry {}

impl fmt::Debug for ChainEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}={:?}", self.node.id(), self.value)
    }
}

#[derive(Clone, PartialEq, Eq, Debug)]
pub struct ActiveChain {
    entries: Vec<ChainEntry>,
}

impl ActiveChain {
    pub fn new(entries: Vec<ChainEntry>) -> Self {
        Self { entries }
    }

    /// A chain holding only the tree root.
    pub fn root(node: Arc<RouteNode>) -> Self {
        Self::new(vec![ChainEntry::new(node, "")])
    }

    pub fn entries(&self) -> &[ChainEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn leaf(&self) -> Option<&ChainEntry> {
        self.entries.last()
    }

    pub fn route_ids(&self) -> Vec<&RouteId> {
        self.entries.iter().map(ChainEntry::id).collect()
    }

    /// Segments consumed by entries `0..=depth`. Depths past the leaf clamp to it.
    pub fn segments_to(&self, depth: usize) -> Vec<&str> {
        self.entries
            .iter()
            .take(depth.saturating_add(1))
            .map(ChainEntry::value)
            .filter(|v| !v.is_empty())
            .collect()
    }

    /// Absolute path accumulated up to and including `depth`.
    pub fn path_to(&self, depth: usize) -> String {
        path::join(&self.segments_to(depth))
    }

    /// Absolute path of the whole chain.
    pub fn path(&self) -> String {
        self.path_to(self.entries.len().saturating_sub(1))
    }

    /// Params bound by entries `0..=depth`.
    pub fn params_to(&self, depth: usize) -> RouteParams {
        self.entries
            .iter()
            .take(depth.saturating_add(1))
            .filter_map(|e| match e.node.segment() {
                Segment::Param(name) => Some((name.clone(), e.value.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn params(&self) -> RouteParams {
        self.params_to(self.entries.len().saturating_sub(1))
    }

    /// Number of leading entries both chains share.
    pub fn common_prefix_len(&self, other: &ActiveChain) -> usize {
        self.entries
            .iter()
            .zip(other.entries.iter())
            .take_while(|(a, b)| a == b)
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::matcher::match_path;
    use crate::test_support::demo_tree;

    #[test]
    fn test_paths_and_params() {
        let tree = demo_tree();
        let chain = match_path(&tree, "/users/jake/notes").unwrap();

        assert_eq!(chain.path(), "/users/jake/notes");
        assert_eq!(chain.path_to(0), "/");
        assert_eq!(chain.path_to(2), "/users/jake");
        assert_eq!(chain.params().get("username").map(String::as_str), Some("jake"));
        assert!(chain.params_to(1).is_empty());
    }

    #[test]
    fn test_common_prefix_stops_at_param_change() {
        let tree = demo_tree();
        let jake = match_path(&tree, "/users/jake/notes").unwrap();
        let ryan = match_path(&tree, "/users/ryan/notes").unwrap();
        assert_eq!(jake.common_prefix_len(&ryan), 2);
    }

    #[test]
    fn test_index_entry_adds_no_segment() {
        let tree = demo_tree();
        let chain = match_path(&tree, "/users").unwrap();
        assert!(chain.leaf().unwrap().node().is_index());
        assert_eq!(chain.path(), "/users");
    }
}
