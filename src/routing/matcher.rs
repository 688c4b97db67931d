//! # Route Matcher
//!
//! Walks the tree one segment at a time. At each level a literal child wins
//! over the (single) dynamic child; once a literal is taken there is no
//! backtracking. With no path left, an index child is appended if present.
//!
//! Matching is pure: the same tree and path always produce the same chain.

use std::sync::Arc;

use log::debug;

use super::chain::{ActiveChain, ChainEntry};
use super::error::NoMatch;
use super::path;
use super::registry::RouteTree;

pub fn match_path(tree: &RouteTree, raw_path: &str) -> Result<ActiveChain, NoMatch> {
    let segments = path::split(raw_path);
    let mut node = Arc::clone(tree.root());
    let mut entries = vec![ChainEntry::new(Arc::clone(&node), "")];

    for segment in &segments {
        let next = node
            .literal_child(segment)
            .or_else(|| node.param_child())
            .cloned();

        match next {
            Some(child) => {
                entries.push(ChainEntry::new(Arc::clone(&child), *segment));
                node = child;
            }
            None => {
                debug!("No child of {} matches segment {:?}", node.id(), segment);
                return Err(NoMatch {
                    path: path::join(&segments),
                    segment: segment.to_string(),
                    matched: ActiveChain::new(entries),
                });
            }
        }
    }

    if let Some(index) = node.index_child() {
        entries.push(ChainEntry::new(Arc::clone(index), ""));
    }

    Ok(ActiveChain::new(entries))
}
