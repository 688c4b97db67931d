//! # Navigation Links
//!
//! A `LinkTarget` is the raw `to` of a link. Absolute targets (leading `/`)
//! are used as-is. Relative targets are anchored at the matched node that
//! rendered the link, not at the tree root:
//!
//! - a target starting with a plain segment descends below the anchor
//!   (`notes` from `/users/kody` → `/users/kody/notes`);
//! - a target starting with `.` or `..` resolves like an href against the
//!   anchor's URL, so the anchor's own segment is replaced
//!   (`../jake` from `/users/kody/notes` → `/users/jake`).
//!
//! Resolution never climbs above `/`.

use super::chain::ActiveChain;
use super::path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    raw: String,
    is_relative: bool,
}

impl LinkTarget {
    pub fn new(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let is_relative = !raw.starts_with('/');
        Self { raw, is_relative }
    }

    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn is_relative(&self) -> bool {
        self.is_relative
    }
}

impl From<&str> for LinkTarget {
    fn from(value: &str) -> Self {
        LinkTarget::new(value)
    }
}

impl From<String> for LinkTarget {
    fn from(value: String) -> Self {
        LinkTarget::new(value)
    }
}

/// Resolves `target` against the tail of `chain`.
pub fn resolve(chain: &ActiveChain, target: &LinkTarget) -> String {
    resolve_from(chain, chain.len().saturating_sub(1), target)
}

/// Resolves `target` against the chain entry at `depth` (the node that rendered the link).
pub fn resolve_from(chain: &ActiveChain, depth: usize, target: &LinkTarget) -> String {
    if !target.is_relative() {
        return path::normalize(target.raw());
    }

    let mut base = chain.segments_to(depth);
    let segments = path::split(target.raw());

    if matches!(segments.first(), Some(&".") | Some(&"..")) {
        base.pop();
    }
    path::apply_segments(&mut base, &segments);
    path::join(&base)
}
