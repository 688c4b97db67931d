//! # Route Registry
//!
//! Startup-time registration table. Each entry names its id, its segment,
//! whether it is an index route, and its parent; `build()` validates the
//! table and produces the immutable `RouteTree`.
//!
//! ```text
//! RouteEntry("routes/users+",      "users")
//! RouteEntry("routes/users+/kody", "kody").parent("routes/users+")
//!        │
//!        ▼ build()
//! root ── users ── kody
//! ```
//!
//! Sibling conflicts (duplicate literals, two dynamic children, two index
//! children) are rejected here so the matcher never has to break ties.

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;

use log::{debug, info};

use super::error::{LoaderFailure, RegistrationError};
use super::loader::Loader;
use super::node::{
    ErrorViewFn, NotFoundFn, RenderContext, RenderFn, RouteId, RouteNode, Segment,
};
use super::view::ViewTree;

pub const ROOT_ID: &str = "root";

/// One row of the registration table.
pub struct RouteEntry {
    id: String,
    segment: Option<String>,
    index: bool,
    parent: Option<String>,
    render: RenderFn,
    loader: Option<Arc<dyn Loader>>,
    error_boundary: Option<ErrorViewFn>,
    not_found: Option<NotFoundFn>,
}

impl RouteEntry {
    /// A route matching `segment` (`"kody"`, `"$username"`).
    pub fn new<F>(id: &str, segment: &str, render: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> ViewTree + Send + Sync + 'static,
    {
        Self::with_parts(id, Some(segment.to_string()), false, Arc::new(render))
    }

    /// An index route, selected when its parent has no path left.
    pub fn index<F>(id: &str, render: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> ViewTree + Send + Sync + 'static,
    {
        Self::with_parts(id, None, true, Arc::new(render))
    }

    /// The root layout. Its id is always [`ROOT_ID`].
    pub fn root<F>(render: F) -> Self
    where
        F: Fn(&RenderContext<'_>) -> ViewTree + Send + Sync + 'static,
    {
        Self::with_parts(ROOT_ID, None, false, Arc::new(render))
    }

    fn with_parts(id: &str, segment: Option<String>, index: bool, render: RenderFn) -> Self {
        Self {
            id: id.to_string(),
            segment,
            index,
            parent: None,
            render,
            loader: None,
            error_boundary: None,
            not_found: None,
        }
    }

    pub fn parent(mut self, parent: &str) -> Self {
        self.parent = Some(parent.to_string());
        self
    }

    pub fn loader<L: Loader + 'static>(mut self, loader: L) -> Self {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn shared_loader(mut self, loader: Arc<dyn Loader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Declares that this route renders loader failures from itself and its descendants.
    pub fn error_boundary<F>(mut self, view: F) -> Self
    where
        F: Fn(&LoaderFailure) -> ViewTree + Send + Sync + 'static,
    {
        self.error_boundary = Some(Arc::new(view));
        self
    }

    /// Declares the view shown in this route's outlet when a path below it does not match.
    pub fn not_found<F>(mut self, view: F) -> Self
    where
        F: Fn(&str) -> ViewTree + Send + Sync + 'static,
    {
        self.not_found = Some(Arc::new(view));
        self
    }
}

/// Registration table, consumed once by [`RouteRegistry::build`].
pub struct RouteRegistry {
    root: RouteEntry,
    entries: Vec<RouteEntry>,
}

impl Default for RouteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RouteRegistry {
    /// A registry whose root renders nothing but its outlet.
    pub fn new() -> Self {
        Self::with_root(RouteEntry::root(|_| ViewTree::outlet()))
    }

    pub fn with_root(root: RouteEntry) -> Self {
        Self {
            root,
            entries: Vec::new(),
        }
    }

    pub fn route(mut self, entry: RouteEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Validates the table and assembles the tree.
    pub fn build(self) -> Result<RouteTree, RegistrationError> {
        let RouteRegistry { root, entries } = self;

        let mut seen = HashSet::from([ROOT_ID.to_string()]);
        for entry in &entries {
            if !seen.insert(entry.id.clone()) {
                return Err(RegistrationError::DuplicateId(entry.id.clone()));
            }
        }

        let mut segments = Vec::with_capacity(entries.len());
        for entry in &entries {
            segments.push(parse_segment(entry)?);
        }

        // Children grouped by parent, in registration order.
        let mut children: HashMap<&str, Vec<usize>> = HashMap::new();
        for (i, entry) in entries.iter().enumerate() {
            let parent = entry.parent.as_deref().unwrap_or(ROOT_ID);
            if !seen.contains(parent) {
                return Err(RegistrationError::UnknownParent {
                    id: entry.id.clone(),
                    parent: parent.to_string(),
                });
            }
            children.entry(parent).or_default().push(i);
        }

        for (i, entry) in entries.iter().enumerate() {
            if segments[i] == Segment::Index && children.contains_key(entry.id.as_str()) {
                return Err(RegistrationError::IndexWithChildren(entry.id.clone()));
            }
        }

        let mut parents: Vec<&str> = children.keys().copied().collect();
        parents.sort();
        for parent in parents {
            check_siblings(parent, &children[parent], &entries, &segments)?;
        }

        let child_ids: HashMap<String, Vec<usize>> = children
            .into_iter()
            .map(|(parent, ids)| (parent.to_string(), ids))
            .collect();

        let total = entries.len();
        let mut slots: Vec<Option<(RouteEntry, Segment)>> = entries
            .into_iter()
            .zip(segments)
            .map(Some)
            .collect();

        let mut built = 0usize;
        let root_children = assemble_children(ROOT_ID, &child_ids, &mut slots, &mut built);

        if built < total {
            let detached = slots
                .iter()
                .flatten()
                .map(|(entry, _)| entry.id.clone())
                .next()
                .unwrap_or_default();
            return Err(RegistrationError::Detached(detached));
        }

        let root = Arc::new(RouteNode {
            id: RouteId::new(ROOT_ID),
            segment: Segment::Root,
            render: root.render,
            loader: root.loader,
            error_boundary: root.error_boundary,
            not_found: root.not_found,
            children: root_children,
        });

        info!("Route tree built with {} routes", total);
        Ok(RouteTree { root, len: total })
    }
}

fn parse_segment(entry: &RouteEntry) -> Result<Segment, RegistrationError> {
    let invalid = || RegistrationError::InvalidSegment {
        id: entry.id.clone(),
        segment: entry.segment.clone().unwrap_or_default(),
    };
    if entry.index {
        return match entry.segment {
            None => Ok(Segment::Index),
            Some(_) => Err(invalid()),
        };
    }
    entry
        .segment
        .as_deref()
        .and_then(Segment::parse)
        .ok_or_else(invalid)
}

fn check_siblings(
    parent: &str,
    siblings: &[usize],
    entries: &[RouteEntry],
    segments: &[Segment],
) -> Result<(), RegistrationError> {
    let mut literals: HashMap<&str, usize> = HashMap::new();
    let mut param: Option<usize> = None;
    let mut index: Option<usize> = None;

    for &i in siblings {
        match &segments[i] {
            Segment::Literal(s) => {
                if let Some(&first) = literals.get(s.as_str()) {
                    return Err(RegistrationError::DuplicateLiteral {
                        parent: parent.to_string(),
                        segment: s.clone(),
                        first: entries[first].id.clone(),
                        second: entries[i].id.clone(),
                    });
                }
                literals.insert(s.as_str(), i);
            }
            Segment::Param(_) => {
                if let Some(first) = param {
                    return Err(RegistrationError::MultipleParams {
                        parent: parent.to_string(),
                        first: entries[first].id.clone(),
                        second: entries[i].id.clone(),
                    });
                }
                param = Some(i);
            }
            Segment::Index => {
                if let Some(first) = index {
                    return Err(RegistrationError::MultipleIndex {
                        parent: parent.to_string(),
                        first: entries[first].id.clone(),
                        second: entries[i].id.clone(),
                    });
                }
                index = Some(i);
            }
            Segment::Root => {}
        }
    }
    Ok(())
}

fn assemble_children(
    parent: &str,
    child_ids: &HashMap<String, Vec<usize>>,
    slots: &mut [Option<(RouteEntry, Segment)>],
    built: &mut usize,
) -> Vec<Arc<RouteNode>> {
    let Some(ids) = child_ids.get(parent) else {
        return Vec::new();
    };

    let mut nodes = Vec::with_capacity(ids.len());
    for &i in ids {
        let Some((entry, segment)) = slots[i].take() else {
            continue;
        };
        *built += 1;
        let children = assemble_children(&entry.id, child_ids, slots, built);
        debug!("Registered route {} ({}) under {}", entry.id, segment, parent);
        nodes.push(Arc::new(RouteNode {
            id: RouteId::new(&entry.id),
            segment,
            render: entry.render,
            loader: entry.loader,
            error_boundary: entry.error_boundary,
            not_found: entry.not_found,
            children,
        }));
    }
    nodes
}

/// The validated, read-only route tree.
#[derive(Debug)]
pub struct RouteTree {
    root: Arc<RouteNode>,
    len: usize,
}

impl RouteTree {
    pub fn root(&self) -> &Arc<RouteNode> {
        &self.root
    }

    /// Number of registered routes, excluding the root.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn find(&self, id: &str) -> Option<&Arc<RouteNode>> {
        fn walk<'a>(node: &'a Arc<RouteNode>, id: &str) -> Option<&'a Arc<RouteNode>> {
            if node.id().as_str() == id {
                return Some(node);
            }
            node.children().iter().find_map(|c| walk(c, id))
        }
        walk(&self.root, id)
    }
}

impl fmt::Display for RouteTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fn write_node(f: &mut fmt::Formatter<'_>, node: &RouteNode, depth: usize) -> fmt::Result {
            let mut flags = Vec::new();
            if node.loader().is_some() {
                flags.push("loader");
            }
            if node.has_error_boundary() {
                flags.push("error-boundary");
            }
            if node.has_not_found() {
                flags.push("not-found");
            }
            write!(f, "{:indent$}{}  [{}]", "", node.segment(), node.id(), indent = depth * 2)?;
            if !flags.is_empty() {
                write!(f, " ({})", flags.join(", "))?;
            }
            writeln!(f)?;
            for child in node.children() {
                write_node(f, child, depth + 1)?;
            }
            Ok(())
        }
        write_node(f, &self.root, 0)
    }
}
