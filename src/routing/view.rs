//! # View Trees
//!
//! The typed output of a render function: elements with attributes and
//! children, text, links and at most one meaningful `Outlet` marking where a
//! matched child is composed in.
//!
//! ```rust,ignore
//! ViewTree::element("div")
//!     .attr("class", "container")
//!     .child(ViewTree::element("h1").child(ViewTree::text("Kody")))
//!     .child(ViewTree::link("notes", "Notes"))
//!     .child(ViewTree::outlet())
//! ```

use super::link::LinkTarget;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewTree {
    Element {
        tag: String,
        attrs: Vec<(String, String)>,
        children: Vec<ViewTree>,
    },
    Text(String),
    Link {
        to: LinkTarget,
        label: String,
        attrs: Vec<(String, String)>,
        /// Absolute path, filled in during composition.
        href: Option<String>,
    },
    Outlet,
}

impl ViewTree {
    pub fn element(tag: &str) -> Self {
        ViewTree::Element {
            tag: tag.to_string(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn text(text: impl Into<String>) -> Self {
        ViewTree::Text(text.into())
    }

    pub fn link(to: impl Into<LinkTarget>, label: impl Into<String>) -> Self {
        ViewTree::Link {
            to: to.into(),
            label: label.into(),
            attrs: Vec::new(),
            href: None,
        }
    }

    pub fn outlet() -> Self {
        ViewTree::Outlet
    }

    /// Adds an attribute to an element or link. No effect on other nodes.
    pub fn attr(mut self, key: &str, value: impl Into<String>) -> Self {
        if let ViewTree::Element { attrs, .. } | ViewTree::Link { attrs, .. } = &mut self {
            attrs.push((key.to_string(), value.into()));
        }
        self
    }

    /// Appends a child. No effect on non-element nodes.
    pub fn child(mut self, child: ViewTree) -> Self {
        if let ViewTree::Element { children, .. } = &mut self {
            children.push(child);
        }
        self
    }

    pub fn children(mut self, iter: impl IntoIterator<Item = ViewTree>) -> Self {
        if let ViewTree::Element { children, .. } = &mut self {
            children.extend(iter);
        }
        self
    }

    pub fn tag(&self) -> Option<&str> {
        match self {
            ViewTree::Element { tag, .. } => Some(tag),
            _ => None,
        }
    }

    pub fn get_attr(&self, key: &str) -> Option<&str> {
        match self {
            ViewTree::Element { attrs, .. } | ViewTree::Link { attrs, .. } => attrs
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str()),
            _ => None,
        }
    }

    pub fn has_outlet(&self) -> bool {
        match self {
            ViewTree::Outlet => true,
            ViewTree::Element { children, .. } => children.iter().any(ViewTree::has_outlet),
            _ => false,
        }
    }

    /// Replaces the first outlet with `child`. Remaining outlets, or all of
    /// them when `child` is `None`, are dropped.
    pub fn fill_outlet(self, child: Option<ViewTree>) -> ViewTree {
        let mut slot = child;
        self.fill_with(&mut slot)
    }

    fn fill_with(self, slot: &mut Option<ViewTree>) -> ViewTree {
        match self {
            ViewTree::Element {
                tag,
                attrs,
                children,
            } => {
                let mut filled = Vec::with_capacity(children.len());
                for child in children {
                    if let ViewTree::Outlet = child {
                        if let Some(inner) = slot.take() {
                            filled.push(inner);
                        }
                    } else {
                        filled.push(child.fill_with(slot));
                    }
                }
                ViewTree::Element {
                    tag,
                    attrs,
                    children: filled,
                }
            }
            ViewTree::Outlet => slot.take().unwrap_or_else(|| ViewTree::text("")),
            other => other,
        }
    }

    /// Fills in `href` on every link that does not have one yet.
    pub fn resolve_links<F>(self, resolve: &F) -> ViewTree
    where
        F: Fn(&LinkTarget) -> String,
    {
        match self {
            ViewTree::Element {
                tag,
                attrs,
                children,
            } => ViewTree::Element {
                tag,
                attrs,
                children: children
                    .into_iter()
                    .map(|c| c.resolve_links(resolve))
                    .collect(),
            },
            ViewTree::Link {
                to,
                label,
                attrs,
                href: None,
            } => {
                let href = resolve(&to);
                ViewTree::Link {
                    to,
                    label,
                    attrs,
                    href: Some(href),
                }
            }
            other => other,
        }
    }

    /// Links in document order as `(label, href)`; unresolved links fall back to their raw target.
    pub fn links(&self) -> Vec<(&str, &str)> {
        let mut out = Vec::new();
        self.collect_links(&mut out);
        out
    }

    fn collect_links<'a>(&'a self, out: &mut Vec<(&'a str, &'a str)>) {
        match self {
            ViewTree::Element { children, .. } => {
                for child in children {
                    child.collect_links(out);
                }
            }
            ViewTree::Link { to, label, href, .. } => {
                out.push((label, href.as_deref().unwrap_or(to.raw())));
            }
            _ => {}
        }
    }

    /// Concatenated text and link labels, for assertions and logging.
    pub fn text_content(&self) -> String {
        match self {
            ViewTree::Element { children, .. } => children
                .iter()
                .map(ViewTree::text_content)
                .filter(|s| !s.is_empty())
                .collect::<Vec<_>>()
                .join(" "),
            ViewTree::Text(text) => text.clone(),
            ViewTree::Link { label, .. } => label.clone(),
            ViewTree::Outlet => String::new(),
        }
    }
}

/// Nests each layer into the outlet of the one before it. `layers` run root first.
pub fn compose(layers: Vec<ViewTree>) -> ViewTree {
    layers
        .into_iter()
        .rev()
        .fold(None, |inner, layer| Some(layer.fill_outlet(inner)))
        .unwrap_or_else(|| ViewTree::text(""))
}
