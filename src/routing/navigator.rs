//! # Navigator
//!
//! The navigation controller. It is the only owner of mutable routing
//! state: the history stack, the current `ActiveChain` and the instances
//! mounted for it.
//!
//! ```text
//!  navigate(path) ─┬─ history.push
//!                  ├─ match_path ──▶ new chain
//!                  ├─ diff with old chain
//!                  │    common prefix   → kept (same InstanceId, same data)
//!                  │    old suffix      → unmounted
//!                  │    new suffix      → mounted, loads issued
//!                  └─ generation += 1
//!
//!  settle(generation, instance, result)
//!       stale generation or unknown instance → Discarded
//!       otherwise                            → Committed
//! ```
//!
//! Each navigation bumps the generation. Loads are tagged with it, so a
//! result from a superseded navigation can never land in committed state.
//! Preserved nodes that were still pending get their load re-issued under
//! the new generation.

use std::fmt;
use std::sync::Arc;

use log::{debug, info, warn};
use serde_json::Value;

use super::chain::ActiveChain;
use super::error::LoaderFailure;
use super::history::{History, MemoryHistory};
use super::link::{LinkTarget, resolve_from};
use super::loader::{LoadContext, LoadRequest};
use super::matcher::match_path;
use super::node::{ErrorViewFn, NotFoundFn, RenderContext, RouteId};
use super::path;
use super::registry::RouteTree;
use super::view::{ViewTree, compose};

/// Identity of one mounted render of a route. A route that is unmounted and
/// mounted again gets a fresh id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct InstanceId(pub u64);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
    /// The route has no loader.
    Idle,
    Pending,
    Ready(Value),
    Failed(LoaderFailure),
}

#[derive(Debug, Clone)]
pub struct MountedRoute {
    pub instance: InstanceId,
    pub route: RouteId,
    pub value: String,
    pub load: LoadState,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    Matched,
    /// The path stopped matching at `segment`; the chain holds the matched prefix.
    NotFound { segment: String },
}

/// What one navigation changed.
#[derive(Debug)]
pub struct Transition {
    pub generation: u64,
    pub path: String,
    /// Length of the chain prefix that kept its instances.
    pub preserved: usize,
    pub unmounted: Vec<InstanceId>,
    pub mounted: Vec<InstanceId>,
    /// Loads the runtime must execute and feed back through `settle`.
    pub loads: Vec<LoadRequest>,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Settlement {
    Committed,
    Discarded,
}

pub type PendingFn = Arc<dyn Fn(&str) -> ViewTree + Send + Sync>;

/// Top-level views used when no route in the chain declares a boundary.
#[derive(Clone)]
pub struct Fallbacks {
    pub not_found: NotFoundFn,
    pub error: ErrorViewFn,
    pub pending: PendingFn,
}

impl Default for Fallbacks {
    fn default() -> Self {
        Self {
            not_found: Arc::new(|path: &str| {
                ViewTree::element("div")
                    .attr("class", "not-found")
                    .child(ViewTree::element("h1").child(ViewTree::text("404")))
                    .child(
                        ViewTree::element("p")
                            .child(ViewTree::text(format!("Nothing lives at {path}"))),
                    )
                    .child(ViewTree::link("/", "Home"))
            }),
            error: Arc::new(|failure: &LoaderFailure| {
                ViewTree::element("div")
                    .attr("class", "error")
                    .child(ViewTree::element("h1").child(ViewTree::text("Something went wrong")))
                    .child(ViewTree::element("p").child(ViewTree::text(failure.to_string())))
            }),
            pending: Arc::new(|_path: &str| {
                ViewTree::element("p")
                    .attr("class", "pending")
                    .child(ViewTree::text("Loading…"))
            }),
        }
    }
}

pub struct Navigator<H: History = MemoryHistory> {
    tree: Arc<RouteTree>,
    history: H,
    chain: ActiveChain,
    mounted: Vec<MountedRoute>,
    outcome: Outcome,
    path: String,
    generation: u64,
    next_instance: u64,
    fallbacks: Fallbacks,
}

impl<H: History> Navigator<H> {
    /// Nothing is mounted until [`Navigator::start`].
    pub fn new(tree: Arc<RouteTree>, history: H) -> Self {
        let path = history.current().to_string();
        Self {
            tree,
            history,
            chain: ActiveChain::new(Vec::new()),
            mounted: Vec::new(),
            outcome: Outcome::Matched,
            path,
            generation: 0,
            next_instance: 0,
            fallbacks: Fallbacks::default(),
        }
    }

    pub fn with_fallbacks(mut self, fallbacks: Fallbacks) -> Self {
        self.fallbacks = fallbacks;
        self
    }

    /// Mounts whatever the history currently points at, without pushing.
    pub fn start(&mut self) -> Transition {
        let path = self.history.current().to_string();
        info!("Navigator starting at {}", path);
        self.transition(&path)
    }

    /// Pushes `to` onto the history and transitions to it.
    pub fn navigate(&mut self, to: &str) -> Transition {
        let path = path::normalize(to);
        self.history.push(&path);
        self.transition(&path)
    }

    /// Activates a link rendered by the chain entry at `anchor_depth`.
    pub fn follow(&mut self, target: &LinkTarget, anchor_depth: usize) -> Transition {
        let href = resolve_from(&self.chain, anchor_depth, target);
        debug!(
            "Following link {:?} from depth {} -> {}",
            target.raw(),
            anchor_depth,
            href
        );
        self.navigate(&href)
    }

    pub fn back(&mut self) -> Option<Transition> {
        let path = self.history.back()?;
        Some(self.transition(&path))
    }

    pub fn forward(&mut self) -> Option<Transition> {
        let path = self.history.forward()?;
        Some(self.transition(&path))
    }

    fn transition(&mut self, path: &str) -> Transition {
        self.generation += 1;
        let generation = self.generation;

        let (chain, outcome) = match match_path(&self.tree, path) {
            Ok(chain) => (chain, Outcome::Matched),
            Err(no_match) => {
                warn!("{}", no_match);
                (
                    no_match.matched,
                    Outcome::NotFound {
                        segment: no_match.segment,
                    },
                )
            }
        };

        let preserved = self.chain.common_prefix_len(&chain);
        let unmounted: Vec<InstanceId> = self
            .mounted
            .drain(preserved..)
            .map(|m| m.instance)
            .collect();

        let mut loads: Vec<LoadRequest> = self
            .mounted
            .iter()
            .enumerate()
            .filter(|(_, m)| m.load == LoadState::Pending)
            .filter_map(|(depth, m)| load_request(&chain, depth, m.instance, generation))
            .collect();

        let mut mounted = Vec::with_capacity(chain.len() - preserved);
        for depth in preserved..chain.len() {
            let entry = &chain.entries()[depth];
            let instance = InstanceId(self.next_instance);
            self.next_instance += 1;

            let load = match load_request(&chain, depth, instance, generation) {
                Some(request) => {
                    loads.push(request);
                    LoadState::Pending
                }
                None => LoadState::Idle,
            };
            self.mounted.push(MountedRoute {
                instance,
                route: entry.id().clone(),
                value: entry.value().to_string(),
                load,
            });
            mounted.push(instance);
        }

        info!(
            "Navigation {} -> {} (generation={}, kept={}, unmounted={}, mounted={}, loads={})",
            self.path,
            path,
            generation,
            preserved,
            unmounted.len(),
            mounted.len(),
            loads.len()
        );

        self.chain = chain;
        self.outcome = outcome.clone();
        self.path = path.to_string();

        Transition {
            generation,
            path: path.to_string(),
            preserved,
            unmounted,
            mounted,
            loads,
            outcome,
        }
    }

    /// Hands a loader result back. Only the current generation can commit,
    /// and only into an instance that is still mounted and pending.
    pub fn settle(
        &mut self,
        generation: u64,
        instance: InstanceId,
        result: Result<Value, LoaderFailure>,
    ) -> Settlement {
        if generation != self.generation {
            debug!(
                "Discarding load for {} from generation {} (current {})",
                instance, generation, self.generation
            );
            return Settlement::Discarded;
        }
        let Some(mounted) = self.mounted.iter_mut().find(|m| m.instance == instance) else {
            debug!("Discarding load for unmounted instance {}", instance);
            return Settlement::Discarded;
        };
        if mounted.load != LoadState::Pending {
            return Settlement::Discarded;
        }
        mounted.load = match result {
            Ok(value) => LoadState::Ready(value),
            Err(failure) => {
                warn!("Loader for {} failed: {}", mounted.route, failure);
                LoadState::Failed(failure)
            }
        };
        Settlement::Committed
    }

    pub fn tree(&self) -> &Arc<RouteTree> {
        &self.tree
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    pub fn chain(&self) -> &ActiveChain {
        &self.chain
    }

    pub fn mounted(&self) -> &[MountedRoute] {
        &self.mounted
    }

    pub fn outcome(&self) -> &Outcome {
        &self.outcome
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn is_pending(&self) -> bool {
        self.mounted.iter().any(|m| m.load == LoadState::Pending)
    }

    /// Instance mounted for `route`, if it is part of the current chain.
    pub fn instance_of(&self, route: &str) -> Option<InstanceId> {
        self.mounted
            .iter()
            .find(|m| m.route.as_str() == route)
            .map(|m| m.instance)
    }

    /// Composes the mounted chain into one view, root first.
    ///
    /// A pending route shows the pending placeholder in its slot and hides
    /// its descendants. A failed route is replaced, together with everything
    /// below it, by the closest error boundary at or above it.
    pub fn view(&self) -> ViewTree {
        let mut layers = Vec::with_capacity(self.mounted.len());
        for (depth, mounted) in self.mounted.iter().enumerate() {
            match &mounted.load {
                LoadState::Pending => {
                    layers.push((self.fallbacks.pending)(&self.chain.path_to(depth)));
                    return compose(layers);
                }
                LoadState::Failed(failure) => return self.error_view(layers, depth, failure),
                LoadState::Ready(data) => layers.push(self.render_layer(depth, Some(data))),
                LoadState::Idle => layers.push(self.render_layer(depth, None)),
            }
        }

        match &self.outcome {
            Outcome::Matched => compose(layers),
            Outcome::NotFound { .. } => self.not_found_view(layers),
        }
    }

    /// `(label, href)` of every link in the current view.
    pub fn links(&self) -> Vec<(String, String)> {
        self.view()
            .links()
            .into_iter()
            .map(|(label, href)| (label.to_string(), href.to_string()))
            .collect()
    }

    fn render_layer(&self, depth: usize, data: Option<&Value>) -> ViewTree {
        let entry = &self.chain.entries()[depth];
        let path = self.chain.path_to(depth);
        let params = self.chain.params_to(depth);
        let ctx = RenderContext {
            path: &path,
            params: &params,
            data,
        };
        self.anchor(entry.node().render(&ctx), depth)
    }

    fn anchor(&self, view: ViewTree, depth: usize) -> ViewTree {
        view.resolve_links(&|target: &LinkTarget| resolve_from(&self.chain, depth, target))
    }

    fn error_view(
        &self,
        mut layers: Vec<ViewTree>,
        depth: usize,
        failure: &LoaderFailure,
    ) -> ViewTree {
        let boundary = (0..=depth)
            .rev()
            .find(|&d| self.chain.entries()[d].node().has_error_boundary());

        match boundary {
            Some(d) => {
                let node = self.chain.entries()[d].node();
                debug!("Loader failure at depth {} handled by {}", depth, node.id());
                layers.truncate(d);
                if let Some(view) = node.render_error(failure) {
                    layers.push(self.anchor(view, d));
                }
                compose(layers)
            }
            None => self.anchor((self.fallbacks.error)(failure), 0),
        }
    }

    fn not_found_view(&self, mut layers: Vec<ViewTree>) -> ViewTree {
        let boundary = (0..self.chain.len())
            .rev()
            .find(|&d| self.chain.entries()[d].node().has_not_found());

        let (depth, view) = match boundary {
            Some(d) => {
                let node = self.chain.entries()[d].node();
                (d, node.render_not_found(&self.path))
            }
            None => {
                let deepest = (0..layers.len())
                    .rev()
                    .find(|&d| layers[d].has_outlet())
                    .unwrap_or(0);
                (deepest, Some((self.fallbacks.not_found)(&self.path)))
            }
        };

        layers.truncate(depth + 1);
        if let Some(view) = view {
            layers.push(self.anchor(view, depth));
        }
        compose(layers)
    }
}

fn load_request(
    chain: &ActiveChain,
    depth: usize,
    instance: InstanceId,
    generation: u64,
) -> Option<LoadRequest> {
    let entry = chain.entries().get(depth)?;
    let loader = entry.node().loader()?;
    Some(LoadRequest {
        generation,
        instance,
        context: LoadContext {
            route: entry.id().clone(),
            path: chain.path_to(depth),
            params: chain.params_to(depth),
        },
        loader: Arc::clone(loader),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::loader::FixtureLoader;
    use crate::routing::registry::{RouteEntry, RouteRegistry};
    use crate::test_support::{demo_navigator, settle_all};
    use serde_json::json;

    const KODY: &str = "routes/users+/kody";
    const NOTES: &str = "routes/users+/kody.notes";
    const USER: &str = "routes/users+/$username";

    #[test]
    fn test_start_mounts_chain_without_pushing() {
        let mut nav = demo_navigator("/users/kody");
        let t = nav.start();

        assert_eq!(t.preserved, 0);
        assert_eq!(t.mounted.len(), 3);
        assert!(t.unmounted.is_empty());
        assert_eq!(nav.history().entries().len(), 1);
        assert_eq!(nav.outcome(), &Outcome::Matched);
    }

    #[test]
    fn test_child_navigation_preserves_parent_instance() {
        let mut nav = demo_navigator("/users/kody");
        nav.start();
        let kody = nav.instance_of(KODY).unwrap();

        let t = nav.navigate("/users/kody/notes");

        assert_eq!(t.preserved, 3);
        assert!(t.unmounted.is_empty());
        assert_eq!(t.mounted.len(), 1);
        assert_eq!(nav.instance_of(KODY), Some(kody));
        assert_eq!(nav.instance_of(NOTES), Some(t.mounted[0]));
        assert_eq!(t.loads.len(), 1);
        assert_eq!(t.loads[0].context.path, "/users/kody/notes");
    }

    #[test]
    fn test_sibling_navigation_unmounts_suffix() {
        let mut nav = demo_navigator("/users/kody/notes");
        nav.start();
        let kody = nav.instance_of(KODY).unwrap();
        let notes = nav.instance_of(NOTES).unwrap();

        let t = nav.navigate("/users/jake");

        assert_eq!(t.preserved, 2);
        assert_eq!(t.unmounted, vec![kody, notes]);
        assert!(nav.instance_of(USER).is_some());
    }

    #[test]
    fn test_param_change_remounts_dynamic_route() {
        let mut nav = demo_navigator("/users/jake");
        nav.start();
        let jake = nav.instance_of(USER).unwrap();

        let t = nav.navigate("/users/ryan");

        assert_eq!(t.unmounted, vec![jake]);
        assert_ne!(nav.instance_of(USER), Some(jake));
    }

    #[test]
    fn test_follow_resolves_against_anchor() {
        let mut nav = demo_navigator("/users/kody");
        nav.start();
        let t = nav.follow(&LinkTarget::new("notes"), 2);
        assert_eq!(t.path, "/users/kody/notes");
        assert_eq!(nav.history().current(), "/users/kody/notes");
    }

    #[test]
    fn test_stale_load_is_discarded() {
        let mut nav = demo_navigator("/");
        nav.start();

        let first = nav.navigate("/users/jake");
        let second = nav.navigate("/users/ryan");
        let late = &first.loads[0];

        let settled = nav.settle(late.generation, late.instance, Ok(json!({ "name": "Jake" })));
        assert_eq!(settled, Settlement::Discarded);
        assert!(nav.is_pending());

        let current = &second.loads[0];
        let settled = nav.settle(current.generation, current.instance, Ok(json!({ "name": "Ryan" })));
        assert_eq!(settled, Settlement::Committed);
        assert!(!nav.is_pending());
        assert!(nav.view().text_content().contains("Ryan"));
    }

    #[test]
    fn test_preserved_pending_route_is_reloaded_under_new_generation() {
        let mut nav = demo_navigator("/");
        nav.start();
        let first = nav.navigate("/users/jake");
        let second = nav.navigate("/users/jake/notes");

        assert_eq!(second.preserved, 3);
        assert_eq!(second.loads.len(), 2);
        assert_eq!(second.loads[0].instance, first.loads[0].instance);
        assert_eq!(second.loads[0].generation, second.generation);

        let stale = &first.loads[0];
        assert_eq!(
            nav.settle(stale.generation, stale.instance, Ok(json!({}))),
            Settlement::Discarded
        );
        settle_all(&mut nav, second.loads);
        assert!(!nav.is_pending());
    }

    #[test]
    fn test_double_settle_is_discarded() {
        let mut nav = demo_navigator("/users/jake");
        let t = nav.start();
        let load = &t.loads[0];
        assert_eq!(nav.settle(load.generation, load.instance, Ok(json!({}))), Settlement::Committed);
        assert_eq!(nav.settle(load.generation, load.instance, Ok(json!({}))), Settlement::Discarded);
    }

    #[test]
    fn test_pending_route_keeps_ancestors_rendered() {
        let mut nav = demo_navigator("/users/jake/notes");
        let t = nav.start();

        let text = nav.view().text_content();
        assert!(text.contains("Epic Notes"));
        assert!(text.contains("Loading"));

        settle_all(&mut nav, t.loads);
        let text = nav.view().text_content();
        assert!(!text.contains("Loading"));
        assert!(text.contains("Jake"));
    }

    #[test]
    fn test_loader_failure_uses_own_boundary() {
        let mut nav = demo_navigator("/users/nobody");
        let t = nav.start();
        settle_all(&mut nav, t.loads);

        let text = nav.view().text_content();
        assert!(text.contains("Epic Notes"));
        assert!(text.contains("Could not load this user"));
        assert!(text.contains("not found: /users/nobody"));
    }

    #[test]
    fn test_loader_failure_bubbles_to_ancestor_boundary() {
        // ryan exists, but has no notes; the notes route has no boundary.
        let mut nav = demo_navigator("/users/ryan/notes");
        let t = nav.start();
        settle_all(&mut nav, t.loads);

        let text = nav.view().text_content();
        assert!(text.contains("Epic Notes"));
        assert!(text.contains("Could not load this user"));
        assert!(text.contains("not found: /users/ryan/notes"));
        assert!(!text.contains("Ryan's notes"));
    }

    #[test]
    fn test_loader_failure_without_boundary_uses_top_level_fallback() {
        let tree = RouteRegistry::new()
            .route(
                RouteEntry::new("broken", "broken", |_| ViewTree::text("never"))
                    .loader(FixtureLoader::new("broken", |_| {
                        Err(LoaderFailure::Network("refused".into()))
                    })),
            )
            .build()
            .unwrap();
        let mut nav = Navigator::new(Arc::new(tree), MemoryHistory::new("/broken"));
        let t = nav.start();
        settle_all(&mut nav, t.loads);

        let text = nav.view().text_content();
        assert!(text.contains("Something went wrong"));
        assert!(text.contains("network error: refused"));
    }

    #[test]
    fn test_no_match_commits_history_and_keeps_ancestors() {
        let mut nav = demo_navigator("/users/kody");
        nav.start();
        let users = nav.instance_of("routes/users+").unwrap();
        let kody = nav.instance_of(KODY).unwrap();

        let t = nav.navigate("/users/kody/settings");

        assert_eq!(
            t.outcome,
            Outcome::NotFound {
                segment: "settings".into()
            }
        );
        assert_eq!(nav.history().current(), "/users/kody/settings");
        assert_eq!(nav.instance_of("routes/users+"), Some(users));
        assert_eq!(nav.instance_of(KODY), Some(kody));

        let text = nav.view().text_content();
        assert!(text.contains("Epic Notes"));
        assert!(text.contains("/users/kody/settings"));
    }

    #[test]
    fn test_global_not_found_fallback() {
        let mut nav = demo_navigator("/nowhere");
        nav.start();
        let text = nav.view().text_content();
        assert!(text.contains("Epic Notes"));
        assert!(text.contains("Nothing lives at /nowhere"));
    }

    #[test]
    fn test_global_not_found_keeps_matched_ancestors_rendered() {
        let tree = RouteRegistry::new()
            .route(RouteEntry::new("users", "users", |_| {
                ViewTree::element("section")
                    .child(ViewTree::text("Users"))
                    .child(ViewTree::outlet())
            }))
            .route(
                RouteEntry::new("kody", "kody", |_| {
                    ViewTree::element("div")
                        .child(ViewTree::text("Kody"))
                        .child(ViewTree::outlet())
                })
                .parent("users"),
            )
            .build()
            .unwrap();
        let mut nav = Navigator::new(Arc::new(tree), MemoryHistory::new("/users/kody"));
        nav.start();
        nav.navigate("/users/kody/settings");

        assert_eq!(
            nav.view().text_content(),
            "Users Kody 404 Nothing lives at /users/kody/settings Home"
        );
    }

    #[test]
    fn test_back_does_not_push() {
        let mut nav = demo_navigator("/users/kody");
        nav.start();
        nav.navigate("/users/kody/notes");

        let t = nav.back().unwrap();
        assert_eq!(t.path, "/users/kody");
        assert_eq!(nav.history().entries().len(), 2);
        assert!(nav.forward().is_some());
        assert_eq!(nav.path(), "/users/kody/notes");
    }

    #[test]
    fn test_links_are_anchored_at_rendering_route() {
        let mut nav = demo_navigator("/users/kody/notes");
        let t = nav.start();
        settle_all(&mut nav, t.loads);

        let links = nav.links();
        assert!(links.contains(&("Notes".to_string(), "/users/kody/notes".to_string())));
        assert!(links.contains(&("Jake's profile".to_string(), "/users/jake".to_string())));
    }
}
