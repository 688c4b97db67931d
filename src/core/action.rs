//! # Actions
//!
//! Everything that can happen in Outlet becomes an `Action`.
//! User follows a link? That's `Action::FollowFocused`.
//! A loader settles? That's `Action::LoaderSettled { .. }`.
//!
//! The `update()` function takes the current state and an action, mutates
//! the state and returns an `Effect` for the runtime to carry out. No I/O
//! happens here.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```

use log::{debug, info};
use serde_json::Value;

use crate::core::state::App;
use crate::routing::{InstanceId, LoadRequest, LoaderFailure, Outcome, Settlement, Transition};

#[derive(Debug)]
pub enum Action {
    /// Mount the initial history entry.
    Start,
    Navigate(String),
    FollowFocused,
    FocusNext,
    FocusPrev,
    Back,
    Forward,
    LoaderSettled {
        generation: u64,
        instance: InstanceId,
        result: Result<Value, LoaderFailure>,
    },
    Quit,
}

#[derive(Debug)]
pub enum Effect {
    None,
    Quit,
    /// A navigation happened. The runtime cancels every load still in
    /// flight and runs these instead (possibly none). `reset_scroll` is set
    /// when nothing below the root survived the transition.
    SpawnLoads {
        loads: Vec<LoadRequest>,
        reset_scroll: bool,
    },
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Start => {
            let transition = app.navigator.start();
            transitioned(app, transition)
        }
        Action::Navigate(path) => {
            let transition = app.navigator.navigate(&path);
            transitioned(app, transition)
        }
        Action::FollowFocused => match app.focused() {
            Some((label, href)) => {
                info!("Following link '{}' -> {}", label, href);
                let transition = app.navigator.navigate(&href);
                transitioned(app, transition)
            }
            None => Effect::None,
        },
        Action::FocusNext => {
            let count = app.navigator.links().len();
            app.focused_link = match (app.focused_link, count) {
                (_, 0) => None,
                (Some(i), n) => Some((i + 1) % n),
                (None, _) => Some(0),
            };
            Effect::None
        }
        Action::FocusPrev => {
            let count = app.navigator.links().len();
            app.focused_link = match (app.focused_link, count) {
                (_, 0) => None,
                (Some(0), n) | (None, n) => Some(n - 1),
                (Some(i), _) => Some(i - 1),
            };
            Effect::None
        }
        Action::Back => match app.navigator.back() {
            Some(transition) => transitioned(app, transition),
            None => {
                app.status_message = String::from("Already at the oldest entry");
                Effect::None
            }
        },
        Action::Forward => match app.navigator.forward() {
            Some(transition) => transitioned(app, transition),
            None => {
                app.status_message = String::from("Already at the newest entry");
                Effect::None
            }
        },
        Action::LoaderSettled {
            generation,
            instance,
            result,
        } => {
            if app.navigator.settle(generation, instance, result) == Settlement::Committed {
                let links = app.navigator.links().len();
                if app.focused_link.is_some_and(|i| i >= links) {
                    app.focused_link = None;
                }
                if !app.navigator.is_pending() {
                    app.status_message = app.navigator.path().to_string();
                }
            }
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}

fn transitioned(app: &mut App, transition: Transition) -> Effect {
    app.focused_link = None;
    app.status_message = match &transition.outcome {
        Outcome::NotFound { segment } => {
            format!("No route for {} (at \"{}\")", transition.path, segment)
        }
        Outcome::Matched if transition.loads.is_empty() => transition.path.clone(),
        Outcome::Matched => format!("Loading {}…", transition.path),
    };
    Effect::SpawnLoads {
        reset_scroll: transition.preserved <= 1,
        loads: transition.loads,
    }
}
