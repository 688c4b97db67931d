//! The `/users` subtree.

use serde_json::Value;

use super::{LoaderSource, fixtures};
use crate::routing::{LoaderFailure, RenderContext, RouteEntry, RouteRegistry, ViewTree};

const USERS: &str = "routes/users+";
const KODY: &str = "routes/users+/kody";
const USER: &str = "routes/users+/$username";

pub(super) fn register(registry: RouteRegistry, source: &LoaderSource) -> RouteRegistry {
    registry
        .route(RouteEntry::new(USERS, "users", |_| users_layout()).not_found(users_not_found))
        .route(RouteEntry::index("routes/users+/_index", |_| directory()).parent(USERS))
        .route(RouteEntry::new(KODY, "kody", |_| kody_profile()).parent(USERS))
        .route(
            RouteEntry::new("routes/users+/kody.notes", "notes", kody_notes)
                .parent(KODY)
                .shared_loader(source.loader("kody-notes", fixtures::load_notes)),
        )
        .route(
            RouteEntry::new(USER, "$username", user_profile)
                .parent(USERS)
                .shared_loader(source.loader("user", fixtures::load_user))
                .error_boundary(user_error),
        )
        .route(
            RouteEntry::new("routes/users+/$username.notes", "notes", user_notes)
                .parent(USER)
                .shared_loader(source.loader("user-notes", fixtures::load_notes)),
        )
}

fn users_layout() -> ViewTree {
    ViewTree::element("section")
        .attr("class", "users")
        .child(ViewTree::element("h2").child(ViewTree::text("Users")))
        .child(ViewTree::outlet())
}

fn users_not_found(path: &str) -> ViewTree {
    ViewTree::element("div")
        .attr("class", "not-found")
        .child(ViewTree::element("p").child(ViewTree::text(format!("No user page at {path}"))))
        .child(ViewTree::link("/users", "Back to users"))
}

fn directory() -> ViewTree {
    let users = ["kody", "jake", "ryan"].into_iter().filter_map(|username| {
        let user = fixtures::user(username)?;
        let name = user.get("name").and_then(Value::as_str)?.to_string();
        Some(ViewTree::element("li").child(ViewTree::link(username, name)))
    });
    ViewTree::element("ul").children(users)
}

fn kody_profile() -> ViewTree {
    ViewTree::element("div")
        .attr("class", "container mb-48 mt-36 border-4 border-green-500")
        .child(ViewTree::element("h1").child(ViewTree::text("Kody")))
        .child(ViewTree::link("notes", "Notes").attr("class", "underline"))
        .child(ViewTree::outlet())
}

fn kody_notes(ctx: &RenderContext<'_>) -> ViewTree {
    ViewTree::element("div")
        .child(note_list(ctx.data))
        .child(ViewTree::link("../jake", "Jake's profile"))
        .child(ViewTree::link("..", "All users"))
}

fn user_profile(ctx: &RenderContext<'_>) -> ViewTree {
    let name = ctx
        .data_str("name")
        .or_else(|| ctx.param("username"))
        .unwrap_or_default();
    let mut profile = ViewTree::element("div")
        .attr("class", "profile")
        .child(ViewTree::element("h1").child(ViewTree::text(name)));
    if let Some(bio) = ctx.data_str("bio") {
        profile = profile.child(ViewTree::element("p").child(ViewTree::text(bio)));
    }
    profile
        .child(ViewTree::link("notes", "Notes"))
        .child(ViewTree::outlet())
}

fn user_notes(ctx: &RenderContext<'_>) -> ViewTree {
    let owner = ctx
        .data_str("owner")
        .or_else(|| ctx.param("username"))
        .unwrap_or_default();
    ViewTree::element("div")
        .child(ViewTree::element("h2").child(ViewTree::text(format!("{owner}'s notes"))))
        .child(note_list(ctx.data))
        .child(ViewTree::link(".", "Profile"))
}

fn user_error(failure: &LoaderFailure) -> ViewTree {
    ViewTree::element("div")
        .attr("class", "error")
        .child(ViewTree::element("h2").child(ViewTree::text("Could not load this user")))
        .child(ViewTree::element("p").child(ViewTree::text(failure.to_string())))
        .child(ViewTree::link("/users", "All users"))
}

fn note_list(data: Option<&Value>) -> ViewTree {
    let notes = data
        .and_then(|d| d.get("notes"))
        .and_then(Value::as_array)
        .map(|notes| {
            notes
                .iter()
                .filter_map(|note| note.get("title").and_then(Value::as_str))
                .map(|title| ViewTree::element("li").child(ViewTree::text(title)))
                .collect::<Vec<_>>()
        })
        .unwrap_or_default();
    ViewTree::element("ul").attr("class", "notes").children(notes)
}
