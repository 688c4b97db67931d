//! In-process data behind the demo routes when no API is configured.

use serde_json::{Value, json};

use crate::routing::{LoadContext, LoaderFailure};

pub fn user(username: &str) -> Option<Value> {
    match username {
        "kody" => Some(json!({ "username": "kody", "name": "Kody", "bio": "Koala enthusiast" })),
        "jake" => Some(json!({ "username": "jake", "name": "Jake", "bio": "Writes everything down" })),
        "ryan" => Some(json!({ "username": "ryan", "name": "Ryan", "bio": "Keeps no notes" })),
        _ => None,
    }
}

pub fn notes(username: &str) -> Option<Value> {
    let notes = match username {
        "kody" => json!([
            { "id": "k1", "title": "Eucalyptus sources" },
            { "id": "k2", "title": "Nap schedule" },
        ]),
        "jake" => json!([
            { "id": "j1", "title": "Groceries" },
        ]),
        _ => return None,
    };
    let owner = user(username)?;
    Some(json!({ "owner": owner["name"], "notes": notes }))
}

/// Loader body for `$username`.
pub fn load_user(ctx: &LoadContext) -> Result<Value, LoaderFailure> {
    let username = ctx.param("username").unwrap_or_default();
    user(username).ok_or_else(|| LoaderFailure::NotFound(ctx.path.clone()))
}

/// Loader body for `$username.notes` and `kody.notes`. Kody's notes route is
/// static, so the owner falls back to the last path segment.
pub fn load_notes(ctx: &LoadContext) -> Result<Value, LoaderFailure> {
    let username = ctx
        .param("username")
        .or_else(|| ctx.path.trim_end_matches("/notes").rsplit('/').next())
        .unwrap_or_default();
    notes(username).ok_or_else(|| LoaderFailure::NotFound(ctx.path.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{RouteId, RouteParams};

    fn ctx(path: &str, username: Option<&str>) -> LoadContext {
        let mut params = RouteParams::new();
        if let Some(name) = username {
            params.insert("username".to_string(), name.to_string());
        }
        LoadContext {
            route: RouteId::new("test"),
            path: path.to_string(),
            params,
        }
    }

    #[test]
    fn test_unknown_user_is_not_found() {
        assert_eq!(
            load_user(&ctx("/users/nobody", Some("nobody"))),
            Err(LoaderFailure::NotFound("/users/nobody".into()))
        );
    }

    #[test]
    fn test_static_notes_route_infers_owner() {
        let value = load_notes(&ctx("/users/kody/notes", None)).unwrap();
        assert_eq!(value["owner"], "Kody");
        assert_eq!(value["notes"].as_array().map(Vec::len), Some(2));
    }

    #[test]
    fn test_user_without_notes() {
        assert!(load_user(&ctx("/users/ryan", Some("ryan"))).is_ok());
        assert!(load_notes(&ctx("/users/ryan/notes", Some("ryan"))).is_err());
    }
}
