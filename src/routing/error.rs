//! Error taxonomy for the routing core.
//!
//! - `RegistrationError`: the route table is ambiguous or malformed. Fatal at startup.
//! - `NoMatch`: a path has no chain. Recovered by rendering a not-found view.
//! - `LoaderFailure`: a route's data loader failed. Bubbles to the nearest error boundary.

use thiserror::Error;

use super::chain::ActiveChain;

/// Raised while turning a `RouteRegistry` into a `RouteTree`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    #[error("route id `{0}` registered twice")]
    DuplicateId(String),
    #[error("routes `{first}` and `{second}` both claim literal segment `{segment}` under `{parent}`")]
    DuplicateLiteral {
        parent: String,
        segment: String,
        first: String,
        second: String,
    },
    #[error("routes `{first}` and `{second}` are both dynamic children of `{parent}`")]
    MultipleParams {
        parent: String,
        first: String,
        second: String,
    },
    #[error("routes `{first}` and `{second}` are both index children of `{parent}`")]
    MultipleIndex {
        parent: String,
        first: String,
        second: String,
    },
    #[error("route `{id}` names unknown parent `{parent}`")]
    UnknownParent { id: String, parent: String },
    #[error("index route `{0}` cannot have children")]
    IndexWithChildren(String),
    #[error("route `{id}` has an invalid segment `{segment}`")]
    InvalidSegment { id: String, segment: String },
    #[error("route `{0}` is not reachable from the root")]
    Detached(String),
}

impl RegistrationError {
    /// True for the sibling conflicts that make matching ambiguous.
    pub fn is_ambiguous(&self) -> bool {
        matches!(
            self,
            RegistrationError::DuplicateLiteral { .. }
                | RegistrationError::MultipleParams { .. }
                | RegistrationError::MultipleIndex { .. }
        )
    }
}

/// A path that does not resolve to a full chain.
///
/// `matched` holds the prefix that did match (always at least the root), so
/// callers can keep those ancestors mounted and look up the closest
/// not-found boundary.
#[derive(Debug, Clone, Error)]
#[error("no route matches `{path}` (stopped at segment `{segment}`)")]
pub struct NoMatch {
    pub path: String,
    pub segment: String,
    pub matched: ActiveChain,
}

/// Errors a data loader can report.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LoaderFailure {
    /// The loader has no data for this route (unknown user, missing record).
    #[error("not found: {0}")]
    NotFound(String),
    /// Network-level failure (DNS, connection refused).
    #[error("network error: {0}")]
    Network(String),
    /// The backend answered with a non-success status.
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    /// The payload could not be decoded.
    #[error("parse error: {0}")]
    Parse(String),
    /// The loader did not settle within the configured timeout.
    #[error("timed out after {0}ms")]
    Timeout(u64),
}
