//! # Route Data Loaders
//!
//! A loader fetches the data one route needs before it can render. The
//! navigator never awaits loaders itself: it hands out `LoadRequest`s tagged
//! with the navigation generation, the runtime executes them (spawned tasks
//! in the TUI, `load_all` in the headless renderer), and the results come
//! back through `Navigator::settle`.
//!
//! Two implementations ship here:
//! - `FixtureLoader`: answers from an in-process function, optionally after a delay
//! - `HttpLoader`: `GET {base_url}{route path}` returning JSON

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use futures::future::join_all;
use log::{debug, info, warn};
use serde_json::Value;

use super::chain::RouteParams;
use super::error::LoaderFailure;
use super::navigator::InstanceId;
use super::node::RouteId;

/// What a loader is told about the route it loads for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadContext {
    pub route: RouteId,
    /// Absolute path of the route's own position in the chain.
    pub path: String,
    pub params: RouteParams,
}

impl LoadContext {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }
}

#[async_trait]
pub trait Loader: Send + Sync {
    /// Returns the name of the loader, for logs and route listings.
    fn name(&self) -> &str;

    async fn load(&self, ctx: &LoadContext) -> Result<Value, LoaderFailure>;
}

/// A pending load issued by the navigator.
#[derive(Clone)]
pub struct LoadRequest {
    pub generation: u64,
    pub instance: InstanceId,
    pub context: LoadContext,
    pub loader: Arc<dyn Loader>,
}

impl LoadRequest {
    /// Runs the loader, turning an overrun into `LoaderFailure::Timeout`.
    pub async fn run(&self, timeout: Duration) -> Result<Value, LoaderFailure> {
        debug!(
            "Loading {} via {} (generation={}, instance={})",
            self.context.path,
            self.loader.name(),
            self.generation,
            self.instance
        );
        match tokio::time::timeout(timeout, self.loader.load(&self.context)).await {
            Ok(result) => result,
            Err(_) => {
                warn!(
                    "Loader {} timed out after {:?} for {}",
                    self.loader.name(),
                    timeout,
                    self.context.path
                );
                Err(LoaderFailure::Timeout(timeout.as_millis() as u64))
            }
        }
    }
}

impl fmt::Debug for LoadRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoadRequest")
            .field("generation", &self.generation)
            .field("instance", &self.instance)
            .field("route", &self.context.route)
            .field("path", &self.context.path)
            .field("loader", &self.loader.name())
            .finish()
    }
}

/// A settled load, ready to hand back to the navigator.
#[derive(Debug, Clone)]
pub struct LoadOutcome {
    pub generation: u64,
    pub instance: InstanceId,
    pub result: Result<Value, LoaderFailure>,
}

/// Runs every request concurrently and waits for all of them.
pub async fn load_all(requests: Vec<LoadRequest>, timeout: Duration) -> Vec<LoadOutcome> {
    let futures = requests.into_iter().map(|request| async move {
        let result = request.run(timeout).await;
        LoadOutcome {
            generation: request.generation,
            instance: request.instance,
            result,
        }
    });
    join_all(futures).await
}

// ============================================================================
// FixtureLoader
// ============================================================================

type FixtureFn = dyn Fn(&LoadContext) -> Result<Value, LoaderFailure> + Send + Sync;

/// Answers from an in-process function. Used by the demo routes and tests.
pub struct FixtureLoader {
    name: String,
    resolve: Box<FixtureFn>,
    latency: Duration,
}

impl FixtureLoader {
    pub fn new<F>(name: &str, resolve: F) -> Self
    where
        F: Fn(&LoadContext) -> Result<Value, LoaderFailure> + Send + Sync + 'static,
    {
        Self {
            name: name.to_string(),
            resolve: Box::new(resolve),
            latency: Duration::ZERO,
        }
    }

    /// Always answers with `value`.
    pub fn value(name: &str, value: Value) -> Self {
        Self::new(name, move |_| Ok(value.clone()))
    }

    /// Simulates network latency before answering.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = latency;
        self
    }
}

#[async_trait]
impl Loader for FixtureLoader {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, ctx: &LoadContext) -> Result<Value, LoaderFailure> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        (self.resolve)(ctx)
    }
}

// ============================================================================
// HttpLoader
// ============================================================================

/// Fetches `GET {base_url}{path}` and decodes the body as JSON.
pub struct HttpLoader {
    name: String,
    base_url: String,
    client: reqwest::Client,
}

impl HttpLoader {
    pub fn new(name: &str, base_url: &str) -> Self {
        Self::with_client(name, base_url, reqwest::Client::new())
    }

    pub fn with_client(name: &str, base_url: &str, client: reqwest::Client) -> Self {
        Self {
            name: name.to_string(),
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        }
    }

    pub fn url_for(&self, ctx: &LoadContext) -> String {
        format!("{}{}", self.base_url, ctx.path)
    }
}

#[async_trait]
impl Loader for HttpLoader {
    fn name(&self) -> &str {
        &self.name
    }

    async fn load(&self, ctx: &LoadContext) -> Result<Value, LoaderFailure> {
        let url = self.url_for(ctx);
        info!("HTTP loader {} GET {}", self.name, url);

        let response = self
            .client
            .get(&url)
            .header("Accept", "application/json")
            .send()
            .await
            .map_err(|e| LoaderFailure::Network(e.to_string()))?;

        let status = response.status();
        debug!("HTTP loader {} status: {}", self.name, status);

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(LoaderFailure::NotFound(ctx.path.clone()));
        }
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            warn!("HTTP loader {} error: {} - {}", self.name, status, message);
            return Err(LoaderFailure::Status {
                status: status.as_u16(),
                message,
            });
        }

        response
            .json::<Value>()
            .await
            .map_err(|e| LoaderFailure::Parse(e.to_string()))
    }
}
