//! Server module for exposing the reasoning chain via a REST API
//!
//! Provides a REST API server with a single `POST /query` endpoint. The
//! caller's API key arrives in the `X-API-Key` header and is forwarded to the
//! completion service per request; CORS is permissive so browser front-ends
//! can call the endpoint directly.

mod handlers;
mod types;

use axum::Router;
use tower_http::cors::CorsLayer;

use crate::backends::anthropic::{DEFAULT_MAX_TOKENS, DEFAULT_MODEL};
use crate::chain::MAX_RECORDED_STEPS;
use handlers::handle_query;

pub use types::{ErrorResponse, QueryRequest, QueryResponse};

/// Main server struct holding the completion-service configuration
pub struct Server {
    model: String,
    max_tokens: u32,
    max_steps: usize,
    base_url: Option<String>,
}

/// Internal server state shared between request handlers
#[derive(Clone)]
pub(crate) struct ServerState {
    /// Model identifier sent with every completion request
    pub(crate) model: String,
    /// Maximum output tokens per completion request
    pub(crate) max_tokens: u32,
    /// Cap on answered reasoning steps per query
    pub(crate) max_steps: usize,
    /// Completion-service base URL override, used by tests
    pub(crate) base_url: Option<String>,
}

impl Default for Server {
    fn default() -> Self {
        Self::new()
    }
}

impl Server {
    /// Creates a new server instance with the default configuration
    pub fn new() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            max_steps: MAX_RECORDED_STEPS,
            base_url: None,
        }
    }

    /// Sets the model identifier used for every completion request
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Sets the maximum output tokens per completion request
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Sets the cap on answered reasoning steps per query
    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Overrides the completion-service base URL
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Builds the axum router for the API
    pub fn router(&self) -> Router {
        Router::new()
            .route("/query", axum::routing::post(handle_query))
            .layer(CorsLayer::permissive())
            .with_state(ServerState {
                model: self.model.clone(),
                max_tokens: self.max_tokens,
                max_steps: self.max_steps,
                base_url: self.base_url.clone(),
            })
    }

    /// Starts the server and listens for requests on the specified address
    ///
    /// # Arguments
    /// * `addr` - Address to bind to (e.g. "127.0.0.1:3000")
    ///
    /// # Returns
    /// * `Ok(())` if server runs to completion
    /// * `Err(ChainError)` if binding or serving fails
    pub async fn run(self, addr: &str) -> Result<(), crate::error::ChainError> {
        let app = self.router();

        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .map_err(|e| crate::error::ChainError::HttpError(e.to_string()))?;

        log::info!("listening on {addr}");

        axum::serve(listener, app)
            .await
            .map_err(|e| crate::error::ChainError::HttpError(e.to_string()))?;

        Ok(())
    }
}
