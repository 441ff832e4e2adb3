//! Stepchain is a chain-of-thought query service built on the Anthropic messages API.
//!
//! # Overview
//! Given a single user prompt, the service asks the model for a short numbered
//! list of reasoning steps, answers each step in order while threading a growing
//! textual context between the calls, then asks the model to synthesize one
//! final answer from the accumulated context. The crate provides:
//!
//! - Chat message types and the [`chat::ChatProvider`] seam
//! - An Anthropic backend implementing that seam
//! - The three-phase [`chain::ReasoningChain`] orchestrator
//! - An axum HTTP server exposing the orchestrator as `POST /query`
//! - A [`transcript`] module with the front-end state transitions
//!
//! # Architecture
//! The crate is organized into modules that handle different aspects of one
//! query exchange. All state is request-scoped; nothing persists between
//! requests and the caller's API key is forwarded, never stored.

// Re-export for convenience
pub use async_trait::async_trait;

/// Backend implementation for the Anthropic completion service
pub mod backends;

/// Three-phase reasoning chain: generate steps, answer them, synthesize
pub mod chain;

/// Chat-based message types and the provider trait
pub mod chat;

/// Error types and handling
pub mod error;

/// HTTP server exposing the reasoning chain via a REST endpoint
pub mod api;

/// Immutable transcript state and message segmentation for front-ends
pub mod transcript;

#[inline]
/// Initialize logging using env_logger if the "logging" feature is enabled.
/// This is a no-op if the feature is not enabled.
pub fn init_logging() {
    #[cfg(feature = "logging")]
    {
        let _ = env_logger::try_init();
    }
}
