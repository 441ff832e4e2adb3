use serde::{Deserialize, Serialize};

use crate::chain::StepRecord;

/// Request payload for the query endpoint
#[derive(Deserialize)]
pub struct QueryRequest {
    /// The user prompt to run the reasoning chain on
    pub prompt: String,
}

/// Response payload for a successful query
#[derive(Serialize)]
pub struct QueryResponse {
    /// The synthesized final answer
    pub answer: String,
    /// The answered reasoning steps, in order
    pub steps: Vec<StepRecord>,
}

/// Response payload for a failed query
#[derive(Serialize)]
pub struct ErrorResponse {
    /// Human-readable error message
    pub error: String,
}
