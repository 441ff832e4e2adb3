use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    Json,
};
use uuid::Uuid;

use super::types::{ErrorResponse, QueryRequest, QueryResponse};
use super::ServerState;
use crate::backends::anthropic::Anthropic;
use crate::chain::ReasoningChain;
use crate::error::ChainError;

/// Handles reasoning-chain queries to the API server
///
/// # Arguments
/// * `state` - Server state containing the completion-service configuration
/// * `headers` - HTTP request headers carrying the caller's API key
/// * `body` - Raw request body, parsed after the credential check
///
/// # Returns
/// * `Ok(Json<QueryResponse>)` - Final answer plus the answered step trail
/// * `Err((StatusCode, Json<ErrorResponse>))` - Error response
///
/// # Authentication
/// The `X-API-Key` header is forwarded to the completion service as-is. A
/// missing or empty key is rejected with 401 before the body is even parsed,
/// so no external call is made. The key is never stored.
///
/// # Failure behavior
/// Any failure after the credential check, including a malformed body, maps
/// to a single generic 500 response. The underlying error is logged but never
/// returned, and no partial answer or step trail is exposed.
pub async fn handle_query(
    State(state): State<ServerState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<QueryResponse>, (StatusCode, Json<ErrorResponse>)> {
    let api_key = headers
        .get("x-api-key")
        .and_then(|value| value.to_str().ok())
        .filter(|key| !key.is_empty());

    let Some(api_key) = api_key else {
        return Err(error_response(
            StatusCode::UNAUTHORIZED,
            "API key is required",
        ));
    };

    let request_id = Uuid::new_v4();
    log::info!("query {request_id}: received {} byte(s)", body.len());

    match run_query(&state, api_key, &body).await {
        Ok(response) => {
            log::info!(
                "query {request_id}: answered with {} step(s)",
                response.steps.len()
            );
            Ok(Json(response))
        }
        Err(e) => {
            log::error!("query {request_id}: {e}");
            Err(error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing your request.",
            ))
        }
    }
}

/// Parses the body, builds a request-scoped Anthropic client from the
/// forwarded key and runs the three-phase chain.
async fn run_query(
    state: &ServerState,
    api_key: &str,
    body: &[u8],
) -> Result<QueryResponse, ChainError> {
    let req: QueryRequest =
        serde_json::from_slice(body).map_err(|e| ChainError::JsonError(e.to_string()))?;

    let provider = Anthropic::new(
        api_key,
        Some(state.model.clone()),
        Some(state.max_tokens),
        None,
        state.base_url.clone(),
    )?;

    let outcome = ReasoningChain::new(&provider)
        .max_steps(state.max_steps)
        .run(&req.prompt)
        .await?;

    Ok(QueryResponse {
        answer: outcome.answer,
        steps: outcome.steps,
    })
}

fn error_response(
    status: StatusCode,
    message: &str,
) -> (StatusCode, Json<ErrorResponse>) {
    (
        status,
        Json(ErrorResponse {
            error: message.to_string(),
        }),
    )
}
