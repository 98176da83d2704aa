//! Change-feed trigger endpoint
//!
//! The functions host posts each trigger invocation here and writes the
//! returned `outputs` to the configured output binding.

use axum::{body::Bytes, extract::State, routing::post, Json, Router};
use cfeed_common::InvokeResponse;
use tracing::{error, info, info_span, Instrument};
use uuid::Uuid;

use crate::error::{ApiError, ApiResult};
use crate::orchestrator;
use crate::AppState;

/// Route name matches the function name in `function.json`
pub const PROCESSOR_ROUTE: &str = "/cosmosdbprocessor";

/// POST /cosmosdbprocessor
///
/// Runs the enrichment pipeline over one trigger payload.
/// Malformed payloads answer 400; shape and embedding failures answer 500.
pub async fn process_documents(
    State(state): State<AppState>,
    body: Bytes,
) -> ApiResult<Json<InvokeResponse>> {
    let invocation_id = Uuid::new_v4();
    let span = info_span!("invocation", %invocation_id);

    async move {
        if body.is_empty() {
            return Err(ApiError::BadRequest("Empty request body".to_string()));
        }

        let config = &state.config;
        let result = orchestrator::run(&body, config, state.embedder.as_ref())
            .await
            .map_err(|e| {
                error!("Batch aborted: {}", e);
                ApiError::from(e)
            })?;

        info!(
            enriched = result.documents.len(),
            log_lines = result.logs.len(),
            "Invocation complete"
        );

        Ok(Json(InvokeResponse::build(
            &config.output_binding,
            result.documents,
            result.logs,
        )))
    }
    .instrument(span)
    .await
}

/// Build trigger routes
pub fn processor_routes() -> Router<AppState> {
    Router::new().route(PROCESSOR_ROUTE, post(process_documents))
}
