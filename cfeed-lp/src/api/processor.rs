//! Change-feed trigger endpoint
//!
//! Decodes each trigger invocation into typed documents and reports them in
//! the invocation log. Nothing is written to output bindings.

use axum::{body::Bytes, routing::post, Json, Router};
use cfeed_common::payload::decode_payload;
use cfeed_common::{InvokeResponse, LogCollector};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::document::CosmosDocument;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Route name matches the function name in `function.json`
pub const PROCESSOR_ROUTE: &str = "/processor";

/// POST /processor
pub async fn process_and_log(body: Bytes) -> ApiResult<Json<InvokeResponse>> {
    let invocation_id = Uuid::new_v4();

    async move {
        if body.is_empty() {
            return Err(ApiError::BadRequest("Empty request body".to_string()));
        }

        let mut logs = LogCollector::started("processor function invoked...");
        let batch = decode_payload::<CosmosDocument>(&body).map_err(|e| {
            warn!("Rejected trigger payload: {}", e);
            ApiError::from(e)
        })?;

        if let Some(sys) = batch.metadata.as_ref().and_then(|m| m.sys.as_ref()) {
            logs.push(format!(
                "Trigger {} at {} ({})",
                sys.method_name, sys.utc_now, sys.rand_guid
            ));
        }
        logs.extend(
            batch
                .documents
                .iter()
                .map(|doc| format!("Cosmos DB document: {}", doc)),
        );

        info!(documents = batch.documents.len(), "Invocation complete");
        Ok(Json(InvokeResponse::logs_only(logs)))
    }
    .instrument(info_span!("invocation", %invocation_id))
    .await
}

/// Build trigger routes
pub fn processor_routes() -> Router<AppState> {
    Router::new().route(PROCESSOR_ROUTE, post(process_and_log))
}
