//! Batch enrichment
//!
//! Drives one change-feed invocation end to end:
//! 1. Decode the trigger payload into open documents
//! 2. Classify each document against its stored fingerprint
//! 3. Sanitize and embed new or modified documents, in input order
//! 4. Attach the vector and fingerprint to the sanitized copy
//!
//! Any failure aborts the whole batch. Nothing enriched before the failure is
//! returned, so the host can redeliver the batch without partial writes.

use cfeed_common::payload::{decode_payload, DecodeError};
use cfeed_common::{Document, LogCollector};
use serde_json::{Number, Value};
use std::fmt;
use thiserror::Error;
use tracing::{debug, warn};

use crate::config::EnrichmentConfig;
use crate::fingerprint::classify;
use crate::sanitizer::{sanitize, system_keys};
use crate::services::embedding::{EmbedError, Embedder};

/// Why a required document field was rejected
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShapeProblem {
    Missing,
    /// Present with a non-string JSON type
    NotText(&'static str),
}

impl fmt::Display for ShapeProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ShapeProblem::Missing => f.write_str("is missing"),
            ShapeProblem::NotText(kind) => write!(f, "must be a string, found {}", kind),
        }
    }
}

/// A document lacks a required text field
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("document at index {index}: field '{field}' {problem}")]
pub struct DocumentShapeError {
    /// Position of the document in the batch
    pub index: usize,
    /// Document id, when it could be read
    pub id: Option<String>,
    pub field: String,
    pub problem: ShapeProblem,
}

/// Batch-level failure; every variant aborts the invocation
#[derive(Debug, Error)]
pub enum OrchestratorError {
    #[error("Failed to parse payload: {0}")]
    Decode(#[from] DecodeError),

    #[error("Invalid document: {0}")]
    DocumentShape(#[from] DocumentShapeError),

    #[error("Failed to create embedding for document {id}: {source}")]
    Embed {
        id: String,
        #[source]
        source: EmbedError,
    },
}

/// Result of one successful invocation
#[derive(Debug, Clone)]
pub struct BatchResult {
    /// Enriched new/modified documents, in input order
    pub documents: Vec<Document>,
    pub logs: LogCollector,
}

/// Run the enrichment pipeline over a raw trigger payload
pub async fn run(
    raw: &[u8],
    config: &EnrichmentConfig,
    embedder: &dyn Embedder,
) -> Result<BatchResult, OrchestratorError> {
    let mut logs = LogCollector::started("function invoked");
    logs.push(format!("Vector property: {}", config.vector_property));
    logs.push(format!("Property to embed: {}", config.property_to_embed));
    logs.push(format!("Hash property: {}", config.hash_property));

    let batch = decode_payload::<Document>(raw)?;
    if let Some(sys) = batch.metadata.as_ref().and_then(|m| m.sys.as_ref()) {
        debug!(
            method = %sys.method_name,
            rand_guid = %sys.rand_guid,
            utc_now = %sys.utc_now,
            "Trigger metadata"
        );
    }
    logs.push(format!("Processing {} documents", batch.documents.len()));

    let keys_to_remove = system_keys(&config.vector_property);
    let mut enriched = Vec::new();

    for (index, doc) in batch.documents.iter().enumerate() {
        let id = require_text(doc, "id", index, None)?;
        logs.push(format!("Processing document ID: {}", id));
        if let Some(text) = doc.get(&config.property_to_embed).and_then(Value::as_str) {
            logs.push(format!("Document data: {}", text));
        }

        let verdict = classify(doc, &config.hash_property, &config.property_to_embed);
        logs.push(verdict.describe());
        logs.push(format!(
            "Document modification status: {}, hash: {}",
            verdict.needs_embedding(),
            verdict.fingerprint
        ));

        if !verdict.needs_embedding() {
            continue;
        }

        let text = require_text(doc, &config.property_to_embed, index, Some(id))?;
        let mut output = sanitize(doc, &keys_to_remove);

        let embed_failed = |source: EmbedError| {
            warn!(document_id = %id, error = %source, "Embedding failed, aborting batch");
            OrchestratorError::Embed {
                id: id.to_string(),
                source,
            }
        };
        let embedding = embedder.embed(text).await.map_err(embed_failed)?;
        let dimensions = embedding.len();
        let vector = vector_value(&embedding).map_err(embed_failed)?;

        output.insert(config.vector_property.clone(), vector);
        output.insert(
            config.hash_property.clone(),
            Value::String(verdict.fingerprint),
        );
        logs.push(format!(
            "Created embedding for document: {} ({} dimensions)",
            id, dimensions
        ));
        enriched.push(output);
    }

    Ok(BatchResult {
        documents: enriched,
        logs,
    })
}

/// Checked read of a string field
fn require_text<'a>(
    doc: &'a Document,
    field: &str,
    index: usize,
    id: Option<&str>,
) -> Result<&'a str, DocumentShapeError> {
    let problem = match doc.get(field) {
        Some(Value::String(text)) => return Ok(text.as_str()),
        Some(other) => ShapeProblem::NotText(json_kind(other)),
        None => ShapeProblem::Missing,
    };
    Err(DocumentShapeError {
        index,
        id: id.map(str::to_string),
        field: field.to_string(),
        problem,
    })
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Convert an embedding to a JSON array
///
/// Components are written with the shortest decimal form of the `f32`, so
/// `0.1f32` serializes as `0.1` rather than its widened `f64` expansion.
fn vector_value(embedding: &[f32]) -> Result<Value, EmbedError> {
    if embedding.is_empty() {
        return Err(EmbedError::EmptyEmbedding);
    }

    embedding
        .iter()
        .enumerate()
        .map(|(i, &component)| {
            let widened = component
                .to_string()
                .parse::<f64>()
                .unwrap_or(f64::from(component));
            Number::from_f64(widened)
                .map(Value::Number)
                .ok_or(EmbedError::NonFinite(i))
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}
