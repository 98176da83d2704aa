//! Change-feed trigger payload decoding
//!
//! The trigger host delivers documents double encoded: the `documents` field of
//! the envelope is a JSON string whose content is itself a JSON string literal,
//! and only that inner literal holds the JSON array of documents.
//!
//! ```text
//! {"Data":{"documents":"\"[{\\\"id\\\":\\\"1\\\"}]\""},"Metadata":{...}}
//! ```
//!
//! [`decode`] peels the three layers in order and reports which one failed.
//! The element type is chosen by the caller: a fixed schema struct, or the open
//! [`Document`] map when the handler must preserve unknown fields.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use thiserror::Error;
use tracing::warn;

use crate::Result;

/// Open document shape: field name to arbitrary JSON value, in insertion order
pub type Document = serde_json::Map<String, Value>;

/// Raw trigger envelope as posted by the functions host
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriggerPayload {
    #[serde(rename = "Data")]
    pub data: TriggerData,
    #[serde(
        rename = "Metadata",
        default,
        deserialize_with = "lenient_metadata",
        skip_serializing_if = "Option::is_none"
    )]
    pub metadata: Option<Metadata>,
}

/// `Data` section of the trigger envelope
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TriggerData {
    /// Double-encoded JSON array of documents
    pub documents: String,
}

/// `Metadata` section of the trigger envelope
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct Metadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sys: Option<SysMetadata>,
}

/// Host-supplied invocation details
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
pub struct SysMetadata {
    #[serde(rename = "MethodName", default, deserialize_with = "null_as_default")]
    pub method_name: String,
    #[serde(rename = "UtcNow", default, deserialize_with = "null_as_default")]
    pub utc_now: String,
    #[serde(rename = "RandGuid", default, deserialize_with = "null_as_default")]
    pub rand_guid: String,
}

/// Read an explicit `null` as the type's default
///
/// Pair with `#[serde(default)]` so absent and `null` fields behave alike.
pub fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de> + Default,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata is informational; an unreadable block is dropped, never fatal
fn lenient_metadata<'de, D>(deserializer: D) -> std::result::Result<Option<Metadata>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if value.is_null() {
        return Ok(None);
    }
    match serde_json::from_value(value) {
        Ok(metadata) => Ok(Some(metadata)),
        Err(e) => {
            warn!("Ignoring unreadable trigger metadata: {}", e);
            Ok(None)
        }
    }
}

/// Parse stage at which decoding failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// Outer envelope object
    Envelope,
    /// The `documents` string literal
    InnerString,
    /// The documents array itself
    Array,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            DecodeStage::Envelope => "trigger payload",
            DecodeStage::InnerString => "documents field",
            DecodeStage::Array => "documents array",
        };
        f.write_str(label)
    }
}

/// Payload decoding failure, tagged with the stage that rejected the input
#[derive(Debug, Error)]
#[error("failed to decode {stage}: {source}")]
pub struct DecodeError {
    pub stage: DecodeStage,
    pub source: serde_json::Error,
}

impl DecodeError {
    fn at(stage: DecodeStage, source: serde_json::Error) -> Self {
        Self { stage, source }
    }
}

/// Documents decoded from one trigger invocation
#[derive(Debug, Clone)]
pub struct DecodedBatch<T> {
    pub documents: Vec<T>,
    pub metadata: Option<Metadata>,
}

/// Decode a trigger payload into documents of type `T`
///
/// The whole batch is rejected on the first failing stage; no partial
/// results are returned.
pub fn decode<T: DeserializeOwned>(raw: &[u8]) -> std::result::Result<Vec<T>, DecodeError> {
    decode_payload(raw).map(|batch| batch.documents)
}

/// Decode a trigger payload, keeping the envelope metadata alongside the documents
pub fn decode_payload<T: DeserializeOwned>(
    raw: &[u8],
) -> std::result::Result<DecodedBatch<T>, DecodeError> {
    let envelope: TriggerPayload = serde_json::from_slice(raw)
        .map_err(|e| DecodeError::at(DecodeStage::Envelope, e))?;

    let array_text: String = serde_json::from_str(&envelope.data.documents).map_err(|e| {
        warn!("Failed to unmarshal documents field as string: {}", e);
        DecodeError::at(DecodeStage::InnerString, e)
    })?;

    let documents: Vec<T> = serde_json::from_str(&array_text).map_err(|e| {
        warn!("Failed to unmarshal documents array: {}", e);
        DecodeError::at(DecodeStage::Array, e)
    })?;

    Ok(DecodedBatch {
        documents,
        metadata: envelope.metadata,
    })
}

/// Encode documents into a trigger payload accepted by [`decode`]
pub fn encode<T: Serialize>(documents: &[T]) -> Result<Vec<u8>> {
    encode_with_metadata(documents, None)
}

/// Encode documents and envelope metadata into a trigger payload
pub fn encode_with_metadata<T: Serialize>(
    documents: &[T],
    metadata: Option<Metadata>,
) -> Result<Vec<u8>> {
    let array_text = serde_json::to_string(documents)?;
    let envelope = TriggerPayload {
        data: TriggerData {
            documents: serde_json::to_string(&array_text)?,
        },
        metadata,
    };
    Ok(serde_json::to_vec(&envelope)?)
}
