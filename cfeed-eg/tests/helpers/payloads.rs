//! Trigger payload builders

use cfeed_common::{encode, Document};
use cfeed_eg::EnrichmentConfig;
use serde_json::Value;

/// sha256("great product")
pub const GREAT_PRODUCT_SHA256: &str =
    "51fb0c3c0c60b7bcb74e32ef01e4c27d0f862dde56de3582f1468239b1e15356";

/// Property names used throughout the tests
pub fn test_config() -> EnrichmentConfig {
    EnrichmentConfig::new("vector", "customerNotes", "hash")
}

/// Unwrap a `json!` object literal into a document
pub fn doc(value: Value) -> Document {
    match value {
        Value::Object(map) => map,
        other => panic!("expected object, got {}", other),
    }
}

/// Double-encoded trigger envelope around `documents`
pub fn envelope(documents: &[Value]) -> Vec<u8> {
    encode(documents).expect("encode test payload")
}
