//! System property removal
//!
//! The change feed injects store bookkeeping (`_rid`, `_etag`, ...) into every
//! document. Those fields must not be written back with the enriched document.

use cfeed_common::Document;

/// Store-managed properties stripped from every output document
pub const SYSTEM_KEYS: [&str; 6] = ["_rid", "_self", "_etag", "_attachments", "_lsn", "_ts"];

/// Keys removed before enrichment: the system keys plus the vector property,
/// which is re-added with the fresh embedding
pub fn system_keys(vector_property: &str) -> Vec<&str> {
    let mut keys = Vec::with_capacity(SYSTEM_KEYS.len() + 1);
    keys.push(vector_property);
    keys.extend(SYSTEM_KEYS);
    keys
}

/// Copy of `doc` without `keys_to_remove`
///
/// Remaining fields keep their values and order. The input is left untouched.
pub fn sanitize(doc: &Document, keys_to_remove: &[&str]) -> Document {
    doc.iter()
        .filter(|(key, _)| !keys_to_remove.contains(&key.as_str()))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}
