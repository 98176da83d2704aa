//! Content fingerprinting and change classification
//!
//! A document's fingerprint is the hex-encoded SHA-256 of its embed-source
//! text. Comparing it with the fingerprint stored on the document by a
//! previous run tells whether the text changed since it was last embedded.

use cfeed_common::Document;
use serde_json::Value;
use sha2::{Digest, Sha256};

/// Change status of a document relative to its stored fingerprint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    New,
    Modified,
    Unchanged,
}

/// What was found in the document's hash field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviousHash {
    /// Field not present
    Absent,
    /// Field present but not a string
    NotText,
    Text(String),
}

/// Outcome of classifying one document
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Verdict {
    pub classification: Classification,
    /// Fingerprint to store with the enriched document (empty when not applicable)
    pub fingerprint: String,
    pub previous: PreviousHash,
}

impl Verdict {
    /// New and modified documents are (re-)embedded
    pub fn needs_embedding(&self) -> bool {
        matches!(
            self.classification,
            Classification::New | Classification::Modified
        )
    }

    /// One-line description of the decision for the invocation log
    pub fn describe(&self) -> String {
        match (&self.previous, self.classification) {
            (PreviousHash::Absent, _) => {
                format!("New document detected, generated hash: {}", self.fingerprint)
            }
            (PreviousHash::NotText, _) => "Invalid hash property in document".to_string(),
            (PreviousHash::Text(old), Classification::Modified) => format!(
                "Document modified - old hash: {}, new hash: {}",
                old, self.fingerprint
            ),
            (PreviousHash::Text(old), _) => format!("Document unchanged, hash: {}", old),
        }
    }
}

/// Hex-encoded SHA-256 of `text`
pub fn fingerprint(text: &str) -> String {
    format!("{:x}", Sha256::digest(text.as_bytes()))
}

/// Fingerprint of a document field, or an empty string when the field is
/// absent or not text
pub fn compute_field_hash(doc: &Document, field: &str) -> String {
    doc.get(field)
        .and_then(Value::as_str)
        .map(fingerprint)
        .unwrap_or_default()
}

/// Classify a document by comparing its stored hash with a fresh fingerprint
///
/// A hash field holding anything other than a string is treated as
/// `Unchanged` with an empty fingerprint, so the document is skipped rather
/// than re-embedded.
pub fn classify(doc: &Document, hash_field: &str, embed_source_field: &str) -> Verdict {
    let candidate = compute_field_hash(doc, embed_source_field);

    match doc.get(hash_field) {
        None => Verdict {
            classification: Classification::New,
            fingerprint: candidate,
            previous: PreviousHash::Absent,
        },
        Some(Value::String(existing)) => {
            let classification = if *existing == candidate {
                Classification::Unchanged
            } else {
                Classification::Modified
            };
            Verdict {
                classification,
                fingerprint: candidate,
                previous: PreviousHash::Text(existing.clone()),
            }
        }
        Some(_) => Verdict {
            classification: Classification::Unchanged,
            fingerprint: String::new(),
            previous: PreviousHash::NotText,
        },
    }
}
