//! Integration tests for batch enrichment
//!
//! Tests cover:
//! - New, modified and unchanged classification across a batch
//! - Sanitization of system properties on output
//! - All-or-nothing failure for decode, shape and embedding errors
//! - Per-invocation diagnostic logs

mod helpers;

use cfeed_common::payload::DecodeStage;
use cfeed_eg::fingerprint::fingerprint;
use cfeed_eg::orchestrator::{run, OrchestratorError, ShapeProblem};
use helpers::{envelope, test_config, FailingEmbedder, FixedEmbedder, GREAT_PRODUCT_SHA256};
use serde_json::json;

// =============================================================================
// Classification scenarios
// =============================================================================

#[tokio::test]
async fn test_new_document_is_enriched() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({"id": "doc-1", "customerNotes": "great product"})]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();

    assert_eq!(result.documents.len(), 1);
    let enriched = &result.documents[0];
    assert_eq!(enriched["id"], "doc-1");
    assert_eq!(enriched["hash"], GREAT_PRODUCT_SHA256);
    assert_eq!(enriched["vector"], json!([0.1, 0.2, 0.3]));
    assert_eq!(embedder.inputs(), vec!["great product".to_string()]);
}

#[tokio::test]
async fn test_only_modified_document_is_emitted() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[
        json!({"id": "same", "customerNotes": "great product", "hash": GREAT_PRODUCT_SHA256}),
        json!({"id": "changed", "customerNotes": "now it is broken", "hash": GREAT_PRODUCT_SHA256}),
    ]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();

    assert_eq!(result.documents.len(), 1);
    assert_eq!(result.documents[0]["id"], "changed");
    assert_eq!(result.documents[0]["hash"], fingerprint("now it is broken"));
    assert_eq!(embedder.calls(), 1, "unchanged document must not be embedded");
}

#[tokio::test]
async fn test_all_unchanged_yields_no_documents() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({"id": "same", "customerNotes": "great product", "hash": GREAT_PRODUCT_SHA256})]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();

    assert!(result.documents.is_empty());
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_corrupt_stored_hash_is_skipped() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({"id": "odd", "customerNotes": "great product", "hash": {"v": 1}})]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();

    assert!(result.documents.is_empty());
    assert_eq!(embedder.calls(), 0);
    assert!(result
        .logs
        .lines()
        .contains(&"Invalid hash property in document".to_string()));
}

#[tokio::test]
async fn test_output_preserves_input_order() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[
        json!({"id": "a", "customerNotes": "first"}),
        json!({"id": "b", "customerNotes": "great product", "hash": GREAT_PRODUCT_SHA256}),
        json!({"id": "c", "customerNotes": "third"}),
        json!({"id": "d", "customerNotes": "fourth", "hash": "stale"}),
    ]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();

    let ids: Vec<&str> = result
        .documents
        .iter()
        .map(|d| d["id"].as_str().unwrap())
        .collect();
    assert_eq!(ids, vec!["a", "c", "d"]);
    assert_eq!(embedder.inputs(), vec!["first", "third", "fourth"]);
}

// =============================================================================
// Output shape
// =============================================================================

#[tokio::test]
async fn test_system_properties_removed_and_order_kept() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({
        "id": "dfa26d32",
        "customerNotes": "this is a great product",
        "rating": 5,
        "tags": ["a", "b"],
        "vector": [9.0, 9.0],
        "_rid": "lV8dAK7u9cCUAAAAAAAAAA==",
        "_self": "dbs/lV8dAA==/colls/lV8dAK7u9cA=/docs/lV8dAK7u9cCUAAAAAAAAAA==/",
        "_etag": "\"0f007efc-0000-0800-0000-67f5fb920000\"",
        "_attachments": "attachments/",
        "_ts": 1744173970,
        "_lsn": 160
    })]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();
    let enriched = &result.documents[0];

    let keys: Vec<&str> = enriched.keys().map(String::as_str).collect();
    assert_eq!(
        keys,
        vec!["id", "customerNotes", "rating", "tags", "vector", "hash"]
    );
    assert_eq!(enriched["vector"], json!([0.1, 0.2, 0.3]), "stale vector replaced");
    assert_eq!(enriched["tags"], json!(["a", "b"]));
}

#[tokio::test]
async fn test_modified_document_hash_overwritten_in_place() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({"id": "x", "hash": "stale", "customerNotes": "great product"})]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();
    let keys: Vec<&str> = result.documents[0].keys().map(String::as_str).collect();

    assert_eq!(keys, vec!["id", "hash", "customerNotes", "vector"]);
    assert_eq!(result.documents[0]["hash"], GREAT_PRODUCT_SHA256);
}

// =============================================================================
// Failures abort the whole batch
// =============================================================================

#[tokio::test]
async fn test_malformed_envelope_is_decode_error() {
    let embedder = FixedEmbedder::default();
    let raw = br#"{"Data":{"documents":"[{\"id\":\"1\"}]"}}"#;

    let err = run(raw, &test_config(), &embedder).await.unwrap_err();

    match err {
        OrchestratorError::Decode(e) => assert_eq!(e.stage, DecodeStage::InnerString),
        other => panic!("expected decode error, got {:?}", other),
    }
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_embed_failure_on_second_of_three_aborts_batch() {
    let embedder = FailingEmbedder::on_call(2);
    let raw = envelope(&[
        json!({"id": "one", "customerNotes": "first"}),
        json!({"id": "two", "customerNotes": "second"}),
        json!({"id": "three", "customerNotes": "third"}),
    ]);

    let err = run(&raw, &test_config(), &embedder).await.unwrap_err();

    match &err {
        OrchestratorError::Embed { id, .. } => assert_eq!(id, "two"),
        other => panic!("expected embed error, got {:?}", other),
    }
    assert_eq!(embedder.calls(), 2, "third document must not be attempted");
    assert!(err.to_string().contains("API error 503"));
}

#[tokio::test]
async fn test_missing_id_is_shape_error() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[
        json!({"id": "ok", "customerNotes": "fine"}),
        json!({"customerNotes": "no id"}),
    ]);

    let err = run(&raw, &test_config(), &embedder).await.unwrap_err();

    match err {
        OrchestratorError::DocumentShape(e) => {
            assert_eq!(e.index, 1);
            assert_eq!(e.field, "id");
            assert_eq!(e.problem, ShapeProblem::Missing);
        }
        other => panic!("expected shape error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_numeric_id_is_shape_error() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({"id": 42, "customerNotes": "fine"})]);

    let err = run(&raw, &test_config(), &embedder).await.unwrap_err();

    assert!(matches!(
        err,
        OrchestratorError::DocumentShape(ref e) if e.problem == ShapeProblem::NotText("number")
    ));
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_new_document_without_text_is_shape_error() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({"id": "bare", "customerNotes": ["not", "text"]})]);

    let err = run(&raw, &test_config(), &embedder).await.unwrap_err();

    match err {
        OrchestratorError::DocumentShape(e) => {
            assert_eq!(e.field, "customerNotes");
            assert_eq!(e.id.as_deref(), Some("bare"));
            assert_eq!(e.problem, ShapeProblem::NotText("array"));
        }
        other => panic!("expected shape error, got {:?}", other),
    }
    assert_eq!(embedder.calls(), 0);
}

#[tokio::test]
async fn test_missing_text_with_empty_stored_hash_is_skipped() {
    // Unhashable text fingerprints to "", matching the stored empty hash
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[json!({"id": "bare", "hash": ""})]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();

    assert!(result.documents.is_empty());
}

// =============================================================================
// Diagnostic logs
// =============================================================================

#[tokio::test]
async fn test_logs_describe_each_decision() {
    let embedder = FixedEmbedder::default();
    let raw = envelope(&[
        json!({"id": "new-doc", "customerNotes": "great product"}),
        json!({"id": "old-doc", "customerNotes": "great product", "hash": GREAT_PRODUCT_SHA256}),
    ]);

    let result = run(&raw, &test_config(), &embedder).await.unwrap();
    let logs = result.logs.into_lines();

    assert_eq!(logs[0], "function invoked");
    assert_eq!(logs[1], "Vector property: vector");
    assert_eq!(logs[2], "Property to embed: customerNotes");
    assert_eq!(logs[3], "Hash property: hash");
    assert_eq!(logs[4], "Processing 2 documents");
    assert_eq!(logs[5], "Processing document ID: new-doc");
    assert_eq!(logs[6], "Document data: great product");
    assert_eq!(
        logs[7],
        format!("New document detected, generated hash: {}", GREAT_PRODUCT_SHA256)
    );
    assert_eq!(
        logs[8],
        format!("Document modification status: true, hash: {}", GREAT_PRODUCT_SHA256)
    );
    assert_eq!(logs[9], "Created embedding for document: new-doc (3 dimensions)");
    assert_eq!(logs[10], "Processing document ID: old-doc");
    assert_eq!(
        logs[12],
        format!("Document unchanged, hash: {}", GREAT_PRODUCT_SHA256)
    );
    assert_eq!(logs.len(), 14);
}

#[tokio::test]
async fn test_concurrent_invocations_keep_separate_logs() {
    let embedder = FixedEmbedder::default();
    let config = test_config();
    let one = envelope(&[json!({"id": "only-in-one", "customerNotes": "a"})]);
    let two = envelope(&[
        json!({"id": "only-in-two", "customerNotes": "b"}),
        json!({"id": "also-in-two", "customerNotes": "c"}),
    ]);

    let (first, second) = tokio::join!(
        run(&one, &config, &embedder),
        run(&two, &config, &embedder)
    );
    let first = first.unwrap().logs.into_lines();
    let second = second.unwrap().logs.into_lines();

    assert!(first.iter().any(|l| l.contains("only-in-one")));
    assert!(!first.iter().any(|l| l.contains("two")));
    assert!(!second.iter().any(|l| l.contains("only-in-one")));
    assert!(second.contains(&"Processing 2 documents".to_string()));
}
