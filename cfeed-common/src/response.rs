//! Invoke response returned to the functions host

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::logs::LogCollector;
use crate::payload::Document;

/// Output binding name used when none is configured
pub const DEFAULT_OUTPUT_BINDING: &str = "outputData";

/// Custom handler invoke response
///
/// `outputs` maps output binding names to values. A binding with nothing to
/// write is left out of the map entirely; the host treats an absent binding
/// differently from an empty array.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvokeResponse {
    pub outputs: Map<String, Value>,
    pub logs: Vec<String>,
    /// Reserved; always serialized as `null`
    #[serde(rename = "returnValue")]
    pub return_value: Option<Value>,
}

impl InvokeResponse {
    /// Build the response for an enrichment batch
    ///
    /// When `enriched` is empty the binding key is omitted from `outputs`.
    pub fn build(binding: &str, enriched: Vec<Document>, mut logs: LogCollector) -> Self {
        let mut outputs = Map::new();
        if !enriched.is_empty() {
            logs.push(format!(
                "Adding {} documents with embeddings",
                enriched.len()
            ));
            let documents = enriched.into_iter().map(Value::Object).collect();
            outputs.insert(binding.to_string(), Value::Array(documents));
            logs.push("Added enriched documents to binding output");
        }

        Self {
            outputs,
            logs: logs.into_lines(),
            return_value: None,
        }
    }

    /// Build a response carrying only log lines
    pub fn logs_only(logs: LogCollector) -> Self {
        Self {
            outputs: Map::new(),
            logs: logs.into_lines(),
            return_value: None,
        }
    }

    /// Documents written to `binding`, if any
    pub fn output_documents(&self, binding: &str) -> Option<&Vec<Value>> {
        self.outputs.get(binding).and_then(Value::as_array)
    }
}
