//! Embedder test doubles

use async_trait::async_trait;
use cfeed_eg::{EmbedError, Embedder};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Returns the same vector for every input and records what it was asked
pub struct FixedEmbedder {
    vector: Vec<f32>,
    calls: AtomicUsize,
    inputs: Mutex<Vec<String>>,
}

impl FixedEmbedder {
    pub fn new(vector: Vec<f32>) -> Self {
        Self {
            vector,
            calls: AtomicUsize::new(0),
            inputs: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().unwrap().clone()
    }
}

impl Default for FixedEmbedder {
    fn default() -> Self {
        Self::new(vec![0.1, 0.2, 0.3])
    }
}

#[async_trait]
impl Embedder for FixedEmbedder {
    fn name(&self) -> &'static str {
        "fixed"
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>, EmbedError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inputs.lock().unwrap().push(text.to_string());
        Ok(self.vector.clone())
    }
}

/// Succeeds until call number `fail_on` (1-based), which fails
pub struct FailingEmbedder {
    fail_on: usize,
    calls: AtomicUsize,
}

impl FailingEmbedder {
    pub fn on_call(fail_on: usize) -> Self {
        Self {
            fail_on,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Embedder for FailingEmbedder {
    fn name(&self) -> &'static str {
        "failing"
    }

    async fn embed(&self, _text: &str) -> Result<Vec<f32>, EmbedError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if call == self.fail_on {
            return Err(EmbedError::Api(503, "deployment overloaded".to_string()));
        }
        Ok(vec![1.0, 0.0])
    }
}
