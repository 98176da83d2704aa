//! External service clients

pub mod azure_openai_client;
pub mod embedding;

pub use azure_openai_client::AzureOpenAiClient;
pub use embedding::{EmbedError, Embedder};
