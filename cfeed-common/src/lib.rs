//! # cfeed Common Library
//!
//! Shared code for the change-feed custom handlers:
//! - Trigger envelope types and the double-encoded payload decoder
//! - Invoke response builder
//! - Request-scoped diagnostic log collection
//! - Configuration file loading
//! - Graceful shutdown signal for the binaries
//! - Common error types

pub mod config;
pub mod error;
pub mod logs;
pub mod payload;
pub mod response;
pub mod shutdown;

pub use error::{Error, Result};
pub use logs::LogCollector;
pub use payload::{decode, decode_payload, encode, DecodeError, DecodeStage, Document};
pub use response::InvokeResponse;
