//! Test Helper Utilities
//!
//! Shared utilities for testing cfeed-eg

#![allow(dead_code)]

pub mod embedders;
pub mod payloads;

pub use embedders::{FailingEmbedder, FixedEmbedder};
pub use payloads::{doc, envelope, test_config, GREAT_PRODUCT_SHA256};
