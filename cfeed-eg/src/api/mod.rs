//! HTTP API handlers for cfeed-eg

pub mod health;
pub mod processor;

pub use health::health_routes;
pub use processor::{processor_routes, PROCESSOR_ROUTE};
