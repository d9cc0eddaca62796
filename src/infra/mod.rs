//! Infrastructure adapters and runtime bootstrap.

pub mod actions;
pub mod error;
pub mod feed_source;
pub mod pools;
pub mod telemetry;
