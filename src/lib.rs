//! Deterministic content assignment for simulated social-media feeds.
//!
//! The [`application::assignment::AssignmentEngine`] decides which display
//! name, avatar, image and time label each post shows. Avatar and image
//! pools are fetched through a session-scoped [`cache::PoolCache`].

pub mod application;
pub mod cache;
pub mod config;
pub mod domain;
pub mod infra;

pub use simfeed_types as types;
