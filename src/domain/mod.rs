//! Domain layer types and invariants.

pub mod error;
pub mod facet;
pub mod flags;
pub mod identity;
pub mod names;
