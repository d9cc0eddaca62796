//! Application services: seeding, picking, assignment and feed growth.

pub mod actions;
pub mod assignment;
pub mod error;
pub mod feed;
pub mod picker;
pub mod providers;
pub mod scheduler;
pub mod seed;
pub mod slot;
