//! Poison-tolerant locking.
//!
//! Cache entries and consumer slots hold plain data that stays consistent
//! between statements, so a panic elsewhere never leaves them half-written.
//! A poisoned lock is logged and then used as is.

use std::sync::{Mutex, MutexGuard};

use tracing::warn;

pub(crate) fn mutex_lock<'a, T>(
    lock: &'a Mutex<T>,
    source: &'static str,
    op: &'static str,
) -> MutexGuard<'a, T> {
    lock.lock().unwrap_or_else(|poisoned| {
        warn!(
            source,
            op,
            outcome = "poison_recovered",
            "Lock was poisoned by a panicking holder; continuing"
        );
        poisoned.into_inner()
    })
}
