//! Per-consumer display state guarded against stale async results.

use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::cache::mutex_lock;

const SOURCE: &str = "application::slot";

/// Proof that a result was requested under a particular generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotTicket {
    generation: u64,
}

impl SlotTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

/// Holds the value one consumer currently shows.
///
/// Every change of inputs and every teardown bumps the generation; a result
/// carrying an older ticket is discarded instead of overwriting newer state.
pub struct ConsumerSlot<T> {
    generation: AtomicU64,
    retired: AtomicU64,
    value: Mutex<Option<T>>,
}

impl<T: Clone> ConsumerSlot<T> {
    pub fn new() -> Self {
        Self {
            generation: AtomicU64::new(0),
            retired: AtomicU64::new(0),
            value: Mutex::new(None),
        }
    }

    /// Start a new generation and show `interim` immediately.
    pub fn begin(&self, interim: T) -> SlotTicket {
        let mut value = mutex_lock(&self.value, SOURCE, "begin");
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *value = Some(interim);
        SlotTicket { generation }
    }

    /// Apply a late result. Returns `false` if the ticket is stale or the
    /// slot has been retired.
    pub fn apply(&self, ticket: SlotTicket, result: T) -> bool {
        let mut value = mutex_lock(&self.value, SOURCE, "apply");
        if !self.is_current(ticket) {
            return false;
        }
        *value = Some(result);
        true
    }

    pub fn is_current(&self, ticket: SlotTicket) -> bool {
        ticket.generation == self.generation.load(Ordering::SeqCst)
            && ticket.generation > self.retired.load(Ordering::SeqCst)
    }

    /// Tear the consumer down: pending results are ignored from now on.
    pub fn retire(&self) {
        let mut value = mutex_lock(&self.value, SOURCE, "retire");
        let generation = self.generation.load(Ordering::SeqCst);
        self.retired.store(generation, Ordering::SeqCst);
        *value = None;
    }

    pub fn current(&self) -> Option<T> {
        mutex_lock(&self.value, SOURCE, "current").clone()
    }
}

impl<T: Clone> Default for ConsumerSlot<T> {
    fn default() -> Self {
        Self::new()
    }
}
