//! Progressive feed mounting.
//!
//! [`ProgressiveFeed`] decides how many posts are mounted. It starts with a
//! first batch and grows by a fixed step on each accepted trigger: a one-shot
//! idle tick after mount, or the trailing sentinel coming within the
//! proximity threshold of the viewport. `visible_count` never exceeds the
//! post count and never shrinks unless the post list itself does.

use std::collections::HashSet;
use std::time::Duration;

use tokio::sync::{mpsc, watch};
use tracing::{debug, info};

const DEFAULT_FIRST_BATCH: usize = 8;
const DEFAULT_STEP: usize = 6;
const DEFAULT_PROXIMITY_THRESHOLD: f64 = 600.0;
const DEFAULT_IDLE_DELAY_MS: u64 = 200;

#[derive(Debug, Clone, PartialEq)]
pub struct SchedulerConfig {
    pub first_batch: usize,
    pub step: usize,
    /// Distance from the viewport edge, in layout units, at which the
    /// sentinel counts as visible.
    pub proximity_threshold: f64,
    pub idle_delay: Duration,
}

impl Default for SchedulerConfig {
    fn default() -> Self {
        Self {
            first_batch: DEFAULT_FIRST_BATCH,
            step: DEFAULT_STEP,
            proximity_threshold: DEFAULT_PROXIMITY_THRESHOLD,
            idle_delay: Duration::from_millis(DEFAULT_IDLE_DELAY_MS),
        }
    }
}

impl From<&crate::config::SchedulerSettings> for SchedulerConfig {
    fn from(settings: &crate::config::SchedulerSettings) -> Self {
        Self {
            first_batch: settings.first_batch.get(),
            step: settings.step.get(),
            proximity_threshold: settings.proximity_threshold,
            idle_delay: settings.idle_delay,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchedulerState {
    /// Waiting for a trigger.
    Idle,
    /// A batch was released and has not been rendered yet.
    Growing,
    /// Every post is mounted.
    Complete,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FeedTrigger {
    /// Deferred tick scheduled once after the initial mount.
    IdleTick,
    /// One firing of the sentinel observer.
    SentinelProximity { event_id: u64, distance: f64 },
    /// The underlying post list changed length.
    LengthChanged(usize),
}

pub struct ProgressiveFeed {
    config: SchedulerConfig,
    total: usize,
    visible: usize,
    state: SchedulerState,
    idle_fired: bool,
    seen_sentinel_events: HashSet<u64>,
}

impl ProgressiveFeed {
    pub fn new(config: SchedulerConfig, total: usize) -> Self {
        let visible = config.first_batch.min(total);
        let state = if visible == total {
            SchedulerState::Complete
        } else {
            SchedulerState::Idle
        };

        Self {
            config,
            total,
            visible,
            state,
            idle_fired: false,
            seen_sentinel_events: HashSet::new(),
        }
    }

    pub fn visible_count(&self) -> usize {
        self.visible
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    /// Whether the submission affordance should be offered.
    pub fn is_complete(&self) -> bool {
        self.visible == self.total
    }

    /// Apply a trigger. Returns the new `visible_count` when it changed.
    ///
    /// Triggers arriving while a batch is still [`SchedulerState::Growing`]
    /// are dropped, as are repeated sentinel event ids and sentinel events
    /// beyond the proximity threshold.
    pub fn handle(&mut self, trigger: FeedTrigger) -> Option<usize> {
        match trigger {
            FeedTrigger::IdleTick => {
                if self.idle_fired {
                    return None;
                }
                self.idle_fired = true;
                self.grow()
            }
            FeedTrigger::SentinelProximity { event_id, distance } => {
                if !self.seen_sentinel_events.insert(event_id) {
                    debug!(event_id, "Duplicate sentinel event ignored");
                    return None;
                }
                if distance > self.config.proximity_threshold {
                    return None;
                }
                self.grow()
            }
            FeedTrigger::LengthChanged(total) => self.set_total(total),
        }
    }

    /// Mark the released batch as rendered so further triggers are accepted.
    pub fn settle(&mut self) {
        if self.state == SchedulerState::Growing {
            self.state = self.resting_state();
        }
    }

    /// Re-derive the cap after the post list changed length.
    pub fn set_total(&mut self, total: usize) -> Option<usize> {
        let previous = self.visible;
        self.total = total;
        if self.visible > total {
            self.visible = total;
        }
        if self.state != SchedulerState::Growing {
            self.state = self.resting_state();
        }
        (self.visible != previous).then_some(self.visible)
    }

    fn grow(&mut self) -> Option<usize> {
        if self.state != SchedulerState::Idle {
            return None;
        }

        let next = self.visible.saturating_add(self.config.step).min(self.total);
        if next == self.visible {
            return None;
        }

        self.visible = next;
        self.state = SchedulerState::Growing;
        Some(next)
    }

    fn resting_state(&self) -> SchedulerState {
        if self.is_complete() {
            SchedulerState::Complete
        } else {
            SchedulerState::Idle
        }
    }
}

/// Drive a [`ProgressiveFeed`] from a trigger channel.
///
/// The idle tick is scheduled once, `idle_delay` after start. Every change
/// of `visible_count` is published on `visible`, after which the batch is
/// considered rendered. Returns when the trigger channel closes.
pub async fn run_feed_growth(
    mut feed: ProgressiveFeed,
    mut triggers: mpsc::Receiver<FeedTrigger>,
    visible: watch::Sender<usize>,
) -> ProgressiveFeed {
    visible.send_replace(feed.visible_count());

    let idle = tokio::time::sleep(feed.config.idle_delay);
    tokio::pin!(idle);
    let mut idle_pending = true;

    loop {
        let trigger = tokio::select! {
            _ = &mut idle, if idle_pending => {
                idle_pending = false;
                FeedTrigger::IdleTick
            }
            received = triggers.recv() => match received {
                Some(trigger) => trigger,
                None => break,
            },
        };

        if let Some(count) = feed.handle(trigger) {
            debug!(visible = count, total = feed.total(), trigger = ?trigger, "Feed window changed");
            visible.send_replace(count);
            if feed.is_complete() {
                debug!(total = feed.total(), "Feed fully mounted");
            }
        }
        feed.settle();
    }

    info!(
        visible = feed.visible_count(),
        total = feed.total(),
        "Feed growth driver stopped"
    );
    feed
}

/// Every `visible_count` a feed of `total` posts passes through when the
/// idle tick fires first and the sentinel is in view on each later trigger.
pub fn growth_sequence(config: SchedulerConfig, total: usize) -> Vec<usize> {
    let mut feed = ProgressiveFeed::new(config, total);
    let mut sequence = vec![feed.visible_count()];
    let mut triggers = std::iter::once(FeedTrigger::IdleTick).chain((1..).map(|event_id| {
        FeedTrigger::SentinelProximity {
            event_id,
            distance: 0.0,
        }
    }));

    while !feed.is_complete() {
        let Some(trigger) = triggers.next() else {
            break;
        };
        if let Some(count) = feed.handle(trigger) {
            sequence.push(count);
        }
        feed.settle();
    }
    sequence
}
