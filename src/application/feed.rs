//! Feed-level resolution on top of [`AssignmentEngine`].
//!
//! A feed is eventually consistent: [`FeedService::snapshot`] returns what
//! can be shown right now and starts the pool fetches, and
//! [`FeedService::settle`] returns the same feed once those fetches are done.
//! Mounted posts keep their display in a [`ConsumerSlot`] so a late result
//! for an unmounted or re-keyed post is dropped.

use std::sync::Arc;

use dashmap::DashMap;
use futures::future::join_all;
use simfeed_types::{FeedDocument, Post, RandomizationFlags, ResolvedDisplay, ResolvedPost};
use tokio::task::JoinHandle;
use tracing::{debug, instrument};

use crate::application::actions::ActionSink;
use crate::application::assignment::AssignmentEngine;
use crate::application::slot::ConsumerSlot;

/// Feed-wide flags with the forced override applied on top.
pub fn feed_flags(document: &FeedDocument, force_all: bool) -> RandomizationFlags {
    RandomizationFlags {
        force_all: document.flags.force_all || force_all,
        ..document.flags
    }
}

pub struct FeedService {
    engine: Arc<AssignmentEngine>,
    slots: DashMap<String, Arc<ConsumerSlot<ResolvedDisplay>>>,
    actions: Option<Arc<dyn ActionSink>>,
}

impl FeedService {
    pub fn new(engine: Arc<AssignmentEngine>) -> Self {
        Self {
            engine,
            slots: DashMap::new(),
            actions: None,
        }
    }

    pub fn with_action_sink(mut self, sink: Arc<dyn ActionSink>) -> Self {
        self.actions = Some(sink);
        self
    }

    pub fn engine(&self) -> &Arc<AssignmentEngine> {
        &self.engine
    }

    /// Resolve every post from ready pools only, starting fetches for the
    /// rest.
    ///
    /// Each snapshot starts a new pass: pools that exhausted their fetch
    /// attempts are re-armed and fetched again.
    pub fn snapshot(&self, document: &FeedDocument) -> Vec<ResolvedPost> {
        let rearmed = self.engine.pools().forget_failures();
        if rearmed > 0 {
            debug!(rearmed, "Re-armed failed pools for a new snapshot");
        }

        document
            .posts
            .iter()
            .map(|post| {
                self.engine.prefetch(post, &document.flags);
                resolved(post, self.engine.resolve_now(post, &document.flags))
            })
            .collect()
    }

    /// Resolve every post after its pools have settled.
    #[instrument(skip_all, fields(posts = document.posts.len()))]
    pub async fn settle(&self, document: &FeedDocument) -> Vec<ResolvedPost> {
        let displays = join_all(
            document
                .posts
                .iter()
                .map(|post| self.engine.resolve(post, &document.flags)),
        )
        .await;

        document
            .posts
            .iter()
            .zip(displays)
            .map(|(post, display)| resolved(post, display))
            .collect()
    }

    /// Mount a post: the interim display is visible immediately and the
    /// settled display replaces it once pools are ready.
    ///
    /// Mounting the same post id again supersedes the earlier mount. The
    /// returned handle yields whether the settled display was applied.
    pub fn mount(&self, post: Post, flags: RandomizationFlags) -> JoinHandle<bool> {
        let slot = self
            .slots
            .entry(post.id.clone())
            .or_insert_with(|| Arc::new(ConsumerSlot::new()))
            .clone();

        self.engine.prefetch(&post, &flags);
        let ticket = slot.begin(self.engine.resolve_now(&post, &flags));

        let engine = Arc::clone(&self.engine);
        tokio::spawn(async move {
            let display = engine.resolve(&post, &flags).await;
            let applied = slot.apply(ticket, display);
            if !applied {
                debug!(
                    post_id = %post.id,
                    generation = ticket.generation(),
                    "Discarded stale display"
                );
            }
            applied
        })
    }

    /// Tear down a mounted post; pending results for it are ignored.
    pub fn unmount(&self, post_id: &str) -> bool {
        match self.slots.remove(post_id) {
            Some((_, slot)) => {
                slot.retire();
                true
            }
            None => false,
        }
    }

    pub fn display(&self, post_id: &str) -> Option<ResolvedDisplay> {
        self.slots.get(post_id).and_then(|slot| slot.current())
    }

    pub fn mounted_count(&self) -> usize {
        self.slots.len()
    }

    /// Forward an interaction to the configured sink, if any.
    pub fn record_action(&self, post_id: &str, action: &str) {
        match &self.actions {
            Some(sink) => sink.record(post_id, action),
            None => debug!(post_id, action, "No action sink configured"),
        }
    }
}

fn resolved(post: &Post, display: ResolvedDisplay) -> ResolvedPost {
    ResolvedPost {
        post_id: post.id.clone(),
        display,
    }
}
