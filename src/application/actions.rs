//! Recording of user interactions with posts.
//!
//! Assignment never records actions; presentation code calls the sink when
//! a participant likes, shares or comments on a post.

/// Destination for interaction events keyed by post id and action name.
pub trait ActionSink: Send + Sync {
    fn record(&self, post_id: &str, action: &str);
}
