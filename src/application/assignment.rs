//! Content assignment: which name, avatar, image and time label a post shows.
//!
//! Every facet is resolved by walking an ordered fallback chain. A facet
//! that randomizes tries [`FallbackStrategy::PoolPick`] first; every facet
//! ends in [`FallbackStrategy::HardcodedDefault`], so a name, avatar and
//! time label are always present.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::join_all;
use simfeed_types::{Post, RandomizationFlags, ResolvedDisplay};
use tracing::trace;

use crate::application::picker::pick;
use crate::application::seed::{SeedKey, build_seed_key};
use crate::cache::{Pool, PoolCache, PoolKey};
use crate::domain::facet::Facet;
use crate::domain::flags::FacetFlags;
use crate::domain::identity::IdentityContext;
use crate::domain::names::{DEFAULT_TIME_LABEL, TIME_BUCKETS, default_name_for, names_for};

pub const DEFAULT_PLACEHOLDER_AVATAR_URL: &str = "/static/avatars/placeholder.svg";

/// One step of a facet's fallback chain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FallbackStrategy {
    /// Deterministic pick from the facet's pool.
    PoolPick,
    /// The post's own authored value.
    Authored,
    /// Facet-specific constant.
    HardcodedDefault,
}

const RANDOMIZED_CHAIN: [FallbackStrategy; 3] = [
    FallbackStrategy::PoolPick,
    FallbackStrategy::Authored,
    FallbackStrategy::HardcodedDefault,
];

const AUTHORED_CHAIN: [FallbackStrategy; 2] = [
    FallbackStrategy::Authored,
    FallbackStrategy::HardcodedDefault,
];

pub fn fallback_chain(randomize: bool) -> &'static [FallbackStrategy] {
    if randomize {
        &RANDOMIZED_CHAIN
    } else {
        &AUTHORED_CHAIN
    }
}

/// Which strategy produced each facet. `image` is `None` when the post
/// shows no image at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FacetSources {
    pub name: FallbackStrategy,
    pub avatar: FallbackStrategy,
    pub image: Option<FallbackStrategy>,
    pub time: FallbackStrategy,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    pub display: ResolvedDisplay,
    pub sources: FacetSources,
}

#[derive(Debug, Clone)]
pub struct AssignmentDefaults {
    pub placeholder_avatar_url: String,
}

impl Default for AssignmentDefaults {
    fn default() -> Self {
        Self {
            placeholder_avatar_url: DEFAULT_PLACEHOLDER_AVATAR_URL.to_string(),
        }
    }
}

/// Resolves display fields per post. Holds no per-post state.
pub struct AssignmentEngine {
    identity: IdentityContext,
    pools: Arc<PoolCache>,
    defaults: AssignmentDefaults,
}

impl AssignmentEngine {
    pub fn new(
        identity: IdentityContext,
        pools: Arc<PoolCache>,
        defaults: AssignmentDefaults,
    ) -> Self {
        Self {
            identity,
            pools,
            defaults,
        }
    }

    pub fn identity(&self) -> &IdentityContext {
        &self.identity
    }

    pub fn pools(&self) -> &Arc<PoolCache> {
        &self.pools
    }

    /// Pools this post draws from under `flags`.
    pub fn required_pools(&self, post: &Post, flags: &RandomizationFlags) -> Vec<PoolKey> {
        let policy = FacetPolicy::new(post, flags);
        let mut keys = Vec::with_capacity(2);

        if policy.randomizes(Facet::Avatar)
            && let Some(key) = PoolKey::avatar(post.persona())
        {
            keys.push(key);
        }
        if policy.randomizes(Facet::Image)
            && let Some(key) = post.topic.as_deref().and_then(PoolKey::image)
        {
            keys.push(key);
        }
        keys
    }

    /// Kick off fetches for this post's pools without waiting on them.
    pub fn prefetch(&self, post: &Post, flags: &RandomizationFlags) {
        for key in self.required_pools(post, flags) {
            self.pools.prefetch(&key);
        }
    }

    /// Resolve using only pools that are already ready; facets whose pool is
    /// still loading show their authored value for now.
    pub fn assign_now(&self, post: &Post, flags: &RandomizationFlags) -> Assignment {
        self.assemble(post, flags, |key| self.pools.peek(key))
    }

    /// Resolve after waiting for every pool this post needs.
    pub async fn assign(&self, post: &Post, flags: &RandomizationFlags) -> Assignment {
        let keys = self.required_pools(post, flags);
        let fetched = join_all(keys.iter().map(|key| self.pools.get_pool(key))).await;
        let ready: HashMap<PoolKey, Pool> = keys
            .into_iter()
            .zip(fetched)
            .filter_map(|(key, pool)| pool.map(|pool| (key, pool)))
            .collect();

        self.assemble(post, flags, |key| ready.get(key).cloned())
    }

    pub fn resolve_now(&self, post: &Post, flags: &RandomizationFlags) -> ResolvedDisplay {
        self.assign_now(post, flags).display
    }

    pub async fn resolve(&self, post: &Post, flags: &RandomizationFlags) -> ResolvedDisplay {
        self.assign(post, flags).await.display
    }

    fn seed(&self, post: &Post, facet: Facet) -> SeedKey {
        build_seed_key(self.identity.seed_parts(&post.id), facet.as_str())
    }

    fn assemble(
        &self,
        post: &Post,
        flags: &RandomizationFlags,
        lookup: impl Fn(&PoolKey) -> Option<Pool>,
    ) -> Assignment {
        let policy = FacetPolicy::new(post, flags);
        let persona = post.persona();

        let (name_source, display_author) =
            resolve_facet(post, Facet::Name, policy.chain(Facet::Name), |strategy| {
                match strategy {
                    FallbackStrategy::PoolPick => {
                        pick(names_for(persona), &self.seed(post, Facet::Name))
                            .map(|name| (*name).to_string())
                    }
                    FallbackStrategy::Authored => authored(post.author.as_deref()),
                    FallbackStrategy::HardcodedDefault => {
                        Some(default_name_for(persona).to_string())
                    }
                }
            })
            .unwrap_or_else(|| hardcoded(default_name_for(persona)));

        let (avatar_source, effective_avatar_url) =
            resolve_facet(post, Facet::Avatar, policy.chain(Facet::Avatar), |strategy| {
                match strategy {
                    FallbackStrategy::PoolPick => PoolKey::avatar(persona)
                        .and_then(|key| lookup(&key))
                        .and_then(|pool| pick(&pool, &self.seed(post, Facet::Avatar)).cloned()),
                    FallbackStrategy::Authored => authored(post.avatar_url.as_deref()),
                    FallbackStrategy::HardcodedDefault => {
                        Some(self.defaults.placeholder_avatar_url.clone())
                    }
                }
            })
            .unwrap_or_else(|| hardcoded(&self.defaults.placeholder_avatar_url));

        let image = resolve_facet(post, Facet::Image, policy.chain(Facet::Image), |strategy| {
            match strategy {
                FallbackStrategy::PoolPick => post
                    .topic
                    .as_deref()
                    .and_then(PoolKey::image)
                    .and_then(|key| lookup(&key))
                    .and_then(|pool| pick(&pool, &self.seed(post, Facet::Image)).cloned()),
                FallbackStrategy::Authored => authored(post.image.as_deref()),
                FallbackStrategy::HardcodedDefault => None,
            }
        });
        let (image_source, display_image_url) = match image {
            Some((source, url)) => (Some(source), Some(url)),
            None => (None, None),
        };

        let (time_source, time_label) =
            resolve_facet(post, Facet::Time, policy.chain(Facet::Time), |strategy| {
                match strategy {
                    FallbackStrategy::PoolPick => pick(&TIME_BUCKETS, &self.seed(post, Facet::Time))
                        .map(|label| (*label).to_string()),
                    FallbackStrategy::Authored => authored(post.time.as_deref()),
                    FallbackStrategy::HardcodedDefault => Some(DEFAULT_TIME_LABEL.to_string()),
                }
            })
            .unwrap_or_else(|| hardcoded(DEFAULT_TIME_LABEL));

        Assignment {
            display: ResolvedDisplay {
                display_author,
                effective_avatar_url,
                display_image_url,
                time_label,
            },
            sources: FacetSources {
                name: name_source,
                avatar: avatar_source,
                image: image_source,
                time: time_source,
            },
        }
    }
}

/// Effective randomization for one post: layered flags, with identity
/// facets frozen on sponsored posts.
struct FacetPolicy {
    flags: RandomizationFlags,
    sponsored: bool,
}

impl FacetPolicy {
    fn new(post: &Post, flags: &RandomizationFlags) -> Self {
        Self {
            flags: flags.effective_for(post),
            sponsored: post.is_sponsored(),
        }
    }

    fn randomizes(&self, facet: Facet) -> bool {
        self.flags.randomizes(facet) && !(self.sponsored && facet.is_identity())
    }

    fn chain(&self, facet: Facet) -> &'static [FallbackStrategy] {
        fallback_chain(self.randomizes(facet))
    }
}

fn resolve_facet(
    post: &Post,
    facet: Facet,
    chain: &[FallbackStrategy],
    mut attempt: impl FnMut(FallbackStrategy) -> Option<String>,
) -> Option<(FallbackStrategy, String)> {
    let resolved = chain
        .iter()
        .find_map(|strategy| attempt(*strategy).map(|value| (*strategy, value)));

    if let Some((strategy, _)) = &resolved {
        trace!(post_id = %post.id, facet = %facet, strategy = ?strategy, "Facet resolved");
    }
    resolved
}

/// Authored values pass through verbatim; blank ones count as absent.
fn authored(value: Option<&str>) -> Option<String> {
    value
        .filter(|value| !value.trim().is_empty())
        .map(str::to_string)
}

fn hardcoded(value: &str) -> (FallbackStrategy, String) {
    (FallbackStrategy::HardcodedDefault, value.to_string())
}
