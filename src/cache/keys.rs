use std::fmt;

use simfeed_types::PersonaType;

/// Identifies one pool in the cache.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PoolKey {
    /// Avatar images for a persona type.
    Avatar(PersonaType),
    /// Topical post images.
    Image(String),
}

impl PoolKey {
    /// Avatar pool for a persona, if the persona is known.
    pub fn avatar(persona: PersonaType) -> Option<Self> {
        persona.is_known().then_some(Self::Avatar(persona))
    }

    /// Image pool for a topic, if the topic is non-blank.
    pub fn image(topic: &str) -> Option<Self> {
        let topic = topic.trim();
        (!topic.is_empty()).then(|| Self::Image(topic.to_string()))
    }

    /// Short label used as a metrics dimension.
    pub fn kind(&self) -> &'static str {
        match self {
            PoolKey::Avatar(_) => "avatar",
            PoolKey::Image(_) => "image",
        }
    }
}

impl fmt::Display for PoolKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PoolKey::Avatar(persona) => write!(f, "avatar:{persona}"),
            PoolKey::Image(topic) => write!(f, "image:{topic}"),
        }
    }
}
