//! Shared record types for simulated feeds.
//!
//! Posts and flags arrive from the feed data source; [`ResolvedDisplay`] is
//! what the presentation layer renders.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Coarse author category used to choose name and avatar pools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PersonaType {
    Male,
    Female,
    Company,
    #[serde(other)]
    Unknown,
}

impl PersonaType {
    pub fn as_str(self) -> &'static str {
        match self {
            PersonaType::Male => "male",
            PersonaType::Female => "female",
            PersonaType::Company => "company",
            PersonaType::Unknown => "unknown",
        }
    }

    pub fn is_known(self) -> bool {
        !matches!(self, PersonaType::Unknown)
    }
}

impl fmt::Display for PersonaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Advertising marker carried by sponsored posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdType {
    Ad,
    Influencer,
    #[serde(other)]
    Other,
}

/// Per-post flag overrides layered over the feed-wide flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FlagOverrides {
    pub randomize_names: Option<bool>,
    pub randomize_avatars: Option<bool>,
    pub randomize_images: Option<bool>,
    pub randomize_times: Option<bool>,
}

/// Which display facets draw from pools instead of authored content.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RandomizationFlags {
    pub randomize_names: bool,
    pub randomize_avatars: bool,
    pub randomize_images: bool,
    pub randomize_times: bool,
    /// Forces every facet on regardless of feed or post configuration.
    pub force_all: bool,
}

impl RandomizationFlags {
    pub fn all() -> Self {
        Self {
            randomize_names: true,
            randomize_avatars: true,
            randomize_images: true,
            randomize_times: true,
            force_all: false,
        }
    }

    pub fn with_overrides(mut self, overrides: &FlagOverrides) -> Self {
        if let Some(value) = overrides.randomize_names {
            self.randomize_names = value;
        }
        if let Some(value) = overrides.randomize_avatars {
            self.randomize_avatars = value;
        }
        if let Some(value) = overrides.randomize_images {
            self.randomize_images = value;
        }
        if let Some(value) = overrides.randomize_times {
            self.randomize_times = value;
        }
        self
    }

    /// Flags in effect for a single post: post overrides first, then the
    /// forced override on top.
    pub fn effective_for(&self, post: &Post) -> Self {
        let layered = match post.flags.as_ref() {
            Some(overrides) => self.with_overrides(overrides),
            None => *self,
        };

        if layered.force_all {
            Self {
                force_all: true,
                ..Self::all()
            }
        } else {
            layered
        }
    }
}

/// Authored post content. Read-only to the assignment engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    #[serde(default)]
    pub author: Option<String>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub image: Option<String>,
    #[serde(default)]
    pub time: Option<String>,
    #[serde(default)]
    pub author_type: Option<PersonaType>,
    #[serde(default)]
    pub ad_type: Option<AdType>,
    #[serde(default)]
    pub topic: Option<String>,
    #[serde(default)]
    pub flags: Option<FlagOverrides>,
}

impl Post {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Advertising and influencer-partnership posts keep their identity.
    pub fn is_sponsored(&self) -> bool {
        matches!(self.ad_type, Some(AdType::Ad | AdType::Influencer))
    }

    pub fn persona(&self) -> PersonaType {
        self.author_type.unwrap_or(PersonaType::Unknown)
    }
}

/// Display fields the presentation layer renders for one post.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedDisplay {
    pub display_author: String,
    pub effective_avatar_url: String,
    pub display_image_url: Option<String>,
    pub time_label: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolvedPost {
    pub post_id: String,
    #[serde(flatten)]
    pub display: ResolvedDisplay,
}

/// A feed as supplied by the data source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedDocument {
    #[serde(default)]
    pub flags: RandomizationFlags,
    #[serde(default)]
    pub posts: Vec<Post>,
}
