//! Pool providers backed by a TOML manifest on disk or by in-memory lists.
//!
//! Manifest format:
//!
//! ```toml
//! [avatars]
//! female = ["https://cdn.example.com/avatars/f1.jpg"]
//! male = ["https://cdn.example.com/avatars/m1.jpg"]
//!
//! [images]
//! travel = ["https://cdn.example.com/images/travel/1.jpg"]
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use simfeed_types::PersonaType;
use tracing::debug;
use url::Url;

use crate::application::providers::{PoolFetchError, PoolProvider};

const BUILTIN_AVATAR_BASE: &str = "https://cdn.simfeed.dev/avatars";
const BUILTIN_IMAGE_BASE: &str = "https://cdn.simfeed.dev/images";
const BUILTIN_AVATARS_PER_PERSONA: usize = 12;
const BUILTIN_IMAGES_PER_TOPIC: usize = 8;
const BUILTIN_TOPICS: [&str; 6] = ["food", "travel", "fitness", "tech", "pets", "news"];

/// Parsed pool manifest. Every entry is an absolute URL.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct PoolManifest {
    avatars: HashMap<PersonaType, Vec<String>>,
    images: HashMap<String, Vec<String>>,
}

impl PoolManifest {
    pub fn parse(source: &str) -> Result<Self, PoolFetchError> {
        let manifest: Self = toml::from_str(source)
            .map_err(|err| PoolFetchError::invalid(format!("manifest is not valid TOML: {err}")))?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn avatars(&self, persona: PersonaType) -> Option<&[String]> {
        self.avatars.get(&persona).map(Vec::as_slice)
    }

    pub fn images(&self, topic: &str) -> Option<&[String]> {
        self.images.get(topic).map(Vec::as_slice)
    }

    fn validate(&self) -> Result<(), PoolFetchError> {
        if self.avatars.contains_key(&PersonaType::Unknown) {
            return Err(PoolFetchError::invalid(
                "avatars may only be keyed by male, female or company",
            ));
        }

        let avatar_entries = self
            .avatars
            .iter()
            .flat_map(|(persona, urls)| urls.iter().map(move |url| (persona.as_str(), url)));
        let image_entries = self
            .images
            .iter()
            .flat_map(|(topic, urls)| urls.iter().map(move |url| (topic.as_str(), url)));

        for (pool, entry) in avatar_entries.chain(image_entries) {
            ensure_absolute(pool, entry)?;
        }
        Ok(())
    }
}

fn ensure_absolute(pool: &str, entry: &str) -> Result<(), PoolFetchError> {
    Url::parse(entry).map(|_| ()).map_err(|err| {
        PoolFetchError::invalid(format!(
            "pool `{pool}` entry `{entry}` is not an absolute URL: {err}"
        ))
    })
}

/// Reads the manifest from disk on every fetch, so edits are picked up by
/// the next session without a restart.
#[derive(Debug, Clone)]
pub struct ManifestPoolProvider {
    path: PathBuf,
}

impl ManifestPoolProvider {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read(&self) -> Result<PoolManifest, PoolFetchError> {
        debug!(path = %self.path.display(), "Reading pool manifest");
        let source = tokio::fs::read_to_string(&self.path)
            .await
            .map_err(|err| {
                PoolFetchError::unavailable(format!("{}: {err}", self.path.display()))
            })?;
        PoolManifest::parse(&source)
    }
}

#[async_trait]
impl PoolProvider for ManifestPoolProvider {
    async fn fetch_avatar_pool(&self, persona: PersonaType) -> Result<Vec<String>, PoolFetchError> {
        let manifest = self.read().await?;
        manifest
            .avatars(persona)
            .map(<[String]>::to_vec)
            .ok_or_else(|| PoolFetchError::not_found(format!("avatar:{persona}")))
    }

    async fn fetch_image_pool(&self, topic: &str) -> Result<Vec<String>, PoolFetchError> {
        let manifest = self.read().await?;
        manifest
            .images(topic)
            .map(<[String]>::to_vec)
            .ok_or_else(|| PoolFetchError::not_found(format!("image:{topic}")))
    }
}

/// In-memory pools, used when no manifest is configured.
#[derive(Debug, Clone, Default)]
pub struct StaticPoolProvider {
    avatars: HashMap<PersonaType, Vec<String>>,
    images: HashMap<String, Vec<String>>,
}

impl StaticPoolProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Placeholder avatars for every persona and images for a handful of
    /// common topics.
    pub fn builtin() -> Self {
        let mut provider = Self::new();
        for persona in [PersonaType::Female, PersonaType::Male, PersonaType::Company] {
            provider = provider.with_avatars(
                persona,
                (1..=BUILTIN_AVATARS_PER_PERSONA)
                    .map(|i| format!("{BUILTIN_AVATAR_BASE}/{persona}/{i:02}.jpg")),
            );
        }
        for topic in BUILTIN_TOPICS {
            provider = provider.with_images(
                topic,
                (1..=BUILTIN_IMAGES_PER_TOPIC)
                    .map(|i| format!("{BUILTIN_IMAGE_BASE}/{topic}/{i:02}.jpg")),
            );
        }
        provider
    }

    pub fn with_avatars<I, S>(mut self, persona: PersonaType, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.avatars
            .insert(persona, urls.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_images<I, S>(mut self, topic: impl Into<String>, urls: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.images
            .insert(topic.into(), urls.into_iter().map(Into::into).collect());
        self
    }
}

#[async_trait]
impl PoolProvider for StaticPoolProvider {
    async fn fetch_avatar_pool(&self, persona: PersonaType) -> Result<Vec<String>, PoolFetchError> {
        self.avatars
            .get(&persona)
            .cloned()
            .ok_or_else(|| PoolFetchError::not_found(format!("avatar:{persona}")))
    }

    async fn fetch_image_pool(&self, topic: &str) -> Result<Vec<String>, PoolFetchError> {
        self.images
            .get(topic)
            .cloned()
            .ok_or_else(|| PoolFetchError::not_found(format!("image:{topic}")))
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    const MANIFEST: &str = r#"
[avatars]
female = ["https://cdn.example.com/f1.jpg", "https://cdn.example.com/f2.jpg"]

[images]
travel = ["https://cdn.example.com/travel/1.jpg"]
"#;

    #[test]
    fn parses_avatar_and_image_pools() {
        let manifest = PoolManifest::parse(MANIFEST).expect("valid manifest");
        assert_eq!(manifest.avatars(PersonaType::Female).map(<[String]>::len), Some(2));
        assert_eq!(manifest.avatars(PersonaType::Male), None);
        assert_eq!(manifest.images("travel").map(<[String]>::len), Some(1));
    }

    #[test]
    fn rejects_relative_urls() {
        let err = PoolManifest::parse("[images]\nfood = [\"/static/food.jpg\"]\n")
            .expect_err("relative URL");
        assert!(matches!(err, PoolFetchError::Invalid(message) if message.contains("food")));
    }

    #[test]
    fn rejects_unknown_persona_keys() {
        let err = PoolManifest::parse("[avatars]\nrobot = [\"https://cdn.example.com/r.jpg\"]\n")
            .expect_err("unknown persona");
        assert!(matches!(err, PoolFetchError::Invalid(_)));
    }

    #[test]
    fn rejects_malformed_toml() {
        assert!(matches!(
            PoolManifest::parse("[avatars"),
            Err(PoolFetchError::Invalid(_))
        ));
    }

    #[tokio::test]
    async fn manifest_provider_reads_pools_from_disk() {
        let mut file = tempfile::NamedTempFile::new().expect("temp manifest");
        file.write_all(MANIFEST.as_bytes()).expect("write manifest");
        let provider = ManifestPoolProvider::new(file.path());

        let avatars = provider
            .fetch_avatar_pool(PersonaType::Female)
            .await
            .expect("female avatars");
        assert_eq!(avatars[0], "https://cdn.example.com/f1.jpg");

        let missing = provider.fetch_image_pool("food").await;
        assert!(matches!(missing, Err(PoolFetchError::NotFound { .. })));
    }

    #[tokio::test]
    async fn missing_manifest_is_unavailable() {
        let dir = tempfile::tempdir().expect("temp dir");
        let provider = ManifestPoolProvider::new(dir.path().join("absent.toml"));

        let result = provider.fetch_avatar_pool(PersonaType::Male).await;
        assert!(matches!(result, Err(PoolFetchError::Unavailable(_))));
    }

    #[tokio::test]
    async fn builtin_pools_cover_every_persona() {
        let provider = StaticPoolProvider::builtin();
        for persona in [PersonaType::Female, PersonaType::Male, PersonaType::Company] {
            let pool = provider.fetch_avatar_pool(persona).await.expect("avatars");
            assert_eq!(pool.len(), BUILTIN_AVATARS_PER_PERSONA);
            assert!(pool.iter().all(|url| Url::parse(url).is_ok()));
        }
        assert!(provider.fetch_avatar_pool(PersonaType::Unknown).await.is_err());
        assert!(provider.fetch_image_pool("travel").await.is_ok());
    }
}
