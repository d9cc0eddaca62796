//! Loading feed documents from disk.

use std::collections::HashSet;
use std::path::Path;

use simfeed_types::FeedDocument;
use tracing::info;

use super::error::{FeedError, InfraError};

/// Read and parse a JSON feed document.
///
/// Posts with a blank id are rejected, as are duplicate ids: both would
/// make seeded output and consumer slots ambiguous.
pub async fn load_feed(path: &Path) -> Result<FeedDocument, InfraError> {
    let source = tokio::fs::read_to_string(path).await?;
    let document = parse_feed(&source)
        .map_err(|reason| InfraError::feed(path.display().to_string(), reason))?;

    info!(
        path = %path.display(),
        posts = document.posts.len(),
        "Feed document loaded"
    );
    Ok(document)
}

pub fn parse_feed(source: &str) -> Result<FeedDocument, FeedError> {
    let document: FeedDocument = serde_json::from_str(source)?;

    let mut seen = HashSet::new();
    for (index, post) in document.posts.iter().enumerate() {
        if post.id.trim().is_empty() {
            return Err(FeedError::BlankId { index });
        }
        if !seen.insert(post.id.as_str()) {
            return Err(FeedError::DuplicateId {
                id: post.id.clone(),
            });
        }
    }
    Ok(document)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use simfeed_types::PersonaType;

    use super::*;

    #[test]
    fn parses_flags_and_posts() {
        let document = parse_feed(
            r#"{
                "flags": {"randomize_names": true},
                "posts": [
                    {"id": "p1", "author": "Alice", "authorType": "female", "text": "hi"},
                    {"id": "p2", "authorType": "robot"}
                ]
            }"#,
        )
        .expect("valid feed");

        assert!(document.flags.randomize_names);
        assert!(!document.flags.randomize_avatars);
        assert_eq!(document.posts.len(), 2);
        assert_eq!(document.posts[0].persona(), PersonaType::Female);
        assert_eq!(document.posts[1].persona(), PersonaType::Unknown);
    }

    #[test]
    fn rejects_duplicate_and_blank_ids() {
        let duplicate = parse_feed(r#"{"posts": [{"id": "p1"}, {"id": "p1"}]}"#);
        assert!(matches!(duplicate, Err(FeedError::DuplicateId { id }) if id == "p1"));

        let blank = parse_feed(r#"{"posts": [{"id": "p0"}, {"id": " "}]}"#);
        assert!(matches!(blank, Err(FeedError::BlankId { index: 1 })));

        assert!(matches!(parse_feed("{\"posts\": 7}"), Err(FeedError::Json(_))));
    }

    #[tokio::test]
    async fn load_feed_reports_the_path() {
        let mut file = tempfile::NamedTempFile::new().expect("temp feed");
        file.write_all(b"{not json").expect("write feed");

        let err = load_feed(file.path()).await.expect_err("invalid feed");
        assert!(matches!(
            err,
            InfraError::Feed {
                reason: FeedError::Json(_),
                ..
            }
        ));
        assert!(err.to_string().contains("invalid JSON"));
    }

    #[tokio::test]
    async fn missing_feed_is_an_io_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let err = load_feed(&dir.path().join("absent.json"))
            .await
            .expect_err("missing feed");
        assert!(matches!(err, InfraError::Io(_)));
    }
}
