use super::error::DomainError;

pub const SUPPORTED_APP_IDS: [&str; 2] = ["fb", "ig"];

/// Exogenous identifiers supplied by the hosting environment.
///
/// Treated as opaque strings for seeding; only the app id is validated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityContext {
    run_id: String,
    app_id: String,
    project_id: String,
    feed_id: String,
}

impl IdentityContext {
    pub fn new(
        run_id: impl Into<String>,
        app_id: impl Into<String>,
        project_id: impl Into<String>,
        feed_id: impl Into<String>,
    ) -> Result<Self, DomainError> {
        let app_id = app_id.into();
        if !SUPPORTED_APP_IDS.contains(&app_id.as_str()) {
            return Err(DomainError::validation(format!(
                "unsupported app id `{app_id}`; expected one of {}",
                SUPPORTED_APP_IDS.join(", ")
            )));
        }

        Ok(Self {
            run_id: run_id.into(),
            app_id,
            project_id: project_id.into(),
            feed_id: feed_id.into(),
        })
    }

    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn feed_id(&self) -> &str {
        &self.feed_id
    }

    /// Seed parts for a post, in seed order: run, app, project, feed, post.
    pub fn seed_parts<'a>(&'a self, post_id: &'a str) -> [&'a str; 5] {
        [
            self.run_id.as_str(),
            self.app_id.as_str(),
            self.project_id.as_str(),
            self.feed_id.as_str(),
            post_id,
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_unknown_app() {
        let err = IdentityContext::new("run1", "tw", "proj1", "feed1").unwrap_err();
        assert!(err.to_string().contains("unsupported app id `tw`"));
    }

    #[test]
    fn seed_parts_are_ordered() {
        let identity = IdentityContext::new("run1", "ig", "proj1", "feed1").expect("valid");
        assert_eq!(
            identity.seed_parts("p1"),
            ["run1", "ig", "proj1", "feed1", "p1"]
        );
    }
}
