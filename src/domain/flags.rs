//! Facet-level view over [`RandomizationFlags`] and the forced-override switch.

use simfeed_types::RandomizationFlags;

use super::facet::Facet;

const FORCE_QUERY_KEYS: [&str; 2] = ["randomize", "debug"];

pub trait FacetFlags {
    fn randomizes(&self, facet: Facet) -> bool;
}

impl FacetFlags for RandomizationFlags {
    fn randomizes(&self, facet: Facet) -> bool {
        if self.force_all {
            return true;
        }
        match facet {
            Facet::Name => self.randomize_names,
            Facet::Avatar => self.randomize_avatars,
            Facet::Image => self.randomize_images,
            Facet::Time => self.randomize_times,
        }
    }
}

/// Whether a query string such as `?randomize=1` asks for every facet.
///
/// Accepts `1`, `true`, `yes` and `on` (case-insensitive). A leading `?` is
/// ignored.
pub fn forced_from_query(query: &str) -> bool {
    let query = query.strip_prefix('?').unwrap_or(query);
    url::form_urlencoded::parse(query.as_bytes()).any(|(key, value)| {
        FORCE_QUERY_KEYS.contains(&key.as_ref()) && is_truthy(value.as_ref())
    })
}

fn is_truthy(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "1" | "true" | "yes" | "on"
    )
}
