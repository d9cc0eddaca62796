use std::fmt;

/// One randomizable aspect of a post's display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Facet {
    Name,
    Avatar,
    Image,
    Time,
}

impl Facet {
    pub const ALL: [Facet; 4] = [Facet::Name, Facet::Avatar, Facet::Image, Facet::Time];

    /// Seed component appended last to every seed key for this facet.
    pub fn as_str(self) -> &'static str {
        match self {
            Facet::Name => "name",
            Facet::Avatar => "avatar",
            Facet::Image => "image",
            Facet::Time => "time",
        }
    }

    /// Identity facets are frozen on sponsored posts.
    pub fn is_identity(self) -> bool {
        matches!(self, Facet::Name | Facet::Avatar | Facet::Image)
    }
}

impl fmt::Display for Facet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
