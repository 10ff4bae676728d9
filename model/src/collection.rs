//! Content collections listed by `collection` blocks.

use std::fmt;
use std::str::FromStr;

use crate::error::ModelError;

/// A content collection exposed by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CollectionName {
    /// Service offerings.
    Services,
    /// Case studies.
    Cases,
    /// Events.
    Events,
    /// Investment projects.
    Projects,
    /// Partners.
    Partners,
    /// Insight articles.
    Articles,
    /// Team members.
    Team,
}

impl CollectionName {
    /// Every known collection.
    pub const ALL: [CollectionName; 7] = [
        CollectionName::Services,
        CollectionName::Cases,
        CollectionName::Events,
        CollectionName::Projects,
        CollectionName::Partners,
        CollectionName::Articles,
        CollectionName::Team,
    ];

    /// Gateway collection name.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            CollectionName::Services => "services",
            CollectionName::Cases => "cases",
            CollectionName::Events => "events",
            CollectionName::Projects => "projects",
            CollectionName::Partners => "partners",
            CollectionName::Articles => "articles",
            CollectionName::Team => "team",
        }
    }

    /// Admin display label.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            CollectionName::Services => "Services",
            CollectionName::Cases => "Cases",
            CollectionName::Events => "Events",
            CollectionName::Projects => "Investments",
            CollectionName::Partners => "Partners",
            CollectionName::Articles => "Insights",
            CollectionName::Team => "Team",
        }
    }

    /// Whether items of this collection carry a `slug` and can have detail pages.
    #[must_use]
    pub fn has_slugs(self) -> bool {
        self != CollectionName::Team
    }

    /// Query keys the gateway accepts as list filters for this collection.
    #[must_use]
    pub fn filters(self) -> &'static [&'static str] {
        match self {
            CollectionName::Cases | CollectionName::Articles | CollectionName::Partners => {
                &["category"]
            }
            CollectionName::Projects => &["stage", "industry"],
            CollectionName::Services | CollectionName::Events | CollectionName::Team => &[],
        }
    }
}

impl fmt::Display for CollectionName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionName {
    type Err = ModelError;

    fn from_str(name: &str) -> Result<Self, Self::Err> {
        CollectionName::ALL
            .into_iter()
            .find(|c| c.as_str() == name)
            .ok_or_else(|| ModelError::UnknownCollection(name.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_round_trip() {
        for name in CollectionName::ALL {
            assert_eq!(name.as_str().parse::<CollectionName>(), Ok(name));
        }
    }

    #[test]
    fn unknown_name_is_rejected() {
        assert_eq!(
            "widgets".parse::<CollectionName>(),
            Err(ModelError::UnknownCollection("widgets".into()))
        );
    }
}
