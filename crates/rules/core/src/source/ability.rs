//! Abilities granted by sources.

use std::str::FromStr;

/// How an ability is used at the table. Each kind is a display bucket.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::EnumString,
    strum::EnumIter,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "camelCase"))]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum ActivityKind {
    Passive,
    ExoticSense,
    DominantAction,
    SwiftAction,
    Reaction,
    Free,
    Strike,
    Journey,
    Miscellaneous,
}

impl ActivityKind {
    pub const COUNT: usize = 9;

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Passive => "passive",
            Self::ExoticSense => "exoticSense",
            Self::DominantAction => "dominantAction",
            Self::SwiftAction => "swiftAction",
            Self::Reaction => "reaction",
            Self::Free => "free",
            Self::Strike => "strike",
            Self::Journey => "journey",
            Self::Miscellaneous => "miscellaneous",
        }
    }

    /// Parse a host label. Accepts `dominantAction`, `dominant_action`,
    /// `Dominant Action` and similar spellings.
    pub fn parse_label(label: &str) -> Result<Self, strum::ParseError> {
        let folded: String = label
            .chars()
            .filter(|c| !matches!(c, '_' | '-' | ' '))
            .collect();
        Self::from_str(&folded)
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An ability granted by a source.
///
/// `activity` is kept as the raw host label so records with an unknown kind
/// still load; the catalog drops them with a diagnostic.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AbilityEntry {
    pub name: String,
    pub activity: String,
    pub tags: String,
    pub description: String,
}

impl AbilityEntry {
    pub fn new(name: impl Into<String>, activity: ActivityKind) -> Self {
        Self {
            name: name.into(),
            activity: activity.as_str().to_owned(),
            ..Self::default()
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_tags(mut self, tags: impl Into<String>) -> Self {
        self.tags = tags.into();
        self
    }

    pub fn activity_kind(&self) -> Result<ActivityKind, strum::ParseError> {
        ActivityKind::parse_label(&self.activity)
    }
}
