//! Sources: every assignable element that can carry effects and abilities.
//!
//! A source is an ancestry, foundation, track, talent, knack, equipment item
//! or universal grant. Tracks additionally carry up to five level-gated tiers;
//! equipment carries a placement that may or may not satisfy its requirement.

pub mod ability;
pub mod effect;

use std::collections::BTreeMap;

pub use ability::{AbilityEntry, ActivityKind};
pub use effect::{EffectEntry, Numeric, ProgressionStat, VisionKind};

#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
    strum::AsRefStr,
)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum SourceKind {
    Ancestry,
    Foundation,
    Track,
    Talent,
    Knack,
    Equipment,
    #[default]
    Universal,
}

/// Entries unlocked by one tier of a track.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TierData {
    pub effects: Vec<EffectEntry>,
    pub abilities: Vec<AbilityEntry>,
    /// Character tags granted while the tier is unlocked.
    pub tags: Vec<String>,
}

impl TierData {
    pub fn with_effect(mut self, effect: EffectEntry) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_ability(mut self, ability: AbilityEntry) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Source {
    /// Stable identity used for deduplication. Falls back to `name` when empty.
    pub id: String,
    pub name: String,
    pub kind: SourceKind,
    /// Track/talent slot, 0-based.
    pub slot_index: Option<u32>,
    /// Track tiers keyed 1..=5.
    pub tiers: BTreeMap<u8, TierData>,
    /// Where an equipment item currently is (e.g. "worn", "stowed").
    pub placement: Option<String>,
    /// Where an equipment item must be for its entries to apply.
    pub required_placement: Option<String>,
    pub effects: Vec<EffectEntry>,
    pub abilities: Vec<AbilityEntry>,
    /// Character tags granted unconditionally (typically by an ancestry).
    pub tags: Vec<String>,
}

impl Source {
    pub fn new(kind: SourceKind, name: impl Into<String>) -> Self {
        Self {
            kind,
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn identity(&self) -> &str {
        if self.id.is_empty() { &self.name } else { &self.id }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    pub fn in_slot(mut self, slot_index: u32) -> Self {
        self.slot_index = Some(slot_index);
        self
    }

    pub fn with_tier(mut self, tier: u8, data: TierData) -> Self {
        self.tiers.insert(tier, data);
        self
    }

    pub fn placed(mut self, placement: impl Into<String>) -> Self {
        self.placement = Some(placement.into());
        self
    }

    pub fn requiring(mut self, placement: impl Into<String>) -> Self {
        self.required_placement = Some(placement.into());
        self
    }

    pub fn with_effect(mut self, effect: EffectEntry) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_ability(mut self, ability: AbilityEntry) -> Self {
        self.abilities.push(ability);
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tags.push(tag.into());
        self
    }
}
