//! The character record consumed by every computation.
//!
//! Characters are owned by the host document layer. The core only ever reads
//! them: each derivation is a pure function of the current record.

pub mod attributes;
pub mod size;

use std::collections::BTreeMap;

pub use attributes::{Attribute, Skill, SkillGovernor};
pub use size::SizeTier;

use crate::progression::ProgressionTier;
use crate::source::Source;

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Character {
    pub name: String,
    pub level: u32,
    /// Counts as one extra level for the progression bonus table.
    pub progression_boost: bool,
    /// Currency score. Only [`crate::wealth::WealthLedger`] changes it.
    pub currency: u32,
    pub base_size: SizeTier,
    /// Unlisted attributes sit at moderate.
    pub attributes: BTreeMap<Attribute, ProgressionTier>,
    /// Unlisted skills sit at mediocre.
    pub skills: BTreeMap<Skill, ProgressionTier>,
    pub sources: Vec<Source>,
    pub vitality_formula: Option<String>,
    pub coast_formula: Option<String>,
}

impl Character {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
            ..Self::default()
        }
    }

    pub fn attribute_tier(&self, attribute: Attribute) -> ProgressionTier {
        self.attributes
            .get(&attribute)
            .copied()
            .unwrap_or(ProgressionTier::Moderate)
    }

    pub fn skill_tier(&self, skill: Skill) -> ProgressionTier {
        self.skills
            .get(&skill)
            .copied()
            .unwrap_or(ProgressionTier::Mediocre)
    }

    /// Level used for the bonus table (`level + 1` with the boost flag).
    pub fn total_level(&self) -> u32 {
        self.level.saturating_add(u32::from(self.progression_boost))
    }

    pub fn with_source(mut self, source: Source) -> Self {
        self.sources.push(source);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn total_level_counts_the_boost() {
        let mut character = Character::new("Ada", 4);
        assert_eq!(character.total_level(), 4);
        character.progression_boost = true;
        assert_eq!(character.total_level(), 5);
    }

    #[test]
    fn total_level_saturates() {
        let mut character = Character::new("Ada", u32::MAX);
        character.progression_boost = true;
        assert_eq!(character.total_level(), u32::MAX);
    }
}
