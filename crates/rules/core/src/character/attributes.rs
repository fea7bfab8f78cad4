//! Attributes, skills and the governor relation between them.
//!
//! Every skill is governed by an attribute floor. Raising a skill above its
//! governor's tier costs extra build points (see [`crate::progression::cost`]).

use crate::progression::ProgressionTier;

use super::Character;

/// The six attributes that define a character.
#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum Attribute {
    Brawn,
    Finesse,
    Grit,
    Wits,
    Resolve,
    Charm,
}

#[derive(
    Clone,
    Copy,
    Debug,
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
pub enum Skill {
    Athletics,
    Acrobatics,
    Stealth,
    Endurance,
    Lore,
    Investigation,
    Crafting,
    Perception,
    Survival,
    Persuasion,
    Deception,
    Intimidation,
    Insight,
}

/// What sets the cost floor of a skill.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkillGovernor {
    Attribute(Attribute),
    /// The better of two attributes.
    BestOf(Attribute, Attribute),
    /// Uses another skill's governor.
    Mirror(Skill),
}

impl Skill {
    pub const fn governor(self) -> SkillGovernor {
        use Attribute::*;
        match self {
            Skill::Athletics => SkillGovernor::Attribute(Brawn),
            Skill::Acrobatics | Skill::Stealth => SkillGovernor::Attribute(Finesse),
            Skill::Endurance => SkillGovernor::Attribute(Grit),
            Skill::Lore | Skill::Investigation | Skill::Crafting => {
                SkillGovernor::Attribute(Wits)
            }
            Skill::Perception => SkillGovernor::BestOf(Wits, Resolve),
            Skill::Survival => SkillGovernor::Attribute(Resolve),
            Skill::Persuasion | Skill::Deception => SkillGovernor::Attribute(Charm),
            Skill::Intimidation => SkillGovernor::BestOf(Brawn, Charm),
            Skill::Insight => SkillGovernor::Mirror(Skill::Perception),
        }
    }

    /// Tier of the attribute floor governing this skill for `character`.
    pub fn governing_tier(self, character: &Character) -> ProgressionTier {
        match self.governor() {
            SkillGovernor::Attribute(attribute) => character.attribute_tier(attribute),
            SkillGovernor::BestOf(a, b) => {
                character.attribute_tier(a).max(character.attribute_tier(b))
            }
            // Mirrors only ever point at non-mirroring skills.
            SkillGovernor::Mirror(skill) => match skill.governor() {
                SkillGovernor::Mirror(_) => ProgressionTier::Mediocre,
                _ => skill.governing_tier(character),
            },
        }
    }
}
