//! Build-point costs.
//!
//! Attributes have a flat cost per tier. Skills cost their base tier price
//! plus one point for every rank they sit above their governing attribute.

use strum::IntoEnumIterator;

use super::ProgressionTier;
use crate::character::{Attribute, Character, Skill};

pub const fn attribute_cost(tier: ProgressionTier) -> i32 {
    match tier {
        ProgressionTier::Mediocre => -5,
        ProgressionTier::Moderate => 0,
        ProgressionTier::Specialty => 4,
        ProgressionTier::Awesome => 8,
    }
}

const fn skill_base_cost(tier: ProgressionTier) -> i32 {
    match tier {
        ProgressionTier::Mediocre => 0,
        ProgressionTier::Moderate => 1,
        ProgressionTier::Specialty => 2,
        ProgressionTier::Awesome => 3,
    }
}

pub fn skill_cost(tier: ProgressionTier, governing: ProgressionTier) -> i32 {
    skill_base_cost(tier) + (tier.rank() - governing.rank()).max(0)
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BuildPoints {
    pub attributes: i32,
    pub skills: i32,
    pub total: i32,
}

pub fn build_points(character: &Character) -> BuildPoints {
    let attributes: i32 = Attribute::iter()
        .map(|attribute| attribute_cost(character.attribute_tier(attribute)))
        .sum();
    let skills: i32 = Skill::iter()
        .map(|skill| skill_cost(character.skill_tier(skill), skill.governing_tier(character)))
        .sum();

    BuildPoints {
        attributes,
        skills,
        total: attributes + skills,
    }
}
