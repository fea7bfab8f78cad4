//! Progression tiers and the level-scaled bonus table.
//!
//! Every progression (attribute, skill, speed, toughness, destiny) sits on one
//! of four tiers. The tier picks a column of the bonus table, and the table
//! grows with the character's total level:
//!
//! ```text
//! mediocre  = floor(0.6 × L − 0.3)
//! moderate  = floor(0.8 × L)
//! specialty = floor(1.0 × L)
//! awesome   = floor(1.2 × L + 0.8001)
//! ```
//!
//! The formulas are evaluated in exact integer arithmetic (tenths and
//! ten-thousandths) so no level ever lands on the wrong side of a floor.

pub mod cost;

pub use cost::{BuildPoints, attribute_cost, build_points, skill_cost};

/// Progression tier, ordered by rank.
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
pub enum ProgressionTier {
    #[default]
    Mediocre,
    Moderate,
    Specialty,
    Awesome,
}

impl ProgressionTier {
    pub const fn rank(self) -> i32 {
        match self {
            Self::Mediocre => 0,
            Self::Moderate => 1,
            Self::Specialty => 2,
            Self::Awesome => 3,
        }
    }
}

/// Bonus per tier at a given total level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BonusTable {
    pub mediocre: i32,
    pub moderate: i32,
    pub specialty: i32,
    pub awesome: i32,
}

impl BonusTable {
    /// Table for `level`, counting the progression boost as one extra level.
    pub fn for_level(level: u32, progression_boost: bool) -> Self {
        let total = i64::from(level) + i64::from(progression_boost);
        Self {
            mediocre: floor_ratio(6 * total - 3, 10),
            moderate: floor_ratio(8 * total, 10),
            specialty: floor_ratio(total, 1),
            awesome: floor_ratio(12_000 * total + 8_001, 10_000),
        }
    }

    pub const fn get(&self, tier: ProgressionTier) -> i32 {
        match tier {
            ProgressionTier::Mediocre => self.mediocre,
            ProgressionTier::Moderate => self.moderate,
            ProgressionTier::Specialty => self.specialty,
            ProgressionTier::Awesome => self.awesome,
        }
    }

    /// Target number for a defence on `tier`.
    pub const fn target_number(&self, tier: ProgressionTier) -> i32 {
        crate::config::RulesConfig::TARGET_NUMBER_BASE + self.get(tier)
    }
}

fn floor_ratio(numerator: i64, denominator: i64) -> i32 {
    numerator
        .div_euclid(denominator)
        .clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    fn float_reference(level: u32) -> BonusTable {
        let l = f64::from(level);
        BonusTable {
            mediocre: (0.6 * l - 0.3).floor() as i32,
            moderate: (0.8 * l).floor() as i32,
            specialty: l.floor() as i32,
            awesome: (1.2 * l + 0.8001).floor() as i32,
        }
    }

    #[test]
    fn level_five_table() {
        let table = BonusTable::for_level(5, false);
        assert_eq!(
            table,
            BonusTable {
                mediocre: 2,
                moderate: 4,
                specialty: 5,
                awesome: 6
            }
        );
    }

    #[test]
    fn level_zero_mediocre_is_negative() {
        let table = BonusTable::for_level(0, false);
        assert_eq!(table.mediocre, -1);
        assert_eq!(table.moderate, 0);
        assert_eq!(table.awesome, 0);
    }

    #[test]
    fn boost_counts_as_one_level() {
        assert_eq!(BonusTable::for_level(4, true), BonusTable::for_level(5, false));
    }

    #[test]
    fn integer_table_matches_float_formulas() {
        for level in 0..=40 {
            assert_eq!(
                BonusTable::for_level(level, false),
                float_reference(level),
                "level {level}"
            );
        }
    }

    #[test]
    fn tiers_never_invert() {
        for level in 0..=40 {
            let table = BonusTable::for_level(level, false);
            assert!(table.mediocre <= table.moderate);
            assert!(table.moderate <= table.specialty);
            assert!(table.specialty <= table.awesome);
        }
    }

    #[test]
    fn target_numbers_add_base_six() {
        let table = BonusTable::for_level(5, false);
        assert_eq!(table.target_number(ProgressionTier::Mediocre), 8);
        assert_eq!(table.target_number(ProgressionTier::Moderate), 10);
    }
}
