//! Derived character statistics.
//!
//! # Pipeline
//!
//! ```text
//! [ Character + Sources ]
//!      ↓  gate::active_entries
//! [ Active entries ]
//!      ↓  EffectTally fold (order independent)
//! [ Tally ]
//!      ↓  bonus table, size ladder, bulk table, formulas
//! [ DerivedStats ]
//! ```
//!
//! Nothing here is stored. Hosts recompute on every relevant change; the same
//! character always yields the same snapshot.

pub mod tally;

pub use tally::EffectTally;

use crate::character::{Character, SizeTier, Skill};
use crate::config::RulesConfig;
use crate::error::{Diagnostic, ErrorSeverity};
use crate::formula::{CharacterScope, Formula};
use crate::gate::{self, ActiveSet};
use crate::progression::{BonusTable, BuildPoints, ProgressionTier, build_points};
use crate::source::ProgressionStat;

/// A progression that has a tier and the bonus it grants.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ProgressionValue {
    pub tier: ProgressionTier,
    pub bonus: i32,
}

/// A defence expressed as a target number (`6 + bonus`).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TargetNumber {
    pub tier: ProgressionTier,
    pub target: i32,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DerivedStats {
    pub level: u32,
    pub total_level: u32,
    pub bonus_table: BonusTable,
    pub size: SizeTier,
    pub size_steps: i64,
    /// Meters.
    pub night_vision: f64,
    /// Meters.
    pub dark_vision: f64,
    /// Only present when some source grants a speed progression.
    pub speed: Option<ProgressionValue>,
    pub toughness: TargetNumber,
    pub destiny: TargetNumber,
    pub bulk_capacity: i64,
    pub proficiencies: Vec<String>,
    pub resistances: Vec<String>,
    pub vulnerabilities: Vec<String>,
    pub tags: Vec<String>,
    pub build_points: BuildPoints,
    pub vitality: i64,
    pub coast_number: i64,
    pub diagnostics: Vec<Diagnostic>,
}

impl DerivedStats {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Bulk the athletics skill adds on top of the frame.
pub const fn athletics_bulk(tier: ProgressionTier) -> i64 {
    match tier {
        ProgressionTier::Mediocre => 0,
        ProgressionTier::Moderate => 2,
        ProgressionTier::Specialty => 4,
        ProgressionTier::Awesome => 6,
    }
}

/// Compute the full derived snapshot for `character`.
pub fn derive_stats(character: &Character, config: &RulesConfig) -> DerivedStats {
    let active = gate::active_entries(character);
    derive_from_active(character, &active, config)
}

/// Compute derived stats from an already gated entry set.
pub fn derive_from_active(
    character: &Character,
    active: &ActiveSet<'_>,
    config: &RulesConfig,
) -> DerivedStats {
    let mut diagnostics = active.diagnostics.clone();

    for (label, effect) in active.effects() {
        if effect.malformed_number().is_some() {
            tracing::warn!("Ignoring malformed number on {:?} from {}", effect, label);
            diagnostics.push(Diagnostic::new(
                ErrorSeverity::Validation,
                label.to_string(),
                "effect value is not a finite number; ignored",
            ));
        }
    }

    let tally: EffectTally = active
        .effects()
        .map(|(_, effect)| EffectTally::from_effect(effect))
        .chain(active.tags().map(EffectTally::from_tag))
        .collect();

    let table = BonusTable::for_level(character.level, character.progression_boost);
    let size = character.base_size.shifted(tally.size_steps);

    let toughness_tier = tally
        .progression(ProgressionStat::ToughnessTn)
        .unwrap_or(ProgressionTier::Mediocre);
    let destiny_tier = tally
        .progression(ProgressionStat::DestinyTn)
        .unwrap_or(ProgressionTier::Moderate);
    let speed = tally
        .progression(ProgressionStat::Speed)
        .map(|tier| ProgressionValue {
            tier,
            bonus: table.get(tier),
        });

    let bulk_capacity = size
        .base_bulk()
        .saturating_add(athletics_bulk(character.skill_tier(Skill::Athletics)))
        .saturating_add(tally.bulk_boost)
        .max(0);

    let mut tags: Vec<String> = tally.tags.into_iter().collect();
    if tags.is_empty() {
        tags.push(config.default_tag.clone());
    }

    let scope = CharacterScope::new(character, table);
    let vitality = custom_number(
        "vitality",
        character.vitality_formula.as_deref(),
        &config.vitality_formula,
        &scope,
        &mut diagnostics,
    );
    let coast_number = custom_number(
        "coast number",
        character.coast_formula.as_deref(),
        &config.coast_formula,
        &scope,
        &mut diagnostics,
    );

    DerivedStats {
        level: character.level,
        total_level: character.total_level(),
        bonus_table: table,
        size,
        size_steps: tally.size_steps,
        night_vision: tally.night_vision.map_or(config.night_vision_floor, |v| {
            v.max(config.night_vision_floor)
        }),
        dark_vision: tally.dark_vision.map_or(config.dark_vision_floor, |v| {
            v.max(config.dark_vision_floor)
        }),
        speed,
        toughness: TargetNumber {
            tier: toughness_tier,
            target: table.target_number(toughness_tier),
        },
        destiny: TargetNumber {
            tier: destiny_tier,
            target: table.target_number(destiny_tier),
        },
        bulk_capacity,
        proficiencies: tally.proficiencies.into_iter().collect(),
        resistances: tally.resistances.into_iter().collect(),
        vulnerabilities: tally.vulnerabilities.into_iter().collect(),
        tags,
        build_points: build_points(character),
        vitality,
        coast_number,
        diagnostics,
    }
}

/// Evaluate a user formula, falling back to the ruleset default on any error.
fn custom_number(
    name: &str,
    custom: Option<&str>,
    default: &str,
    scope: &CharacterScope<'_>,
    diagnostics: &mut Vec<Diagnostic>,
) -> i64 {
    let origin = format!("{name} formula");

    if let Some(text) = custom.filter(|text| !text.trim().is_empty()) {
        match Formula::parse(text).and_then(|formula| formula.evaluate(scope)) {
            Ok(value) => return value.floor() as i64,
            Err(error) => {
                tracing::warn!(
                    "Custom {} formula {:?} failed: {}; using default",
                    name,
                    text,
                    error
                );
                diagnostics.push(Diagnostic::from_error(origin.clone(), &error));
            }
        }
    }

    match Formula::parse(default).and_then(|formula| formula.evaluate(scope)) {
        Ok(value) => value.floor() as i64,
        Err(error) => {
            tracing::warn!("Default {} formula {:?} failed: {}", name, default, error);
            diagnostics.push(Diagnostic::from_error(origin, &error));
            0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::character::Attribute;
    use crate::source::{EffectEntry, Source, SourceKind, TierData, VisionKind};

    fn config() -> RulesConfig {
        RulesConfig::default()
    }

    #[test]
    fn bare_character_gets_defaults() {
        let stats = derive_stats(&Character::new("Ada", 0), &config());
        assert_eq!(stats.night_vision, 1.0);
        assert_eq!(stats.dark_vision, 0.2);
        assert_eq!(stats.size, SizeTier::Medium);
        assert_eq!(stats.speed, None);
        assert_eq!(stats.toughness.tier, ProgressionTier::Mediocre);
        assert_eq!(stats.destiny.tier, ProgressionTier::Moderate);
        // Level 0: mediocre bonus is -1, moderate is 0.
        assert_eq!(stats.toughness.target, 5);
        assert_eq!(stats.destiny.target, 6);
        assert_eq!(stats.tags, vec!["Humanoid".to_owned()]);
        assert_eq!(stats.bulk_capacity, 6);
        assert!(stats.diagnostics.is_empty());
    }

    #[test]
    fn vision_floors_hold_against_smaller_grants() {
        let character = Character::default().with_source(
            Source::new(SourceKind::Ancestry, "Mole")
                .with_effect(EffectEntry::vision(VisionKind::Night, 0.5))
                .with_effect(EffectEntry::vision(VisionKind::Dark, 4.0)),
        );
        let stats = derive_stats(&character, &config());
        assert_eq!(stats.night_vision, 1.0);
        assert_eq!(stats.dark_vision, 4.0);
    }

    #[test]
    fn progression_overrides_feed_target_numbers() {
        let character = Character::new("Ada", 5).with_source(
            Source::new(SourceKind::Foundation, "Sentinel")
                .with_effect(EffectEntry::progression(
                    ProgressionStat::ToughnessTn,
                    ProgressionTier::Specialty,
                ))
                .with_effect(EffectEntry::progression(
                    ProgressionStat::Speed,
                    ProgressionTier::Awesome,
                )),
        );
        let stats = derive_stats(&character, &config());
        assert_eq!(stats.toughness.target, 6 + 5);
        assert_eq!(stats.destiny.target, 6 + 4);
        assert_eq!(
            stats.speed,
            Some(ProgressionValue {
                tier: ProgressionTier::Awesome,
                bonus: 6
            })
        );
    }

    #[test]
    fn lower_unlocked_tiers_stay_in_the_pool() {
        let track = Source::new(SourceKind::Track, "Guardian")
            .in_slot(0)
            .with_tier(
                1,
                TierData::default().with_effect(EffectEntry::progression(
                    ProgressionStat::DestinyTn,
                    ProgressionTier::Awesome,
                )),
            )
            .with_tier(
                2,
                TierData::default().with_effect(EffectEntry::progression(
                    ProgressionStat::DestinyTn,
                    ProgressionTier::Specialty,
                )),
            );
        let stats = derive_stats(&Character::new("Ada", 9).with_source(track), &config());
        assert_eq!(stats.destiny.tier, ProgressionTier::Awesome);
    }

    #[test]
    fn size_and_bulk_combine() {
        let mut character = Character::default()
            .with_source(
                Source::new(SourceKind::Ancestry, "Ogrekin").with_effect(EffectEntry::size(2)),
            )
            .with_source(
                Source::new(SourceKind::Equipment, "Pack")
                    .requiring("worn")
                    .placed("worn")
                    .with_effect(EffectEntry::bulk(3)),
            );
        character.skills.insert(Skill::Athletics, ProgressionTier::Specialty);

        let stats = derive_stats(&character, &config());
        assert_eq!(stats.size, SizeTier::Huge);
        assert_eq!(stats.bulk_capacity, 12 + 4 + 3);
    }

    #[test]
    fn bulk_capacity_never_negative() {
        let character = Character {
            base_size: SizeTier::Diminutive,
            ..Character::default()
        }
        .with_source(
            Source::new(SourceKind::Knack, "Burdened").with_effect(EffectEntry::bulk(-10)),
        );
        assert_eq!(derive_stats(&character, &config()).bulk_capacity, 0);
    }

    #[test]
    fn huge_bulk_boost_saturates() {
        let mut character = Character::new("Atlas", 1).with_source(
            Source::new(SourceKind::Knack, "Bottomless").with_effect(EffectEntry::bulk(1e30)),
        );
        character.skills.insert(Skill::Athletics, ProgressionTier::Awesome);
        assert_eq!(derive_stats(&character, &config()).bulk_capacity, i64::MAX);

        let character = Character::new("Ant", 1).with_source(
            Source::new(SourceKind::Knack, "Crushing").with_effect(EffectEntry::bulk(-1e30)),
        );
        assert_eq!(derive_stats(&character, &config()).bulk_capacity, 0);
    }

    #[test]
    fn tags_replace_the_default() {
        let character = Character::default()
            .with_source(Source::new(SourceKind::Ancestry, "Hound").with_tag("Beast"));
        let stats = derive_stats(&character, &config());
        assert_eq!(stats.tags, vec!["Beast".to_owned()]);
        assert!(!stats.has_tag("Humanoid"));
    }

    #[test]
    fn default_formulas_use_character_scope() {
        let mut character = Character::new("Ada", 8);
        character.attributes.insert(Attribute::Grit, ProgressionTier::Awesome);
        let stats = derive_stats(&character, &config());
        // 10 + level + awesome bonus at level 8 (floor(10.4001) = 10).
        assert_eq!(stats.vitality, 28);
        assert_eq!(stats.coast_number, 6);
    }

    #[test]
    fn broken_formula_falls_back_and_reports() {
        let mut character = Character::new("Ada", 4);
        character.vitality_formula = Some("level / (grit - grit)".into());
        character.coast_formula = Some("luck * 2".into());

        let stats = derive_stats(&character, &config());
        let table = BonusTable::for_level(4, false);
        assert_eq!(stats.vitality, 10 + 4 + i64::from(table.moderate));
        assert_eq!(stats.coast_number, 5);
        assert_eq!(stats.diagnostics.len(), 2);
    }

    #[test]
    fn custom_formula_wins_when_valid() {
        let mut character = Character::new("Ada", 4);
        character.vitality_formula = Some("max(20, level * 3)".into());
        assert_eq!(derive_stats(&character, &config()).vitality, 20);
    }

    #[test]
    fn malformed_numbers_are_reported_not_applied() {
        let character = Character::default().with_source(
            Source::new(SourceKind::Talent, "Odd")
                .with_effect(EffectEntry::vision(VisionKind::Night, f64::NAN)),
        );
        let stats = derive_stats(&character, &config());
        assert_eq!(stats.night_vision, 1.0);
        assert_eq!(stats.diagnostics.len(), 1);
        assert_eq!(stats.diagnostics[0].origin, "Odd");
    }

    #[test]
    fn derivation_is_idempotent() {
        let elf = Source::new(SourceKind::Ancestry, "Elf")
            .with_effect(EffectEntry::vision(VisionKind::Night, 9.0));
        let character = Character::new("Ada", 6).with_source(elf);
        assert_eq!(derive_stats(&character, &config()), derive_stats(&character, &config()));
    }
}
