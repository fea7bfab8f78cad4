//! Per-kind merge of effect entries.
//!
//! Each entry becomes a single-entry [`EffectTally`]; tallies combine with
//! [`EffectTally::merge`], which is associative and commutative (max, sum or
//! set union per field). Folding in any order yields the same tally.
//!
//! | Kind | Merge |
//! |---|---|
//! | VisionRadius | max per vision kind |
//! | SizeModifier | sum of steps |
//! | ProgressionOverride | max tier per stat |
//! | BulkCapacityBoost | sum |
//! | Proficiency, Resistance, Vulnerability, tags | sorted set union |

use std::collections::{BTreeMap, BTreeSet};

use crate::progression::ProgressionTier;
use crate::source::{EffectEntry, ProgressionStat, VisionKind};

#[derive(Clone, Debug, Default, PartialEq)]
pub struct EffectTally {
    pub night_vision: Option<f64>,
    pub dark_vision: Option<f64>,
    pub size_steps: i64,
    pub progressions: BTreeMap<ProgressionStat, ProgressionTier>,
    pub bulk_boost: i64,
    pub proficiencies: BTreeSet<String>,
    pub resistances: BTreeSet<String>,
    pub vulnerabilities: BTreeSet<String>,
    pub tags: BTreeSet<String>,
}

impl EffectTally {
    /// Tally of a single entry. Absent numbers contribute nothing.
    pub fn from_effect(effect: &EffectEntry) -> Self {
        let mut tally = Self::default();
        match effect {
            EffectEntry::VisionRadius { vision, meters } => {
                let slot = match vision {
                    VisionKind::Night => &mut tally.night_vision,
                    VisionKind::Dark => &mut tally.dark_vision,
                };
                *slot = meters.value();
            }
            EffectEntry::SizeModifier { steps } => {
                tally.size_steps = steps.whole().unwrap_or(0);
            }
            EffectEntry::ProgressionOverride { stat, tier } => {
                tally.progressions.insert(*stat, *tier);
            }
            EffectEntry::BulkCapacityBoost { amount } => {
                tally.bulk_boost = amount.whole().unwrap_or(0);
            }
            EffectEntry::Proficiency { value } => insert_label(&mut tally.proficiencies, value),
            EffectEntry::Resistance { tag } => insert_label(&mut tally.resistances, tag),
            EffectEntry::Vulnerability { tag } => insert_label(&mut tally.vulnerabilities, tag),
        }
        tally
    }

    pub fn from_tag(tag: &str) -> Self {
        let mut tally = Self::default();
        insert_label(&mut tally.tags, tag);
        tally
    }

    pub fn merge(mut self, other: Self) -> Self {
        self.night_vision = max_of(self.night_vision, other.night_vision);
        self.dark_vision = max_of(self.dark_vision, other.dark_vision);
        self.size_steps = self.size_steps.saturating_add(other.size_steps);
        self.bulk_boost = self.bulk_boost.saturating_add(other.bulk_boost);
        for (stat, tier) in other.progressions {
            self.progressions
                .entry(stat)
                .and_modify(|current| *current = (*current).max(tier))
                .or_insert(tier);
        }
        self.proficiencies.extend(other.proficiencies);
        self.resistances.extend(other.resistances);
        self.vulnerabilities.extend(other.vulnerabilities);
        self.tags.extend(other.tags);
        self
    }

    pub fn progression(&self, stat: ProgressionStat) -> Option<ProgressionTier> {
        self.progressions.get(&stat).copied()
    }
}

impl FromIterator<EffectTally> for EffectTally {
    fn from_iter<I: IntoIterator<Item = EffectTally>>(iter: I) -> Self {
        iter.into_iter().fold(Self::default(), Self::merge)
    }
}

fn max_of(a: Option<f64>, b: Option<f64>) -> Option<f64> {
    match (a, b) {
        (Some(a), Some(b)) => Some(a.max(b)),
        (a, None) => a,
        (None, b) => b,
    }
}

/// Blank labels are not labels.
fn insert_label(set: &mut BTreeSet<String>, label: &str) {
    let label = label.trim();
    if !label.is_empty() {
        set.insert(label.to_owned());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::Numeric;

    fn sample() -> Vec<EffectEntry> {
        vec![
            EffectEntry::vision(VisionKind::Night, 2.0),
            EffectEntry::vision(VisionKind::Night, 1.0),
            EffectEntry::vision(VisionKind::Dark, 0.5),
            EffectEntry::size(1),
            EffectEntry::size(-3),
            EffectEntry::size(1),
            EffectEntry::progression(ProgressionStat::Speed, ProgressionTier::Specialty),
            EffectEntry::progression(ProgressionStat::Speed, ProgressionTier::Moderate),
            EffectEntry::progression(ProgressionStat::DestinyTn, ProgressionTier::Awesome),
            EffectEntry::bulk(2),
            EffectEntry::resistance("Fire"),
            EffectEntry::resistance("fire"),
            EffectEntry::resistance("Fire"),
        ]
    }

    fn tally_of(effects: &[EffectEntry]) -> EffectTally {
        effects.iter().map(EffectTally::from_effect).collect()
    }

    #[test]
    fn merge_policies() {
        let tally = tally_of(&sample());
        assert_eq!(tally.night_vision, Some(2.0));
        assert_eq!(tally.dark_vision, Some(0.5));
        assert_eq!(tally.size_steps, -1);
        assert_eq!(tally.progression(ProgressionStat::Speed), Some(ProgressionTier::Specialty));
        assert_eq!(tally.progression(ProgressionStat::DestinyTn), Some(ProgressionTier::Awesome));
        assert_eq!(tally.progression(ProgressionStat::ToughnessTn), None);
        assert_eq!(tally.bulk_boost, 2);
        // Case is preserved, so these are two distinct resistances.
        assert_eq!(tally.resistances.iter().collect::<Vec<_>>(), vec!["Fire", "fire"]);
    }

    #[test]
    fn order_does_not_matter() {
        let forward = sample();
        let expected = tally_of(&forward);

        let mut reversed = forward.clone();
        reversed.reverse();
        assert_eq!(tally_of(&reversed), expected);

        // Every rotation of the list, as a cheap stand-in for all permutations.
        for shift in 0..forward.len() {
            let mut rotated = forward.clone();
            rotated.rotate_left(shift);
            assert_eq!(tally_of(&rotated), expected);
        }

        // Interleave odds and evens.
        let interleaved: Vec<_> = forward
            .iter()
            .step_by(2)
            .chain(forward.iter().skip(1).step_by(2))
            .cloned()
            .collect();
        assert_eq!(tally_of(&interleaved), expected);
    }

    #[test]
    fn absent_numbers_never_override() {
        let effects = vec![
            EffectEntry::vision(VisionKind::Night, 3.0),
            EffectEntry::VisionRadius {
                vision: VisionKind::Night,
                meters: Numeric::new(f64::NAN),
            },
            EffectEntry::size(Numeric::ABSENT),
            EffectEntry::bulk(Numeric::parse("lots")),
        ];
        let tally = tally_of(&effects);
        assert_eq!(tally.night_vision, Some(3.0));
        assert_eq!(tally.size_steps, 0);
        assert_eq!(tally.bulk_boost, 0);
    }

    #[test]
    fn blank_labels_are_ignored() {
        let tally = EffectTally::from_tag("  ").merge(EffectTally::from_tag("Beast"));
        assert_eq!(tally.tags.len(), 1);
    }
}
