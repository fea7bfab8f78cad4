//! Source gating: which entries are active for a character right now.
//!
//! Three rules decide activity:
//!
//! 1. **Tracks** unlock tier `T` in slot `S` once `level >= S + 1 + (T - 1) * 4`.
//!    The stagger means no two of four tracks unlock a tier on the same level.
//!    A track's own untiered entries are always active.
//! 2. **Equipment** is active when it has no placement requirement, or when its
//!    current placement equals the requirement.
//! 3. Everything else is active whenever it is assigned.
//!
//! Active sources are visited once per `id` (first active occurrence wins), so
//! a source reachable twice is never counted twice. Sources without an `id` are
//! all distinct.

use std::collections::HashSet;
use std::fmt;

use crate::character::Character;
use crate::config::RulesConfig;
use crate::error::{Diagnostic, ErrorSeverity};
use crate::source::{AbilityEntry, EffectEntry, Source, SourceKind};

/// Traceable name of the place an entry came from.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SourceLabel {
    pub name: String,
    pub tier: Option<u8>,
}

impl SourceLabel {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tier: None,
        }
    }

    pub fn tiered(name: impl Into<String>, tier: u8) -> Self {
        Self {
            name: name.into(),
            tier: Some(tier),
        }
    }
}

impl fmt::Display for SourceLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.tier {
            Some(tier) => write!(f, "{} (Tier {})", self.name, tier),
            None => f.write_str(&self.name),
        }
    }
}

/// One active grant.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Grant<'a> {
    Effect(&'a EffectEntry),
    Ability(&'a AbilityEntry),
    Tag(&'a str),
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActiveEntry<'a> {
    pub label: SourceLabel,
    pub source: &'a Source,
    pub grant: Grant<'a>,
}

/// Everything active for one character, in source order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActiveSet<'a> {
    pub entries: Vec<ActiveEntry<'a>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl<'a> ActiveSet<'a> {
    pub fn effects(&self) -> impl Iterator<Item = (&SourceLabel, &'a EffectEntry)> + '_ {
        self.entries.iter().filter_map(|entry| match entry.grant {
            Grant::Effect(effect) => Some((&entry.label, effect)),
            _ => None,
        })
    }

    pub fn abilities(&self) -> impl Iterator<Item = (&SourceLabel, &'a AbilityEntry)> + '_ {
        self.entries.iter().filter_map(|entry| match entry.grant {
            Grant::Ability(ability) => Some((&entry.label, ability)),
            _ => None,
        })
    }

    pub fn tags(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.entries.iter().filter_map(|entry| match entry.grant {
            Grant::Tag(tag) => Some(tag),
            _ => None,
        })
    }
}

/// Whether tier `tier` of a track in `slot_index` is unlocked at `level`.
pub fn tier_unlocked(slot_index: u32, tier: u8, level: u32) -> bool {
    if tier == 0 || tier > RulesConfig::MAX_TIERS {
        return false;
    }
    let required =
        u64::from(slot_index) + 1 + u64::from(tier - 1) * u64::from(RulesConfig::TIER_STRIDE);
    u64::from(level) >= required
}

/// Whether an equipment item sits where it needs to be.
pub fn placement_satisfied(source: &Source) -> bool {
    match source.required_placement.as_deref().map(str::trim) {
        None | Some("") => true,
        Some(required) => source.placement.as_deref().map(str::trim) == Some(required),
    }
}

/// Whether a source's untiered entries apply.
pub fn source_active(source: &Source) -> bool {
    match source.kind {
        SourceKind::Equipment => placement_satisfied(source),
        _ => true,
    }
}

/// Active sources, with repeats of the same non-empty `id` removed.
///
/// Inactive sources are filtered out first, so a stowed copy never shadows a
/// held one. Sources without an `id` are never merged, even when they share a
/// name.
pub fn active_sources(character: &Character) -> impl Iterator<Item = &Source> {
    let mut seen = HashSet::new();
    character.sources.iter().filter(move |source| {
        if !source_active(source) {
            tracing::debug!(
                "Source {:?} inactive: placement {:?} does not meet {:?}",
                source.name,
                source.placement,
                source.required_placement
            );
            return false;
        }
        if source.id.is_empty() || seen.insert(source.id.as_str()) {
            return true;
        }
        tracing::debug!("Skipping repeat of source {:?}", source.id);
        false
    })
}

/// Collect every active effect, ability and tag for `character`.
pub fn active_entries(character: &Character) -> ActiveSet<'_> {
    let mut active = ActiveSet::default();

    for source in active_sources(character) {
        push_entries(
            &mut active,
            source,
            SourceLabel::new(source.name.clone()),
            &source.effects,
            &source.abilities,
            &source.tags,
        );

        if source.tiers.is_empty() {
            continue;
        }
        if source.kind != SourceKind::Track {
            active.diagnostics.push(Diagnostic::new(
                ErrorSeverity::Validation,
                source.name.clone(),
                format!("{} sources have no tiers; tier entries ignored", source.kind),
            ));
            continue;
        }
        let Some(slot_index) = source.slot_index else {
            active.diagnostics.push(Diagnostic::new(
                ErrorSeverity::Validation,
                source.name.clone(),
                "track has no slot; no tiers unlocked",
            ));
            continue;
        };

        for (&tier, data) in &source.tiers {
            if tier == 0 || tier > RulesConfig::MAX_TIERS {
                active.diagnostics.push(Diagnostic::new(
                    ErrorSeverity::Validation,
                    source.name.clone(),
                    format!("tier {tier} is outside 1..={}", RulesConfig::MAX_TIERS),
                ));
                continue;
            }
            if !tier_unlocked(slot_index, tier, character.level) {
                continue;
            }
            push_entries(
                &mut active,
                source,
                SourceLabel::tiered(source.name.clone(), tier),
                &data.effects,
                &data.abilities,
                &data.tags,
            );
        }
    }

    for diagnostic in &active.diagnostics {
        tracing::warn!("{}", diagnostic);
    }
    active
}

fn push_entries<'a>(
    active: &mut ActiveSet<'a>,
    source: &'a Source,
    label: SourceLabel,
    effects: &'a [EffectEntry],
    abilities: &'a [AbilityEntry],
    tags: &'a [String],
) {
    let grants = effects
        .iter()
        .map(Grant::Effect)
        .chain(abilities.iter().map(Grant::Ability))
        .chain(tags.iter().map(|tag| Grant::Tag(tag.as_str())));

    for grant in grants {
        active.entries.push(ActiveEntry {
            label: label.clone(),
            source,
            grant,
        });
    }
}
