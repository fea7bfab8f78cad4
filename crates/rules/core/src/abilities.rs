//! Ability catalog: active abilities bucketed by activity kind.
//!
//! Every bucket is present in the output, empty or not, so hosts can render a
//! fixed layout. Abilities with an activity label we do not know are dropped
//! with a diagnostic.

use std::collections::BTreeMap;

use strum::IntoEnumIterator;

use crate::character::Character;
use crate::error::{Diagnostic, ErrorSeverity};
use crate::gate::{self, ActiveSet, SourceLabel};
use crate::source::{AbilityEntry, ActivityKind};

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CatalogEntry {
    pub ability: AbilityEntry,
    pub source: SourceLabel,
    /// Identity of the granting source.
    pub source_id: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AbilityCatalog {
    pub buckets: BTreeMap<ActivityKind, Vec<CatalogEntry>>,
    pub diagnostics: Vec<Diagnostic>,
}

impl Default for AbilityCatalog {
    fn default() -> Self {
        Self {
            buckets: ActivityKind::iter().map(|kind| (kind, Vec::new())).collect(),
            diagnostics: Vec::new(),
        }
    }
}

impl AbilityCatalog {
    pub fn bucket(&self, kind: ActivityKind) -> &[CatalogEntry] {
        self.buckets.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    /// Total abilities across all buckets.
    pub fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (ActivityKind, &CatalogEntry)> {
        self.buckets
            .iter()
            .flat_map(|(kind, entries)| entries.iter().map(move |entry| (*kind, entry)))
    }
}

/// Bucket every active ability of `character`.
pub fn categorize(character: &Character) -> AbilityCatalog {
    categorize_active(&gate::active_entries(character))
}

/// Bucket abilities from an already gated entry set.
///
/// Repeats of a source `id` are already dropped (see [`gate::active_sources`]),
/// so each identified source's abilities appear once.
pub fn categorize_active(active: &ActiveSet<'_>) -> AbilityCatalog {
    let mut catalog = AbilityCatalog::default();

    for entry in &active.entries {
        let gate::Grant::Ability(ability) = entry.grant else {
            continue;
        };
        match ability.activity_kind() {
            Ok(kind) => catalog.buckets.entry(kind).or_default().push(CatalogEntry {
                ability: ability.clone(),
                source: entry.label.clone(),
                source_id: entry.source.identity().to_owned(),
            }),
            Err(_) => {
                tracing::warn!(
                    "Dropping ability {:?} from {}: unknown activity kind {:?}",
                    ability.name,
                    entry.label,
                    ability.activity
                );
                catalog.diagnostics.push(Diagnostic::new(
                    ErrorSeverity::Validation,
                    entry.label.to_string(),
                    format!(
                        "ability {:?} has unknown activity kind {:?}",
                        ability.name, ability.activity
                    ),
                ));
            }
        }
    }

    catalog
}
