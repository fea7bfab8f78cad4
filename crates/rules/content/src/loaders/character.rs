//! Character sheet loader.
//!
//! A sheet lists its sources either inline or by compendium id. Referenced
//! sources may override where they sit (track slot, equipment placement)
//! without copying the whole definition.

use std::collections::BTreeMap;
use std::path::Path;

use rules_core::{Attribute, Character, ProgressionTier, SizeTier, Skill, Source};
use serde::{Deserialize, Serialize};

use crate::loaders::{LoadResult, SourceCatalog, read_file};

/// A compendium source plus per-character overrides.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceRef {
    pub id: String,
    pub slot_index: Option<u32>,
    pub placement: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SourceSpec {
    Inline(Source),
    Reference(SourceRef),
}

/// Character sheet structure for RON files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterSheet {
    pub name: String,
    pub level: u32,
    pub progression_boost: bool,
    pub currency: u32,
    pub base_size: SizeTier,
    pub attributes: BTreeMap<Attribute, ProgressionTier>,
    pub skills: BTreeMap<Skill, ProgressionTier>,
    pub sources: Vec<SourceSpec>,
    pub vitality_formula: Option<String>,
    pub coast_formula: Option<String>,
}

impl CharacterSheet {
    /// Build the character, pulling referenced sources from `catalog`.
    ///
    /// An unknown reference is an error: silently dropping a source would
    /// change derived stats without telling anyone.
    pub fn resolve(self, catalog: &SourceCatalog) -> LoadResult<Character> {
        let sources = self
            .sources
            .into_iter()
            .map(|spec| match spec {
                SourceSpec::Inline(source) => Ok(source),
                SourceSpec::Reference(reference) => {
                    let mut source = catalog.get(&reference.id).cloned().ok_or_else(|| {
                        anyhow::anyhow!(
                            "Sheet {:?} references unknown source {:?}",
                            self.name,
                            reference.id
                        )
                    })?;
                    if reference.slot_index.is_some() {
                        source.slot_index = reference.slot_index;
                    }
                    if reference.placement.is_some() {
                        source.placement = reference.placement;
                    }
                    Ok(source)
                }
            })
            .collect::<LoadResult<Vec<_>>>()?;

        Ok(Character {
            name: self.name,
            level: self.level,
            progression_boost: self.progression_boost,
            currency: self.currency,
            base_size: self.base_size,
            attributes: self.attributes,
            skills: self.skills,
            sources,
            vitality_formula: self.vitality_formula,
            coast_formula: self.coast_formula,
        })
    }
}

/// Loader for character sheets from RON files.
pub struct CharacterLoader;

impl CharacterLoader {
    pub fn load(path: &Path) -> LoadResult<CharacterSheet> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> LoadResult<CharacterSheet> {
        ron::from_str(content)
            .map_err(|e| anyhow::anyhow!("Failed to parse character sheet RON: {}", e))
    }

    /// Load a sheet and resolve its references against `catalog`.
    pub fn load_character(path: &Path, catalog: &SourceCatalog) -> LoadResult<Character> {
        let sheet = Self::load(path)?;
        let character = sheet.resolve(catalog)?;
        tracing::info!(
            "Loaded character {:?} (level {}, {} sources)",
            character.name,
            character.level,
            character.sources.len()
        );
        Ok(character)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use rules_core::{RulesConfig, SourceKind, derive_stats};

    use super::*;
    use crate::loaders::CatalogLoader;

    const COMPENDIUM: &str = r#"(
        sources: [
            (
                id: "track.pathfinder",
                name: "Pathfinder",
                kind: track,
                tiers: {
                    2: (effects: [VisionRadius(vision: night, meters: 2.0)]),
                },
            ),
            (
                id: "gear.goggles",
                name: "Dusk Goggles",
                kind: equipment,
                required_placement: Some("worn"),
                placement: Some("worn"),
                effects: [VisionRadius(vision: dark, meters: 3.0)],
            ),
        ],
    )"#;

    const SHEET: &str = r#"(
        name: "Wren",
        level: 5,
        currency: 4,
        skills: { athletics: specialty },
        sources: [
            Inline((
                name: "Duskborn",
                kind: ancestry,
                effects: [VisionRadius(vision: night, meters: 1.0)],
            )),
            Reference((id: "track.pathfinder", slot_index: Some(0))),
            Reference((id: "gear.goggles", placement: Some("stowed"))),
        ],
    )"#;

    fn write(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn sheet_resolves_references_with_overrides() {
        let catalog = CatalogLoader::load(write(COMPENDIUM).path()).unwrap();
        let character = CharacterLoader::load_character(write(SHEET).path(), &catalog).unwrap();

        assert_eq!(character.sources.len(), 3);
        assert_eq!(character.sources[1].kind, SourceKind::Track);
        assert_eq!(character.sources[1].slot_index, Some(0));
        assert_eq!(character.sources[2].placement.as_deref(), Some("stowed"));
        assert_eq!(character.skill_tier(Skill::Athletics), ProgressionTier::Specialty);

        let stats = derive_stats(&character, &RulesConfig::default());
        assert_eq!(stats.night_vision, 2.0);
        // Goggles are stowed in this sheet.
        assert_eq!(stats.dark_vision, 0.2);
    }

    #[test]
    fn unknown_reference_is_an_error() {
        let sheet = CharacterLoader::parse(r#"(sources: [Reference((id: "nope"))])"#).unwrap();
        let error = sheet.resolve(&SourceCatalog::default()).unwrap_err();
        assert!(error.to_string().contains("nope"));
    }

    #[test]
    fn inline_only_sheet_needs_no_compendium() {
        let sheet = CharacterLoader::parse(r#"(name: "Solo", level: 2)"#).unwrap();
        let character = sheet.resolve(&SourceCatalog::default()).unwrap();
        assert_eq!(character.name, "Solo");
        assert!(character.sources.is_empty());
    }
}
