//! Data-driven character sheets, source compendiums and rules configuration.
//!
//! This crate provides loaders for RON/TOML data files:
//! - Character sheets (RON), with sources inline or referenced by id
//! - Source compendiums (RON)
//! - Rules configuration (TOML)
//!
//! All loaders use rules-core types directly with serde for deserialization.

pub mod loaders;

pub use loaders::{
    CatalogLoader, CharacterLoader, CharacterSheet, ConfigLoader, LoadResult, SourceCatalog,
    SourceRef, SourceSpec,
};
