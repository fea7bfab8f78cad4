//! Deterministic rules math for a d12 tabletop ruleset.
//!
//! `rules-core` turns a [`Character`] and the sources it carries into derived
//! statistics, a categorized ability catalog, dice outcomes and currency
//! transactions. Everything here is a pure function of its inputs plus an
//! explicit [`DicePool`]; no I/O happens in this crate. Hosts recompute a
//! [`DerivedStats`] snapshot whenever any input changes.
pub mod abilities;
pub mod character;
pub mod config;
pub mod dice;
pub mod error;
pub mod formula;
pub mod gate;
pub mod progression;
pub mod source;
pub mod stats;
pub mod wealth;
pub use abilities::{AbilityCatalog, CatalogEntry, categorize};
pub use character::{Attribute, Character, SizeTier, Skill, SkillGovernor};
pub use config::RulesConfig;
pub use dice::{
    DiceEngine, DiceError, DicePool, DiceRow, FairRollSequencer, PcgRng, RngOracle, RollRequest,
    RollResult, ScriptedDice, SeededDice,
};
pub use error::{Diagnostic, ErrorSeverity, RulesError};
pub use formula::{CharacterScope, Formula, FormulaError, Scope};
pub use gate::{ActiveEntry, ActiveSet, Grant, SourceLabel, active_entries};
pub use progression::{BonusTable, BuildPoints, ProgressionTier, build_points};
pub use source::{
    AbilityEntry, ActivityKind, EffectEntry, Numeric, ProgressionStat, Source, SourceKind,
    TierData, VisionKind,
};
pub use stats::{DerivedStats, EffectTally, ProgressionValue, TargetNumber, derive_stats};
pub use wealth::{
    BatchOutcome, Direction, ItemOutcome, PurchaseItem, TransactionOutcome, TransactionRequest,
    WealthError, WealthLedger,
};
