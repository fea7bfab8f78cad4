//! Subcommand implementations. Each returns a serializable result; `main`
//! prints it.

use std::path::Path;
use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::{Context, Result, anyhow};
use rules_content::{CatalogLoader, CharacterLoader, ConfigLoader, SourceCatalog};
use rules_core::dice::roll::resolve as resolve_faces;
use rules_core::{
    AbilityCatalog, BatchOutcome, Character, DerivedStats, DiceEngine, DicePool, Direction,
    FairRollSequencer, PurchaseItem, RollRequest, RollResult, RulesConfig, SeededDice,
    TransactionOutcome, TransactionRequest, WealthLedger, categorize, derive_stats,
};
use serde::Serialize;

/// Actor id used for every seeded roll made from the command line.
const CLI_ACTOR: u32 = 0;

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let text = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{text}");
    Ok(())
}

pub fn derive(sheet: &Path, config: Option<&Path>, sources: Option<&Path>) -> Result<DerivedStats> {
    let config = match config {
        Some(path) => ConfigLoader::load(path)?,
        None => RulesConfig::default(),
    };
    let character = load_character(sheet, sources)?;
    let stats = derive_stats(&character, &config);
    report_diagnostics(&stats.diagnostics);
    Ok(stats)
}

pub fn abilities(sheet: &Path, sources: Option<&Path>) -> Result<AbilityCatalog> {
    let character = load_character(sheet, sources)?;
    let catalog = categorize(&character);
    report_diagnostics(&catalog.diagnostics);
    Ok(catalog)
}

pub fn roll(
    boosts: i32,
    modifier: i32,
    seed: Option<u64>,
    label: Option<String>,
    faces: &[u8],
) -> Result<RollResult> {
    let request = RollRequest::new(boosts, modifier).with_flavor(label.unwrap_or_default());
    if !faces.is_empty() {
        return Ok(resolve_faces(&request, faces)?);
    }
    let mut engine = DiceEngine::new(SeededDice::new(session_seed(seed), CLI_ACTOR));
    Ok(engine.roll(&request)?)
}

pub fn wealth(
    direction: &str,
    score: u32,
    amount: u32,
    seed: Option<u64>,
    fair: Option<usize>,
) -> Result<TransactionOutcome> {
    let direction: Direction = direction
        .parse()
        .map_err(|_| anyhow!("Unknown direction {direction:?}; expected purchase, gain or loss"))?;
    let request = TransactionRequest { amount, direction };

    match fair {
        Some(prior) => {
            let mut sequencer = FairRollSequencer::new();
            for _ in 0..prior {
                sequencer.advance();
            }
            settle(sequencer, score, request)
        }
        None => settle(SeededDice::new(session_seed(seed), CLI_ACTOR), score, request),
    }
}

pub fn buy_all(score: u32, prices: &[u32], seed: Option<u64>) -> Result<BatchOutcome> {
    let items = prices
        .iter()
        .enumerate()
        .map(|(i, &price)| PurchaseItem::new(format!("item {}", i + 1), price));
    let mut ledger = WealthLedger::new(SeededDice::new(session_seed(seed), CLI_ACTOR));
    let batch = ledger.buy_all(score, items)?;
    tracing::info!(
        "Bought {} of {} items; score {} -> {}",
        batch.bought().count(),
        batch.items.len(),
        score,
        batch.final_score
    );
    Ok(batch)
}

fn settle<P: DicePool>(
    dice: P,
    score: u32,
    request: TransactionRequest,
) -> Result<TransactionOutcome> {
    let outcome = WealthLedger::new(dice).apply(score, request)?;
    if let Some(rejection) = &outcome.rejection {
        tracing::warn!("Transaction refused: {}", rejection);
    }
    Ok(outcome)
}

fn load_character(sheet: &Path, sources: Option<&Path>) -> Result<Character> {
    let catalog = match sources {
        Some(path) => CatalogLoader::load(path)?,
        None => SourceCatalog::default(),
    };
    CharacterLoader::load_character(sheet, &catalog)
}

/// Each diagnostic was already logged where it arose.
fn report_diagnostics(diagnostics: &[rules_core::Diagnostic]) {
    if !diagnostics.is_empty() {
        tracing::info!("Finished with {} diagnostics (see output)", diagnostics.len());
    }
}

fn session_seed(seed: Option<u64>) -> u64 {
    seed.unwrap_or_else(|| {
        let nanos = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map_or(0, |elapsed| elapsed.as_nanos());
        let seed = nanos as u64;
        tracing::info!("Using session seed {}", seed);
        seed
    })
}
