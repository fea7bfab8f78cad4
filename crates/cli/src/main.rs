//! `ruleset`: derive character stats, list abilities, roll dice and settle
//! wealth from the terminal.
mod commands;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "ruleset", version, about = "d12 tabletop rules calculator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Derive the full stat snapshot of a character sheet
    Derive {
        /// Character sheet (.ron)
        sheet: PathBuf,
        /// Rules configuration (.toml)
        #[arg(long, env = "RULESET_CONFIG")]
        config: Option<PathBuf>,
        /// Source compendium (.ron) for referenced sources
        #[arg(long, env = "RULESET_COMPENDIUM")]
        sources: Option<PathBuf>,
    },
    /// List a character's active abilities by activity kind
    Abilities {
        /// Character sheet (.ron)
        sheet: PathBuf,
        /// Source compendium (.ron) for referenced sources
        #[arg(long, env = "RULESET_COMPENDIUM")]
        sources: Option<PathBuf>,
    },
    /// Roll a boost/snag d12 pool
    Roll {
        /// Boosts minus snags (clamped to ±10)
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        boosts: i32,
        /// Flat modifier added to the key die
        #[arg(long, default_value_t = 0, allow_hyphen_values = true)]
        modifier: i32,
        /// Session seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
        /// Label echoed in the result
        #[arg(long)]
        label: Option<String>,
        /// Resolve these faces instead of rolling
        #[arg(long, value_delimiter = ',')]
        faces: Vec<u8>,
    },
    /// Apply one currency transaction
    Wealth {
        /// purchase, gain or loss
        direction: String,
        /// Current currency score
        #[arg(long)]
        score: u32,
        /// Price, gain or loss amount
        #[arg(long)]
        amount: u32,
        /// Session seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
        /// Use fair dice, resuming after this many earlier fair faces
        #[arg(long)]
        fair: Option<usize>,
    },
    /// Buy several items, cheapest first
    BuyAll {
        /// Current currency score
        #[arg(long)]
        score: u32,
        /// Item prices (repeat or comma separate)
        #[arg(long = "price", value_delimiter = ',', required = true)]
        prices: Vec<u32>,
        /// Session seed for reproducible dice
        #[arg(long)]
        seed: Option<u64>,
    },
}

fn main() -> Result<()> {
    // Load .env file if it exists (silently ignore if not found)
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Derive {
            sheet,
            config,
            sources,
        } => commands::print_json(&commands::derive(
            &sheet,
            config.as_deref(),
            sources.as_deref(),
        )?),
        Commands::Abilities { sheet, sources } => {
            commands::print_json(&commands::abilities(&sheet, sources.as_deref())?)
        }
        Commands::Roll {
            boosts,
            modifier,
            seed,
            label,
            faces,
        } => commands::print_json(&commands::roll(boosts, modifier, seed, label, &faces)?),
        Commands::Wealth {
            direction,
            score,
            amount,
            seed,
            fair,
        } => commands::print_json(&commands::wealth(&direction, score, amount, seed, fair)?),
        Commands::BuyAll {
            score,
            prices,
            seed,
        } => commands::print_json(&commands::buy_all(score, &prices, seed)?),
    }
}
