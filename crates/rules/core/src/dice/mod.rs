//! d12 dice: pools of faces, roll resolution and fair sequencing.

pub mod fair;
pub mod pool;
pub mod rng;
pub mod roll;

pub use fair::FairRollSequencer;
pub use pool::{DicePool, ScriptedDice, SeededDice};
pub use rng::{PcgRng, RngOracle, die_seed};
pub use roll::{DiceEngine, DiceRow, RollRequest, RollResult};

use crate::error::{ErrorSeverity, RulesError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DiceError {
    #[error("dice pool ran dry after {drawn} of {needed} faces")]
    Exhausted { needed: usize, drawn: usize },

    #[error("roll needs {expected} faces, got {found}")]
    PoolSize { expected: usize, found: usize },
}

impl RulesError for DiceError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Exhausted { .. } => ErrorSeverity::Recoverable,
            Self::PoolSize { .. } => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Exhausted { .. } => "dice.exhausted",
            Self::PoolSize { .. } => "dice.pool_size",
        }
    }
}
