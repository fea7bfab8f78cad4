//! Currency-score ledger.
//!
//! Wealth is a single score rather than coins. Every transaction rolls one d12
//! per point of score; each face of 8 or more is a success that softens the
//! transaction. A purchase the score cannot cover is reported but leaves the
//! score untouched.

use crate::character::Character;
use crate::dice::fair::is_success;
use crate::dice::{DiceError, DicePool};
use crate::error::{ErrorSeverity, RulesError};

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum WealthError {
    #[error("cost {cost} exceeds currency score {score}")]
    InsufficientFunds { cost: u32, score: u32 },
}

impl RulesError for WealthError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Recoverable
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::InsufficientFunds { .. } => "wealth.insufficient_funds",
        }
    }
}

#[derive(
    Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumString, strum::AsRefStr,
)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum Direction {
    Purchase,
    Gain,
    Loss,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionRequest {
    pub amount: u32,
    pub direction: Direction,
}

impl TransactionRequest {
    pub const fn purchase(price: u32) -> Self {
        Self {
            amount: price,
            direction: Direction::Purchase,
        }
    }

    pub const fn gain(amount: u32) -> Self {
        Self {
            amount,
            direction: Direction::Gain,
        }
    }

    pub const fn loss(amount: u32) -> Self {
        Self {
            amount,
            direction: Direction::Loss,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TransactionOutcome {
    pub request: TransactionRequest,
    pub dice: Vec<u8>,
    pub successes: u32,
    /// `max(0, amount - successes)`: the cost, gain or loss actually applied.
    pub delta: u32,
    pub score_before: u32,
    pub score_after: u32,
    /// Why the transaction was refused, if it was.
    pub rejection: Option<WealthError>,
}

impl TransactionOutcome {
    pub fn succeeded(&self) -> bool {
        self.rejection.is_none()
    }

    pub fn into_result(self) -> Result<Self, WealthError> {
        match self.rejection {
            Some(error) => Err(error),
            None => Ok(self),
        }
    }
}

/// A named item in a batch purchase.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct PurchaseItem {
    pub name: String,
    pub price: u32,
}

impl PurchaseItem {
    pub fn new(name: impl Into<String>, price: u32) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemOutcome {
    pub item: PurchaseItem,
    pub outcome: TransactionOutcome,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BatchOutcome {
    /// In the order attempted (cheapest first).
    pub items: Vec<ItemOutcome>,
    pub final_score: u32,
}

impl BatchOutcome {
    pub fn bought(&self) -> impl Iterator<Item = &PurchaseItem> {
        self.items
            .iter()
            .filter(|entry| entry.outcome.succeeded())
            .map(|entry| &entry.item)
    }

    pub fn skipped(&self) -> impl Iterator<Item = &PurchaseItem> {
        self.items
            .iter()
            .filter(|entry| !entry.outcome.succeeded())
            .map(|entry| &entry.item)
    }
}

/// Applies currency transactions with dice drawn from `P`.
#[derive(Clone, Debug)]
pub struct WealthLedger<P: DicePool> {
    dice: P,
}

impl<P: DicePool> WealthLedger<P> {
    pub fn new(dice: P) -> Self {
        Self { dice }
    }

    pub fn dice(&self) -> &P {
        &self.dice
    }

    pub fn into_dice(self) -> P {
        self.dice
    }

    pub fn purchase(&mut self, score: u32, price: u32) -> Result<TransactionOutcome, DiceError> {
        self.apply(score, TransactionRequest::purchase(price))
    }

    pub fn gain(&mut self, score: u32, amount: u32) -> Result<TransactionOutcome, DiceError> {
        self.apply(score, TransactionRequest::gain(amount))
    }

    pub fn loss(&mut self, score: u32, amount: u32) -> Result<TransactionOutcome, DiceError> {
        self.apply(score, TransactionRequest::loss(amount))
    }

    /// Roll `score` dice and apply `request` to `score`.
    ///
    /// Only a dice pool running dry is an error; a refused purchase is an
    /// outcome with [`TransactionOutcome::rejection`] set.
    pub fn apply(
        &mut self,
        score: u32,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, DiceError> {
        let dice = self.dice.draw(score as usize)?;
        let successes = dice.iter().filter(|&&face| is_success(face)).count() as u32;
        let delta = request.amount.saturating_sub(successes);

        let (score_after, rejection) = match request.direction {
            Direction::Purchase if delta > score => (
                score,
                Some(WealthError::InsufficientFunds { cost: delta, score }),
            ),
            Direction::Purchase | Direction::Loss => (score.saturating_sub(delta), None),
            Direction::Gain => (score.saturating_add(delta), None),
        };

        match &rejection {
            Some(error) => tracing::info!(
                "{} of {} refused: {}",
                request.direction,
                request.amount,
                error
            ),
            None => tracing::debug!(
                "{} of {}: {} successes, score {} -> {}",
                request.direction,
                request.amount,
                successes,
                score,
                score_after
            ),
        }

        Ok(TransactionOutcome {
            request,
            dice,
            successes,
            delta,
            score_before: score,
            score_after,
            rejection,
        })
    }

    /// Apply `request` to the character's currency. The score changes only
    /// when the transaction succeeds.
    pub fn commit(
        &mut self,
        character: &mut Character,
        request: TransactionRequest,
    ) -> Result<TransactionOutcome, DiceError> {
        let outcome = self.apply(character.currency, request)?;
        if outcome.succeeded() {
            character.currency = outcome.score_after;
        }
        Ok(outcome)
    }

    /// Buy items cheapest first, each against the score the previous ones left.
    ///
    /// Items the remaining score cannot cover are skipped and reported; ties in
    /// price keep their input order.
    pub fn buy_all(
        &mut self,
        score: u32,
        items: impl IntoIterator<Item = PurchaseItem>,
    ) -> Result<BatchOutcome, DiceError> {
        let mut items: Vec<PurchaseItem> = items.into_iter().collect();
        items.sort_by_key(|item| item.price);

        let mut batch = BatchOutcome {
            items: Vec::with_capacity(items.len()),
            final_score: score,
        };
        for item in items {
            let outcome = self.purchase(batch.final_score, item.price)?;
            batch.final_score = outcome.score_after;
            batch.items.push(ItemOutcome { item, outcome });
        }
        Ok(batch)
    }
}
