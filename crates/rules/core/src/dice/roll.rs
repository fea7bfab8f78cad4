//! Boost/snag d12 pool resolution.
//!
//! A roll draws `3 + |boosts|` dice, sorts them ascending, and reads one of
//! them as the key die: second highest when boosted, second lowest when
//! snagged, the median otherwise.

use arrayvec::ArrayVec;

use super::DiceError;
use super::pool::DicePool;
use crate::config::RulesConfig;

/// Sorted faces of one roll. A pool never exceeds [`RulesConfig::MAX_POOL`].
pub type DiceRow = ArrayVec<u8, { RulesConfig::MAX_POOL }>;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct RollRequest {
    /// Boosts minus snags. Values past ±10 are clamped.
    pub net_boosts: i32,
    pub modifier: i32,
    /// Free text carried through to the result.
    pub flavor: String,
}

impl RollRequest {
    pub fn new(net_boosts: i32, modifier: i32) -> Self {
        Self {
            net_boosts,
            modifier,
            flavor: String::new(),
        }
    }

    pub fn with_flavor(mut self, flavor: impl Into<String>) -> Self {
        self.flavor = flavor.into();
        self
    }

    pub fn clamped_boosts(&self) -> i32 {
        self.net_boosts
            .clamp(-RulesConfig::MAX_NET_BOOSTS, RulesConfig::MAX_NET_BOOSTS)
    }

    pub fn dice_count(&self) -> usize {
        dice_count(self.clamped_boosts())
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RollResult {
    pub net_boosts: i32,
    pub dice_sorted: DiceRow,
    pub key_die_index: usize,
    pub key_die_value: u8,
    pub modifier: i32,
    pub total: i32,
    /// A 12 sits directly above the key die.
    pub crit_success_chance: bool,
    /// A 1 sits directly below the key die.
    pub crit_failure_chance: bool,
    pub flavor: String,
}

pub fn dice_count(net_boosts: i32) -> usize {
    RulesConfig::BASE_DICE + net_boosts.unsigned_abs() as usize
}

pub fn key_die_index(net_boosts: i32, len: usize) -> usize {
    match net_boosts {
        b if b > 0 => len - 2,
        b if b < 0 => 1,
        _ => len / 2,
    }
}

/// Resolve a roll from faces the caller already has.
///
/// `faces` must hold exactly [`RollRequest::dice_count`] values; they are
/// clamped onto the die and sorted here.
pub fn resolve(request: &RollRequest, faces: &[u8]) -> Result<RollResult, DiceError> {
    let net_boosts = request.clamped_boosts();
    let expected = dice_count(net_boosts);
    if faces.len() != expected {
        return Err(DiceError::PoolSize {
            expected,
            found: faces.len(),
        });
    }

    let mut dice_sorted: DiceRow = faces
        .iter()
        .map(|face| (*face).clamp(1, RulesConfig::DIE_FACES))
        .collect();
    dice_sorted.sort_unstable();

    let index = key_die_index(net_boosts, dice_sorted.len());
    let key = dice_sorted[index];
    let crit_success_chance = dice_sorted
        .get(index + 1)
        .is_some_and(|&above| above == RulesConfig::DIE_FACES);
    let crit_failure_chance = index
        .checked_sub(1)
        .and_then(|below| dice_sorted.get(below))
        .is_some_and(|&below| below == 1);

    Ok(RollResult {
        net_boosts,
        dice_sorted,
        key_die_index: index,
        key_die_value: key,
        modifier: request.modifier,
        total: i32::from(key) + request.modifier,
        crit_success_chance,
        crit_failure_chance,
        flavor: request.flavor.clone(),
    })
}

/// Rolls requests against a dice pool.
#[derive(Clone, Debug)]
pub struct DiceEngine<P: DicePool> {
    pool: P,
}

impl<P: DicePool> DiceEngine<P> {
    pub fn new(pool: P) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &P {
        &self.pool
    }

    pub fn into_pool(self) -> P {
        self.pool
    }

    pub fn roll(&mut self, request: &RollRequest) -> Result<RollResult, DiceError> {
        let faces = self.pool.draw(request.dice_count())?;
        let result = resolve(request, &faces)?;
        tracing::debug!(
            "Rolled {:?} (boosts {}): key {} + {} = {}",
            result.dice_sorted.as_slice(),
            result.net_boosts,
            result.key_die_value,
            result.modifier,
            result.total
        );
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dice::{ScriptedDice, SeededDice};

    #[test]
    fn unboosted_pool_reads_the_median() {
        let result = resolve(&RollRequest::new(0, 2), &[9, 3, 6]).unwrap();
        assert_eq!(result.dice_sorted.as_slice(), &[3, 6, 9]);
        assert_eq!(result.key_die_index, 1);
        assert_eq!(result.key_die_value, 6);
        assert_eq!(result.total, 8);
    }

    #[test]
    fn two_boosts_read_second_highest_of_five() {
        let result = resolve(&RollRequest::new(2, 0), &[1, 12, 4, 7, 10]).unwrap();
        assert_eq!(result.dice_sorted.len(), 5);
        assert_eq!(result.key_die_index, 3);
        assert_eq!(result.key_die_value, 10);
        assert!(result.crit_success_chance);
        assert!(!result.crit_failure_chance);
    }

    #[test]
    fn snags_read_second_lowest() {
        let result = resolve(&RollRequest::new(-1, -1), &[1, 5, 12, 8]).unwrap();
        assert_eq!(result.key_die_index, 1);
        assert_eq!(result.key_die_value, 5);
        assert_eq!(result.total, 4);
        assert!(result.crit_failure_chance);
        assert!(!result.crit_success_chance);
    }

    #[test]
    fn boosts_are_clamped() {
        let request = RollRequest::new(25, 0);
        assert_eq!(request.clamped_boosts(), 10);
        assert_eq!(request.dice_count(), RulesConfig::MAX_POOL);

        let snagged = RollRequest::new(-40, 0);
        assert_eq!(snagged.dice_count(), RulesConfig::MAX_POOL);
    }

    #[test]
    fn wrong_face_count_is_rejected() {
        assert_eq!(
            resolve(&RollRequest::new(1, 0), &[4, 4, 4]),
            Err(DiceError::PoolSize {
                expected: 4,
                found: 3
            })
        );
    }

    #[test]
    fn engine_draws_from_its_pool() {
        let mut engine = DiceEngine::new(ScriptedDice::new([2, 11, 7]));
        let result = engine
            .roll(&RollRequest::new(0, 1).with_flavor("climb"))
            .unwrap();
        assert_eq!(result.total, 8);
        assert_eq!(result.flavor, "climb");
        assert_eq!(engine.pool().remaining(), 0);

        assert!(engine.roll(&RollRequest::default()).is_err());
    }

    #[test]
    fn seeded_rolls_are_sorted_and_sized() {
        let mut engine = DiceEngine::new(SeededDice::new(77, 0));
        for boosts in -10..=10 {
            let result = engine.roll(&RollRequest::new(boosts, 0)).unwrap();
            assert_eq!(result.dice_sorted.len(), dice_count(boosts));
            assert!(result.dice_sorted.windows(2).all(|w| w[0] <= w[1]));
            assert_eq!(result.key_die_value, result.dice_sorted[result.key_die_index]);
        }
    }
}
