//! Sources of d12 faces.
//!
//! The engine never owns randomness. It asks a [`DicePool`] for faces, which
//! may be a seeded deterministic generator, host-supplied faces, or the fair
//! roll sequencer.

use std::collections::VecDeque;

use super::DiceError;
use super::rng::{PcgRng, RngOracle, die_seed};
use crate::config::RulesConfig;

pub trait DicePool {
    /// Next face in `1..=12`, or `None` when the pool has run dry.
    fn next_face(&mut self) -> Option<u8>;

    /// Draw `count` faces in order.
    fn draw(&mut self, count: usize) -> Result<Vec<u8>, DiceError> {
        let mut faces = Vec::with_capacity(count);
        for drawn in 0..count {
            let face = self.next_face().ok_or(DiceError::Exhausted {
                needed: count,
                drawn,
            })?;
            faces.push(face);
        }
        Ok(faces)
    }
}

impl<P: DicePool + ?Sized> DicePool for &mut P {
    fn next_face(&mut self) -> Option<u8> {
        (**self).next_face()
    }
}

/// Deterministic dice from an [`RngOracle`].
///
/// Every face gets its own seed from `(session, actor, draw counter)`, so
/// a replay with the same session seed reproduces every roll.
#[derive(Clone, Debug)]
pub struct SeededDice<R: RngOracle = PcgRng> {
    oracle: R,
    session_seed: u64,
    actor: u32,
    draws: u64,
}

impl SeededDice<PcgRng> {
    pub fn new(session_seed: u64, actor: u32) -> Self {
        Self::with_oracle(PcgRng, session_seed, actor)
    }
}

impl<R: RngOracle> SeededDice<R> {
    pub fn with_oracle(oracle: R, session_seed: u64, actor: u32) -> Self {
        Self {
            oracle,
            session_seed,
            actor,
            draws: 0,
        }
    }

    /// Faces drawn so far.
    pub fn draws(&self) -> u64 {
        self.draws
    }
}

impl<R: RngOracle> DicePool for SeededDice<R> {
    fn next_face(&mut self) -> Option<u8> {
        let seed = die_seed(self.session_seed, self.actor, self.draws);
        self.draws += 1;
        let face = self.oracle.roll_die(seed, u32::from(RulesConfig::DIE_FACES));
        Some(face as u8)
    }
}

/// Faces supplied by the host (e.g. from its own dice roller), replayed in order.
///
/// Out-of-range values are clamped onto the die.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ScriptedDice {
    faces: VecDeque<u8>,
}

impl ScriptedDice {
    pub fn new(faces: impl IntoIterator<Item = u8>) -> Self {
        Self {
            faces: faces.into_iter().collect(),
        }
    }

    pub fn remaining(&self) -> usize {
        self.faces.len()
    }
}

impl DicePool for ScriptedDice {
    fn next_face(&mut self) -> Option<u8> {
        self.faces
            .pop_front()
            .map(|face| face.clamp(1, RulesConfig::DIE_FACES))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seeded_dice_replay() {
        let first = SeededDice::new(1234, 3).draw(20).unwrap();
        let second = SeededDice::new(1234, 3).draw(20).unwrap();
        assert_eq!(first, second);
        assert!(first.iter().all(|f| (1..=12).contains(f)));

        let other_actor = SeededDice::new(1234, 4).draw(20).unwrap();
        assert_ne!(first, other_actor);
    }

    #[test]
    fn draw_counter_carries_across_calls() {
        let whole = SeededDice::new(77, 2).draw(12).unwrap();

        let mut split = SeededDice::new(77, 2);
        let mut faces = split.draw(5).unwrap();
        faces.extend(split.draw(7).unwrap());
        assert_eq!(split.draws(), 12);
        assert_eq!(faces, whole);

        // The counter feeds the seed, so a long run is not one repeated face.
        assert!(whole.iter().any(|&face| face != whole[0]));
    }

    #[test]
    fn scripted_dice_clamp_and_run_dry() {
        let mut dice = ScriptedDice::new([0, 5, 40]);
        assert_eq!(dice.draw(3).unwrap(), vec![1, 5, 12]);
        assert_eq!(
            dice.draw(2),
            Err(DiceError::Exhausted {
                needed: 2,
                drawn: 0
            })
        );
    }

    #[test]
    fn borrowed_pools_draw_from_the_owner() {
        fn take_two(mut pool: impl DicePool) -> Vec<u8> {
            pool.draw(2).unwrap()
        }

        let mut dice = ScriptedDice::new([3, 4, 5]);
        assert_eq!(take_two(&mut dice), vec![3, 4]);
        assert_eq!(dice.remaining(), 1);
    }
}
