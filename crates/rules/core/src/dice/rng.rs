//! Seeded randomness for [`super::SeededDice`].
//!
//! An oracle is a pure function of its seed. Hosts that want true randomness
//! feed faces in through [`super::ScriptedDice`] instead.

/// Deterministic source of 32-bit values, one per seed.
pub trait RngOracle: Send + Sync {
    fn next_u32(&self, seed: u64) -> u32;

    /// A face in `1..=sides`.
    ///
    /// Scales the 32-bit output onto the die with a multiply and shift, which
    /// keeps the high bits of the output.
    fn roll_die(&self, seed: u64, sides: u32) -> u32 {
        let scaled = (u64::from(self.next_u32(seed)) * u64::from(sides.max(1))) >> 32;
        scaled as u32 + 1
    }
}

/// PCG-XSH-RR: one LCG step over a 64-bit state, permuted down to 32 bits.
///
/// See <https://www.pcg-random.org/>.
#[derive(Clone, Copy, Debug, Default)]
pub struct PcgRng;

impl PcgRng {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;
}

impl RngOracle for PcgRng {
    fn next_u32(&self, seed: u64) -> u32 {
        let state = seed
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT);
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        xorshifted.rotate_right((state >> 59) as u32)
    }
}

/// Seed for one face: the `draw`-th die thrown by `actor` in a session.
///
/// Each input passes through the SplitMix64 finalizer before the next is
/// folded in, so neighbouring draws and actors land far apart.
pub fn die_seed(session_seed: u64, actor: u32, draw: u64) -> u64 {
    let session = splitmix(session_seed);
    let actor = splitmix(session ^ u64::from(actor));
    splitmix(actor ^ draw)
}

fn splitmix(value: u64) -> u64 {
    let mut z = value.wrapping_add(0x9e3779b97f4a7c15);
    z = (z ^ (z >> 30)).wrapping_mul(0xbf58476d1ce4e5b9);
    z = (z ^ (z >> 27)).wrapping_mul(0x94d049bb133111eb);
    z ^ (z >> 31)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_face() {
        let rng = PcgRng;
        let seed = die_seed(42, 1, 7);
        assert_eq!(rng.roll_die(seed, 12), rng.roll_die(seed, 12));
    }

    #[test]
    fn faces_stay_on_the_die() {
        let rng = PcgRng;
        let mut seen = [0u32; 12];
        for draw in 0..2_400 {
            let face = rng.roll_die(die_seed(9, 0, draw), 12);
            assert!((1..=12).contains(&face));
            seen[(face - 1) as usize] += 1;
        }
        assert!(seen.iter().all(|&count| count > 0), "every face comes up: {seen:?}");
    }

    #[test]
    fn draws_and_actors_get_their_own_seeds() {
        let base = die_seed(1, 1, 1);
        assert_ne!(base, die_seed(1, 1, 2));
        assert_ne!(base, die_seed(1, 2, 1));
        assert_ne!(base, die_seed(2, 1, 1));
        // Swapping actor and draw must not collide.
        assert_ne!(die_seed(1, 3, 5), die_seed(1, 5, 3));
        assert_ne!(die_seed(0, 0, 0), die_seed(1, 1, 0));
    }

    #[test]
    fn one_sided_die_always_shows_one() {
        let rng = PcgRng;
        for draw in 0..32 {
            assert_eq!(rng.roll_die(die_seed(5, 0, draw), 1), 1);
            assert_eq!(rng.roll_die(die_seed(5, 0, draw), 0), 1);
        }
    }
}
