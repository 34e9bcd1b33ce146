//! Dice oracle for to-hit and magnitude rolls.
//!
//! The combat resolver treats the oracle as a pure, side-effect-free source
//! of rolls: it never inspects how values are produced, which lets hosts
//! substitute a seeded generator for replays and a fixed stub for tests.

use std::sync::atomic::{AtomicU64, Ordering};

/// Oracle producing dice rolls.
pub trait DiceOracle: Send + Sync {
    /// Rolls `count` dice with `sides` faces each and returns the sum.
    ///
    /// Each die lands in `1..=sides`. Zero dice or zero sides roll 0.
    fn roll(&self, count: u32, sides: u32) -> i32;
}

/// Deterministic dice oracle backed by a PCG-XSH-RR generator.
///
/// Same seed, same sequence of rolls - suitable for replay and testing.
/// State advances atomically so shared references may roll concurrently.
#[derive(Debug)]
pub struct PcgDice {
    state: AtomicU64,
}

impl PcgDice {
    const MULTIPLIER: u64 = 6364136223846793005;
    const INCREMENT: u64 = 1442695040888963407;

    pub fn new(seed: u64) -> Self {
        Self {
            state: AtomicU64::new(seed),
        }
    }

    /// LCG step: `state' = (state × multiplier + increment) mod 2^64`.
    #[inline]
    fn pcg_step(state: u64) -> u64 {
        state
            .wrapping_mul(Self::MULTIPLIER)
            .wrapping_add(Self::INCREMENT)
    }

    /// XSH-RR output permutation: xorshift high bits, then random rotate.
    #[inline]
    fn pcg_output(state: u64) -> u32 {
        let xorshifted = (((state >> 18) ^ state) >> 27) as u32;
        let rot = (state >> 59) as u32;
        xorshifted.rotate_right(rot)
    }

    fn next_u32(&self) -> u32 {
        let mut current = self.state.load(Ordering::Relaxed);
        loop {
            let next = Self::pcg_step(current);
            match self.state.compare_exchange_weak(
                current,
                next,
                Ordering::Relaxed,
                Ordering::Relaxed,
            ) {
                Ok(_) => return Self::pcg_output(next),
                Err(observed) => current = observed,
            }
        }
    }
}

impl DiceOracle for PcgDice {
    fn roll(&self, count: u32, sides: u32) -> i32 {
        if sides == 0 {
            return 0;
        }
        (0..count)
            .map(|_| (self.next_u32() % sides) as i32 + 1)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn same_seed_same_sequence() {
        let a = PcgDice::new(0xfeed);
        let b = PcgDice::new(0xfeed);
        let rolls_a: Vec<_> = (0..32).map(|_| a.roll(1, 20)).collect();
        let rolls_b: Vec<_> = (0..32).map(|_| b.roll(1, 20)).collect();
        assert_eq!(rolls_a, rolls_b);
    }

    #[test]
    fn rolls_stay_in_range() {
        let dice = PcgDice::new(7);
        for _ in 0..256 {
            let roll = dice.roll(1, 6);
            assert!((1..=6).contains(&roll), "d6 rolled {roll}");
        }
        assert!(dice.roll(3, 4) >= 3);
        assert!(dice.roll(3, 4) <= 12);
    }

    #[test]
    fn degenerate_dice_roll_zero() {
        let dice = PcgDice::new(1);
        assert_eq!(dice.roll(0, 6), 0);
        assert_eq!(dice.roll(2, 0), 0);
    }
}
