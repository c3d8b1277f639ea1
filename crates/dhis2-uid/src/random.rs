//! Random sources used by the sampler.
//!
//! [`SeededRandom`] is a multiply-with-carry generator: two 16/16-bit
//! recurrences combined into one 32-bit word. The carry is taken with an
//! arithmetic shift of the state read as `i32`, so once a state word has its
//! top bit set the carry is sign extended. Two generators built from the
//! same seed always yield the same sequence.

use rand::Rng;
use rand::rngs::ThreadRng;

/// Seed used by [`SeededRandom::default`].
pub const DEFAULT_SEED: u32 = 123_456_789;

/// Fixed initial value of the `m_z` half of the generator state.
const INITIAL_Z: u32 = 987_654_321;

const LOW_WORD: u32 = 0xFFFF;
const Z_MULTIPLIER: u32 = 36_969;
const W_MULTIPLIER: u32 = 18_000;
const WORD_RANGE: f64 = 4_294_967_296.0;

/// A source of floating-point draws consumed by [`crate::sample`].
pub trait RandomSource {
    /// Returns the next draw and advances the source.
    fn next_value(&mut self) -> f64;
}

impl<R: RandomSource + ?Sized> RandomSource for &mut R {
    fn next_value(&mut self) -> f64 {
        (**self).next_value()
    }
}

/// Deterministic multiply-with-carry generator.
///
/// Draws fall in `[0.5, 1.5)`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeededRandom {
    m_w: u32,
    m_z: u32,
}

impl SeededRandom {
    /// Creates a generator whose `m_w` state starts at `seed`.
    #[must_use]
    pub const fn new(seed: u32) -> Self {
        Self {
            m_w: seed,
            m_z: INITIAL_Z,
        }
    }

    /// Advances the state and returns the combined 32-bit word.
    pub fn next_word(&mut self) -> u32 {
        self.m_z = Z_MULTIPLIER
            .wrapping_mul(self.m_z & LOW_WORD)
            .wrapping_add(carry(self.m_z));
        self.m_w = W_MULTIPLIER
            .wrapping_mul(self.m_w & LOW_WORD)
            .wrapping_add(carry(self.m_w));
        (self.m_z << 16).wrapping_add(self.m_w)
    }
}

/// High half of `state` as a signed 32-bit value, sign bits included.
const fn carry(state: u32) -> u32 {
    ((state as i32) >> 16) as u32
}

impl Default for SeededRandom {
    fn default() -> Self {
        Self::new(DEFAULT_SEED)
    }
}

impl RandomSource for SeededRandom {
    fn next_value(&mut self) -> f64 {
        f64::from(self.next_word()) / WORD_RANGE + 0.5
    }
}

/// Non-deterministic source backed by the thread-local RNG.
///
/// Draws fall in `[0, 1)`.
#[derive(Debug)]
pub struct ThreadRandom {
    rng: ThreadRng,
}

impl ThreadRandom {
    #[must_use]
    pub fn new() -> Self {
        Self { rng: rand::rng() }
    }
}

impl Default for ThreadRandom {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomSource for ThreadRandom {
    fn next_value(&mut self) -> f64 {
        self.rng.random::<f64>()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seeded_known_sequence() {
        let mut random = SeededRandom::new(123_123);
        assert_eq!(random.next_value(), 1.4736288751009852);
        assert_eq!(random.next_value(), 0.7618483956903219);
        assert_eq!(random.next_value(), 1.45821354794316);
        assert_eq!(random.next_value(), 0.7725607361644506);
    }

    #[test]
    fn test_carry_sign_extends() {
        assert_eq!(carry(0x7FFF_0000), 0x7FFF);
        assert_eq!(carry(0x8000_0000), 0xFFFF_8000);
        assert_eq!(carry(0xFFFF_FFFF), 0xFFFF_FFFF);
    }

    #[test]
    fn test_seeded_sequence_past_negative_state() {
        // The z state first has its top bit set on the ninth draw.
        let mut random = SeededRandom::new(123_123);
        let draws: Vec<f64> = (0..10).map(|_| random.next_value()).collect();
        assert!((draws[8].rem_euclid(1.0) - 0.260_448_517_045_006).abs() < 1e-12);
        assert!((draws[9].rem_euclid(1.0) - 0.071_570_892_352_610).abs() < 1e-12);
    }

    #[test]
    fn test_seeded_range() {
        let mut random = SeededRandom::default();
        for _ in 0..10_000 {
            let value = random.next_value();
            assert!((0.5..1.5).contains(&value), "out of range: {value}");
        }
    }

    #[test]
    fn test_different_seeds_diverge() {
        let mut left = SeededRandom::new(1);
        let mut right = SeededRandom::new(2);
        let left: Vec<u32> = (0..8).map(|_| left.next_word()).collect();
        let right: Vec<u32> = (0..8).map(|_| right.next_word()).collect();
        assert_ne!(left, right);
    }

    #[test]
    fn test_thread_random_range() {
        let mut random = ThreadRandom::new();
        for _ in 0..1_000 {
            let value = random.next_value();
            assert!((0.0..1.0).contains(&value));
        }
    }

    fn draw(mut source: impl RandomSource) -> f64 {
        source.next_value()
    }

    #[test]
    fn test_mut_ref_forwards() {
        let mut random = SeededRandom::new(7);
        let mut copy = random.clone();
        assert_eq!(draw(&mut random), copy.next_value());
        assert_eq!(random, copy);
    }
}
