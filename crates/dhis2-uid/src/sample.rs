//! Index sampling over ordered sequences.

use crate::error::EmptyInputError;
use crate::random::RandomSource;

/// 26 lowercase followed by 26 uppercase ASCII letters.
pub const LETTERS: Alphabet<'static> =
    Alphabet::fixed(b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ");

/// Digits followed by [`LETTERS`].
pub const ALPHANUMERIC: Alphabet<'static> =
    Alphabet::fixed(b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ");

/// Maps a draw onto an index in `0..len`.
///
/// The draw is reduced to its fractional part first, so sources with a
/// shifted range such as [`crate::SeededRandom`] (`[0.5, 1.5)`) land inside
/// the sequence. For `[0, 1)` sources this is `round(value * (len - 1))`.
/// Returns `None` when `len` is zero.
#[must_use]
pub fn sample_index(len: usize, value: f64) -> Option<usize> {
    let last = len.checked_sub(1)?;
    let fraction = value.rem_euclid(1.0);
    let scaled = (fraction * last as f64).round();
    // NaN and negative values saturate to zero.
    let index = scaled as usize;
    Some(index.min(last))
}

/// Picks one element of `items` using one draw from `random`.
///
/// An empty slice yields `None` without consuming a draw.
pub fn sample<'a, T>(items: &'a [T], random: &mut impl RandomSource) -> Option<&'a T> {
    if items.is_empty() {
        return None;
    }
    let index = sample_index(items.len(), random.next_value())?;
    items.get(index)
}

/// A non-empty, ordered set of ASCII characters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Alphabet<'a> {
    chars: &'a [u8],
}

impl<'a> Alphabet<'a> {
    /// Wraps `chars`, rejecting an empty slice.
    pub fn new(chars: &'a [u8]) -> Result<Self, EmptyInputError> {
        if chars.is_empty() {
            return Err(EmptyInputError);
        }
        Ok(Self { chars })
    }

    const fn fixed(chars: &'a [u8]) -> Self {
        assert!(!chars.is_empty(), "alphabet must not be empty");
        Self { chars }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chars.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chars.is_empty()
    }

    #[must_use]
    pub fn contains(&self, ch: char) -> bool {
        u8::try_from(ch).is_ok_and(|byte| self.chars.contains(&byte))
    }

    /// Picks one character using one draw from `random`.
    pub fn pick(&self, random: &mut impl RandomSource) -> char {
        let byte = sample(self.chars, random)
            .or_else(|| self.chars.last())
            .copied()
            .unwrap_or(b'?');
        char::from(byte)
    }
}
