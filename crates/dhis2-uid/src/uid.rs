use std::fmt;

use serde::{Deserialize, Serialize};

use crate::random::RandomSource;
use crate::sample::{ALPHANUMERIC, LETTERS};

/// Length of a platform UID.
pub const DEFAULT_UID_LENGTH: usize = 11;

/// A generated identifier: one letter followed by alphanumerics.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Uid(String);

impl Uid {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Uid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Uid {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<Uid> for String {
    fn from(uid: Uid) -> Self {
        uid.0
    }
}

/// Generates one identifier of `length` characters.
///
/// Position 0 draws from [`LETTERS`], every later position from
/// [`ALPHANUMERIC`], one draw per position in order. A `length` of zero
/// still yields the single leading letter.
pub fn generate_uid(length: usize, random: &mut impl RandomSource) -> Uid {
    let mut code = String::with_capacity(length.max(1));
    code.push(LETTERS.pick(random));
    for _ in 1..length {
        code.push(ALPHANUMERIC.pick(random));
    }
    Uid(code)
}

/// Generates `count` identifiers from one shared source.
pub fn generate_uids(count: usize, length: usize, random: &mut impl RandomSource) -> Vec<Uid> {
    (0..count).map(|_| generate_uid(length, random)).collect()
}

/// Returns true if `code` satisfies the 11 character UID contract.
#[must_use]
pub fn is_valid_uid(code: &str) -> bool {
    let mut chars = code.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    code.len() == DEFAULT_UID_LENGTH
        && first.is_ascii_alphabetic()
        && chars.all(|ch| ch.is_ascii_alphanumeric())
}
