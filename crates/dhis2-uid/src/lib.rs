//! DHIS2 UID generation.
//!
//! A DHIS2 UID is an 11 character identifier whose first character is an
//! ASCII letter and whose remaining characters are ASCII alphanumerics.
//!
//! Every generation call takes an explicit [`RandomSource`]. Use
//! [`ThreadRandom`] for ordinary identifiers and [`SeededRandom`] when the
//! same input must always produce the same identifiers.
//!
//! ```
//! use dhis2_uid::{SeededRandom, generate_uid, is_valid_uid};
//!
//! let mut random = SeededRandom::new(123_123);
//! let uid = generate_uid(11, &mut random);
//! assert!(is_valid_uid(uid.as_str()));
//! ```

#![deny(unsafe_code)]

pub mod error;
pub mod random;
pub mod sample;
pub mod uid;

pub use error::EmptyInputError;
pub use random::{RandomSource, SeededRandom, ThreadRandom};
pub use sample::{ALPHANUMERIC, Alphabet, LETTERS, sample, sample_index};
pub use uid::{DEFAULT_UID_LENGTH, Uid, generate_uid, generate_uids, is_valid_uid};
