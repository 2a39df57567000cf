//! Object key generation.
//!
//! Keys are the caller's filename plus a random suffix, so two uploads of
//! `cat.png` never collide in the object store.

use rand::TryRngCore;
use rand::rngs::OsRng;
use thiserror::Error;

/// Length of the random suffix appended to every object key.
pub const OBJECT_KEY_SUFFIX_LEN: usize = 10;

const ALPHABET: &[u8; 62] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Largest multiple of the alphabet size that fits in a byte.
const ACCEPT_BELOW: u8 = 248;

/// The entropy source failed.
#[derive(Debug, Clone, Error)]
#[error("entropy source failed: {0}")]
pub struct KeyError(String);

impl KeyError {
    /// Create a key error from any displayable cause.
    #[must_use]
    pub fn new(msg: impl Into<String>) -> Self {
        Self(msg.into())
    }
}

/// Source of key suffixes.
pub trait SuffixGenerator: Send + Sync {
    /// Produce a suffix of exactly `length` characters.
    fn generate(&self, length: usize) -> Result<String, KeyError>;
}

/// Suffixes drawn from the operating system's CSPRNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomSuffixGenerator;

impl SuffixGenerator for RandomSuffixGenerator {
    fn generate(&self, length: usize) -> Result<String, KeyError> {
        generate_suffix(&mut OsRng, length)
    }
}

/// Draw an alphanumeric token of `length` characters from `rng`.
///
/// Bytes at or above [`ACCEPT_BELOW`] are discarded so every symbol is
/// equally likely.
pub fn generate_suffix<R>(rng: &mut R, length: usize) -> Result<String, KeyError>
where
    R: TryRngCore + ?Sized,
{
    let mut token = String::with_capacity(length);
    let mut buf = [0u8; 32];

    while token.len() < length {
        rng.try_fill_bytes(&mut buf)
            .map_err(|e| KeyError::new(e.to_string()))?;

        for byte in buf.iter().copied().filter(|b| *b < ACCEPT_BELOW) {
            token.push(char::from(ALPHABET[usize::from(byte) % ALPHABET.len()]));
            if token.len() == length {
                break;
            }
        }
    }

    Ok(token)
}

/// Storage key for `filename` with the given suffix.
#[must_use]
pub fn compose_object_key(filename: &str, suffix: &str) -> String {
    format!("{filename}_{suffix}")
}

/// Whether every key composed from `filename` stays below the store root.
///
/// The suffix is appended to the last segment, so only the leading segments
/// can climb out.
#[must_use]
pub fn is_confined_filename(filename: &str) -> bool {
    !filename.starts_with('/') && !filename.split('/').rev().skip(1).any(|segment| segment == "..")
}
