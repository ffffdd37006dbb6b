use std::fmt;

use serde::Serialize;

use crate::error::{Result, SeqError};

pub const ALPHABET: [u8; 4] = [b'A', b'C', b'G', b'T'];

/// Validated DNA sequence: non-empty, uppercase, every symbol in {A,C,G,T}.
///
/// The only public way to obtain one is [`validate`] (or [`parse_pattern`]),
/// so every algorithm downstream can index bytes without re-checking.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Sequence(String);

impl Sequence {
    /// Wrap bytes already known to be uppercase ACGT (e.g. the complement of a valid sequence).
    pub(crate) fn from_valid_bytes(bytes: impl IntoIterator<Item = u8>) -> Self {
        Sequence(bytes.into_iter().map(char::from).collect())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false for a validated sequence; present for API symmetry.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<[u8]> for Sequence {
    fn as_ref(&self) -> &[u8] {
        self.as_bytes()
    }
}

/// Strip whitespace, uppercase and check the alphabet.
pub fn validate(raw: &str) -> Result<Sequence> {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars().filter(|c| !c.is_whitespace()) {
        let up = c.to_ascii_uppercase();
        match up {
            'A' | 'C' | 'G' | 'T' => out.push(up),
            _ => {
                return Err(SeqError::InvalidSequence { ch: c, pos: out.len() });
            }
        }
    }
    if out.is_empty() {
        return Err(SeqError::EmptySequence);
    }
    Ok(Sequence(out))
}

/// Same normalization as [`validate`], but an empty pattern is `InvalidPattern`.
pub fn parse_pattern(raw: &str) -> Result<Sequence> {
    match validate(raw) {
        Err(SeqError::EmptySequence) => Err(SeqError::InvalidPattern),
        other => other,
    }
}

#[inline]
pub fn complement(base: u8) -> u8 {
    match base.to_ascii_uppercase() {
        b'A' => b'T',
        b'C' => b'G',
        b'G' => b'C',
        b'T' => b'A',
        other => other,
    }
}

pub fn revcomp(seq: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(seq.len());
    for &b in seq.iter().rev() {
        out.push(complement(b));
    }
    out
}
