//! Sifted bit streams.

use serde::{Deserialize, Serialize};

/// Paired Alice/Bob bit sequences.
///
/// Bits are appended in pairs only, so both sides always have equal length.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BitStreamPair {
    alice: Vec<u8>,
    bob: Vec<u8>,
}

impl BitStreamPair {
    /// Create an empty pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one sifted bit for each party.
    pub fn push(&mut self, alice: u8, bob: u8) {
        self.alice.push(alice);
        self.bob.push(bob);
    }

    /// Number of sifted positions.
    pub fn len(&self) -> usize {
        self.alice.len()
    }

    /// Returns `true` if nothing has been sifted.
    pub fn is_empty(&self) -> bool {
        self.alice.is_empty()
    }

    /// Number of positions where the parties disagree.
    pub fn errors(&self) -> usize {
        self.alice
            .iter()
            .zip(&self.bob)
            .filter(|(a, b)| a != b)
            .count()
    }

    /// Fraction of disagreeing positions, or `None` if empty.
    pub fn error_rate(&self) -> Option<f64> {
        (!self.is_empty()).then(|| self.errors() as f64 / self.len() as f64)
    }

    /// Alice's bits.
    pub fn alice(&self) -> &[u8] {
        &self.alice
    }

    /// Bob's bits.
    pub fn bob(&self) -> &[u8] {
        &self.bob
    }
}

/// The two sifted streams of a run.
///
/// - **high quality**: rounds where both parties chose the same basis; the
///   only source of key material.
/// - **recycled**: successful rounds with mismatched bases; used only to
///   estimate the channel error rate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SiftedStreamSet {
    high_quality: BitStreamPair,
    recycled: BitStreamPair,
}

impl SiftedStreamSet {
    /// Create empty streams.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append to the matched-basis stream.
    pub fn push_high_quality(&mut self, alice: u8, bob: u8) {
        self.high_quality.push(alice, bob);
    }

    /// Append to the mismatched-basis stream.
    pub fn push_recycled(&mut self, alice: u8, bob: u8) {
        self.recycled.push(alice, bob);
    }

    /// Matched-basis stream.
    pub fn high_quality(&self) -> &BitStreamPair {
        &self.high_quality
    }

    /// Mismatched-basis stream.
    pub fn recycled(&self) -> &BitStreamPair {
        &self.recycled
    }

    /// Total number of successful rounds.
    pub fn total_len(&self) -> usize {
        self.high_quality.len() + self.recycled.len()
    }
}
