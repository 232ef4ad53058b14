//! Candidate strings bucketed by the low bits of their file offset.

use crate::config::make_mask;
use crate::strings::CandidateString;
use std::collections::HashMap;
use tracing::debug;

/// Maps a masked offset to every candidate string sharing those low bits.
///
/// Buckets keep their strings in insertion order, which is ascending offset
/// order when fed from an extractor. Colliding strings are all retained.
#[derive(Debug, Clone)]
pub struct MaskedStringIndex {
    mask_bits: u32,
    mask: u64,
    buckets: HashMap<u64, Vec<CandidateString>>,
    strings: usize,
}

impl MaskedStringIndex {
    pub fn new(mask_bits: u32) -> Self {
        Self {
            mask_bits,
            mask: make_mask(mask_bits),
            buckets: HashMap::new(),
            strings: 0,
        }
    }

    /// Index every string of `candidates`.
    pub fn build<I>(candidates: I, mask_bits: u32) -> Self
    where
        I: IntoIterator<Item = CandidateString>,
    {
        let mut index = Self::new(mask_bits);
        index.extend(candidates);
        debug!(
            strings = index.strings,
            buckets = index.buckets.len(),
            mask_bits,
            "Built masked string index"
        );
        index
    }

    pub fn insert(&mut self, candidate: CandidateString) {
        let key = candidate.offset & self.mask;
        self.buckets.entry(key).or_default().push(candidate);
        self.strings += 1;
    }

    /// The strings whose offset shares the low bits of `value`.
    pub fn bucket_for(&self, value: u64) -> Option<&[CandidateString]> {
        self.buckets.get(&(value & self.mask)).map(Vec::as_slice)
    }

    pub fn mask(&self) -> u64 {
        self.mask
    }

    pub fn mask_bits(&self) -> u32 {
        self.mask_bits
    }

    /// Number of populated buckets.
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    /// Number of indexed strings.
    pub fn len(&self) -> usize {
        self.strings
    }

    pub fn is_empty(&self) -> bool {
        self.strings == 0
    }

    /// The indexed string starting at `offset`.
    pub fn string_at(&self, offset: u64) -> Option<&CandidateString> {
        self.buckets
            .get(&(offset & self.mask))?
            .iter()
            .find(|s| s.offset == offset)
    }
}

impl Extend<CandidateString> for MaskedStringIndex {
    fn extend<I: IntoIterator<Item = CandidateString>>(&mut self, iter: I) {
        for candidate in iter {
            self.insert(candidate);
        }
    }
}
