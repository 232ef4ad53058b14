//! Base address voting.
//!
//! Every pointer word whose low bits land in a populated bucket of the
//! [`MaskedStringIndex`] proposes `value - string.offset` as the load base
//! for each string of that bucket. Proposals that would be negative are
//! discarded.

use crate::config::{Endianness, PointerSize, VoteWeighting};
use crate::index::MaskedStringIndex;
use crate::pointers::{PointerChunker, PointerWord};
use rayon::prelude::*;
use serde::Serialize;
use std::collections::HashMap;
use tracing::debug;

/// Number of pointer words voted by one rayon task.
const WORDS_PER_TASK: usize = 64 * 1024;

/// Accumulated votes per candidate base address.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VoteTable {
    votes: HashMap<u64, u64>,
    total: u64,
}

impl VoteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add `weight` votes to `base`.
    pub fn add(&mut self, base: u64, weight: u64) {
        *self.votes.entry(base).or_insert(0) += weight;
        self.total += weight;
    }

    /// Votes recorded for `base`, zero if it never received any.
    pub fn get(&self, base: u64) -> u64 {
        self.votes.get(&base).copied().unwrap_or(0)
    }

    /// Fold another table into this one. Merging is commutative and associative.
    pub fn merge(&mut self, other: VoteTable) {
        if self.votes.len() < other.votes.len() {
            let mine = std::mem::replace(self, other);
            self.merge(mine);
            return;
        }
        for (base, weight) in other.votes {
            *self.votes.entry(base).or_insert(0) += weight;
        }
        self.total += other.total;
    }

    /// Number of distinct candidate bases.
    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }

    /// Sum of all votes.
    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn iter(&self) -> impl Iterator<Item = (u64, u64)> + '_ {
        self.votes.iter().map(|(&base, &votes)| (base, votes))
    }
}

/// Counters collected while voting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct VoteStats {
    /// Pointer words examined.
    pub pointers: u64,
    /// Pointer words whose low bits hit a populated bucket.
    pub matched_pointers: u64,
    /// Proposals dropped because the base would be negative.
    pub negative_bases: u64,
}

impl VoteStats {
    fn merge(&mut self, other: VoteStats) {
        self.pointers += other.pointers;
        self.matched_pointers += other.matched_pointers;
        self.negative_bases += other.negative_bases;
    }
}

/// Single-writer accumulator of votes against one index.
pub struct BaseVoter<'a> {
    index: &'a MaskedStringIndex,
    weighting: VoteWeighting,
    table: VoteTable,
    stats: VoteStats,
}

impl<'a> BaseVoter<'a> {
    pub fn new(index: &'a MaskedStringIndex, weighting: VoteWeighting) -> Self {
        Self {
            index,
            weighting,
            table: VoteTable::new(),
            stats: VoteStats::default(),
        }
    }

    /// Vote with one pointer word. Its file offset plays no part.
    pub fn observe(&mut self, word: PointerWord) {
        self.stats.pointers += 1;
        let Some(bucket) = self.index.bucket_for(word.value) else {
            return;
        };
        self.stats.matched_pointers += 1;
        let weight = match self.weighting {
            VoteWeighting::Unit => 1,
            VoteWeighting::BucketSize => bucket.len() as u64,
        };
        for s in bucket {
            match word.value.checked_sub(s.offset) {
                Some(base) => self.table.add(base, weight),
                None => self.stats.negative_bases += 1,
            }
        }
    }

    pub fn observe_all<I: IntoIterator<Item = PointerWord>>(&mut self, words: I) {
        for word in words {
            self.observe(word);
        }
    }

    pub fn stats(&self) -> &VoteStats {
        &self.stats
    }

    pub fn finish(self) -> (VoteTable, VoteStats) {
        debug!(
            bases = self.table.len(),
            total_votes = self.table.total(),
            pointers = self.stats.pointers,
            matched_pointers = self.stats.matched_pointers,
            "Voting finished"
        );
        (self.table, self.stats)
    }
}

/// Vote over every pointer word of an in-memory image on one thread.
pub fn vote_slice(
    data: &[u8],
    index: &MaskedStringIndex,
    pointer_size: PointerSize,
    endianness: Endianness,
    weighting: VoteWeighting,
) -> (VoteTable, VoteStats) {
    let mut voter = BaseVoter::new(index, weighting);
    voter.observe_all(PointerChunker::new(data, pointer_size, endianness));
    voter.finish()
}

/// Vote over an in-memory image with rayon.
///
/// The image is split on pointer boundaries so every task sees the same
/// words the sequential pass would; the partial tables are then merged.
pub fn vote_slice_parallel(
    data: &[u8],
    index: &MaskedStringIndex,
    pointer_size: PointerSize,
    endianness: Endianness,
    weighting: VoteWeighting,
) -> (VoteTable, VoteStats) {
    let span = pointer_size.bytes() * WORDS_PER_TASK;
    let (table, stats) = data
        .par_chunks(span)
        .enumerate()
        .map(|(i, chunk)| {
            let mut voter = BaseVoter::new(index, weighting);
            voter.observe_all(PointerChunker::with_base_offset(
                chunk,
                (i * span) as u64,
                pointer_size,
                endianness,
            ));
            (voter.table, voter.stats)
        })
        .reduce(
            || (VoteTable::new(), VoteStats::default()),
            |(mut ta, mut sa), (tb, sb)| {
                ta.merge(tb);
                sa.merge(sb);
                (ta, sa)
            },
        );
    debug!(
        bases = table.len(),
        total_votes = table.total(),
        pointers = stats.pointers,
        tasks = data.len().div_ceil(span),
        "Parallel voting finished"
    );
    (table, stats)
}
