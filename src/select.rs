//! Ranking of candidate base addresses.
//!
//! Candidates are ordered by descending vote count. Equal counts are
//! ordered by ascending base address, so the lowest base wins a tie.

use crate::error::{BaseGuessError, Result};
use crate::vote::VoteTable;
use serde::Serialize;
use std::cmp::Ordering;

/// A candidate base address and its vote count.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaseCandidate {
    pub base: u64,
    pub votes: u64,
}

impl BaseCandidate {
    /// Ranking order: more votes first, then lower base first.
    pub fn rank(&self, other: &Self) -> Ordering {
        other
            .votes
            .cmp(&self.votes)
            .then_with(|| self.base.cmp(&other.base))
    }
}

/// Read-only view that ranks a [`VoteTable`].
#[derive(Debug, Clone, Copy)]
pub struct ResultSelector<'a> {
    table: &'a VoteTable,
}

impl<'a> ResultSelector<'a> {
    pub fn new(table: &'a VoteTable) -> Self {
        Self { table }
    }

    fn candidates(&self) -> impl Iterator<Item = BaseCandidate> + 'a {
        let table: &'a VoteTable = self.table;
        table
            .iter()
            .map(|(base, votes)| BaseCandidate { base, votes })
    }

    /// The most voted base address.
    ///
    /// Fails with [`BaseGuessError::EmptyResult`] when nothing was voted for.
    pub fn best(&self) -> Result<BaseCandidate> {
        self.candidates()
            .min_by(BaseCandidate::rank)
            .ok_or_else(|| BaseGuessError::EmptyResult {
                reason: "no pointer correlated with any candidate string".to_string(),
            })
    }

    /// Up to `k` candidates in ranking order.
    pub fn top_k(&self, k: usize) -> Vec<BaseCandidate> {
        let mut all: Vec<BaseCandidate> = self.candidates().collect();
        if k < all.len() {
            all.select_nth_unstable_by(k, BaseCandidate::rank);
            all.truncate(k);
        }
        all.sort_unstable_by(BaseCandidate::rank);
        all
    }
}
