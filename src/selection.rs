//! Solver output as a bitset over the concatenated candidate pools.

use fixedbitset::FixedBitSet;

use crate::config::ContestConfig;
use crate::error::SolverError;
use crate::players::CandidatePool;

/// One solve outcome: a bit per candidate, captain pool first, then flex pool.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Selection {
    bits: FixedBitSet,
    captain_len: usize,
}

impl Selection {
    /// Builds a selection from raw positions. Positions past the pool are ignored.
    pub fn from_positions(pool: &CandidatePool, positions: impl IntoIterator<Item = usize>) -> Self {
        let mut bits = FixedBitSet::with_capacity(pool.len());
        for position in positions.into_iter().filter(|p| *p < pool.len()) {
            bits.insert(position);
        }
        Self {
            bits,
            captain_len: pool.captains().len(),
        }
    }

    /// Decodes solver values, rejecting anything that does not fill the roster exactly.
    pub fn decode(
        values: &[bool],
        pool: &CandidatePool,
        contest: &ContestConfig,
    ) -> Result<Self, SolverError> {
        if values.len() != pool.len() {
            return Err(SolverError::InvalidModel(format!(
                "solution has {} values for {} candidates",
                values.len(),
                pool.len()
            )));
        }
        let selection = Self::from_positions(
            pool,
            values
                .iter()
                .enumerate()
                .filter(|(_, on)| **on)
                .map(|(position, _)| position),
        );
        let (captains, flex) = (selection.captain_count(), selection.flex_count());
        if captains != contest.captain_slots || flex != contest.flex_slots {
            return Err(SolverError::InconsistentSolution { captains, flex });
        }
        Ok(selection)
    }

    pub fn contains(&self, position: usize) -> bool {
        self.bits.contains(position)
    }

    /// Selected positions in ascending order, captains first.
    pub fn positions(&self) -> impl Iterator<Item = usize> + '_ {
        self.bits.ones()
    }

    pub fn captain_count(&self) -> usize {
        self.bits.count_ones(..self.captain_len)
    }

    pub fn flex_count(&self) -> usize {
        self.bits.count_ones(self.captain_len..)
    }

    /// Number of selected positions.
    pub fn len(&self) -> usize {
        self.bits.count_ones(..)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Number of positions selected in both.
    pub fn overlap(&self, other: &Selection) -> usize {
        self.bits.intersection(&other.bits).count()
    }
}
