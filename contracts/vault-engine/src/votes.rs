//! Vote Accumulator
//!
//! Time-weighted stake per validator, summed across every vault that voted
//! for it. Totals only ever grow.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use xhedge_common::{
    errors::XHedgeResult,
    math::safe_add,
    types::ValidatorId,
};

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct VoteAccumulator {
    val_to_votes: BTreeMap<ValidatorId, u128>,
}

impl VoteAccumulator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accumulated weight of `validator` (0 if never voted for)
    pub fn votes_of(&self, validator: &ValidatorId) -> u128 {
        self.val_to_votes.get(validator).copied().unwrap_or(0)
    }

    /// A validator nobody has voted for yet
    pub fn is_new(&self, validator: &ValidatorId) -> bool {
        self.votes_of(validator) == 0
    }

    /// Total `validator` would reach after adding `incr`
    pub fn total_after(&self, validator: &ValidatorId, incr: u128) -> XHedgeResult<u128> {
        safe_add(self.votes_of(validator), incr)
    }

    /// Add `incr` to `validator`, returning the new total
    pub fn accumulate(&mut self, validator: ValidatorId, incr: u128) -> XHedgeResult<u128> {
        let total = self.total_after(&validator, incr)?;
        if total != 0 {
            self.val_to_votes.insert(validator, total);
        }
        Ok(total)
    }

    /// Validators with a non-zero total, in id order
    pub fn iter(&self) -> impl Iterator<Item = (&ValidatorId, &u128)> {
        self.val_to_votes.iter()
    }
}
