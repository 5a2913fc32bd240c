//! Engine Configuration
//!
//! Tunables default to the compiled protocol constants; a host may load an
//! override from any serde format and must call [`EngineConfig::validate`].

use serde::{Deserialize, Serialize};

use xhedge_common::{
    constants::{fees, limits, precision::WAD, voting},
    errors::{XHedgeError, XHedgeResult},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// A vault must lock strictly more than this
    pub min_locked_amount: u128,
    /// Cap on elapsed seconds credited by a single vote
    pub max_vote_elapsed: u64,
    /// Weight a vote needs to give a validator its first votes
    pub min_votes_for_new_validator: u128,
    /// Withdrawal fee kept in the vault (WAD = 100%)
    pub withdrawal_fee_rate: u128,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            min_locked_amount: limits::MIN_LOCKED_AMOUNT,
            max_vote_elapsed: voting::MAX_VOTE_ELAPSED,
            min_votes_for_new_validator: voting::MIN_VOTES_FOR_NEW_VALIDATOR,
            withdrawal_fee_rate: fees::WITHDRAWAL_FEE_RATE,
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> XHedgeResult<()> {
        if self.max_vote_elapsed == 0 {
            return Err(XHedgeError::InvalidConfig {
                param: "max_vote_elapsed",
                reason: "must be positive",
            });
        }
        if self.withdrawal_fee_rate >= WAD {
            return Err(XHedgeError::InvalidConfig {
                param: "withdrawal_fee_rate",
                reason: "must be below 100%",
            });
        }
        Ok(())
    }
}
