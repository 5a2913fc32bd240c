//! Payout Ledger
//!
//! In-memory [`PayoutSink`] that credits withdrawable balances. A host with
//! real value transfer plugs in its own sink instead.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::debug;

use xhedge_common::{
    errors::{XHedgeError, XHedgeResult},
    interfaces::PayoutSink,
    math::safe_add,
    types::{Address, Payout, ZERO_ADDRESS},
};

#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Balances {
    credited: BTreeMap<Address, u128>,
    total_paid: u128,
}

impl Balances {
    pub fn new() -> Self {
        Self::default()
    }

    /// Value credited to `owner` and not yet withdrawn
    pub fn balance_of(&self, owner: &Address) -> u128 {
        self.credited.get(owner).copied().unwrap_or(0)
    }

    /// Everything ever paid out of the ledger
    pub fn total_paid(&self) -> u128 {
        self.total_paid
    }

    /// Hand the whole balance of `owner` to the host
    pub fn withdraw(&mut self, owner: &Address) -> u128 {
        self.credited.remove(owner).unwrap_or(0)
    }
}

impl PayoutSink for Balances {
    fn deliver(&mut self, payouts: &[Payout]) -> XHedgeResult<()> {
        // Stage the whole batch before touching any balance
        let mut staged: BTreeMap<Address, u128> = BTreeMap::new();
        let mut total_paid = self.total_paid;
        for payout in payouts.iter().filter(|p| p.amount > 0) {
            if payout.to == ZERO_ADDRESS {
                return Err(XHedgeError::PayoutFailed { to: payout.to, amount: payout.amount });
            }
            let current = match staged.get(&payout.to) {
                Some(balance) => *balance,
                None => self.balance_of(&payout.to),
            };
            staged.insert(payout.to, safe_add(current, payout.amount)?);
            total_paid = safe_add(total_paid, payout.amount)?;
        }

        for (to, balance) in staged {
            self.credited.insert(to, balance);
        }
        self.total_paid = total_paid;
        debug!(count = payouts.len(), total_paid, "payouts delivered");
        Ok(())
    }
}
