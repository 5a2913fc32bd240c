//! XHedge Claim Token Registry
//!
//! Non-fungible ownership registry for lever and hedge claims. Each vault
//! owns two tokens, `2*sn` (lever) and `2*sn+1` (hedge); this crate only
//! tracks who holds them.
//!
//! Minting and burning are driven by the vault engine through the
//! [`TokenRegistry`] trait. Holders move claims with
//! [`ClaimRegistry::transfer_from`].

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::debug;

use xhedge_common::{
    errors::{XHedgeError, XHedgeResult},
    events::{EventLog, XHedgeEvent},
    interfaces::TokenRegistry,
    types::{Address, CallContext, ClaimKind, TokenId, ZERO_ADDRESS},
};

// ============ Registry State ============

/// In-memory claim token registry
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct ClaimRegistry {
    /// Owner of every live token
    owners: BTreeMap<TokenId, Address>,
    /// Number of live tokens per owner
    balances: BTreeMap<Address, u64>,
    /// Tokens ever minted
    total_minted: u64,
    /// Tokens ever burned
    total_burned: u64,
    #[serde(skip)]
    #[borsh(skip)]
    events: EventLog,
}

impl ClaimRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live tokens
    pub fn total_supply(&self) -> u64 {
        self.total_minted - self.total_burned
    }

    /// Move a claim on behalf of its holder.
    ///
    /// The caller must be the current owner; the recipient must not be the
    /// zero address.
    pub fn transfer_from(
        &mut self,
        ctx: &CallContext,
        to: Address,
        token_id: TokenId,
    ) -> XHedgeResult<()> {
        self.transfer(ctx.caller, to, token_id)?;

        self.events.emit(XHedgeEvent::ClaimTransferred {
            token_id,
            from: ctx.caller,
            to,
            timestamp: ctx.now,
        });
        Ok(())
    }

    /// Tokens of `owner` on one side, in id order
    pub fn tokens_of(&self, owner: &Address, kind: ClaimKind) -> Vec<TokenId> {
        self.owners
            .iter()
            .filter(|(id, holder)| *holder == owner && ClaimKind::of(**id) == kind)
            .map(|(id, _)| *id)
            .collect()
    }

    /// Drain transfer notifications
    pub fn take_events(&mut self) -> Vec<XHedgeEvent> {
        self.events.take()
    }

    fn credit(&mut self, owner: Address) {
        *self.balances.entry(owner).or_insert(0) += 1;
    }

    fn debit(&mut self, owner: &Address) {
        if let Some(balance) = self.balances.get_mut(owner) {
            *balance -= 1;
            if *balance == 0 {
                self.balances.remove(owner);
            }
        }
    }
}

impl TokenRegistry for ClaimRegistry {
    fn mint(&mut self, to: Address, token_id: TokenId) -> XHedgeResult<()> {
        if to == ZERO_ADDRESS {
            return Err(XHedgeError::InvalidAddress { reason: "cannot mint claim to zero address" });
        }
        if self.owners.contains_key(&token_id) {
            return Err(XHedgeError::TokenAlreadyMinted { token_id });
        }

        self.owners.insert(token_id, to);
        self.credit(to);
        self.total_minted += 1;
        debug!(token_id, "claim minted");
        Ok(())
    }

    fn burn(&mut self, token_id: TokenId) -> XHedgeResult<Address> {
        let owner = self
            .owners
            .remove(&token_id)
            .ok_or(XHedgeError::TokenNotFound { token_id })?;

        self.debit(&owner);
        self.total_burned += 1;
        debug!(token_id, "claim burned");
        Ok(owner)
    }

    fn owner_of(&self, token_id: TokenId) -> Option<Address> {
        self.owners.get(&token_id).copied()
    }

    fn transfer(&mut self, from: Address, to: Address, token_id: TokenId) -> XHedgeResult<()> {
        if to == ZERO_ADDRESS {
            return Err(XHedgeError::InvalidAddress {
                reason: "cannot transfer claim to zero address",
            });
        }
        let owner = self
            .owners
            .get_mut(&token_id)
            .ok_or(XHedgeError::TokenNotFound { token_id })?;
        if *owner != from {
            return Err(XHedgeError::NotTokenOwner { token_id, from });
        }

        *owner = to;
        self.debit(&from);
        self.credit(to);
        Ok(())
    }

    fn balance_of(&self, owner: &Address) -> u64 {
        self.balances.get(owner).copied().unwrap_or(0)
    }
}

// ============ Tests ============
