//! Collaborator Interfaces
//!
//! The ledger reads prices, tracks claim ownership and delivers value
//! through these traits. In-memory implementations live in the
//! `xhedge-price-oracle`, `xhedge-claim-token` and `xhedge-vault-engine`
//! crates; a host can plug in its own.

use crate::errors::XHedgeResult;
use crate::types::{Address, OracleRef, Payout, TokenId};

/// Reads the current price of a feed (18-decimal fixed point).
///
/// No staleness guarantee is assumed; whatever is returned is trusted.
pub trait PriceOracle {
    fn current_price(&self, oracle: &OracleRef) -> XHedgeResult<u128>;
}

/// Ownership registry for claim tokens.
pub trait TokenRegistry {
    /// Create `token_id` owned by `to`
    fn mint(&mut self, to: Address, token_id: TokenId) -> XHedgeResult<()>;

    /// Destroy `token_id`, returning its last owner
    fn burn(&mut self, token_id: TokenId) -> XHedgeResult<Address>;

    /// Current owner, or `None` if the token does not exist
    fn owner_of(&self, token_id: TokenId) -> Option<Address>;

    /// Move `token_id` from its current owner `from` to `to`
    fn transfer(&mut self, from: Address, to: Address, token_id: TokenId) -> XHedgeResult<()>;

    /// Number of tokens held by `owner`
    fn balance_of(&self, owner: &Address) -> u64;

    /// Returns true if `token_id` exists
    fn exists(&self, token_id: TokenId) -> bool {
        self.owner_of(token_id).is_some()
    }
}

/// Delivers value leaving the ledger.
///
/// A batch is all-or-nothing: on error no payout of the batch may have
/// taken effect.
pub trait PayoutSink {
    fn deliver(&mut self, payouts: &[Payout]) -> XHedgeResult<()>;
}
