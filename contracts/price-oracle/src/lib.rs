//! Price Oracle Book
//!
//! Price feeds keyed by oracle reference, each posted by a trusted operator.
//! Prices are 18-decimal fixed point. The vault engine reads them through
//! the [`PriceOracle`] trait and trusts whatever it gets; no staleness rule
//! is applied here.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use xhedge_common::{
    errors::{XHedgeError, XHedgeResult},
    events::{EventLog, XHedgeEvent},
    interfaces::PriceOracle,
    types::{Address, CallContext, OracleRef, ZERO_ADDRESS},
};

// ============ Feed State ============

/// A single price feed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct PriceFeed {
    /// Latest price (18 decimals)
    pub price: u128,
    /// Only this address may post prices
    pub operator: Address,
    /// Unix time of the last post
    pub updated_at: u64,
}

/// All registered feeds
#[derive(
    Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct OracleBook {
    feeds: BTreeMap<OracleRef, PriceFeed>,
    #[serde(skip)]
    #[borsh(skip)]
    events: EventLog,
}

impl OracleBook {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or re-register) a feed with its operator and first price.
    pub fn register(
        &mut self,
        oracle: OracleRef,
        operator: Address,
        price: u128,
        now: u64,
    ) -> XHedgeResult<()> {
        if operator == ZERO_ADDRESS {
            return Err(XHedgeError::InvalidAddress {
                reason: "oracle operator cannot be zero address",
            });
        }
        if price == 0 {
            return Err(XHedgeError::InvalidPrice { price });
        }

        self.feeds.insert(oracle, PriceFeed { price, operator, updated_at: now });
        debug!(price, "oracle feed registered");
        Ok(())
    }

    /// Post a new price. Only the feed operator may call this.
    pub fn update_price(
        &mut self,
        ctx: &CallContext,
        oracle: OracleRef,
        new_price: u128,
    ) -> XHedgeResult<()> {
        let feed = self
            .feeds
            .get_mut(&oracle)
            .ok_or(XHedgeError::OracleNotFound { oracle })?;

        if ctx.caller != feed.operator {
            warn!("price update from non-operator rejected");
            return Err(XHedgeError::OracleUnauthorized {
                expected: feed.operator,
                actual: ctx.caller,
            });
        }
        if new_price == 0 {
            return Err(XHedgeError::InvalidPrice { price: new_price });
        }

        let old_price = feed.price;
        feed.price = new_price;
        feed.updated_at = ctx.now;

        self.events.emit(XHedgeEvent::PriceUpdated {
            oracle,
            old_price,
            new_price,
            timestamp: ctx.now,
        });
        debug!(old_price, new_price, "price updated");
        Ok(())
    }

    pub fn feed(&self, oracle: &OracleRef) -> Option<&PriceFeed> {
        self.feeds.get(oracle)
    }

    /// Drain price update notifications
    pub fn take_events(&mut self) -> Vec<XHedgeEvent> {
        self.events.take()
    }
}

impl PriceOracle for OracleBook {
    fn current_price(&self, oracle: &OracleRef) -> XHedgeResult<u128> {
        let feed = self
            .feeds
            .get(oracle)
            .ok_or(XHedgeError::OracleNotFound { oracle: *oracle })?;

        // A zero price would divide by zero downstream
        if feed.price == 0 {
            return Err(XHedgeError::InvalidPrice { price: feed.price });
        }
        Ok(feed.price)
    }
}

// ============ Tests ============

#[cfg(test)]
mod tests {
    use super::*;

    const PRICE_600: u128 = 600_000_000_000_000_000_000;
    const PRICE_450: u128 = 450_000_000_000_000_000_000;
    const FEED: OracleRef = [9u8; 20];
    const OPERATOR: Address = [1u8; 32];

    fn create_test_book() -> OracleBook {
        let mut book = OracleBook::new();
        book.register(FEED, OPERATOR, PRICE_600, 100).unwrap();
        book
    }

    #[test]
    fn test_current_price() {
        let book = create_test_book();
        assert_eq!(book.current_price(&FEED).unwrap(), PRICE_600);
    }

    #[test]
    fn test_unknown_feed() {
        let book = create_test_book();
        let result = book.current_price(&[3u8; 20]);
        assert!(matches!(result, Err(XHedgeError::OracleNotFound { .. })));
    }

    #[test]
    fn test_update_price_success() {
        let mut book = create_test_book();
        let ctx = CallContext::new(OPERATOR, 200);

        book.update_price(&ctx, FEED, PRICE_450).unwrap();

        assert_eq!(book.current_price(&FEED).unwrap(), PRICE_450);
        assert_eq!(book.feed(&FEED).unwrap().updated_at, 200);
        assert_eq!(
            book.take_events(),
            vec![XHedgeEvent::PriceUpdated {
                oracle: FEED,
                old_price: PRICE_600,
                new_price: PRICE_450,
                timestamp: 200,
            }]
        );
    }

    #[test]
    fn test_update_price_unauthorized() {
        let mut book = create_test_book();
        let ctx = CallContext::new([99u8; 32], 200);

        let result = book.update_price(&ctx, FEED, PRICE_450);
        assert!(matches!(result, Err(XHedgeError::OracleUnauthorized { .. })));
        assert_eq!(book.current_price(&FEED).unwrap(), PRICE_600);
        assert!(book.take_events().is_empty());
    }

    #[test]
    fn test_zero_price_rejected() {
        let mut book = create_test_book();
        let ctx = CallContext::new(OPERATOR, 200);

        let result = book.update_price(&ctx, FEED, 0);
        assert_eq!(result, Err(XHedgeError::InvalidPrice { price: 0 }));

        let result = book.register([4u8; 20], OPERATOR, 0, 200);
        assert_eq!(result, Err(XHedgeError::InvalidPrice { price: 0 }));
    }
}
