//! XHedge Common Library
//!
//! Shared types, constants, and utilities for the XHedge ledger crates.
//!
//! ## The Ledger
//!
//! A user locks a deposit against a reference price feed and receives two
//! separately transferable claims:
//! - **Lever claim** (even token id): leveraged upside on the deposit
//! - **Hedge claim** (odd token id): a fixed `hedge_value` worth of deposit
//!   at the settlement price
//!
//! ## Modules
//!
//! - **Constants**: fixed-point precision, dust threshold, vote cap, fees
//! - **Errors**: one named failure per rejected precondition
//! - **Types**: vault record, claim pair, packed creation arguments
//! - **Math**: 256-bit mul-div and the pure payout rules
//! - **Events**: notifications for off-ledger observers
//! - **Interfaces**: price oracle, token registry and payout sink traits

pub mod constants;
pub mod errors;
pub mod events;
pub mod interfaces;
pub mod math;
pub mod types;

// Re-exports for convenience
pub use constants::*;
pub use errors::*;
pub use events::*;
pub use interfaces::*;
pub use math::*;
pub use types::*;
