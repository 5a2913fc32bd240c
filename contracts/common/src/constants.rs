//! Protocol Constants
//!
//! All magic numbers and default configuration values for the XHedge ledger.
//!
//! # Network Configuration
//!
//! Use feature flags to compile for different networks:
//! - `mainnet` - Production values (higher dust threshold, stricter vote switching)
//! - Default (no feature) - Testnet values (small vaults allowed for testing)
//!
//! ```toml
//! # For mainnet deployment:
//! xhedge-common = { path = "...", features = ["mainnet"] }
//! ```

/// Fixed-point precision
pub mod precision {
    /// 1.0 in 18-decimal fixed point
    pub const WAD: u128 = 1_000_000_000_000_000_000;
}

/// Locked amount limits
///
/// Values differ between mainnet and testnet to allow easier testing.
pub mod limits {
    /// Dust threshold: a vault must lock strictly more than this.
    ///
    /// Below it, the per-unit divisions in closeout and liquidation lose
    /// too much precision.
    /// - Mainnet: 0.01 coin
    /// - Testnet: 0.0001 coin
    #[cfg(feature = "mainnet")]
    pub const MIN_LOCKED_AMOUNT: u128 = 10_000_000_000_000_000;
    #[cfg(not(feature = "mainnet"))]
    pub const MIN_LOCKED_AMOUNT: u128 = 100_000_000_000_000;

    /// First serial number handed out; 0 is never a vault
    pub const FIRST_SERIAL: u64 = 1;

    /// Helper to check if running in mainnet mode
    #[cfg(feature = "mainnet")]
    pub const IS_MAINNET: bool = true;
    #[cfg(not(feature = "mainnet"))]
    pub const IS_MAINNET: bool = false;
}

/// Time-related constants (seconds)
pub mod time {
    /// Seconds per day
    pub const ONE_DAY: u64 = 24 * 60 * 60;
}

/// Time-weighted voting configuration
pub mod voting {
    use super::precision::WAD;
    use super::time::ONE_DAY;

    /// Cap on elapsed time credited by a single vote (14 days)
    pub const MAX_VOTE_ELAPSED: u64 = 14 * ONE_DAY;

    /// Weight a vote must carry to give a validator its first votes.
    ///
    /// Expressed in coin-seconds (amount x elapsed).
    /// - Mainnet: 100 coin-days
    /// - Testnet: 10 coin-days
    #[cfg(feature = "mainnet")]
    pub const MIN_VOTES_FOR_NEW_VALIDATOR: u128 = 100 * WAD * ONE_DAY as u128;
    #[cfg(not(feature = "mainnet"))]
    pub const MIN_VOTES_FOR_NEW_VALIDATOR: u128 = 10 * WAD * ONE_DAY as u128;
}

/// Fee Configuration (18-decimal fixed point, WAD = 100%)
pub mod fees {
    /// Fee retained in the vault when the lever side withdraws (0.5%)
    pub const WITHDRAWAL_FEE_RATE: u128 = 5_000_000_000_000_000;
}

/// Packed creation argument layout
pub mod packing {
    /// Bit offset of `init_collateral_rate` inside word 0
    pub const INIT_RATE_SHIFT: usize = 192;
    /// Bit offset of `min_collateral_rate` inside word 0
    pub const MIN_RATE_SHIFT: usize = 128;
    /// Bit offset of `closeout_penalty` inside word 0
    pub const PENALTY_SHIFT: usize = 64;
    /// Bit offset of `hedge_value` inside word 2 (below it sits the oracle ref)
    pub const HEDGE_VALUE_SHIFT: usize = 160;
    /// Width of the oracle reference in bytes
    pub const ORACLE_REF_BYTES: usize = 20;
}
