//! Error Types for the XHedge Ledger
//!
//! Every operation either succeeds or aborts with one of these named
//! conditions, leaving no partial state behind.

use thiserror::Error;

use crate::types::{Address, OracleRef, SerialNumber, TokenId};

/// Result type alias for XHedge operations
pub type XHedgeResult<T> = Result<T, XHedgeError>;

/// Main error enum for all XHedge ledger errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum XHedgeError {
    // ============ Validation Errors ============
    /// Minimum collateral rate exceeds the initial one
    #[error("collateral rates do not match: min {min_rate} > init {init_rate}")]
    CollateralRatesNotMatch { init_rate: u64, min_rate: u64 },

    /// Maturity is not in the future
    #[error("invalid mature time {mature_time} (now {now})")]
    InvalidMatureTime { mature_time: u64, now: u64 },

    /// Required locked amount is at or below the dust threshold
    #[error("locked amount too small: {required} <= {minimum}")]
    LockedAmountTooSmall { required: u128, minimum: u128 },

    /// Attached value does not cover the required locked amount
    #[error("not enough paid: {paid} < {required}")]
    NotEnoughPaid { paid: u128, required: u128 },

    /// Attached value does not match what the operation expects
    #[error("bad attached value: expected {expected}, got {paid}")]
    BadMsgVal { expected: u128, paid: u128 },

    // ============ Authorization Errors ============
    /// Caller does not own the token
    #[error("caller does not own token {token_id}")]
    NotOwner { token_id: TokenId, caller: Address },

    /// Caller does not own both claims of the vault
    #[error("caller is not the owner of both claims of vault {sn}")]
    NotWholeOwner { sn: SerialNumber, caller: Address },

    /// Token is not a lever claim
    #[error("token {token_id} is not a lever claim")]
    NotLeverNft { token_id: TokenId },

    /// Token is not a hedge claim
    #[error("token {token_id} is not a hedge claim")]
    NotHedgeNft { token_id: TokenId },

    // ============ Lifecycle Errors ============
    /// Vault unknown or already closed
    #[error("vault {sn} not found")]
    VaultNotFound { sn: SerialNumber },

    /// Closeout attempted at or after maturity
    #[error("vault {sn} already mature at {mature_time} (now {now})")]
    AlreadyMature { sn: SerialNumber, mature_time: u64, now: u64 },

    /// Liquidation attempted before maturity
    #[error("vault {sn} not mature until {mature_time} (now {now})")]
    NotMature { sn: SerialNumber, mature_time: u64, now: u64 },

    // ============ Economic Guard Errors ============
    /// Collateralization still above the closeout edge
    #[error("price too high for closeout: value ratio {value_ratio} > {limit}")]
    PriceTooHigh { value_ratio: u128, limit: u128 },

    /// Decrease would leave the vault under-collateralized or dusty
    #[error("amount not enough after decrease: stored {stored}")]
    AmtNotEnough { stored: u128 },

    /// First votes for a validator carry too little weight
    #[error("not enough votes for new validator: {incr_votes} < {minimum}")]
    NotEnoughVotesForNewVal { incr_votes: u128, minimum: u128 },

    // ============ Oracle Errors ============
    /// No price feed registered under this reference
    #[error("oracle not found")]
    OracleNotFound { oracle: OracleRef },

    /// Feed returned or was given an unusable price
    #[error("invalid price {price}")]
    InvalidPrice { price: u128 },

    /// Only the feed operator may update it
    #[error("oracle update not authorized")]
    OracleUnauthorized { expected: Address, actual: Address },

    // ============ Token Errors ============
    /// Token does not exist
    #[error("token {token_id} not found")]
    TokenNotFound { token_id: TokenId },

    /// Token id already has an owner
    #[error("token {token_id} already minted")]
    TokenAlreadyMinted { token_id: TokenId },

    /// Transfer source is not the current owner
    #[error("transfer of token {token_id} not authorized")]
    NotTokenOwner { token_id: TokenId, from: Address },

    /// Invalid address (e.g., zero address)
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: &'static str },

    // ============ Value Transfer Errors ============
    /// Payout batch could not be delivered
    #[error("payout to recipient failed")]
    PayoutFailed { to: Address, amount: u128 },

    // ============ Configuration Errors ============
    /// Engine configuration rejected
    #[error("invalid config {param}: {reason}")]
    InvalidConfig { param: &'static str, reason: &'static str },

    // ============ Math Errors ============
    /// Arithmetic overflow occurred
    #[error("arithmetic overflow")]
    Overflow,

    /// Arithmetic underflow occurred
    #[error("arithmetic underflow")]
    Underflow,

    /// Division by zero
    #[error("division by zero")]
    DivisionByZero,
}

/// Broad classes of failure
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Validation,
    Authorization,
    Lifecycle,
    EconomicGuard,
    Oracle,
    Token,
    ValueTransfer,
    Config,
    Math,
}

impl XHedgeError {
    /// Returns a stable error code for logging/debugging
    pub fn code(&self) -> &'static str {
        match self {
            Self::CollateralRatesNotMatch { .. } => "E001_COLLATERAL_RATES_NOT_MATCH",
            Self::InvalidMatureTime { .. } => "E002_INVALID_MATURE_TIME",
            Self::LockedAmountTooSmall { .. } => "E003_LOCKED_AMOUNT_TOO_SMALL",
            Self::NotEnoughPaid { .. } => "E004_NOT_ENOUGH_PAID",
            Self::BadMsgVal { .. } => "E005_BAD_MSG_VAL",
            Self::NotOwner { .. } => "E010_NOT_OWNER",
            Self::NotWholeOwner { .. } => "E011_NOT_WHOLE_OWNER",
            Self::NotLeverNft { .. } => "E012_NOT_LEVER_NFT",
            Self::NotHedgeNft { .. } => "E013_NOT_HEDGE_NFT",
            Self::VaultNotFound { .. } => "E020_VAULT_NOT_FOUND",
            Self::AlreadyMature { .. } => "E021_ALREADY_MATURE",
            Self::NotMature { .. } => "E022_NOT_MATURE",
            Self::PriceTooHigh { .. } => "E030_PRICE_TOO_HIGH",
            Self::AmtNotEnough { .. } => "E031_AMT_NOT_ENOUGH",
            Self::NotEnoughVotesForNewVal { .. } => "E032_NOT_ENOUGH_VOTES_FOR_NEW_VAL",
            Self::OracleNotFound { .. } => "E040_ORACLE_NOT_FOUND",
            Self::InvalidPrice { .. } => "E041_INVALID_PRICE",
            Self::OracleUnauthorized { .. } => "E042_ORACLE_UNAUTHORIZED",
            Self::TokenNotFound { .. } => "E050_TOKEN_NOT_FOUND",
            Self::TokenAlreadyMinted { .. } => "E051_TOKEN_ALREADY_MINTED",
            Self::NotTokenOwner { .. } => "E052_NOT_TOKEN_OWNER",
            Self::InvalidAddress { .. } => "E053_INVALID_ADDRESS",
            Self::PayoutFailed { .. } => "E060_PAYOUT_FAILED",
            Self::InvalidConfig { .. } => "E070_INVALID_CONFIG",
            Self::Overflow => "E080_OVERFLOW",
            Self::Underflow => "E081_UNDERFLOW",
            Self::DivisionByZero => "E082_DIV_ZERO",
        }
    }

    /// Returns the failure class of this error
    pub fn category(&self) -> ErrorCategory {
        match self {
            Self::CollateralRatesNotMatch { .. }
            | Self::InvalidMatureTime { .. }
            | Self::LockedAmountTooSmall { .. }
            | Self::NotEnoughPaid { .. }
            | Self::BadMsgVal { .. } => ErrorCategory::Validation,
            Self::NotOwner { .. }
            | Self::NotWholeOwner { .. }
            | Self::NotLeverNft { .. }
            | Self::NotHedgeNft { .. } => ErrorCategory::Authorization,
            Self::VaultNotFound { .. } | Self::AlreadyMature { .. } | Self::NotMature { .. } => {
                ErrorCategory::Lifecycle
            }
            Self::PriceTooHigh { .. }
            | Self::AmtNotEnough { .. }
            | Self::NotEnoughVotesForNewVal { .. } => ErrorCategory::EconomicGuard,
            Self::OracleNotFound { .. }
            | Self::InvalidPrice { .. }
            | Self::OracleUnauthorized { .. } => ErrorCategory::Oracle,
            Self::TokenNotFound { .. }
            | Self::TokenAlreadyMinted { .. }
            | Self::NotTokenOwner { .. }
            | Self::InvalidAddress { .. } => ErrorCategory::Token,
            Self::PayoutFailed { .. } => ErrorCategory::ValueTransfer,
            Self::InvalidConfig { .. } => ErrorCategory::Config,
            Self::Overflow | Self::Underflow | Self::DivisionByZero => ErrorCategory::Math,
        }
    }

    /// Returns true if the caller can fix this by retrying later or paying more
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::NotEnoughPaid { .. }      // Attach more value
                | Self::BadMsgVal { .. }    // Attach the exact delta
                | Self::NotMature { .. }    // Wait for maturity
                | Self::PriceTooHigh { .. } // Wait for the price to fall
                | Self::NotEnoughVotesForNewVal { .. } // Let more time elapse
        )
    }
}
