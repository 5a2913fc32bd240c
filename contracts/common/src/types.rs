//! Core Types for the XHedge Ledger
//!
//! This module defines the vault record, the lever/hedge claim pair that
//! every vault owns, and the argument shapes accepted by the engine.

use borsh::{BorshDeserialize, BorshSerialize};
use primitive_types::U256;
use serde::{Deserialize, Serialize};

use crate::constants::packing;
use crate::errors::{XHedgeError, XHedgeResult};

/// Type alias for account addresses
pub type Address = [u8; 32];

/// Opaque identifier of a delegation target
pub type ValidatorId = [u8; 32];

/// Reference to a price feed (160-bit, fits the packed layout)
pub type OracleRef = [u8; 20];

/// Vault serial number
pub type SerialNumber = u64;

/// Claim token identifier (`2*sn` lever, `2*sn+1` hedge)
pub type TokenId = u128;

/// The all-zero address
pub const ZERO_ADDRESS: Address = [0u8; 32];

// ============ Claim Types ============

/// Which side of a vault a claim token represents
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, BorshSerialize,
    BorshDeserialize,
)]
pub enum ClaimKind {
    /// Even token id: leveraged upside
    Lever,
    /// Odd token id: downside protection
    Hedge,
}

impl ClaimKind {
    /// Classify a token id by its parity
    pub fn of(token_id: TokenId) -> Self {
        if token_id & 1 == 0 {
            Self::Lever
        } else {
            Self::Hedge
        }
    }
}

/// The two claim tokens of one vault, addressed by its serial number.
///
/// Token ids are derived, never stored, so the lever and hedge claims of a
/// vault cannot drift apart.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct VaultClaims {
    pub sn: SerialNumber,
}

impl VaultClaims {
    pub fn new(sn: SerialNumber) -> Self {
        Self { sn }
    }

    /// Resolve a token id to its vault and side.
    ///
    /// Returns `None` for ids whose serial would not fit a `u64`.
    pub fn from_token(token_id: TokenId) -> Option<(Self, ClaimKind)> {
        let sn = u64::try_from(token_id >> 1).ok()?;
        Some((Self::new(sn), ClaimKind::of(token_id)))
    }

    pub fn lever(&self) -> TokenId {
        (self.sn as u128) << 1
    }

    pub fn hedge(&self) -> TokenId {
        ((self.sn as u128) << 1) | 1
    }

    pub fn token(&self, kind: ClaimKind) -> TokenId {
        match kind {
            ClaimKind::Lever => self.lever(),
            ClaimKind::Hedge => self.hedge(),
        }
    }
}

// ============ Vault Types ============

/// Individual vault state.
///
/// An all-zero record (`amount == 0`) stands for an unknown or closed vault.
#[derive(
    Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Vault {
    /// Collateral rate locked at creation (18 decimals)
    pub init_collateral_rate: u64,
    /// Collateral rate at which early closeout opens (18 decimals)
    pub min_collateral_rate: u64,
    /// Extra share paid to the hedge side on closeout (18 decimals)
    pub closeout_penalty: u64,
    /// Unix time from which the vault can be liquidated
    pub mature_time: u64,
    /// Delegation target, set by the lever owner
    pub validator_to_vote: ValidatorId,
    /// Hedged value in price units (18 decimals)
    pub hedge_value: u128,
    /// Price feed for this vault
    pub oracle: OracleRef,
    /// Locked deposit (18 decimals)
    pub amount: u128,
    /// Unix time of the last vote accumulation
    pub last_vote_time: u64,
}

impl Vault {
    /// Returns true if the vault still holds a deposit
    pub fn is_open(&self) -> bool {
        self.amount != 0
    }

    /// Returns true once `now` has reached maturity
    pub fn is_mature(&self, now: u64) -> bool {
        now >= self.mature_time
    }
}

/// Parameters of a new vault, as passed to `create`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct CreateVaultParams {
    pub init_collateral_rate: u64,
    pub min_collateral_rate: u64,
    pub closeout_penalty: u64,
    pub mature_time: u64,
    pub validator_to_vote: ValidatorId,
    pub hedge_value: u128,
    pub oracle: OracleRef,
}

/// `CreateVaultParams` squeezed into three 256-bit words.
///
/// ```text
/// word0 = init_rate << 192 | min_rate << 128 | penalty << 64 | mature_time
/// word1 = validator_to_vote
/// word2 = hedge_value << 160 | oracle
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackedCreateArgs {
    pub word0: U256,
    pub word1: U256,
    pub word2: U256,
}

impl PackedCreateArgs {
    /// Pack parameters; fails if `hedge_value` needs more than 96 bits
    pub fn pack(params: &CreateVaultParams) -> XHedgeResult<Self> {
        let hedge_bits = 256 - packing::HEDGE_VALUE_SHIFT;
        if params.hedge_value >> hedge_bits != 0 {
            return Err(XHedgeError::Overflow);
        }

        let word0 = (U256::from(params.init_collateral_rate) << packing::INIT_RATE_SHIFT)
            | (U256::from(params.min_collateral_rate) << packing::MIN_RATE_SHIFT)
            | (U256::from(params.closeout_penalty) << packing::PENALTY_SHIFT)
            | U256::from(params.mature_time);

        let word1 = U256::from_big_endian(&params.validator_to_vote);

        let mut oracle_word = [0u8; 32];
        oracle_word[32 - packing::ORACLE_REF_BYTES..].copy_from_slice(&params.oracle);
        let word2 = (U256::from(params.hedge_value) << packing::HEDGE_VALUE_SHIFT)
            | U256::from_big_endian(&oracle_word);

        Ok(Self { word0, word1, word2 })
    }

    /// Unpack into the same parameters `create` takes
    pub fn unpack(&self) -> CreateVaultParams {
        let low64 = |w: U256| w.low_u64();

        let mut validator_to_vote = [0u8; 32];
        self.word1.to_big_endian(&mut validator_to_vote);

        let mut word2_bytes = [0u8; 32];
        self.word2.to_big_endian(&mut word2_bytes);
        let mut oracle = [0u8; packing::ORACLE_REF_BYTES];
        oracle.copy_from_slice(&word2_bytes[32 - packing::ORACLE_REF_BYTES..]);

        CreateVaultParams {
            init_collateral_rate: low64(self.word0 >> packing::INIT_RATE_SHIFT),
            min_collateral_rate: low64(self.word0 >> packing::MIN_RATE_SHIFT),
            closeout_penalty: low64(self.word0 >> packing::PENALTY_SHIFT),
            mature_time: low64(self.word0),
            validator_to_vote,
            // 96 significant bits at most after the shift
            hedge_value: (self.word2 >> packing::HEDGE_VALUE_SHIFT).low_u128(),
            oracle,
        }
    }
}

// ============ Call Types ============

/// Identity and clock of the host call being executed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallContext {
    /// Caller address
    pub caller: Address,
    /// Current unix time in seconds
    pub now: u64,
}

impl CallContext {
    pub fn new(caller: Address, now: u64) -> Self {
        Self { caller, now }
    }
}

/// Why value leaves the ledger
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub enum PayoutReason {
    /// Overpayment returned on creation
    Refund,
    /// Whole-owner exit
    Burn,
    /// Hedge side of a closeout or liquidation
    HedgeSettlement,
    /// Lever side of a closeout or liquidation
    LeverSettlement,
    /// Collateral withdrawn by the lever owner
    Withdrawal,
}

/// A single value transfer out of the ledger
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
pub struct Payout {
    pub to: Address,
    pub amount: u128,
    pub reason: PayoutReason,
}

impl Payout {
    pub fn new(to: Address, amount: u128, reason: PayoutReason) -> Self {
        Self { to, amount, reason }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_params() -> CreateVaultParams {
        CreateVaultParams {
            init_collateral_rate: 500_000_000_000_000_000,
            min_collateral_rate: 200_000_000_000_000_000,
            closeout_penalty: 10_000_000_000_000_000,
            mature_time: 1_700_001_800,
            validator_to_vote: [7u8; 32],
            hedge_value: 30_000 * 1_000_000_000_000_000_000,
            oracle: [9u8; 20],
        }
    }

    #[test]
    fn test_claim_ids() {
        let claims = VaultClaims::new(5);
        assert_eq!(claims.lever(), 10);
        assert_eq!(claims.hedge(), 11);
        assert_eq!(ClaimKind::of(10), ClaimKind::Lever);
        assert_eq!(ClaimKind::of(11), ClaimKind::Hedge);

        let (back, kind) = VaultClaims::from_token(11).unwrap();
        assert_eq!(back, claims);
        assert_eq!(kind, ClaimKind::Hedge);
        assert_eq!(back.token(ClaimKind::Lever), 10);
    }

    #[test]
    fn test_token_beyond_serial_range() {
        assert!(VaultClaims::from_token(u128::MAX).is_none());
    }

    #[test]
    fn test_zero_vault_is_closed() {
        let vault = Vault::default();
        assert!(!vault.is_open());
        assert!(vault.is_mature(0));
    }

    #[test]
    fn test_packed_layout_matches_fields() {
        let params = sample_params();
        let packed = PackedCreateArgs::pack(&params).unwrap();

        // mature_time sits in the lowest 64 bits of word0
        assert_eq!(packed.word0.low_u64(), params.mature_time);
        // hedge value sits above the 160-bit oracle ref
        assert_eq!((packed.word2 >> 160).low_u128(), params.hedge_value);
        assert_eq!(packed.unpack(), params);
    }

    #[test]
    fn test_pack_rejects_wide_hedge_value() {
        let mut params = sample_params();
        params.hedge_value = 1u128 << 96;
        assert_eq!(PackedCreateArgs::pack(&params), Err(XHedgeError::Overflow));
    }
}
