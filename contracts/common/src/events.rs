//! Ledger Events for XHedge
//!
//! Events are collected during an operation and handed to off-ledger
//! observers (indexers, vote automation). The ledger never reads them back.

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use crate::types::{Address, OracleRef, SerialNumber, TokenId, ValidatorId};

/// Event types for indexing and filtering
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize,
)]
#[borsh(use_discriminant = true)]
#[repr(u8)]
pub enum EventType {
    // Vault Events (0x01 - 0x1F)
    VaultCreated = 0x01,
    VaultBurned = 0x02,
    VaultClosedOut = 0x03,
    VaultLiquidated = 0x04,
    AmountUpdated = 0x05,

    // Claim Token Events (0x20 - 0x3F)
    ClaimMinted = 0x20,
    ClaimBurned = 0x21,
    ClaimTransferred = 0x22,

    // Voting Events (0x40 - 0x5F)
    ValidatorToVoteUpdated = 0x40,
    Voted = 0x41,

    // Oracle Events (0x60 - 0x7F)
    PriceUpdated = 0x60,
}

/// Main event enum containing all ledger events
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub enum XHedgeEvent {
    // ============ Vault Events ============

    /// Emitted when a vault is created
    VaultCreated {
        sn: SerialNumber,
        owner: Address,
        lever_token: TokenId,
        hedge_token: TokenId,
        amount: u128,
        timestamp: u64,
    },

    /// Emitted when the joint owner exits with the whole deposit
    VaultBurned {
        sn: SerialNumber,
        owner: Address,
        amount: u128,
        timestamp: u64,
    },

    /// Emitted on early closeout
    VaultClosedOut {
        sn: SerialNumber,
        price: u128,
        to_hedger: u128,
        to_lever: u128,
        timestamp: u64,
    },

    /// Emitted on settlement at maturity
    VaultLiquidated {
        sn: SerialNumber,
        price: u128,
        to_hedger: u128,
        to_lever: u128,
        timestamp: u64,
    },

    /// Emitted when the locked amount changes
    AmountUpdated {
        sn: SerialNumber,
        new_amount: u128,
        timestamp: u64,
    },

    // ============ Claim Token Events ============

    /// Emitted when a claim token is minted
    ClaimMinted {
        token_id: TokenId,
        to: Address,
        timestamp: u64,
    },

    /// Emitted when a claim token is burned
    ClaimBurned {
        token_id: TokenId,
        from: Address,
        timestamp: u64,
    },

    /// Emitted when a claim token changes hands
    ClaimTransferred {
        token_id: TokenId,
        from: Address,
        to: Address,
        timestamp: u64,
    },

    // ============ Voting Events ============

    /// Emitted when the lever owner changes the delegation target
    ValidatorToVoteUpdated {
        sn: SerialNumber,
        new_validator: ValidatorId,
        timestamp: u64,
    },

    /// Emitted when a vault's time-weighted stake is accumulated
    Voted {
        sn: SerialNumber,
        validator: ValidatorId,
        incr_votes: u128,
        new_accumulated_votes: u128,
        timestamp: u64,
    },

    // ============ Oracle Events ============

    /// Emitted when a feed operator posts a new price
    PriceUpdated {
        oracle: OracleRef,
        old_price: u128,
        new_price: u128,
        timestamp: u64,
    },
}

impl XHedgeEvent {
    /// Get the event type for filtering
    pub fn event_type(&self) -> EventType {
        match self {
            Self::VaultCreated { .. } => EventType::VaultCreated,
            Self::VaultBurned { .. } => EventType::VaultBurned,
            Self::VaultClosedOut { .. } => EventType::VaultClosedOut,
            Self::VaultLiquidated { .. } => EventType::VaultLiquidated,
            Self::AmountUpdated { .. } => EventType::AmountUpdated,
            Self::ClaimMinted { .. } => EventType::ClaimMinted,
            Self::ClaimBurned { .. } => EventType::ClaimBurned,
            Self::ClaimTransferred { .. } => EventType::ClaimTransferred,
            Self::ValidatorToVoteUpdated { .. } => EventType::ValidatorToVoteUpdated,
            Self::Voted { .. } => EventType::Voted,
            Self::PriceUpdated { .. } => EventType::PriceUpdated,
        }
    }

    /// Get the time the event was emitted
    pub fn timestamp(&self) -> u64 {
        match self {
            Self::VaultCreated { timestamp, .. }
            | Self::VaultBurned { timestamp, .. }
            | Self::VaultClosedOut { timestamp, .. }
            | Self::VaultLiquidated { timestamp, .. }
            | Self::AmountUpdated { timestamp, .. }
            | Self::ClaimMinted { timestamp, .. }
            | Self::ClaimBurned { timestamp, .. }
            | Self::ClaimTransferred { timestamp, .. }
            | Self::ValidatorToVoteUpdated { timestamp, .. }
            | Self::Voted { timestamp, .. }
            | Self::PriceUpdated { timestamp, .. } => *timestamp,
        }
    }
}

/// Event log for collecting multiple events during execution
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<XHedgeEvent>,
}

impl EventLog {
    /// Create a new empty event log
    pub fn new() -> Self {
        Self { events: Vec::new() }
    }

    /// Emit an event (add to log)
    pub fn emit(&mut self, event: XHedgeEvent) {
        self.events.push(event);
    }

    /// Take all events, leaving the log empty
    pub fn take(&mut self) -> Vec<XHedgeEvent> {
        std::mem::take(&mut self.events)
    }
}
