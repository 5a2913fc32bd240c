//! Vault Store
//!
//! Serial-number keyed vault records. Closed vaults are removed outright, so
//! an absent entry and a zero record mean the same thing to readers.

use std::collections::BTreeMap;

use borsh::{BorshDeserialize, BorshSerialize};
use serde::{Deserialize, Serialize};

use xhedge_common::{
    constants::limits::FIRST_SERIAL,
    errors::{XHedgeError, XHedgeResult},
    math::{safe_add, safe_sub},
    types::{SerialNumber, ValidatorId, Vault},
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, BorshSerialize, BorshDeserialize)]
pub struct VaultStore {
    /// Serial handed to the next vault; never decreases
    next_sn: SerialNumber,
    /// Open vaults only
    vaults: BTreeMap<SerialNumber, Vault>,
    /// Sum of `amount` over open vaults
    total_locked: u128,
}

impl Default for VaultStore {
    fn default() -> Self {
        Self {
            next_sn: FIRST_SERIAL,
            vaults: BTreeMap::new(),
            total_locked: 0,
        }
    }
}

impl VaultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next_serial(&self) -> SerialNumber {
        self.next_sn
    }

    pub fn total_locked(&self) -> u128 {
        self.total_locked
    }

    /// Number of open vaults
    pub fn len(&self) -> usize {
        self.vaults.len()
    }

    pub fn is_empty(&self) -> bool {
        self.vaults.is_empty()
    }

    /// Open vault by serial
    pub fn get(&self, sn: SerialNumber) -> Option<&Vault> {
        self.vaults.get(&sn)
    }

    /// Open vault by serial, or `VaultNotFound`
    pub fn require(&self, sn: SerialNumber) -> XHedgeResult<&Vault> {
        self.get(sn).ok_or(XHedgeError::VaultNotFound { sn })
    }

    /// Stored record, or the zero record for unknown and closed serials
    pub fn load(&self, sn: SerialNumber) -> Vault {
        self.get(sn).cloned().unwrap_or_default()
    }

    /// Serials of open vaults in ascending order
    pub fn open_serials(&self) -> impl Iterator<Item = SerialNumber> + '_ {
        self.vaults.keys().copied()
    }

    /// Store a new open vault under the next serial.
    ///
    /// Nothing is written if the serial space or the locked total would
    /// overflow.
    pub fn insert(&mut self, vault: Vault) -> XHedgeResult<SerialNumber> {
        let sn = self.next_sn;
        let next_sn = sn.checked_add(1).ok_or(XHedgeError::Overflow)?;
        let total_locked = safe_add(self.total_locked, vault.amount)?;

        self.vaults.insert(sn, vault);
        self.next_sn = next_sn;
        self.total_locked = total_locked;
        Ok(sn)
    }

    /// Replace the locked amount of an open vault
    pub fn set_amount(&mut self, sn: SerialNumber, new_amount: u128) -> XHedgeResult<()> {
        let old_amount = self.require(sn)?.amount;
        let total_locked = safe_add(safe_sub(self.total_locked, old_amount)?, new_amount)?;

        if let Some(vault) = self.vaults.get_mut(&sn) {
            vault.amount = new_amount;
        }
        self.total_locked = total_locked;
        Ok(())
    }

    pub fn set_validator(&mut self, sn: SerialNumber, validator: ValidatorId) -> XHedgeResult<()> {
        let vault = self.vaults.get_mut(&sn).ok_or(XHedgeError::VaultNotFound { sn })?;
        vault.validator_to_vote = validator;
        Ok(())
    }

    pub fn set_last_vote_time(&mut self, sn: SerialNumber, now: u64) -> XHedgeResult<()> {
        let vault = self.vaults.get_mut(&sn).ok_or(XHedgeError::VaultNotFound { sn })?;
        vault.last_vote_time = now;
        Ok(())
    }

    /// Remove an open vault, returning its final record
    pub fn close(&mut self, sn: SerialNumber) -> XHedgeResult<Vault> {
        let amount = self.require(sn)?.amount;
        let total_locked = safe_sub(self.total_locked, amount)?;

        let vault = self.vaults.remove(&sn).ok_or(XHedgeError::VaultNotFound { sn })?;
        self.total_locked = total_locked;
        Ok(vault)
    }
}
