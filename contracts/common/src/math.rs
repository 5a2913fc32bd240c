//! Mathematical Utilities for the XHedge Ledger
//!
//! 18-decimal fixed-point arithmetic and the price-dependent payout rules.
//! Everything here is a pure function of its inputs so it can be tested
//! apart from token ownership and storage.

use primitive_types::U256;

use crate::constants::precision::WAD;
use crate::errors::{XHedgeError, XHedgeResult};

/// Computes `a * b / d` with a 256-bit intermediate, truncating.
///
/// Fails with `DivisionByZero` if `d == 0` and `Overflow` if the quotient
/// does not fit back into 128 bits.
pub fn mul_div(a: u128, b: u128, d: u128) -> XHedgeResult<u128> {
    if d == 0 {
        return Err(XHedgeError::DivisionByZero);
    }
    // Two 128-bit factors cannot overflow 256 bits
    let product = U256::from(a) * U256::from(b);
    let quotient = product / U256::from(d);
    if quotient > U256::from(u128::MAX) {
        return Err(XHedgeError::Overflow);
    }
    Ok(quotient.low_u128())
}

/// Computes `min(a * b / d, cap)`.
///
/// Quotients too wide for 128 bits saturate to `cap` instead of failing.
pub fn mul_div_capped(a: u128, b: u128, d: u128, cap: u128) -> XHedgeResult<u128> {
    if d == 0 {
        return Err(XHedgeError::DivisionByZero);
    }
    let quotient = U256::from(a) * U256::from(b) / U256::from(d);
    if quotient > U256::from(cap) {
        return Ok(cap);
    }
    Ok(quotient.low_u128())
}

/// Safe addition with overflow check
pub fn safe_add(a: u128, b: u128) -> XHedgeResult<u128> {
    a.checked_add(b).ok_or(XHedgeError::Overflow)
}

/// Safe subtraction with underflow check
pub fn safe_sub(a: u128, b: u128) -> XHedgeResult<u128> {
    a.checked_sub(b).ok_or(XHedgeError::Underflow)
}

/// Deposit a new vault must lock.
///
/// required = hedge_value * (1 + init_rate) / price
pub fn required_locked_amount(
    hedge_value: u128,
    init_rate: u64,
    price: u128,
) -> XHedgeResult<u128> {
    let factor = safe_add(WAD, init_rate as u128)?;
    mul_div(hedge_value, factor, price)
}

/// Locked value relative to hedge value, where WAD means exactly covered.
///
/// value_ratio = amount * price / hedge_value
///
/// The collateralization ratio of a vault is `value_ratio - WAD`; callers
/// compare against `WAD + rate` instead so that under-water vaults need no
/// signed arithmetic.
pub fn value_ratio(amount: u128, price: u128, hedge_value: u128) -> XHedgeResult<u128> {
    mul_div(amount, price, hedge_value)
}

/// `WAD + rate`, the value ratio matching a collateral rate
pub fn ratio_limit(rate: u64) -> XHedgeResult<u128> {
    safe_add(WAD, rate as u128)
}

/// Returns true if the vault still meets its minimum collateral rate.
pub fn meets_min_collateral(
    amount: u128,
    price: u128,
    hedge_value: u128,
    min_rate: u64,
) -> XHedgeResult<bool> {
    Ok(value_ratio(amount, price, hedge_value)? >= ratio_limit(min_rate)?)
}

/// How a vault's deposit is divided between the two claim holders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PayoutSplit {
    pub to_hedger: u128,
    pub to_lever: u128,
}

impl PayoutSplit {
    /// Give the hedge side `owed`, capped at `amount`, and the rest to lever.
    fn capped(amount: u128, owed: u128) -> Self {
        let to_hedger = owed.min(amount);
        Self {
            to_hedger,
            to_lever: amount - to_hedger,
        }
    }

    pub fn total(&self) -> u128 {
        self.to_hedger + self.to_lever
    }
}

/// Split for an early closeout.
///
/// to_hedger = min(amount, hedge_value / price * (1 + penalty))
///
/// Once the hedge units alone reach `amount` the penalty cannot lower the
/// result, so both steps saturate at `amount`.
pub fn closeout_split(
    amount: u128,
    hedge_value: u128,
    price: u128,
    closeout_penalty: u64,
) -> XHedgeResult<PayoutSplit> {
    let units = mul_div_capped(hedge_value, WAD, price, amount)?;
    let owed = mul_div_capped(units, ratio_limit(closeout_penalty)?, WAD, amount)?;
    Ok(PayoutSplit::capped(amount, owed))
}

/// Split for settlement at maturity (no penalty term).
///
/// to_hedger = min(amount, hedge_value / price)
pub fn liquidation_split(
    amount: u128,
    hedge_value: u128,
    price: u128,
) -> XHedgeResult<PayoutSplit> {
    let owed = mul_div_capped(hedge_value, WAD, price, amount)?;
    Ok(PayoutSplit::capped(amount, owed))
}

/// Result of a collateral decrease
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Withdrawal {
    /// Fee retained inside the vault
    pub fee: u128,
    /// Value paid out to the lever owner
    pub payout: u128,
    /// Amount the vault holds afterwards
    pub stored: u128,
}

/// Work out a decrease from `amount` down to `new_amount`.
///
/// The fee stays in the vault, so `payout + stored == amount`.
pub fn withdrawal(amount: u128, new_amount: u128, fee_rate: u128) -> XHedgeResult<Withdrawal> {
    let cut = safe_sub(amount, new_amount)?;
    let fee = mul_div(cut, fee_rate, WAD)?;
    Ok(Withdrawal {
        fee,
        payout: cut - fee,
        stored: safe_add(new_amount, fee)?,
    })
}

/// Time-weighted vote increment.
///
/// incr = min(now - last_vote_time, max_elapsed) * amount
pub fn vote_increment(
    now: u64,
    last_vote_time: u64,
    max_elapsed: u64,
    amount: u128,
) -> XHedgeResult<u128> {
    let elapsed = now.saturating_sub(last_vote_time).min(max_elapsed);
    (elapsed as u128).checked_mul(amount).ok_or(XHedgeError::Overflow)
}
