//! Exact decimal arithmetic for ledger balances.
//!
//! `Decimal::checked_add` only fails on overflow. A result that needs more
//! than 28 significant digits is rounded instead, which would let a balance
//! and the outstanding total drift apart. Every result here is checked by
//! undoing the operation; anything that does not round-trip is rejected.

use fundraise_types::{FundraiseError, Result};
use rust_decimal::Decimal;

/// `base + amount`, failing instead of rounding.
///
/// # Errors
/// - `AmountOverflow` if the sum leaves the representable range
/// - `InexactAmount(amount)` if the sum would be rounded
pub(crate) fn exact_add(base: Decimal, amount: Decimal) -> Result<Decimal> {
    let sum = base
        .checked_add(amount)
        .ok_or(FundraiseError::AmountOverflow)?;
    if sum.checked_sub(base) != Some(amount) {
        return Err(FundraiseError::InexactAmount(amount));
    }
    Ok(sum)
}

/// `base - amount`, failing instead of rounding.
///
/// # Errors
/// - `AmountOverflow` if the difference leaves the representable range
/// - `InexactAmount(amount)` if the difference would be rounded
pub(crate) fn exact_sub(base: Decimal, amount: Decimal) -> Result<Decimal> {
    let difference = base
        .checked_sub(amount)
        .ok_or(FundraiseError::AmountOverflow)?;
    if base.checked_sub(difference) != Some(amount) {
        return Err(FundraiseError::InexactAmount(amount));
    }
    Ok(difference)
}
