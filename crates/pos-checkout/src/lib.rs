//! Cart totals and split payments for the front-desk checkout.
//!
//! Money is carried as `i64` minor units (cents). Rates are basis points.

pub mod cart;
pub mod payment;

pub use cart::{Cart, CartTotals, Discount, LineItem, LoyaltyRule};
pub use payment::{Payment, PaymentPlan};

/// 100% in basis points.
pub const FULL_BPS: i64 = 10_000;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CheckoutError {
    #[error("item '{sku}' has a negative quantity")]
    NegativeQuantity { sku: String },
    #[error("item '{sku}' has a negative unit price")]
    NegativePrice { sku: String },
    #[error("discount must be between 0% and 100% or a non-negative amount")]
    InvalidDiscount,
    #[error("tax rate must not be negative")]
    InvalidTaxRate,
    #[error("loyalty spend per point must be positive")]
    InvalidLoyaltyRule,
    #[error("payment amount must be positive")]
    NonPositiveAmount,
    #[error("payment of {amount} exceeds the remaining balance of {remaining}")]
    Overpayment { amount: i64, remaining: i64 },
    #[error("no payment recorded for method '{0}'")]
    UnknownMethod(String),
    #[error("amount out of range")]
    Overflow,
}

/// `amount * bps / 10000`, rounded half-up.
pub(crate) fn apply_bps(amount: i64, bps: i64) -> Result<i64, CheckoutError> {
    let scaled = amount.checked_mul(bps).ok_or(CheckoutError::Overflow)?;
    let rounded = scaled
        .checked_add(FULL_BPS / 2)
        .ok_or(CheckoutError::Overflow)?;
    Ok(rounded / FULL_BPS)
}
