//! Money calculation utilities using rust_decimal for precision
//!
//! All monetary arithmetic runs on `Decimal` internally and converts to
//! `f64` only for storage/serialization. Rounding is 2 decimal places,
//! half-up.

#[cfg(test)]
mod tests;

use rust_decimal::prelude::*;
use shared::models::OrderItemInput;

/// Rounding: 2 decimal places (cents)
const DECIMAL_PLACES: u32 = 2;

/// Fixed tax rate applied to every order (IVA 16%)
pub const TAX_RATE: Decimal = Decimal::from_parts(16, 0, 0, false, 2);

/// Convert an f64 into Decimal for internal math
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or(Decimal::ZERO)
}

/// Round to cents (half-up) and convert back to f64 for storage
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or(0.0)
}

/// Line subtotal: `quantity * unit_price`, rounded to cents
pub fn line_subtotal(quantity: i64, unit_price: f64) -> f64 {
    to_f64(Decimal::from(quantity) * to_decimal(unit_price))
}

/// Monetary totals of an order
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrderTotals {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Compute order totals from the submitted line items.
///
/// `subtotal` is the sum of `quantity * unit_price` over all items,
/// `tax = subtotal * 16%` rounded to cents, `total = subtotal + tax`.
/// Unit prices are taken from the items as submitted; they are price
/// snapshots, not live product lookups.
pub fn order_totals(items: &[OrderItemInput]) -> OrderTotals {
    let subtotal: Decimal = items
        .iter()
        .map(|item| Decimal::from(item.quantity) * to_decimal(item.unit_price))
        .sum();
    let subtotal = round_cents(subtotal);
    let tax = round_cents(subtotal * TAX_RATE);
    let total = subtotal + tax;

    OrderTotals {
        subtotal: to_f64(subtotal),
        tax: to_f64(tax),
        total: to_f64(total),
    }
}

fn round_cents(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
}
