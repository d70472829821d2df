//! Presentation helpers for monetary amounts.
//!
//! Aggregation always happens on [`Decimal`]; conversion to `f64` only happens
//! here, after rounding to two decimal places.

use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::Serializer;

pub fn round_money(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// Nearest `f64` to the rounded amount, so `35.01` prints as `35.01`.
pub fn money_to_f64(value: Decimal) -> f64 {
    let rounded = round_money(value);
    rounded
        .to_string()
        .parse::<f64>()
        .ok()
        .or_else(|| rounded.to_f64())
        .unwrap_or(0.0)
}

/// Percentage `part / whole * 100`, zero when `whole` is zero. Saturates at
/// `Decimal::MAX` when the ratio is not representable.
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    if whole.is_zero() {
        return Decimal::ZERO;
    }
    part.checked_div(whole)
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED))
        .unwrap_or(if part.is_sign_negative() == whole.is_sign_negative() {
            Decimal::MAX
        } else {
            Decimal::MIN
        })
}

pub fn round_percent(value: Decimal) -> f64 {
    let rounded = value.round_dp_with_strategy(1, RoundingStrategy::MidpointAwayFromZero);
    rounded
        .to_string()
        .parse::<f64>()
        .ok()
        .or_else(|| rounded.to_f64())
        .unwrap_or(0.0)
}

pub(crate) fn serialize<S: Serializer>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(money_to_f64(*value))
}

pub(crate) fn serialize_opt<S: Serializer>(
    value: &Option<Decimal>,
    serializer: S,
) -> Result<S::Ok, S::Error> {
    match value {
        Some(v) => serializer.serialize_some(&money_to_f64(*v)),
        None => serializer.serialize_none(),
    }
}
