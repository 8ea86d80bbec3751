//! Parsing and validation of caller-supplied values.
//!
//! Everything here runs before any store interaction. Failures carry the
//! field name and the offending value as received.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::Value;

use crate::error::{InventoryError, Result};
use crate::ids::{CustomerId, InventoryKey, ProductId};

/// Parse a movement quantity: a finite integer greater than zero.
///
/// Accepts JSON numbers and numeric strings.
///
/// # Errors
///
/// Returns `InventoryError::InvalidValue` for field `quantity`.
pub fn quantity(raw: &Value) -> Result<u64> {
    let invalid = || InventoryError::invalid("quantity", render(raw));
    let number = decimal(raw).ok_or_else(invalid)?;
    if !number.fract().is_zero() || number <= Decimal::ZERO {
        return Err(invalid());
    }
    number.to_u64().ok_or_else(invalid)
}

/// Check an already-typed quantity.
///
/// # Errors
///
/// Returns `InventoryError::InvalidValue` for field `quantity` when zero.
pub fn positive_quantity(quantity: u64) -> Result<u64> {
    if quantity == 0 {
        return Err(InventoryError::invalid("quantity", quantity));
    }
    Ok(quantity)
}

/// Parse a unit price: a finite, non-negative decimal.
///
/// # Errors
///
/// Returns `InventoryError::InvalidValue` for field `unit_price`.
pub fn unit_price(raw: &Value) -> Result<Decimal> {
    let price = decimal(raw).ok_or_else(|| InventoryError::invalid("unit_price", render(raw)))?;
    non_negative_price(price)
}

/// Check an already-typed unit price.
///
/// # Errors
///
/// Returns `InventoryError::InvalidValue` for field `unit_price` when negative.
pub fn non_negative_price(price: Decimal) -> Result<Decimal> {
    if price.is_sign_negative() && !price.is_zero() {
        return Err(InventoryError::invalid("unit_price", price));
    }
    Ok(price.normalize())
}

/// Parse an as-of cutoff.
///
/// Accepted forms: RFC 3339 (`2024-05-01T10:00:00Z`), a naive date-time taken
/// as UTC (`2024-05-01T10:00:00`), a date taken as UTC midnight
/// (`2024-05-01`), or integer milliseconds since the Unix epoch.
///
/// # Errors
///
/// Returns `InventoryError::InvalidValue` for field `as_of`.
pub fn as_of(raw: &str) -> Result<DateTime<Utc>> {
    let trimmed = raw.trim();

    if let Ok(at) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(at.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(trimmed, "%Y-%m-%dT%H:%M:%S%.f") {
        return Ok(naive.and_utc());
    }
    if let Some(midnight) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
    {
        return Ok(midnight.and_utc());
    }
    if let Some(at) = trimmed
        .parse::<i64>()
        .ok()
        .and_then(DateTime::from_timestamp_millis)
    {
        return Ok(at);
    }

    Err(InventoryError::invalid("as_of", raw))
}

/// Parse an optional as-of cutoff.
///
/// # Errors
///
/// Returns `InventoryError::InvalidValue` for field `as_of`.
pub fn optional_as_of(raw: Option<&str>) -> Result<Option<DateTime<Utc>>> {
    raw.map(as_of).transpose()
}

/// Parse an inventory key from its textual parts.
///
/// # Errors
///
/// Returns `InventoryError::InvalidValue` for field `customer_id` or
/// `product_id`.
pub fn key(customer_id: &str, product_id: &str) -> Result<InventoryKey> {
    let customer = CustomerId::from_str(customer_id)
        .map_err(|_| InventoryError::invalid("customer_id", customer_id))?;
    let product = ProductId::from_str(product_id)
        .map_err(|_| InventoryError::invalid("product_id", product_id))?;
    Ok(InventoryKey::new(customer, product))
}

fn decimal(raw: &Value) -> Option<Decimal> {
    match raw {
        Value::Number(n) => {
            if let Some(unsigned) = n.as_u64() {
                Some(Decimal::from(unsigned))
            } else if let Some(signed) = n.as_i64() {
                Some(Decimal::from(signed))
            } else {
                n.as_f64().and_then(Decimal::from_f64)
            }
        }
        Value::String(s) => {
            let s = s.trim();
            Decimal::from_str(s)
                .or_else(|_| Decimal::from_scientific(s))
                .ok()
        }
        _ => None,
    }
}

fn render(raw: &Value) -> String {
    match raw {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}
