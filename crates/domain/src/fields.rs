//! Field-level input checks shared by the services.

use common::ProductId;
use rust_decimal::Decimal;

use crate::{DomainError, Result};

pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const MAX_NAME_LEN: usize = 255;
/// Prices are stored as `NUMERIC(10, 2)`.
pub const PRICE_SCALE: u32 = 2;
pub const PRICE_DIGITS: u32 = 10;

/// Fails with one message naming every missing required field.
pub fn require_present(fields: &[(&str, bool)]) -> Result<()> {
    let missing: Vec<&str> = fields
        .iter()
        .filter(|(_, present)| !present)
        .map(|(name, _)| *name)
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(DomainError::validation(format!(
            "Missing required fields: {}",
            missing.join(", ")
        )))
    }
}

/// Trims a text field and rejects blank or overlong values.
pub fn non_blank(field: &str, value: String) -> Result<String> {
    let trimmed = bounded(field, value)?;
    if trimmed.is_empty() {
        return Err(DomainError::validation(format!("{field} must not be blank")));
    }
    Ok(trimmed)
}

/// Trims an optional text field and rejects overlong values.
pub fn bounded(field: &str, value: String) -> Result<String> {
    let trimmed = value.trim();
    if trimmed.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{field} must be at most {MAX_NAME_LEN} characters"
        )));
    }
    Ok(trimmed.to_string())
}

/// Accepts non-negative amounts with at most two decimal places and eight
/// integer digits.
pub fn price(value: Decimal) -> Result<Decimal> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(DomainError::validation("price must not be negative"));
    }
    if value.normalize().scale() > PRICE_SCALE {
        return Err(DomainError::validation(format!(
            "price must have at most {PRICE_SCALE} decimal places"
        )));
    }
    let limit = Decimal::from(10_i64.pow(PRICE_DIGITS - PRICE_SCALE));
    if value >= limit {
        return Err(DomainError::validation(format!("price must be less than {limit}")));
    }
    Ok(value)
}

pub fn rating(value: i32) -> Result<i32> {
    if !(MIN_RATING..=MAX_RATING).contains(&value) {
        return Err(DomainError::validation(format!(
            "rating must be between {MIN_RATING} and {MAX_RATING}"
        )));
    }
    Ok(value)
}

/// Product ids are serial, so anything below 1 can never match a row.
pub fn product_id(value: ProductId) -> Result<ProductId> {
    if value.as_i64() <= 0 {
        return Err(DomainError::validation(format!(
            "product_id must be a positive integer: {value}"
        )));
    }
    Ok(value)
}

/// Loose shape check: something on both sides of a single `@`.
pub fn email(value: String) -> Result<String> {
    let trimmed = bounded("reviewer_email", value)?;
    match trimmed.split_once('@') {
        Some((local, domain))
            if !local.is_empty() && !domain.is_empty() && !domain.contains('@') =>
        {
            Ok(trimmed)
        }
        _ => Err(DomainError::validation(format!(
            "reviewer_email is not a valid email address: {trimmed}"
        ))),
    }
}

pub fn metadata(value: serde_json::Value) -> Result<serde_json::Value> {
    if value.is_object() {
        Ok(value)
    } else {
        Err(DomainError::validation("metadata must be a JSON object"))
    }
}
