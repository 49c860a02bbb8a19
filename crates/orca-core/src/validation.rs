//! # Validation Module
//!
//! Field-level input validation, applied before any business logic runs.
//!
//! ## Validation Layers
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Layer 1: Browser form (required fields, min="1" on quantity)          │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE + pricing/draft rules                            │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (NOT NULL, CHECK, foreign keys)                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;
use crate::money::Money;
use crate::{MAX_ITEM_QUANTITY, MAX_NOTES_LEN, MAX_QUOTE_ITEMS, MAX_UNIT_PRICE_CENTS};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

fn validate_name(field: &str, value: &str, max: usize) -> ValidationResult<()> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if value.chars().count() > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
        });
    }

    Ok(())
}

/// Validates a client name (1-200 characters after trimming).
///
/// ```rust
/// use orca_core::validation::validate_client_name;
///
/// assert!(validate_client_name("Padaria Central").is_ok());
/// assert!(validate_client_name("  ").is_err());
/// ```
pub fn validate_client_name(name: &str) -> ValidationResult<()> {
    validate_name("client name", name, 200)
}

/// Validates a product name (1-200 characters after trimming).
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("product name", name, 200)
}

/// Validates a product group name (1-100 characters after trimming).
pub fn validate_group_name(name: &str) -> ValidationResult<()> {
    validate_name("group name", name, 100)
}

/// Normalizes free-text notes: blank becomes `None`.
///
/// ```rust
/// use orca_core::validation::normalize_notes;
///
/// assert_eq!(normalize_notes(Some("  ")).unwrap(), None);
/// assert_eq!(normalize_notes(Some(" entrega sexta ")).unwrap().as_deref(), Some("entrega sexta"));
/// ```
pub fn normalize_notes(notes: Option<&str>) -> ValidationResult<Option<String>> {
    let Some(text) = notes.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(None);
    };

    if text.chars().count() > MAX_NOTES_LEN {
        return Err(ValidationError::TooLong {
            field: "notes".to_string(),
            max: MAX_NOTES_LEN,
        });
    }

    Ok(Some(text.to_string()))
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// Quantities below 1 are reported by the pricing engine as
/// `CoreError::InvalidQuantity`; this check covers the upper bound.
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price: zero allowed, negative not, capped at
/// `MAX_UNIT_PRICE_CENTS`.
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price.cents() > MAX_UNIT_PRICE_CENTS {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE_CENTS,
        });
    }

    Ok(())
}

// =============================================================================
// Collection Validators
// =============================================================================

/// Checks there is room for one more distinct product in a quote.
pub fn validate_item_capacity(current_items: usize) -> ValidationResult<()> {
    if current_items >= MAX_QUOTE_ITEMS {
        return Err(ValidationError::OutOfRange {
            field: "quote items".to_string(),
            min: 0,
            max: MAX_QUOTE_ITEMS as i64,
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_names() {
        assert!(validate_client_name("Maria").is_ok());
        assert!(validate_client_name("").is_err());
        assert!(validate_product_name(&"A".repeat(201)).is_err());
        assert!(validate_group_name("Bebidas").is_ok());
        assert!(validate_group_name(&"G".repeat(101)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_price() {
        assert!(validate_price(Money::zero()).is_ok());
        assert!(validate_price(Money::from_cents(-1)).is_err());
        assert!(validate_price(Money::from_cents(MAX_UNIT_PRICE_CENTS)).is_ok());
        assert!(validate_price(Money::from_cents(MAX_UNIT_PRICE_CENTS + 1)).is_err());
        assert!(validate_price(Money::from_cents(i64::MAX)).is_err());
    }

    #[test]
    fn test_notes() {
        assert_eq!(normalize_notes(None).unwrap(), None);
        assert!(normalize_notes(Some(&"x".repeat(MAX_NOTES_LEN + 1))).is_err());
    }

    #[test]
    fn test_item_capacity() {
        assert!(validate_item_capacity(0).is_ok());
        assert!(validate_item_capacity(MAX_QUOTE_ITEMS - 1).is_ok());
        assert!(validate_item_capacity(MAX_QUOTE_ITEMS).is_err());
    }
}
