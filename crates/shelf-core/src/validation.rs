//! # Validation Module
//!
//! Input validation for catalog items.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: UI shell                                                     │
//! │  └── Immediate feedback while typing                                   │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE                                                  │
//! │  ├── Text must be non-empty after trimming                             │
//! │  └── Price must be a non-negative integer                              │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Repositories only accept an `ItemDraft`, which can only be   │
//! │           built by passing through layer 2                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::ValidationError;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// String Validators
// =============================================================================

/// Validates and trims a required text field.
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_required_text;
///
/// assert_eq!(validate_required_text("name", "  Dune ").unwrap(), "Dune");
/// assert!(validate_required_text("name", "   ").is_err());
/// ```
pub fn validate_required_text(field: &str, value: &str) -> ValidationResult<String> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(value.to_string())
}

/// Validates an item name. Returns the trimmed name.
pub fn validate_item_name(name: &str) -> ValidationResult<String> {
    validate_required_text("name", name)
}

/// Validates an item description. Returns the trimmed description.
pub fn validate_description(description: &str) -> ValidationResult<String> {
    validate_required_text("description", description)
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Largest accepted price: ten billion major units.
///
/// Keeps the ledger total far from the i64 limit that SQLite's `SUM` enforces.
pub const MAX_PRICE_CENTS: i64 = 1_000_000_000_000;

/// Validates a price in minor units.
///
/// ## Rules
/// - Must be non-negative (>= 0)
/// - Must not exceed [`MAX_PRICE_CENTS`]
/// - Zero is allowed (giveaways)
///
/// ## Example
/// ```rust
/// use shelf_core::validation::validate_price_cents;
///
/// assert!(validate_price_cents(1099).is_ok());
/// assert!(validate_price_cents(0).is_ok());
/// assert!(validate_price_cents(-100).is_err());
/// assert!(validate_price_cents(i64::MAX).is_err());
/// ```
pub fn validate_price_cents(cents: i64) -> ValidationResult<()> {
    if !(0..=MAX_PRICE_CENTS).contains(&cents) {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_PRICE_CENTS,
        });
    }

    Ok(())
}

/// Parses price text typed into a form.
///
/// ## Rules
/// - Surrounding whitespace is ignored
/// - Must be a whole number of minor units (no decimal point, no suffix)
/// - Must be non-negative
///
/// ## Example
/// ```rust
/// use shelf_core::validation::parse_price;
///
/// assert_eq!(parse_price(" 500 ").unwrap(), 500);
/// assert!(parse_price("5.50").is_err());
/// assert!(parse_price("12abc").is_err());
/// assert!(parse_price("-1").is_err());
/// ```
pub fn parse_price(text: &str) -> ValidationResult<i64> {
    let text = text.trim();

    if text.is_empty() {
        return Err(ValidationError::Required {
            field: "price".to_string(),
        });
    }

    let cents: i64 = text.parse().map_err(|_| ValidationError::InvalidFormat {
        field: "price".to_string(),
        reason: "must be a whole number of minor currency units".to_string(),
    })?;

    validate_price_cents(cents)?;

    Ok(cents)
}

// =============================================================================
// Unit Tests
// =============================================================================
