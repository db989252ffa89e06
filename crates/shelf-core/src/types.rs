//! # Domain Types
//!
//! Core domain types used throughout Shelf Ledger.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   sell_item    ┌─────────────────┐                │
//! │  │      Item       │ ─────────────► │   SaleRecord    │                │
//! │  │  ─────────────  │   (snapshot)   │  ─────────────  │                │
//! │  │  id             │                │  id             │                │
//! │  │  name           │ ──────────────►│  item_id        │                │
//! │  │  description    │                │  item_name      │                │
//! │  │  price_cents    │ ──────────────►│  price_cents    │                │
//! │  └─────────────────┘                │  sold_at        │                │
//! │                                     └─────────────────┘                │
//! │                                                                         │
//! │  ┌─────────────────┐                ┌─────────────────┐                │
//! │  │    ItemDraft    │                │     Report      │                │
//! │  │  validated input│                │  total_profit   │                │
//! │  │  for add/update │                │  recent_sales   │                │
//! │  └─────────────────┘                └─────────────────┘                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Snapshot Pattern
//! A SaleRecord copies the item's name and price. The item row is deleted by
//! the same transaction, so ledger history never points at live catalog data.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::validation::{
    parse_price, validate_description, validate_item_name, validate_price_cents,
    ValidationResult,
};

// =============================================================================
// Item
// =============================================================================

/// An item available for sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct Item {
    /// Row id, assigned by the store on creation.
    pub id: i64,

    /// Display name, never empty.
    pub name: String,

    /// Free-form description, never empty.
    pub description: String,

    /// Price in minor currency units.
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price"))]
    pub price_cents: i64,
}

impl Item {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price_cents)
    }
}

// =============================================================================
// Item Draft
// =============================================================================

/// Validated input for creating or replacing an item.
///
/// Fields are private: the only way to obtain a draft is through
/// [`ItemDraft::new`] or [`ItemDraft::parse`], so anything holding one has
/// already passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ItemDraft {
    name: String,
    description: String,
    price_cents: i64,
}

impl ItemDraft {
    /// Validates and trims item fields.
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::ItemDraft;
    ///
    /// assert!(ItemDraft::new("Dune", "Sci-fi classic", 500).is_ok());
    /// assert!(ItemDraft::new("", "Sci-fi classic", 500).is_err());
    /// assert!(ItemDraft::new("Dune", "Sci-fi classic", -1).is_err());
    /// ```
    pub fn new(name: &str, description: &str, price_cents: i64) -> ValidationResult<Self> {
        let name = validate_item_name(name)?;
        let description = validate_description(description)?;
        validate_price_cents(price_cents)?;

        Ok(ItemDraft {
            name,
            description,
            price_cents,
        })
    }

    /// Same as [`ItemDraft::new`], taking the price as form text.
    pub fn parse(name: &str, description: &str, price_text: &str) -> ValidationResult<Self> {
        let price_cents = parse_price(price_text)?;
        Self::new(name, description, price_cents)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn price_cents(&self) -> i64 {
        self.price_cents
    }

    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price_cents)
    }

    /// Builds the catalog row once the store has assigned an id.
    pub fn into_item(self, id: i64) -> Item {
        Item {
            id,
            name: self.name,
            description: self.description,
            price_cents: self.price_cents,
        }
    }
}

// =============================================================================
// Sale Record
// =============================================================================

/// An immutable snapshot of a completed sale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
pub struct SaleRecord {
    pub id: i64,

    /// Id the item had in the catalog. The item itself no longer exists.
    pub item_id: i64,

    /// Item name at time of sale (frozen).
    pub item_name: String,

    /// Sale price in minor units (frozen).
    #[cfg_attr(feature = "sqlx", sqlx(rename = "price"))]
    pub price_cents: i64,

    #[ts(as = "String")]
    pub sold_at: DateTime<Utc>,
}

impl SaleRecord {
    /// Returns the sale price as Money.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_minor(self.price_cents)
    }
}

// =============================================================================
// Report
// =============================================================================

/// Read-only composite view: profit total plus the most recent sales.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Report {
    /// Sum of every sale price in the ledger.
    pub total_profit: Money,

    /// Most recent sales first.
    pub recent_sales: Vec<SaleRecord>,
}

impl Report {
    /// Report for a ledger with no sales.
    pub fn empty() -> Self {
        Report {
            total_profit: Money::zero(),
            recent_sales: Vec::new(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
