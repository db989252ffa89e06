//! # Ledger Error Type
//!
//! Unified error type for every Ledger Engine operation.
//!
//! ## Error Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Shelf Ledger                           │
//! │                                                                         │
//! │  UI shell                    Ledger Engine                              │
//! │  ────────                    ─────────────                              │
//! │                                                                         │
//! │  engine.sell_item(id)                                                   │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  LedgerResult<T>                                                 │  │
//! │  │         │                                                        │  │
//! │  │  Bad input? ──────── ValidationError ─────────► Validation       │  │
//! │  │         │                                                        │  │
//! │  │  Id gone? ────────── DbError::NotFound ────────► NotFound        │  │
//! │  │         │            CoreError::ItemNotFound                     │  │
//! │  │         │                                                        │  │
//! │  │  SQLite failed? ──── DbError::* ───────────────► Storage         │  │
//! │  │         │                                                        │  │
//! │  │  Success ──────────────────────────────────────────────────────► │  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  err.payload() → { "code": "NOT_FOUND", "message": "Item not found: 4" }│
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Recovery
//! - `Validation`: user fixes the form; never retried automatically.
//! - `NotFound`: item was already sold or deleted; caller refreshes its list.
//! - `ProfitOverflow`: the sale is refused; the ledger stays readable.
//! - `Storage`: the operation is aborted and its transaction rolled back.
//! - `Config`: raised only at startup.

use serde::Serialize;
use shelf_core::{CoreError, ValidationError};
use shelf_db::DbError;
use thiserror::Error;
use ts_rs::TS;

/// Error returned by Ledger Engine operations.
#[derive(Debug, Error)]
pub enum LedgerError {
    /// Input failed validation. Nothing was written.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// The referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound { entity: String, id: String },

    /// Selling would push the ledger total past what can be summed.
    /// The sale was not recorded.
    #[error("Recording a sale of {price_cents} would overflow the total profit")]
    ProfitOverflow { price_cents: i64 },

    /// The store failed. Any partial work was rolled back.
    #[error("Storage error: {0}")]
    Storage(DbError),

    /// Startup configuration is unusable.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Machine-readable error codes.
///
/// ## Usage in the UI shell
/// ```typescript
/// switch (e.code) {
///   case 'NOT_FOUND':
///     refreshCatalog();
///     break;
///   case 'VALIDATION_ERROR':
///     showForm(e.message);
///     break;
///   default:
///     showError(e.message);
/// }
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[ts(export)]
pub enum ErrorCode {
    NotFound,
    ValidationError,
    ProfitOverflow,
    StorageError,
    ConfigError,
}

/// Serializable form of a [`LedgerError`] for display.
///
/// ```json
/// {
///   "code": "NOT_FOUND",
///   "message": "Item not found: 4"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct ErrorPayload {
    pub code: ErrorCode,
    pub message: String,
}

impl LedgerError {
    /// Creates a not found error.
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        LedgerError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    /// Creates a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        LedgerError::Config(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            LedgerError::Validation(_) => ErrorCode::ValidationError,
            LedgerError::NotFound { .. } => ErrorCode::NotFound,
            LedgerError::ProfitOverflow { .. } => ErrorCode::ProfitOverflow,
            LedgerError::Storage(_) => ErrorCode::StorageError,
            LedgerError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// True when the caller can fix the situation and carry on.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            LedgerError::Validation(_) | LedgerError::NotFound { .. }
        )
    }

    /// Builds the payload shown to the user.
    ///
    /// Storage details are logged here and replaced with a generic message.
    pub fn payload(&self) -> ErrorPayload {
        let message = match self {
            LedgerError::Storage(err) => {
                tracing::error!(error = %err, "Storage operation failed");
                match err {
                    DbError::ConnectionFailed(_) | DbError::PoolExhausted => {
                        "Database is unavailable".to_string()
                    }
                    DbError::MigrationFailed(_) => "Database schema could not be prepared".to_string(),
                    _ => "Database operation failed".to_string(),
                }
            }
            other => other.to_string(),
        };

        ErrorPayload {
            code: self.code(),
            message,
        }
    }
}

/// Converts database errors. `NotFound` stays recoverable, everything else is storage.
impl From<DbError> for LedgerError {
    fn from(err: DbError) -> Self {
        match err {
            DbError::NotFound { entity, id } => LedgerError::NotFound { entity, id },
            other => LedgerError::Storage(other),
        }
    }
}

impl From<CoreError> for LedgerError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::ItemNotFound(id) => LedgerError::not_found("Item", id),
            CoreError::ProfitOverflow { price_cents } => LedgerError::ProfitOverflow { price_cents },
            CoreError::Validation(e) => LedgerError::Validation(e),
        }
    }
}

/// Result type for Ledger Engine operations.
pub type LedgerResult<T> = Result<T, LedgerError>;

// =============================================================================
// Unit Tests
// =============================================================================
