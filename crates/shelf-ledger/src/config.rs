//! # Ledger Configuration
//!
//! Settings loaded once at startup and read-only afterwards.
//!
//! ## Configuration Sources (Priority Order)
//! 1. Environment variables (`SHELF_*`)
//! 2. Defaults (this file)
//!
//! ## Environment Variables
//! - `SHELF_DB_PATH`: database file location
//! - `SHELF_RECENT_SALES_LIMIT`: rows in the recent-sales view
//! - `SHELF_CURRENCY_SYMBOL`: symbol used by [`LedgerConfig::format_money`]

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use shelf_core::money::MINOR_DIGITS;
use shelf_core::{Money, DEFAULT_RECENT_SALES_LIMIT};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::{LedgerError, LedgerResult};

pub const ENV_DB_PATH: &str = "SHELF_DB_PATH";
pub const ENV_RECENT_SALES_LIMIT: &str = "SHELF_RECENT_SALES_LIMIT";
pub const ENV_CURRENCY_SYMBOL: &str = "SHELF_CURRENCY_SYMBOL";

/// File name of the ledger database inside the data directory.
const DB_FILE_NAME: &str = "shelf.db";

/// Ledger configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LedgerConfig {
    /// SQLite database file. Created on first open.
    pub database_path: PathBuf,

    /// Number of sales in the recent-sales view.
    /// Default: 20
    pub recent_sales_limit: u32,

    /// Currency symbol for display.
    /// Default: "₱"
    pub currency_symbol: String,

    /// Digits after the decimal point in a displayed amount.
    /// Default: 2
    pub minor_digits: u8,
}

impl LedgerConfig {
    /// Creates a configuration for the given database file with default settings.
    pub fn new(database_path: impl Into<PathBuf>) -> Self {
        LedgerConfig {
            database_path: database_path.into(),
            recent_sales_limit: DEFAULT_RECENT_SALES_LIMIT,
            currency_symbol: "₱".to_string(),
            minor_digits: MINOR_DIGITS,
        }
    }

    /// Loads configuration from the process environment.
    ///
    /// ## Errors
    /// `LedgerError::Config` when a variable is set to an unusable value or
    /// no data directory can be determined.
    pub fn from_env() -> LedgerResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads configuration from an arbitrary key lookup.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> LedgerResult<Self> {
        let database_path = match lookup(ENV_DB_PATH) {
            Some(path) if !path.trim().is_empty() => PathBuf::from(path),
            Some(_) => {
                return Err(LedgerError::config(format!("{ENV_DB_PATH} is empty")));
            }
            None => default_database_path()?,
        };

        let mut config = LedgerConfig::new(database_path);

        if let Some(raw) = lookup(ENV_RECENT_SALES_LIMIT) {
            config.recent_sales_limit = raw.trim().parse::<u32>().map_err(|_| {
                LedgerError::config(format!(
                    "{ENV_RECENT_SALES_LIMIT} must be a non-negative integer, got '{raw}'"
                ))
            })?;
        }

        if let Some(symbol) = lookup(ENV_CURRENCY_SYMBOL) {
            config.currency_symbol = symbol;
        }

        debug!(path = %config.database_path.display(), "Configuration loaded");
        Ok(config)
    }

    pub fn database_path(&self) -> &Path {
        &self.database_path
    }

    /// Formats an amount with the configured symbol.
    ///
    /// ## Example
    /// ```rust
    /// use shelf_core::Money;
    /// use shelf_ledger::LedgerConfig;
    ///
    /// let config = LedgerConfig::new("shelf.db");
    /// assert_eq!(config.format_money(Money::from_minor(1234)), "₱12.34");
    /// ```
    pub fn format_money(&self, amount: Money) -> String {
        let minor = amount.minor();
        // Past 18 digits every i64 amount is a pure fraction
        let (whole, frac) = match 10_i64.checked_pow(u32::from(self.minor_digits)) {
            Some(divisor) => ((minor / divisor).unsigned_abs(), (minor % divisor).unsigned_abs()),
            None => (0, minor.unsigned_abs()),
        };
        let sign = if minor < 0 { "-" } else { "" };

        if self.minor_digits == 0 {
            format!("{sign}{}{whole}", self.currency_symbol)
        } else {
            format!(
                "{sign}{}{whole}.{frac:0width$}",
                self.currency_symbol,
                width = usize::from(self.minor_digits)
            )
        }
    }
}

/// Platform data directory location of the ledger database.
///
/// ## Platform-Specific Paths
/// - **macOS**: `~/Library/Application Support/com.shelf.shelf/shelf.db`
/// - **Windows**: `%APPDATA%\shelf\shelf\data\shelf.db`
/// - **Linux**: `~/.local/share/shelf/shelf.db`
///
/// The directory is created if missing.
pub fn default_database_path() -> LedgerResult<PathBuf> {
    let proj_dirs = ProjectDirs::from("com", "shelf", "shelf")
        .ok_or_else(|| LedgerError::config("Could not determine app data directory"))?;

    let data_dir = proj_dirs.data_dir();

    std::fs::create_dir_all(data_dir).map_err(|e| {
        LedgerError::config(format!(
            "Could not create data directory {}: {e}",
            data_dir.display()
        ))
    })?;

    Ok(data_dir.join(DB_FILE_NAME))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = LedgerConfig::new("/tmp/shelf.db");
        assert_eq!(config.recent_sales_limit, 20);
        assert_eq!(config.currency_symbol, "₱");
        assert_eq!(config.minor_digits, 2);
    }

    #[test]
    fn test_environment_overrides() {
        let config = LedgerConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/data/books.db"),
            (ENV_RECENT_SALES_LIMIT, " 5 "),
            (ENV_CURRENCY_SYMBOL, "$"),
        ]))
        .unwrap();

        assert_eq!(config.database_path(), Path::new("/data/books.db"));
        assert_eq!(config.recent_sales_limit, 5);
        assert_eq!(config.currency_symbol, "$");
    }

    #[test]
    fn test_invalid_limit_is_config_error() {
        let err = LedgerConfig::from_lookup(lookup(&[
            (ENV_DB_PATH, "/data/books.db"),
            (ENV_RECENT_SALES_LIMIT, "twenty"),
        ]))
        .unwrap_err();

        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn test_empty_path_is_config_error() {
        let err = LedgerConfig::from_lookup(lookup(&[(ENV_DB_PATH, "  ")])).unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[test]
    fn test_format_money() {
        let config = LedgerConfig::new("shelf.db");
        assert_eq!(config.format_money(Money::from_minor(1234)), "₱12.34");
        assert_eq!(config.format_money(Money::from_minor(100)), "₱1.00");
        assert_eq!(config.format_money(Money::from_minor(1)), "₱0.01");
        assert_eq!(config.format_money(Money::zero()), "₱0.00");
        assert_eq!(config.format_money(Money::from_minor(-550)), "-₱5.50");
    }

    #[test]
    fn test_format_money_matches_money_display() {
        let config = LedgerConfig::new("shelf.db");
        for minor in [0, 1, 99, 1234, -550, i64::MAX, i64::MIN] {
            let amount = Money::from_minor(minor);
            assert_eq!(config.format_money(amount), {
                let shown = amount.to_string();
                match shown.strip_prefix('-') {
                    Some(rest) => format!("-₱{rest}"),
                    None => format!("₱{shown}"),
                }
            });
        }
    }

    #[test]
    fn test_format_money_with_huge_minor_digits() {
        let mut config = LedgerConfig::new("shelf.db");
        config.minor_digits = 19;
        assert_eq!(config.format_money(Money::from_minor(5)), "₱0.0000000000000000005");

        config.minor_digits = u8::MAX;
        let shown = config.format_money(Money::from_minor(-1));
        assert!(shown.starts_with("-₱0.000"));
        assert!(shown.ends_with('1'));
    }

    #[test]
    fn test_format_money_without_minor_digits() {
        let mut config = LedgerConfig::new("shelf.db");
        config.currency_symbol = "¥".to_string();
        config.minor_digits = 0;

        assert_eq!(config.format_money(Money::from_minor(500)), "¥500");
    }
}
