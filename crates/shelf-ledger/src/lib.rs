//! # shelf-ledger: Ledger Engine for Shelf Ledger
//!
//! Single-user local inventory catalog and sales ledger. A UI shell embeds
//! this crate, opens one [`LedgerEngine`] at startup and calls it for every
//! user action.
//!
//! ## Module Organization
//! ```text
//! shelf_ledger/
//! ├── lib.rs          ◄─── You are here (re-exports)
//! ├── engine.rs       ◄─── LedgerEngine: catalog edits, atomic sell, report
//! ├── config.rs       ◄─── LedgerConfig: env overrides, default paths
//! ├── error.rs        ◄─── LedgerError + serializable payload
//! └── telemetry.rs    ◄─── tracing-subscriber setup
//! ```
//!
//! ## Startup Sequence
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Ledger Startup                                    │
//! │                                                                         │
//! │  1. init_tracing() ──────────────────────────────────────────────────►  │
//! │     • tracing-subscriber with env filter, RUST_LOG overrides           │
//! │                                                                         │
//! │  2. LedgerConfig::from_env() ────────────────────────────────────────►  │
//! │     • SHELF_DB_PATH or the platform data directory                     │
//! │                                                                         │
//! │  3. LedgerEngine::open(&config) ─────────────────────────────────────►  │
//! │     • SQLite with WAL mode                                             │
//! │     • Ensure schema (existing history is kept)                         │
//! │                                                                         │
//! │  4. Hand the engine to the UI shell                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Example
//! ```rust,no_run
//! use shelf_ledger::{init_tracing, LedgerConfig, LedgerEngine, LedgerResult};
//!
//! # async fn run() -> LedgerResult<()> {
//! init_tracing();
//! let config = LedgerConfig::from_env()?;
//! let engine = LedgerEngine::open(&config).await?;
//!
//! let dune = engine.add_item("Dune", "Sci-fi classic", 500).await?;
//! engine.sell_item(dune.id).await?;
//!
//! let report = engine.recent_report().await?;
//! println!("Profit: {}", config.format_money(report.total_profit));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod telemetry;

pub use config::LedgerConfig;
pub use engine::LedgerEngine;
pub use error::{ErrorCode, ErrorPayload, LedgerError, LedgerResult};
pub use telemetry::init_tracing;

// Domain types the UI shell works with
pub use shelf_core::{Item, ItemDraft, Money, Report, SaleRecord, ValidationError};
pub use shelf_db::SchemaStatus;
