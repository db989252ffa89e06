//! # Ledger Engine
//!
//! Owns the database and serializes every write. This is the only place where
//! the catalog and the sales ledger change together.
//!
//! ## Sell Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         sell_item(id)                                   │
//! │                                                                         │
//! │  1. Acquire write gate ──────────────────────────────────────────────►  │
//! │     • concurrent sells of the same id queue up here                     │
//! │                                                                         │
//! │  2. BEGIN ───────────────────────────────────────────────────────────►  │
//! │     • SELECT item        → NotFound if already sold/deleted            │
//! │     • SUM(price) + price → ProfitOverflow if it leaves the i64 range   │
//! │     • INSERT sale        (name + price snapshot, sold_at = now)         │
//! │     • DELETE item                                                       │
//! │                                                                         │
//! │  3. COMMIT ──────────────────────────────────────────────────────────►  │
//! │     • any `?` before this drops the transaction → ROLLBACK             │
//! │                                                                         │
//! │  Invariant: an id is never in both tables, and never in neither after  │
//! │  a successful sell.                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Reads
//! Reads skip the write gate. WAL mode lets them run while a write is in
//! flight; `report` reads both aggregates inside one transaction so it sees a
//! single snapshot.

use std::sync::Arc;

use shelf_core::{CoreError, Item, ItemDraft, Money, Report, SaleRecord};
use shelf_db::{CatalogRepository, Database, DbConfig, DbError, SalesRepository, SchemaStatus};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::LedgerConfig;
use crate::error::{LedgerError, LedgerResult};

/// Entry point for the UI shell.
///
/// Cloning is cheap and clones share the same pool and write gate.
///
/// ## Usage
/// ```rust,ignore
/// let engine = LedgerEngine::open(&LedgerConfig::from_env()?).await?;
///
/// let dune = engine.add_item("Dune", "Sci-fi classic", 500).await?;
/// engine.sell_item(dune.id).await?;
///
/// let report = engine.recent_report().await?;
/// ```
#[derive(Debug, Clone)]
pub struct LedgerEngine {
    db: Database,
    write_gate: Arc<Mutex<()>>,
    recent_sales_limit: u32,
}

impl LedgerEngine {
    /// Opens (or creates) the store at the configured path and ensures the schema.
    pub async fn open(config: &LedgerConfig) -> LedgerResult<Self> {
        info!(path = %config.database_path.display(), "Opening ledger");

        let db = Database::new(DbConfig::new(&config.database_path)).await?;
        Ok(Self::from_database(db, config.recent_sales_limit))
    }

    /// Wraps an already connected database.
    pub fn from_database(db: Database, recent_sales_limit: u32) -> Self {
        LedgerEngine {
            db,
            write_gate: Arc::new(Mutex::new(())),
            recent_sales_limit,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn recent_sales_limit(&self) -> u32 {
        self.recent_sales_limit
    }

    // -------------------------------------------------------------------------
    // Schema
    // -------------------------------------------------------------------------

    /// Creates missing tables. Safe to call any number of times.
    pub async fn ensure_schema(&self) -> LedgerResult<()> {
        let _gate = self.write_gate.lock().await;
        self.db.ensure_schema().await?;
        Ok(())
    }

    pub async fn schema_status(&self) -> LedgerResult<SchemaStatus> {
        Ok(self.db.schema_status().await?)
    }

    // -------------------------------------------------------------------------
    // Catalog
    // -------------------------------------------------------------------------

    /// All items, sorted by name.
    pub async fn list_items(&self) -> LedgerResult<Vec<Item>> {
        Ok(self.db.catalog().list().await?)
    }

    pub async fn get_item(&self, id: i64) -> LedgerResult<Item> {
        self.db
            .catalog()
            .get_by_id(id)
            .await?
            .ok_or_else(|| CoreError::ItemNotFound(id).into())
    }

    /// Validates and stores a new item.
    ///
    /// ## Errors
    /// * `Validation` - empty name/description or negative price; nothing stored
    pub async fn add_item(
        &self,
        name: &str,
        description: &str,
        price_cents: i64,
    ) -> LedgerResult<Item> {
        let draft = ItemDraft::new(name, description, price_cents)?;

        let _gate = self.write_gate.lock().await;
        let item = self.db.catalog().insert(&draft).await?;

        info!(id = %item.id, name = %item.name, "Item added");
        Ok(item)
    }

    /// Replaces name, description and price of an existing item.
    ///
    /// ## Errors
    /// * `Validation` - same rules as [`add_item`](Self::add_item)
    /// * `NotFound` - no item with that id
    pub async fn update_item(
        &self,
        id: i64,
        name: &str,
        description: &str,
        price_cents: i64,
    ) -> LedgerResult<Item> {
        let draft = ItemDraft::new(name, description, price_cents)?;

        let _gate = self.write_gate.lock().await;
        let item = self.db.catalog().update(id, &draft).await?;

        info!(id = %id, "Item updated");
        Ok(item)
    }

    /// Removes an item without recording a sale.
    pub async fn delete_item(&self, id: i64) -> LedgerResult<()> {
        let _gate = self.write_gate.lock().await;
        self.db.catalog().delete(id).await?;

        info!(id = %id, "Item deleted");
        Ok(())
    }

    pub async fn item_count(&self) -> LedgerResult<i64> {
        Ok(self.db.catalog().count().await?)
    }

    // -------------------------------------------------------------------------
    // Selling
    // -------------------------------------------------------------------------

    /// Moves an item from the catalog into the sales ledger.
    ///
    /// ## Returns
    /// * `Ok(SaleRecord)` - the snapshot that was recorded
    /// * `Err(NotFound)` - item never existed, was deleted, or was already sold;
    ///   neither table changed
    /// * `Err(ProfitOverflow)` - the ledger total cannot absorb this price;
    ///   neither table changed
    /// * `Err(Storage)` - both statements were rolled back
    pub async fn sell_item(&self, id: i64) -> LedgerResult<SaleRecord> {
        let _gate = self.write_gate.lock().await;
        debug!(id = %id, "Selling item");

        let mut tx = self.db.begin().await?;

        let item = CatalogRepository::get_by_id_on(&mut tx, id)
            .await?
            .ok_or(CoreError::ItemNotFound(id))?;

        // SQLite's SUM errors on overflow, which would break every later report
        SalesRepository::total_profit_on(&mut tx)
            .await?
            .checked_add(item.price())
            .ok_or(CoreError::ProfitOverflow {
                price_cents: item.price_cents,
            })?;

        let record =
            SalesRepository::record_sale_on(&mut tx, item.id, &item.name, item.price_cents)
                .await?;
        CatalogRepository::delete_on(&mut tx, item.id).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        info!(
            id = %id,
            sale_id = %record.id,
            price = record.price_cents,
            "Sale recorded"
        );
        Ok(record)
    }

    // -------------------------------------------------------------------------
    // Reporting
    // -------------------------------------------------------------------------

    /// Total profit plus the `limit` most recent sales, from one snapshot.
    pub async fn report(&self, limit: u32) -> LedgerResult<Report> {
        let mut tx = self.db.begin().await?;

        let total_profit = SalesRepository::total_profit_on(&mut tx).await?;
        let recent_sales = SalesRepository::list_recent_on(&mut tx, limit).await?;

        tx.commit().await.map_err(DbError::transaction)?;

        Ok(Report {
            total_profit,
            recent_sales,
        })
    }

    /// [`report`](Self::report) with the configured recent-sales limit.
    pub async fn recent_report(&self) -> LedgerResult<Report> {
        self.report(self.recent_sales_limit).await
    }

    pub async fn list_recent(&self, limit: u32) -> LedgerResult<Vec<SaleRecord>> {
        Ok(self.db.sales().list_recent(limit).await?)
    }

    pub async fn total_profit(&self) -> LedgerResult<Money> {
        Ok(self.db.sales().total_profit().await?)
    }

    pub async fn sale_count(&self) -> LedgerResult<i64> {
        Ok(self.db.sales().count().await?)
    }

    // -------------------------------------------------------------------------
    // Administration
    // -------------------------------------------------------------------------

    /// Erases all sales history. The catalog is untouched.
    ///
    /// ## Returns
    /// Number of removed sale records.
    pub async fn reset_sales_history(&self) -> LedgerResult<u64> {
        let _gate = self.write_gate.lock().await;
        warn!("Resetting sales history");

        Ok(self.db.sales().reset().await?)
    }

    /// Fails with `Storage` if the store cannot run a trivial query.
    pub async fn health_check(&self) -> LedgerResult<()> {
        if self.db.health_check().await {
            Ok(())
        } else {
            Err(LedgerError::Storage(DbError::ConnectionFailed(
                "health check query failed".to_string(),
            )))
        }
    }

    /// Waits for in-flight writes, then closes the pool.
    pub async fn close(&self) {
        let _gate = self.write_gate.lock().await;
        self.db.close().await;
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCode;
    use shelf_core::validation::MAX_PRICE_CENTS;

    async fn engine() -> LedgerEngine {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        LedgerEngine::from_database(db, 20)
    }

    #[tokio::test]
    async fn test_add_then_list() {
        let engine = engine().await;

        let item = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        let items = engine.list_items().await.unwrap();
        assert_eq!(items, vec![item.clone()]);
        assert_eq!(engine.get_item(item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn test_add_trims_text() {
        let engine = engine().await;

        let item = engine.add_item("  Dune ", "\tSci-fi classic ", 500).await.unwrap();

        assert_eq!(item.name, "Dune");
        assert_eq!(item.description, "Sci-fi classic");
    }

    #[tokio::test]
    async fn test_invalid_input_leaves_catalog_unchanged() {
        let engine = engine().await;
        engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();
        let before = engine.list_items().await.unwrap();

        for (name, description, price) in [
            ("", "Sci-fi classic", 500),
            ("   ", "Sci-fi classic", 500),
            ("Hyperion", "", 450),
            ("Hyperion", "Space opera", -1),
        ] {
            let err = engine.add_item(name, description, price).await.unwrap_err();
            assert_eq!(err.code(), ErrorCode::ValidationError);
        }

        assert_eq!(engine.list_items().await.unwrap(), before);
    }

    #[tokio::test]
    async fn test_dune_example() {
        let engine = engine().await;

        let dune = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();
        let record = engine.sell_item(dune.id).await.unwrap();

        assert!(engine.list_items().await.unwrap().is_empty());

        let report = engine.report(20).await.unwrap();
        assert_eq!(report.total_profit, Money::from_minor(500));
        assert_eq!(report.recent_sales, vec![record.clone()]);
        assert_eq!(record.item_id, dune.id);
        assert_eq!(record.item_name, "Dune");
        assert_eq!(record.price_cents, 500);
    }

    #[tokio::test]
    async fn test_sell_increases_profit_by_price() {
        let engine = engine().await;
        let dune = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();
        let hyperion = engine.add_item("Hyperion", "Space opera", 450).await.unwrap();

        engine.sell_item(dune.id).await.unwrap();
        let before = engine.total_profit().await.unwrap();

        engine.sell_item(hyperion.id).await.unwrap();
        let after = engine.total_profit().await.unwrap();

        assert_eq!(after - before, Money::from_minor(450));
        assert_eq!(engine.sale_count().await.unwrap(), 2);
        assert_eq!(engine.item_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_double_sell_is_not_found() {
        let engine = engine().await;
        let dune = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        engine.sell_item(dune.id).await.unwrap();
        let err = engine.sell_item(dune.id).await.unwrap_err();

        assert!(matches!(err, LedgerError::NotFound { .. }));
        assert_eq!(engine.sale_count().await.unwrap(), 1);
        assert_eq!(engine.total_profit().await.unwrap(), Money::from_minor(500));
    }

    #[tokio::test]
    async fn test_sell_unknown_id_changes_nothing() {
        let engine = engine().await;
        engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        let err = engine.sell_item(404).await.unwrap_err();

        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(engine.item_count().await.unwrap(), 1);
        assert_eq!(engine.sale_count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_update_round_trip() {
        let engine = engine().await;
        let item = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        let updated = engine
            .update_item(item.id, "Dune Messiah", "Sequel", 650)
            .await
            .unwrap();

        let listed = engine.list_items().await.unwrap();
        assert_eq!(listed, vec![updated]);
        assert_eq!(listed[0].id, item.id);
        assert_eq!(listed[0].name, "Dune Messiah");
        assert_eq!(listed[0].description, "Sequel");
        assert_eq!(listed[0].price_cents, 650);
    }

    #[tokio::test]
    async fn test_update_and_delete_missing_are_not_found() {
        let engine = engine().await;
        let dune = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();
        engine.add_item("Hyperion", "Space opera", 450).await.unwrap();
        let before = engine.list_items().await.unwrap();
        let missing = dune.id + 1000;

        let err = engine
            .update_item(missing, "Dune", "Changed", 999)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(engine.list_items().await.unwrap(), before);

        let err = engine.delete_item(missing).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
        assert_eq!(engine.list_items().await.unwrap(), before);

        let err = engine.get_item(missing).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::NotFound);
    }

    #[tokio::test]
    async fn test_price_above_limit_is_rejected() {
        let engine = engine().await;

        let err = engine.add_item("Vault", "Too dear", i64::MAX).await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);

        let err = engine
            .add_item("Vault", "Too dear", MAX_PRICE_CENTS + 1)
            .await
            .unwrap_err();
        assert_eq!(err.code(), ErrorCode::ValidationError);
        assert!(engine.list_items().await.unwrap().is_empty());

        let a = engine.add_item("A", "Priciest allowed", MAX_PRICE_CENTS).await.unwrap();
        let b = engine.add_item("B", "Cheap", 1).await.unwrap();
        engine.sell_item(a.id).await.unwrap();
        engine.sell_item(b.id).await.unwrap();

        let report = engine.report(5).await.unwrap();
        assert_eq!(report.total_profit, Money::from_minor(MAX_PRICE_CENTS + 1));
        assert_eq!(report.recent_sales.len(), 2);
    }

    #[tokio::test]
    async fn test_sell_refused_when_total_would_overflow() {
        let engine = engine().await;
        // History recorded before prices were capped
        engine
            .database()
            .sales()
            .record_sale(1, "Legacy import", i64::MAX - 10)
            .await
            .unwrap();
        let item = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        let err = engine.sell_item(item.id).await.unwrap_err();

        assert!(matches!(err, LedgerError::ProfitOverflow { price_cents: 500 }));
        assert_eq!(engine.get_item(item.id).await.unwrap(), item);
        assert_eq!(engine.sale_count().await.unwrap(), 1);

        let report = engine.report(5).await.unwrap();
        assert_eq!(report.total_profit, Money::from_minor(i64::MAX - 10));
    }

    #[tokio::test]
    async fn test_invalid_update_keeps_stored_item() {
        let engine = engine().await;
        let item = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        let err = engine.update_item(item.id, "Dune", "", 500).await.unwrap_err();

        assert!(matches!(err, LedgerError::Validation(_)));
        assert_eq!(engine.get_item(item.id).await.unwrap(), item);
    }

    #[tokio::test]
    async fn test_delete_does_not_record_sale() {
        let engine = engine().await;
        let item = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        engine.delete_item(item.id).await.unwrap();

        assert!(engine.list_items().await.unwrap().is_empty());
        assert_eq!(engine.report(20).await.unwrap(), Report::empty());
    }

    #[tokio::test]
    async fn test_sale_snapshot_ignores_later_catalog_changes() {
        let engine = engine().await;
        let dune = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();
        let record = engine.sell_item(dune.id).await.unwrap();

        let reissue = engine.add_item("Dune", "Anniversary edition", 900).await.unwrap();
        engine
            .update_item(reissue.id, "Dune (2026)", "Anniversary edition", 950)
            .await
            .unwrap();

        let recent = engine.list_recent(10).await.unwrap();
        assert_eq!(recent, vec![record]);
        assert_eq!(recent[0].item_name, "Dune");
        assert_eq!(recent[0].price_cents, 500);
    }

    #[tokio::test]
    async fn test_report_limit_and_order() {
        let engine = engine().await;
        for (name, price) in [("A", 100), ("B", 200), ("C", 300)] {
            let item = engine.add_item(name, "Book", price).await.unwrap();
            engine.sell_item(item.id).await.unwrap();
        }

        let report = engine.report(2).await.unwrap();
        let names: Vec<&str> = report
            .recent_sales
            .iter()
            .map(|r| r.item_name.as_str())
            .collect();
        assert_eq!(names, vec!["C", "B"]);
        assert_eq!(report.total_profit, Money::from_minor(600));

        let report = engine.report(0).await.unwrap();
        assert!(report.recent_sales.is_empty());
        assert_eq!(report.total_profit, Money::from_minor(600));
    }

    #[tokio::test]
    async fn test_recent_report_uses_configured_limit() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let engine = LedgerEngine::from_database(db, 2);

        for name in ["A", "B", "C"] {
            let item = engine.add_item(name, "Book", 100).await.unwrap();
            engine.sell_item(item.id).await.unwrap();
        }

        let report = engine.recent_report().await.unwrap();
        assert_eq!(report.recent_sales.len(), 2);
        assert_eq!(report.total_profit, Money::from_minor(300));
    }

    #[tokio::test]
    async fn test_empty_report_is_zero() {
        let engine = engine().await;

        let report = engine.recent_report().await.unwrap();
        assert_eq!(report, Report::empty());
    }

    #[tokio::test]
    async fn test_reset_sales_history_keeps_catalog() {
        let engine = engine().await;
        let dune = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();
        let hyperion = engine.add_item("Hyperion", "Space opera", 450).await.unwrap();
        engine.sell_item(dune.id).await.unwrap();

        assert_eq!(engine.reset_sales_history().await.unwrap(), 1);

        assert_eq!(engine.total_profit().await.unwrap(), Money::zero());
        assert_eq!(engine.list_items().await.unwrap(), vec![hyperion]);
    }

    #[tokio::test]
    async fn test_quotes_round_trip_through_sale() {
        let engine = engine().await;
        let item = engine
            .add_item("O'Reilly's \"Rust\"", "'; DROP TABLE sales; --", 1)
            .await
            .unwrap();

        let record = engine.sell_item(item.id).await.unwrap();

        assert_eq!(record.item_name, "O'Reilly's \"Rust\"");
        assert_eq!(engine.list_recent(1).await.unwrap(), vec![record]);
    }

    #[tokio::test]
    async fn test_diagnostics() {
        let engine = engine().await;

        engine.health_check().await.unwrap();
        engine.ensure_schema().await.unwrap();
        assert!(engine.schema_status().await.unwrap().is_current());

        engine.close().await;
        let err = engine.health_check().await.unwrap_err();
        assert_eq!(err.code(), ErrorCode::StorageError);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_sells_of_same_item() {
        let dir = tempfile::tempdir().unwrap();
        let engine = LedgerEngine::open(&LedgerConfig::new(dir.path().join("shelf.db")))
            .await
            .unwrap();
        let item = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let engine = engine.clone();
                tokio::spawn(async move { engine.sell_item(item.id).await })
            })
            .collect();

        let mut sold = 0;
        let mut not_found = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => sold += 1,
                Err(LedgerError::NotFound { .. }) => not_found += 1,
                Err(other) => panic!("unexpected error: {other}"),
            }
        }

        assert_eq!(sold, 1);
        assert_eq!(not_found, 3);
        assert_eq!(engine.sale_count().await.unwrap(), 1);
        assert_eq!(engine.total_profit().await.unwrap(), Money::from_minor(500));
        engine.close().await;
    }

    #[tokio::test]
    async fn test_history_survives_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let config = LedgerConfig::new(dir.path().join("shelf.db"));

        let engine = LedgerEngine::open(&config).await.unwrap();
        let dune = engine.add_item("Dune", "Sci-fi classic", 500).await.unwrap();
        let hyperion = engine.add_item("Hyperion", "Space opera", 450).await.unwrap();
        let record = engine.sell_item(dune.id).await.unwrap();
        engine.close().await;

        let engine = LedgerEngine::open(&config).await.unwrap();
        let report = engine.recent_report().await.unwrap();
        assert_eq!(report.total_profit, Money::from_minor(500));
        assert_eq!(report.recent_sales, vec![record]);
        assert_eq!(engine.list_items().await.unwrap(), vec![hyperion]);

        // A fresh id never collides with a sold one
        let next = engine.add_item("Neuromancer", "Cyberpunk", 300).await.unwrap();
        assert!(next.id > dune.id);
        engine.close().await;
    }
}
