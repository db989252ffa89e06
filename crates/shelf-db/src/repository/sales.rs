//! # Sales Ledger Repository
//!
//! Append-only store of completed sales.
//!
//! ## Ledger Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Sales Ledger                                      │
//! │                                                                         │
//! │  1. RECORD                                                             │
//! │     └── record_sale() → SaleRecord { item_name, price, sold_at }       │
//! │         (inside the engine's sell transaction)                          │
//! │                                                                         │
//! │  2. READ                                                               │
//! │     ├── list_recent(limit) → newest first                              │
//! │     └── total_profit()     → SUM(price), 0 when empty                  │
//! │                                                                         │
//! │  3. (ADMIN ONLY) RESET                                                 │
//! │     └── reset() → deletes every record; never called at startup        │
//! │                                                                         │
//! │  Records are never updated.                                            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Timestamps
//! `sold_at` is written as RFC 3339 UTC with exactly six fractional digits
//! (`2026-10-18T09:30:00.123456Z`), so ordering the TEXT column is the same as
//! ordering by time.

use chrono::{DateTime, SecondsFormat, SubsecRound, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, warn};

use crate::error::DbResult;
use shelf_core::{Money, SaleRecord};

/// Repository for sales ledger operations.
#[derive(Debug, Clone)]
pub struct SalesRepository {
    pool: SqlitePool,
}

impl SalesRepository {
    /// Creates a new SalesRepository.
    pub fn new(pool: SqlitePool) -> Self {
        SalesRepository { pool }
    }

    /// Appends a sale record stamped with the current time.
    ///
    /// ## Snapshot Pattern
    /// `item_name` and `price_cents` are copied in by the caller. Nothing here
    /// reads the catalog, so later catalog edits never reach ledger history.
    pub async fn record_sale(
        &self,
        item_id: i64,
        item_name: &str,
        price_cents: i64,
    ) -> DbResult<SaleRecord> {
        let mut conn = self.pool.acquire().await?;
        Self::record_sale_on(&mut conn, item_id, item_name, price_cents).await
    }

    /// Gets a sale record by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<SaleRecord>> {
        let record = sqlx::query_as::<_, SaleRecord>(
            "SELECT id, item_id, item_name, price, sold_at FROM sales WHERE id = ?1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(record)
    }

    /// Lists the most recent sales, newest first.
    pub async fn list_recent(&self, limit: u32) -> DbResult<Vec<SaleRecord>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_recent_on(&mut conn, limit).await
    }

    /// Sum of every recorded sale price. Zero for an empty ledger.
    pub async fn total_profit(&self) -> DbResult<Money> {
        let mut conn = self.pool.acquire().await?;
        Self::total_profit_on(&mut conn).await
    }

    /// Counts sale records.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM sales")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Deletes every sale record. Administrative operation.
    ///
    /// ## Returns
    /// Number of deleted records.
    pub async fn reset(&self) -> DbResult<u64> {
        let mut conn = self.pool.acquire().await?;
        Self::reset_on(&mut conn).await
    }

    // -------------------------------------------------------------------------
    // Connection-level operations
    // -------------------------------------------------------------------------

    pub async fn record_sale_on(
        conn: &mut SqliteConnection,
        item_id: i64,
        item_name: &str,
        price_cents: i64,
    ) -> DbResult<SaleRecord> {
        let sold_at = now_micros();

        debug!(item_id = %item_id, price = price_cents, "Recording sale");

        let result = sqlx::query(
            r#"
            INSERT INTO sales (item_id, price, sold_at, item_name)
            VALUES (?1, ?2, ?3, ?4)
            "#,
        )
        .bind(item_id)
        .bind(price_cents)
        .bind(format_sold_at(&sold_at))
        .bind(item_name)
        .execute(&mut *conn)
        .await?;

        Ok(SaleRecord {
            id: result.last_insert_rowid(),
            item_id,
            item_name: item_name.to_string(),
            price_cents,
            sold_at,
        })
    }

    pub async fn list_recent_on(
        conn: &mut SqliteConnection,
        limit: u32,
    ) -> DbResult<Vec<SaleRecord>> {
        let records = sqlx::query_as::<_, SaleRecord>(
            r#"
            SELECT id, item_id, item_name, price, sold_at
            FROM sales
            ORDER BY sold_at DESC, id DESC
            LIMIT ?1
            "#,
        )
        .bind(i64::from(limit))
        .fetch_all(&mut *conn)
        .await?;

        debug!(limit = limit, count = records.len(), "Listed recent sales");
        Ok(records)
    }

    pub async fn total_profit_on(conn: &mut SqliteConnection) -> DbResult<Money> {
        let total: i64 = sqlx::query_scalar("SELECT COALESCE(SUM(price), 0) FROM sales")
            .fetch_one(&mut *conn)
            .await?;

        Ok(Money::from_minor(total))
    }

    pub async fn reset_on(conn: &mut SqliteConnection) -> DbResult<u64> {
        let result = sqlx::query("DELETE FROM sales").execute(&mut *conn).await?;

        warn!(removed = result.rows_affected(), "Sales ledger reset");
        Ok(result.rows_affected())
    }
}

/// Current time truncated to the precision that is stored.
fn now_micros() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(6)
}

fn format_sold_at(sold_at: &DateTime<Utc>) -> String {
    sold_at.to_rfc3339_opts(SecondsFormat::Micros, true)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::catalog::CatalogRepository;
    use crate::{Database, DbConfig};
    use chrono::TimeZone;
    use shelf_core::ItemDraft;

    async fn db() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[test]
    fn test_sold_at_format_is_fixed_width() {
        let at = Utc.with_ymd_and_hms(2026, 10, 18, 9, 30, 0).unwrap();
        assert_eq!(format_sold_at(&at), "2026-10-18T09:30:00.000000Z");
    }

    #[tokio::test]
    async fn test_empty_ledger_profit_is_zero() {
        let sales = db().await.sales();

        assert_eq!(sales.total_profit().await.unwrap(), Money::zero());
        assert!(sales.list_recent(20).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_record_sale_round_trips() {
        let sales = db().await.sales();

        let record = sales.record_sale(7, "Dune", 500).await.unwrap();
        let stored = sales.get_by_id(record.id).await.unwrap().unwrap();

        assert_eq!(stored, record);
        assert_eq!(stored.item_id, 7);
        assert_eq!(stored.price(), Money::from_minor(500));
    }

    #[tokio::test]
    async fn test_total_profit_sums_prices() {
        let sales = db().await.sales();

        sales.record_sale(1, "Dune", 500).await.unwrap();
        sales.record_sale(2, "Hyperion", 450).await.unwrap();
        sales.record_sale(3, "Free bookmark", 0).await.unwrap();

        assert_eq!(sales.total_profit().await.unwrap(), Money::from_minor(950));
        assert_eq!(sales.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_list_recent_newest_first_and_truncated() {
        let sales = db().await.sales();

        for i in 1..=5 {
            sales.record_sale(i, &format!("Book {i}"), 100).await.unwrap();
        }

        let recent = sales.list_recent(3).await.unwrap();
        let names: Vec<&str> = recent.iter().map(|r| r.item_name.as_str()).collect();
        assert_eq!(names, vec!["Book 5", "Book 4", "Book 3"]);

        assert!(sales.list_recent(0).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_reset_clears_history() {
        let sales = db().await.sales();
        sales.record_sale(1, "Dune", 500).await.unwrap();
        sales.record_sale(2, "Dune", 500).await.unwrap();

        assert_eq!(sales.reset().await.unwrap(), 2);
        assert_eq!(sales.total_profit().await.unwrap(), Money::zero());
    }

    #[tokio::test]
    async fn test_uncommitted_transaction_rolls_back_both_tables() {
        let db = db().await;
        let item = db
            .catalog()
            .insert(&ItemDraft::new("Dune", "Sci-fi classic", 500).unwrap())
            .await
            .unwrap();

        {
            let mut tx = db.begin().await.unwrap();
            SalesRepository::record_sale_on(&mut tx, item.id, &item.name, item.price_cents)
                .await
                .unwrap();
            CatalogRepository::delete_on(&mut tx, item.id).await.unwrap();
            // dropped without commit
        }

        assert_eq!(db.sales().count().await.unwrap(), 0);
        assert_eq!(db.catalog().get_by_id(item.id).await.unwrap(), Some(item));
    }

    #[tokio::test]
    async fn test_committed_transaction_applies_both_tables() {
        let db = db().await;
        let item = db
            .catalog()
            .insert(&ItemDraft::new("Dune", "Sci-fi classic", 500).unwrap())
            .await
            .unwrap();

        let mut tx = db.begin().await.unwrap();
        SalesRepository::record_sale_on(&mut tx, item.id, &item.name, item.price_cents)
            .await
            .unwrap();
        CatalogRepository::delete_on(&mut tx, item.id).await.unwrap();
        tx.commit().await.unwrap();

        assert_eq!(db.sales().count().await.unwrap(), 1);
        assert_eq!(db.catalog().get_by_id(item.id).await.unwrap(), None);
    }
}
