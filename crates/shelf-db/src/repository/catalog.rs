//! # Catalog Repository
//!
//! Database operations for sellable items.
//!
//! ## Key Operations
//! - List the catalog (name order)
//! - Insert / replace / delete items
//!
//! ## Parameter Binding
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ❌ WRONG: SQL text built from user input                               │
//! │     format!("INSERT ... VALUES ('{}')", name.replace("'", "''"))        │
//! │                                                                         │
//! │  ✅ CORRECT: every value is a bound parameter                           │
//! │     sqlx::query("INSERT ... VALUES (?1, ?2, ?3)").bind(name)...         │
//! │                                                                         │
//! │  Quotes, semicolons and comment markers are stored byte-for-byte.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Connection-level functions
//! The `*_on` associated functions take a `&mut SqliteConnection` so the
//! Ledger Engine can run them inside its sell transaction. The `&self`
//! methods run the same SQL on a pooled connection.

use sqlx::{SqliteConnection, SqlitePool};
use tracing::debug;

use crate::error::{DbError, DbResult};
use shelf_core::{Item, ItemDraft};

/// Repository for catalog database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = CatalogRepository::new(pool);
///
/// let draft = ItemDraft::new("Dune", "Sci-fi classic", 500)?;
/// let item = repo.insert(&draft).await?;
/// let all = repo.list().await?;
/// ```
#[derive(Debug, Clone)]
pub struct CatalogRepository {
    pool: SqlitePool,
}

impl CatalogRepository {
    /// Creates a new CatalogRepository.
    pub fn new(pool: SqlitePool) -> Self {
        CatalogRepository { pool }
    }

    /// Lists every item, sorted by name ascending (ties by id).
    pub async fn list(&self) -> DbResult<Vec<Item>> {
        let mut conn = self.pool.acquire().await?;
        Self::list_on(&mut conn).await
    }

    /// Gets an item by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Item))` - Item found
    /// * `Ok(None)` - Item not found (never added, deleted, or sold)
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Item>> {
        let mut conn = self.pool.acquire().await?;
        Self::get_by_id_on(&mut conn, id).await
    }

    /// Inserts a new item and returns it with its assigned id.
    pub async fn insert(&self, draft: &ItemDraft) -> DbResult<Item> {
        let mut conn = self.pool.acquire().await?;
        Self::insert_on(&mut conn, draft).await
    }

    /// Replaces name, description and price of an existing item.
    ///
    /// ## Returns
    /// * `Ok(Item)` - The item as now stored
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn update(&self, id: i64, draft: &ItemDraft) -> DbResult<Item> {
        let mut conn = self.pool.acquire().await?;
        Self::update_on(&mut conn, id, draft).await
    }

    /// Deletes an item.
    ///
    /// ## Returns
    /// * `Ok(())` - Row removed
    /// * `Err(DbError::NotFound)` - Item doesn't exist
    pub async fn delete(&self, id: i64) -> DbResult<()> {
        let mut conn = self.pool.acquire().await?;
        Self::delete_on(&mut conn, id).await
    }

    /// Counts catalog items (for diagnostics).
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM items")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    // -------------------------------------------------------------------------
    // Connection-level operations
    // -------------------------------------------------------------------------

    pub async fn list_on(conn: &mut SqliteConnection) -> DbResult<Vec<Item>> {
        let items = sqlx::query_as::<_, Item>(
            "SELECT id, name, description, price FROM items ORDER BY name ASC, id ASC",
        )
        .fetch_all(&mut *conn)
        .await?;

        debug!(count = items.len(), "Listed catalog");
        Ok(items)
    }

    pub async fn get_by_id_on(conn: &mut SqliteConnection, id: i64) -> DbResult<Option<Item>> {
        let item = sqlx::query_as::<_, Item>("SELECT id, name, description, price FROM items WHERE id = ?1")
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;

        Ok(item)
    }

    pub async fn insert_on(conn: &mut SqliteConnection, draft: &ItemDraft) -> DbResult<Item> {
        debug!(name = %draft.name(), price = draft.price_cents(), "Inserting item");

        let result = sqlx::query("INSERT INTO items (name, description, price) VALUES (?1, ?2, ?3)")
            .bind(draft.name())
            .bind(draft.description())
            .bind(draft.price_cents())
            .execute(&mut *conn)
            .await?;

        Ok(draft.clone().into_item(result.last_insert_rowid()))
    }

    pub async fn update_on(
        conn: &mut SqliteConnection,
        id: i64,
        draft: &ItemDraft,
    ) -> DbResult<Item> {
        debug!(id = %id, "Updating item");

        let result = sqlx::query(
            r#"
            UPDATE items SET
                name = ?2,
                description = ?3,
                price = ?4
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .bind(draft.name())
        .bind(draft.description())
        .bind(draft.price_cents())
        .execute(&mut *conn)
        .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(draft.clone().into_item(id))
    }

    pub async fn delete_on(conn: &mut SqliteConnection, id: i64) -> DbResult<()> {
        debug!(id = %id, "Deleting item");

        let result = sqlx::query("DELETE FROM items WHERE id = ?1")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Item", id));
        }

        Ok(())
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
