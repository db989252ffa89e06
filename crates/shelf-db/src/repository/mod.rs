//! # Repository Module
//!
//! Database repositories for the catalog and the sales ledger.
//!
//! ## Two Ways In
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                                                                         │
//! │  Pooled (one statement, autocommit)                                    │
//! │       db.catalog().list().await                                        │
//! │       db.sales().total_profit().await                                  │
//! │                                                                         │
//! │  Connection-level (caller owns the transaction)                        │
//! │       let mut tx = db.begin().await?;                                  │
//! │       SalesRepository::record_sale_on(&mut tx, ...).await?;            │
//! │       CatalogRepository::delete_on(&mut tx, id).await?;                │
//! │       tx.commit().await?;                                              │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`CatalogRepository`](catalog::CatalogRepository) - Item CRUD
//! - [`SalesRepository`](sales::SalesRepository) - Append-only sales history

pub mod catalog;
pub mod sales;
