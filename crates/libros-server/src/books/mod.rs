//! Read-only view of the book inventory
//!
//! The audit subsystem never writes books. It reads them to snapshot a
//! book's fields before a destructive request, to enrich searches and
//! exports, and to list the distinct values the inventory filters offer.

mod memory;
mod postgres;

pub use memory::MemoryBookCatalog;
pub use postgres::PgBookCatalog;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::audit::models::BookMetadata;

#[derive(Error, Debug)]
pub enum CatalogError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

pub type CatalogResult<T> = std::result::Result<T, CatalogError>;

/// A book as stored in the inventory
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Book {
    pub id: i64,
    pub title: String,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    pub stock: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl Book {
    pub fn metadata(&self) -> BookMetadata {
        BookMetadata {
            title: Some(self.title.clone()),
            author: self.author.clone(),
            publisher: self.publisher.clone(),
            genre: self.genre.clone(),
            stock: self.stock,
            price: self.price,
            description: self.description.clone(),
        }
    }
}

/// Distinct values offered by the inventory report filters, sorted ascending
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct InventoryFilterOptions {
    pub genres: Vec<String>,
    pub publishers: Vec<String>,
    pub authors: Vec<String>,
}

#[async_trait]
pub trait BookCatalog: Send + Sync {
    /// Live (not soft-deleted) book by id
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Book>>;

    /// Distinct non-empty genres, publishers and authors of live books
    async fn filter_options(&self) -> CatalogResult<InventoryFilterOptions>;
}
