use async_trait::async_trait;
use std::collections::{BTreeMap, BTreeSet};
use tokio::sync::RwLock;

use super::{Book, BookCatalog, CatalogResult, InventoryFilterOptions};

/// In-process catalog for tests and database-less runs
#[derive(Debug, Default)]
pub struct MemoryBookCatalog {
    books: RwLock<BTreeMap<i64, Book>>,
}

impl MemoryBookCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_books(books: impl IntoIterator<Item = Book>) -> Self {
        Self {
            books: RwLock::new(books.into_iter().map(|b| (b.id, b)).collect()),
        }
    }

    pub async fn insert(&self, book: Book) {
        self.books.write().await.insert(book.id, book);
    }

    pub async fn remove(&self, id: i64) -> Option<Book> {
        self.books.write().await.remove(&id)
    }
}

fn distinct<'a>(values: impl Iterator<Item = Option<&'a String>>) -> Vec<String> {
    values
        .flatten()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

#[async_trait]
impl BookCatalog for MemoryBookCatalog {
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Book>> {
        Ok(self.books.read().await.get(&id).cloned())
    }

    async fn filter_options(&self) -> CatalogResult<InventoryFilterOptions> {
        let books = self.books.read().await;

        Ok(InventoryFilterOptions {
            genres: distinct(books.values().map(|b| b.genre.as_ref())),
            publishers: distinct(books.values().map(|b| b.publisher.as_ref())),
            authors: distinct(books.values().map(|b| b.author.as_ref())),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn book(id: i64, author: &str, genre: Option<&str>) -> Book {
        Book {
            id,
            title: format!("Libro {}", id),
            author: Some(author.to_string()),
            publisher: Some("Planeta".to_string()),
            genre: genre.map(str::to_string),
            stock: Some(1),
            price: Some(1000.0),
            description: None,
        }
    }

    #[tokio::test]
    async fn test_filter_options_dedupe_and_sort() {
        let catalog = MemoryBookCatalog::with_books([
            book(1, "Neruda", Some("Poesía")),
            book(2, "Allende", Some("Novela")),
            book(3, "Neruda", Some("")),
            book(4, "Bolaño", None),
        ]);

        let options = catalog.filter_options().await.unwrap();
        assert_eq!(options.genres, vec!["Novela", "Poesía"]);
        assert_eq!(options.publishers, vec!["Planeta"]);
        assert_eq!(options.authors, vec!["Allende", "Bolaño", "Neruda"]);
    }

    #[tokio::test]
    async fn test_remove_hides_book() {
        let catalog = MemoryBookCatalog::with_books([book(7, "Mistral", None)]);
        assert!(catalog.find_by_id(7).await.unwrap().is_some());

        catalog.remove(7).await;
        assert!(catalog.find_by_id(7).await.unwrap().is_none());
    }
}
