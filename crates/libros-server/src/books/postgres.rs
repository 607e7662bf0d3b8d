use async_trait::async_trait;
use sqlx::PgPool;
use tracing::instrument;

use super::{Book, BookCatalog, CatalogResult, InventoryFilterOptions};

/// `books` table reader
#[derive(Clone)]
pub struct PgBookCatalog {
    pool: PgPool,
}

impl PgBookCatalog {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn distinct(&self, column: &'static str) -> CatalogResult<Vec<String>> {
        let sql = format!(
            r#"
            SELECT DISTINCT {column}
            FROM books
            WHERE deleted_at IS NULL
              AND {column} IS NOT NULL
              AND btrim({column}) <> ''
            ORDER BY {column} ASC
            "#,
        );

        let values = sqlx::query_scalar::<_, String>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(values)
    }
}

#[async_trait]
impl BookCatalog for PgBookCatalog {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: i64) -> CatalogResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(
            r#"
            SELECT
                id::bigint AS id,
                title,
                author,
                publisher,
                genre,
                stock::bigint AS stock,
                price::float8 AS price,
                description
            FROM books
            WHERE id = $1 AND deleted_at IS NULL
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    #[instrument(skip(self))]
    async fn filter_options(&self) -> CatalogResult<InventoryFilterOptions> {
        Ok(InventoryFilterOptions {
            genres: self.distinct("genre").await?,
            publishers: self.distinct("publisher").await?,
            authors: self.distinct("author").await?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn seed(pool: &PgPool) {
        sqlx::query(
            r#"
            INSERT INTO books (title, author, publisher, genre, stock, price)
            VALUES
                ('Cien años de soledad', 'García Márquez', 'Sudamericana', 'Novela', 3, 15990),
                ('Rayuela', 'Cortázar', 'Sudamericana', 'Novela', 1, 12990),
                ('Ficciones', 'Borges', '  ', 'Cuento', 0, 9990)
            "#,
        )
        .execute(pool)
        .await
        .unwrap();
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_find_by_id(pool: PgPool) {
        seed(&pool).await;
        let catalog = PgBookCatalog::new(pool.clone());

        let id: i64 = sqlx::query_scalar("SELECT id::bigint FROM books WHERE title = 'Rayuela'")
            .fetch_one(&pool)
            .await
            .unwrap();

        let book = catalog.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(book.author.as_deref(), Some("Cortázar"));
        assert_eq!(book.price, Some(12990.0));

        assert!(catalog.find_by_id(999_999).await.unwrap().is_none());
    }

    #[sqlx::test(migrations = "../../migrations")]
    #[ignore] // Requires database
    async fn test_filter_options_are_distinct_and_sorted(pool: PgPool) {
        seed(&pool).await;
        let catalog = PgBookCatalog::new(pool);

        let options = catalog.filter_options().await.unwrap();
        assert_eq!(options.genres, vec!["Cuento", "Novela"]);
        assert_eq!(options.publishers, vec!["Sudamericana"]);
        assert_eq!(options.authors, vec!["Borges", "Cortázar", "García Márquez"]);
    }
}
