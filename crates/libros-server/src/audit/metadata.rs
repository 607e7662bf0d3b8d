//! Book metadata snapshots and Spanish action descriptions

use http::Method;
use serde_json::Value as JsonValue;
use tracing::warn;

use super::models::{AuditAction, BookMetadata, EntityType};
use crate::books::BookCatalog;

/// Map the book fields of a JSON body onto [`BookMetadata`]
///
/// Numbers sent as strings (`"stock": "5"`) are accepted. Returns `None`
/// when the body is not an object or carries none of the book fields.
pub fn metadata_from_body(body: &JsonValue) -> Option<BookMetadata> {
    let object = body.as_object()?;

    let text = |key: &str| {
        object
            .get(key)
            .and_then(JsonValue::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };
    let number = |key: &str| match object.get(key)? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    let metadata = BookMetadata {
        title: text("title"),
        author: text("author"),
        publisher: text("publisher"),
        genre: text("genre"),
        stock: number("stock").map(|n| n.trunc() as i64),
        price: number("price"),
        description: text("description"),
    };

    (!metadata.is_empty()).then_some(metadata)
}

/// Snapshot the book a request is about
///
/// DELETE reads the live book, since the body is usually empty and the row
/// is about to disappear. Everything else maps the request body. A failed
/// lookup is logged and yields `None`.
pub async fn extract_metadata(
    entity: EntityType,
    method: &Method,
    entity_id: Option<&str>,
    body: Option<&JsonValue>,
    books: &dyn BookCatalog,
) -> Option<BookMetadata> {
    if entity != EntityType::Book {
        return None;
    }

    if *method == Method::DELETE {
        if let Some(id) = entity_id.and_then(|id| id.parse::<i64>().ok()) {
            match books.find_by_id(id).await {
                Ok(Some(book)) => return Some(book.metadata()),
                Ok(None) => {}
                Err(e) => warn!(book_id = id, error = %e, "Book lookup failed, continuing without metadata"),
            }
        }
    }

    body.and_then(metadata_from_body)
}

/// Inputs for [`describe`]
#[derive(Debug, Clone, Copy)]
pub struct DescriptionParts<'a> {
    pub entity: EntityType,
    pub action: AuditAction,
    pub method: &'a Method,
    pub path: &'a str,
    pub entity_id: Option<&'a str>,
    pub body: Option<&'a JsonValue>,
    pub metadata: Option<&'a BookMetadata>,
    pub search_term: Option<&'a str>,
}

fn book_summary(fields: &BookMetadata) -> Option<String> {
    let title = fields.title.as_deref()?;
    let mut summary = format!("\"{}\"", title);
    if let Some(author) = fields.author.as_deref() {
        summary.push_str(&format!(" de {}", author));
    }
    if let Some(publisher) = fields.publisher.as_deref() {
        summary.push_str(&format!(" (Editorial: {})", publisher));
    }
    Some(summary)
}

fn with_id(text: &str, id: Option<&str>) -> String {
    match id {
        Some(id) => format!("{} (ID: {})", text, id),
        None => text.to_string(),
    }
}

/// Human readable, Spanish description of an audited request
pub fn describe(parts: &DescriptionParts<'_>) -> String {
    if parts.entity != EntityType::Book {
        return match parts.entity {
            EntityType::Unknown => format!("{} {}", parts.method, parts.path),
            entity => format!("Operación sobre {}", entity),
        };
    }

    let from_body = parts.body.and_then(metadata_from_body);
    let id = parts.entity_id;

    match parts.action {
        AuditAction::Searched => match parts.search_term {
            Some(term) => format!("Búsqueda de libros: \"{}\"", term),
            None => "Búsqueda de libros".to_string(),
        },
        AuditAction::Viewed => match id {
            Some(id) => format!("Consulta del libro (ID: {})", id),
            None => "Consulta del inventario de libros".to_string(),
        },
        AuditAction::Added => match from_body.as_ref().and_then(book_summary) {
            Some(summary) => format!("Libro agregado: {}", summary),
            None => "Libro agregado".to_string(),
        },
        AuditAction::Updated => match from_body.as_ref().and_then(book_summary) {
            Some(summary) => format!("Libro actualizado: {}", summary),
            None => with_id("Libro actualizado", id),
        },
        AuditAction::Removed => {
            let summary = from_body
                .as_ref()
                .and_then(book_summary)
                .or_else(|| parts.metadata.and_then(book_summary));
            match summary {
                Some(summary) => format!("Libro eliminado: {}", summary),
                None => with_id("Libro eliminado", id),
            }
        }
        _ => format!("{} {}", parts.method, parts.path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::books::{Book, MemoryBookCatalog};
    use serde_json::json;

    fn parts<'a>(action: AuditAction, method: &'a Method, path: &'a str) -> DescriptionParts<'a> {
        DescriptionParts {
            entity: EntityType::Book,
            action,
            method,
            path,
            entity_id: None,
            body: None,
            metadata: None,
            search_term: None,
        }
    }

    fn foo_book() -> Book {
        Book {
            id: 42,
            title: "Foo".into(),
            author: Some("Bar".into()),
            publisher: Some("Baz".into()),
            genre: Some("Ensayo".into()),
            stock: Some(4),
            price: Some(9990.0),
            description: None,
        }
    }

    #[test]
    fn test_metadata_from_body() {
        let metadata = metadata_from_body(&json!({
            "title": "Rayuela",
            "author": "Cortázar",
            "stock": "5",
            "price": 12990.5,
            "password": "ignored"
        }))
        .unwrap();

        assert_eq!(metadata.title.as_deref(), Some("Rayuela"));
        assert_eq!(metadata.stock, Some(5));
        assert_eq!(metadata.price, Some(12990.5));
        assert_eq!(metadata.publisher, None);

        assert_eq!(metadata_from_body(&json!({ "foo": 1 })), None);
        assert_eq!(metadata_from_body(&json!([1, 2])), None);
    }

    #[tokio::test]
    async fn test_delete_reads_the_live_book() {
        let catalog = MemoryBookCatalog::with_books([foo_book()]);

        let metadata = extract_metadata(EntityType::Book, &Method::DELETE, Some("42"), None, &catalog)
            .await
            .unwrap();

        assert_eq!(metadata.title.as_deref(), Some("Foo"));
        assert_eq!(metadata.author.as_deref(), Some("Bar"));
        assert_eq!(metadata.publisher.as_deref(), Some("Baz"));
        assert_eq!(metadata.stock, Some(4));
    }

    #[tokio::test]
    async fn test_delete_of_missing_book_falls_back_to_body() {
        let catalog = MemoryBookCatalog::new();

        assert_eq!(
            extract_metadata(EntityType::Book, &Method::DELETE, Some("42"), None, &catalog).await,
            None
        );

        let body = json!({ "title": "Foo" });
        let metadata =
            extract_metadata(EntityType::Book, &Method::DELETE, Some("42"), Some(&body), &catalog)
                .await
                .unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Foo"));
    }

    #[tokio::test]
    async fn test_non_book_entities_have_no_metadata() {
        let catalog = MemoryBookCatalog::with_books([foo_book()]);
        let body = json!({ "title": "Foo" });

        assert_eq!(
            extract_metadata(EntityType::User, &Method::POST, None, Some(&body), &catalog).await,
            None
        );
    }

    #[test]
    fn test_describe_added_book() {
        let body = json!({
            "title": "El Quijote",
            "author": "Cervantes",
            "publisher": "Planeta"
        });
        let method = Method::POST;
        let mut p = parts(AuditAction::Added, &method, "/api/v1/books");
        p.body = Some(&body);

        assert_eq!(
            describe(&p),
            r#"Libro agregado: "El Quijote" de Cervantes (Editorial: Planeta)"#
        );
    }

    #[test]
    fn test_describe_search() {
        let method = Method::GET;
        let mut p = parts(AuditAction::Searched, &method, "/api/v1/books");
        p.search_term = Some("quijote");

        assert_eq!(describe(&p), r#"Búsqueda de libros: "quijote""#);
    }

    #[test]
    fn test_describe_view_and_update() {
        let get = Method::GET;
        let mut p = parts(AuditAction::Viewed, &get, "/api/v1/books/7");
        assert_eq!(describe(&p), "Consulta del inventario de libros");
        p.entity_id = Some("7");
        assert_eq!(describe(&p), "Consulta del libro (ID: 7)");

        let put = Method::PUT;
        let body = json!({ "stock": 3 });
        let mut p = parts(AuditAction::Updated, &put, "/api/v1/books/7");
        p.entity_id = Some("7");
        p.body = Some(&body);
        assert_eq!(describe(&p), "Libro actualizado (ID: 7)");
    }

    #[test]
    fn test_describe_removed_uses_snapshot() {
        let metadata = foo_book().metadata();
        let method = Method::DELETE;
        let mut p = parts(AuditAction::Removed, &method, "/api/v1/books/42");
        p.entity_id = Some("42");
        p.metadata = Some(&metadata);

        assert_eq!(
            describe(&p),
            r#"Libro eliminado: "Foo" de Bar (Editorial: Baz)"#
        );
    }

    #[test]
    fn test_describe_other_entities() {
        let method = Method::POST;
        let mut p = parts(AuditAction::Login, &method, "/api/v1/auth/login");
        p.entity = EntityType::Auth;
        assert_eq!(describe(&p), "Operación sobre Auth");

        p.entity = EntityType::Unknown;
        p.path = "/api/v1/reports";
        assert_eq!(describe(&p), "POST /api/v1/reports");
    }
}
