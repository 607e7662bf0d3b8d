//! Integration tests for audit log routes
//!
//! These run the reporting API over the in-memory stores.

#[cfg(test)]
mod tests {
    use axum::{
        body::Body,
        http::{header, Method, Request, StatusCode},
        Router,
    };
    use chrono::{Duration, Utc};
    use http_body_util::BodyExt;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    use crate::audit::{
        AuditAction, AuditCompletion, AuditService, AuditStatus, EntityType, MemoryAuditStore,
        NewAuditRecord,
    };
    use crate::books::{Book, MemoryBookCatalog};
    use crate::features::audit_logs::audit_logs_routes;

    struct Fixture {
        app: Router,
        service: AuditService,
        store: Arc<MemoryAuditStore>,
    }

    fn fixture() -> Fixture {
        let books = Arc::new(MemoryBookCatalog::with_books([Book {
            id: 7,
            title: "Rayuela".to_string(),
            author: Some("Julio Cortázar".to_string()),
            publisher: Some("Sudamericana".to_string()),
            genre: Some("Novela".to_string()),
            stock: Some(3),
            price: Some(15990.0),
            description: None,
        }]));
        let store = Arc::new(MemoryAuditStore::with_books(books.clone()));
        let service = AuditService::new(store.clone(), books);

        Fixture {
            app: audit_logs_routes().with_state(service.clone()),
            service,
            store,
        }
    }

    fn entry(action: AuditAction, entity_id: Option<&str>, description: &str) -> NewAuditRecord {
        NewAuditRecord::builder()
            .user(Some(1), Some("ana@cmpc.cl".to_string()), Some("Ana Rojas".to_string()))
            .action(action)
            .entity(EntityType::Book, entity_id.map(str::to_string))
            .description(description)
            .endpoint("GET", "/api/v1/books")
            .try_build()
            .unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str) -> (StatusCode, axum::http::HeaderMap, Vec<u8>) {
        let response = app
            .oneshot(
                Request::builder()
                    .method(method)
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.into_body().collect().await.unwrap().to_bytes().to_vec();
        (status, headers, body)
    }

    async fn send_json(app: Router, method: Method, uri: &str) -> (StatusCode, Value) {
        let (status, _, body) = send(app, method, uri).await;
        (status, serde_json::from_slice(&body).unwrap())
    }

    #[tokio::test]
    async fn test_list_empty_trail() {
        let fx = fixture();

        let (status, body) = send_json(fx.app, Method::GET, "/").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["meta"]["pagination"]["total"], 0);
        assert_eq!(body["meta"]["pagination"]["total_pages"], 0);
    }

    #[tokio::test]
    async fn test_list_filters_and_paginates() {
        let fx = fixture();
        for i in 0..12 {
            fx.service
                .record(entry(AuditAction::Viewed, None, &format!("Consulta {}", i)))
                .await
                .unwrap();
        }
        fx.service
            .record(entry(AuditAction::Added, Some("7"), "Libro agregado: \"Rayuela\""))
            .await
            .unwrap();

        let (status, body) = send_json(fx.app.clone(), Method::GET, "/?page=2&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"].as_array().unwrap().len(), 5);
        assert_eq!(body["meta"]["pagination"]["total"], 13);
        assert_eq!(body["meta"]["pagination"]["total_pages"], 3);
        assert_eq!(body["meta"]["pagination"]["has_prev"], true);

        let (_, body) = send_json(fx.app, Method::GET, "/?action=ADDED").await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["action"], "ADDED");
    }

    #[tokio::test]
    async fn test_list_page_far_past_the_end() {
        let fx = fixture();
        fx.service
            .record(entry(AuditAction::Viewed, None, "Consulta del inventario de libros"))
            .await
            .unwrap();

        let (status, body) =
            send_json(fx.app, Method::GET, "/?page=9223372036854775807&limit=10").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"], json!([]));
        assert_eq!(body["meta"]["pagination"]["total"], 1);
        assert_eq!(body["meta"]["pagination"]["has_next"], false);
    }

    #[tokio::test]
    async fn test_soft_deleted_records_are_not_reported() {
        let fx = fixture();
        let live = fx
            .service
            .record(entry(AuditAction::Viewed, None, "Consulta del inventario de libros"))
            .await
            .unwrap();
        let hidden = fx
            .service
            .record(entry(AuditAction::Removed, Some("7"), "Libro eliminado (ID: 7)"))
            .await
            .unwrap();
        fx.store.set_deleted_at(hidden.id, Utc::now()).await;

        let (status, _) = send_json(fx.app.clone(), Method::GET, &format!("/{}", hidden.id)).await;
        assert_eq!(status, StatusCode::NOT_FOUND);

        let (_, body) = send_json(fx.app.clone(), Method::GET, "/").await;
        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["id"], live.id);

        let (_, body) = send_json(fx.app.clone(), Method::GET, "/stats").await;
        assert_eq!(body["data"]["total"], 1);

        let (_, _, csv) = send(fx.app.clone(), Method::GET, "/export").await;
        let csv = String::from_utf8(csv).unwrap();
        assert!(!csv.contains("Libro eliminado (ID: 7)"));

        let (_, body) = send_json(fx.app, Method::DELETE, "/").await;
        assert_eq!(body["data"]["deleted"], 2);
    }

    #[tokio::test]
    async fn test_search_matches_joined_book() {
        let fx = fixture();
        fx.service
            .record(entry(AuditAction::Updated, Some("7"), "Libro actualizado (ID: 7)"))
            .await
            .unwrap();
        fx.service
            .record(entry(AuditAction::Viewed, None, "Consulta del inventario de libros"))
            .await
            .unwrap();

        let (_, body) = send_json(fx.app, Method::GET, "/?search=cort%C3%A1zar").await;

        let data = body["data"].as_array().unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0]["entity_id"], "7");
    }

    #[tokio::test]
    async fn test_invalid_filter_is_rejected() {
        let fx = fixture();

        let (status, _, _) = send(fx.app, Method::GET, "/?action=NOT_AN_ACTION").await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_get_by_id_and_not_found() {
        let fx = fixture();
        let record = fx
            .service
            .record(entry(AuditAction::Viewed, Some("7"), "Consulta del libro (ID: 7)"))
            .await
            .unwrap();

        let (status, body) = send_json(fx.app.clone(), Method::GET, &format!("/{}", record.id)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["description"], "Consulta del libro (ID: 7)");

        let (status, body) = send_json(fx.app, Method::GET, "/9999").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["error"]["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn test_stats() {
        let fx = fixture();
        let mut removed = entry(AuditAction::Removed, Some("7"), "Libro eliminado (ID: 7)");
        removed.status = AuditStatus::Pending;
        let pending = fx.service.begin(removed).await.unwrap();
        fx.service
            .complete(pending.id, AuditCompletion::failure("Libro no encontrado", 4))
            .await
            .unwrap();
        fx.service
            .record(entry(AuditAction::Viewed, None, "Consulta del inventario de libros"))
            .await
            .unwrap();

        let (status, body) = send_json(fx.app, Method::GET, "/stats").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["total"], 2);
        assert_eq!(body["data"]["by_status"]["FAILURE"], 1);
        assert_eq!(body["data"]["by_status"]["SUCCESS"], 1);
        assert_eq!(body["data"]["recent_activity"].as_array().unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_export_is_csv_attachment() {
        let fx = fixture();
        fx.service
            .record(entry(AuditAction::Viewed, None, "Consulta del inventario de libros"))
            .await
            .unwrap();

        let (status, headers, body) = send(fx.app, Method::GET, "/export").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(headers.get(header::CONTENT_TYPE).unwrap(), "text/csv; charset=utf-8");
        let disposition = headers.get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
        assert!(disposition.starts_with("attachment; filename=\"audit-logs-"));

        let text = String::from_utf8(body).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("ID,"));
        assert!(lines.next().unwrap().contains("Consulta del inventario de libros"));
    }

    #[tokio::test]
    async fn test_inventory_export_and_filter_options() {
        let fx = fixture();
        fx.service
            .record(entry(AuditAction::Added, Some("7"), "Libro agregado: \"Rayuela\""))
            .await
            .unwrap();

        let (status, headers, _) = send(fx.app.clone(), Method::GET, "/inventory/export").await;
        assert_eq!(status, StatusCode::OK);
        let disposition = headers.get(header::CONTENT_DISPOSITION).unwrap().to_str().unwrap();
        assert!(disposition.contains("inventory-audit-"));

        let (status, body) = send_json(fx.app, Method::GET, "/inventory/filter-options").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["genres"], json!(["Novela"]));
        assert_eq!(body["data"]["authors"], json!(["Julio Cortázar"]));
    }

    #[tokio::test]
    async fn test_cleanup_uses_days_param() {
        let fx = fixture();
        let old = fx
            .service
            .record(entry(AuditAction::Viewed, None, "antiguo"))
            .await
            .unwrap();
        fx.store
            .set_created_at(old.id, Utc::now() - Duration::days(45))
            .await;
        fx.service
            .record(entry(AuditAction::Viewed, None, "reciente"))
            .await
            .unwrap();

        let (status, body) = send_json(fx.app.clone(), Method::DELETE, "/cleanup?days=30").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["deleted"], 1);
        assert_eq!(body["data"]["days_to_keep"], 30);
        assert_eq!(fx.store.len().await, 1);

        let (status, _) = send_json(fx.app, Method::DELETE, "/cleanup?days=-1").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_cleanup_defaults_to_retention() {
        let fx = fixture();

        let (status, body) = send_json(fx.app, Method::DELETE, "/cleanup").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["days_to_keep"], 90);
    }

    #[tokio::test]
    async fn test_delete_all() {
        let fx = fixture();
        for _ in 0..3 {
            fx.service
                .record(entry(AuditAction::Viewed, None, "Consulta"))
                .await
                .unwrap();
        }

        let (status, body) = send_json(fx.app.clone(), Method::DELETE, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["deleted"], 3);

        let (_, body) = send_json(fx.app, Method::DELETE, "/").await;
        assert_eq!(body["data"]["deleted"], 0);
    }

    #[tokio::test]
    async fn test_backfill_metadata() {
        let fx = fixture();
        let record = NewAuditRecord::builder()
            .action(AuditAction::Added)
            .entity(EntityType::Book, Some("12".to_string()))
            .request_data(json!({ "body": { "title": "Ficciones", "author": "Borges" } }))
            .try_build()
            .unwrap();
        let stored = fx.service.record(record).await.unwrap();
        assert!(stored.metadata.is_none());

        let (status, body) = send_json(fx.app, Method::POST, "/backfill-metadata").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["updated"], 1);

        let refreshed = fx.service.find_by_id(stored.id).await.unwrap().unwrap();
        let metadata = refreshed.metadata.unwrap();
        assert_eq!(metadata.title.as_deref(), Some("Ficciones"));
        assert_eq!(refreshed.status, AuditStatus::Success);
    }
}
