//! Audit log routes
//!
//! ```text
//! GET    /                          list with filters and pagination
//! GET    /stats                     totals per action, status and level
//! GET    /export                    CSV of the filtered trail
//! GET    /inventory/export          CSV of book operations
//! GET    /inventory/filter-options  genres, publishers and authors
//! GET    /:id                       single record
//! DELETE /                          delete every record
//! DELETE /cleanup?days=N            delete records older than N days
//! POST   /backfill-metadata         derive missing book snapshots
//! ```

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Router,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::api::response::{ApiResponse, ApiResult, AppError, PaginationMeta};
use crate::audit::{AuditFilters, AuditService};

/// Create audit log routes
pub fn audit_logs_routes() -> Router<AuditService> {
    Router::new()
        .route("/", get(list_audit_logs).delete(delete_all_audit_logs))
        .route("/stats", get(get_audit_stats))
        .route("/export", get(export_audit_logs))
        .route("/inventory/export", get(export_inventory))
        .route("/inventory/filter-options", get(get_inventory_filter_options))
        .route("/cleanup", delete(cleanup_audit_logs))
        .route("/backfill-metadata", post(backfill_metadata))
        .route("/:id", get(get_audit_log))
}

#[derive(Debug, Deserialize)]
pub struct CleanupParams {
    pub days: Option<i64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CleanupResult {
    pub deleted: u64,
    pub days_to_keep: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResult {
    pub deleted: u64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BackfillResult {
    pub updated: u64,
}

fn csv_attachment(prefix: &str, body: String) -> Response {
    let filename = format!("{}-{}.csv", prefix, Utc::now().format("%Y-%m-%d"));

    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// List audit records
///
/// GET /?action=ADDED&status=FAILURE&search=quijote&page=2&limit=20
#[tracing::instrument(skip(service))]
async fn list_audit_logs(
    State(service): State<AuditService>,
    Query(filters): Query<AuditFilters>,
) -> ApiResult<Response> {
    let page = service.find_all(&filters).await?;
    let pagination = PaginationMeta::new(page.page, page.limit, page.total, page.total_pages);

    Ok(ApiResponse::success_with_meta(page.records, json!({ "pagination": pagination }))
        .into_response())
}

/// GET /stats
#[tracing::instrument(skip(service))]
async fn get_audit_stats(State(service): State<AuditService>) -> ApiResult<Response> {
    let stats = service.get_stats().await?;
    Ok(ApiResponse::success(stats).into_response())
}

/// GET /export with the same filters as the listing
#[tracing::instrument(skip(service))]
async fn export_audit_logs(
    State(service): State<AuditService>,
    Query(filters): Query<AuditFilters>,
) -> ApiResult<Response> {
    let csv = service.export_to_csv(&filters).await?;
    Ok(csv_attachment("audit-logs", csv))
}

/// GET /inventory/export
#[tracing::instrument(skip(service))]
async fn export_inventory(
    State(service): State<AuditService>,
    Query(filters): Query<AuditFilters>,
) -> ApiResult<Response> {
    let csv = service.export_inventory_to_csv(&filters).await?;
    Ok(csv_attachment("inventory-audit", csv))
}

#[tracing::instrument(skip(service))]
async fn get_inventory_filter_options(State(service): State<AuditService>) -> ApiResult<Response> {
    let options = service.get_inventory_filter_options().await?;
    Ok(ApiResponse::success(options).into_response())
}

/// GET /:id
#[tracing::instrument(skip(service))]
async fn get_audit_log(
    State(service): State<AuditService>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    match service.find_by_id(id).await? {
        Some(record) => Ok(ApiResponse::success(record).into_response()),
        None => Err(AppError::NotFound(format!("Audit record {} not found", id))),
    }
}

/// DELETE /cleanup?days=30, defaults to the configured retention
#[tracing::instrument(skip(service))]
async fn cleanup_audit_logs(
    State(service): State<AuditService>,
    Query(params): Query<CleanupParams>,
) -> ApiResult<Response> {
    let days_to_keep = params.days.unwrap_or_else(|| service.retention_days());
    if days_to_keep < 0 {
        return Err(AppError::BadRequest("days must not be negative".to_string()));
    }

    let deleted = service
        .cleanup_old_logs(days_to_keep)
        .await
        .map_err(|e| AppError::OperationFailed(format!("Failed to clean up audit logs: {}", e)))?;

    Ok(ApiResponse::success(CleanupResult {
        deleted,
        days_to_keep,
    })
    .into_response())
}

/// DELETE /
#[tracing::instrument(skip(service))]
async fn delete_all_audit_logs(State(service): State<AuditService>) -> ApiResult<Response> {
    let deleted = service
        .delete_all_logs()
        .await
        .map_err(|e| AppError::OperationFailed(format!("Failed to delete audit logs: {}", e)))?;

    Ok(ApiResponse::success(DeleteResult { deleted }).into_response())
}

/// POST /backfill-metadata
#[tracing::instrument(skip(service))]
async fn backfill_metadata(State(service): State<AuditService>) -> ApiResult<Response> {
    let updated = service.update_metadata_for_existing_logs().await?;
    Ok(ApiResponse::success(BackfillResult { updated }).into_response())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_audit_logs_routes_exist() {
        let _router = audit_logs_routes();
    }
}
