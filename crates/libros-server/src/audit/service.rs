//! Audit service
//!
//! The only component with access to the audit store. The interceptor writes
//! through `begin`/`complete`, the reporting routes read through the rest.

use chrono::{Duration, Utc};
use http::Method;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use tracing::{info, instrument, warn};

use super::error::AuditResult;
use super::export::{audit_records_to_csv, inventory_records_to_csv};
use super::metadata::{extract_metadata, metadata_from_body};
use super::models::{
    AuditCompletion, AuditFilters, AuditPage, AuditRecord, AuditStats, BookMetadata, EntityType,
    GroupColumn, NewAuditRecord, RecentActivity, DEFAULT_EXPORT_LIMIT, DEFAULT_RETENTION_DAYS,
    RECENT_ACTIVITY_LIMIT,
};
use super::store::AuditStore;
use crate::books::{BookCatalog, InventoryFilterOptions};

/// Upper bound on any retention window, about a century
const MAX_RETENTION_DAYS: i64 = 36_500;

#[derive(Clone)]
pub struct AuditService {
    store: Arc<dyn AuditStore>,
    books: Arc<dyn BookCatalog>,
    export_limit: i64,
    retention_days: i64,
}

impl AuditService {
    pub fn new(store: Arc<dyn AuditStore>, books: Arc<dyn BookCatalog>) -> Self {
        Self {
            store,
            books,
            export_limit: DEFAULT_EXPORT_LIMIT,
            retention_days: DEFAULT_RETENTION_DAYS,
        }
    }

    pub fn with_export_limit(mut self, export_limit: i64) -> Self {
        self.export_limit = export_limit.max(1);
        self
    }

    pub fn with_retention_days(mut self, retention_days: i64) -> Self {
        self.retention_days = retention_days.clamp(0, MAX_RETENTION_DAYS);
        self
    }

    /// Retention used by cleanup when the caller gives none
    pub fn retention_days(&self) -> i64 {
        self.retention_days
    }

    // ------------------------------------------------------------------------
    // Writer side
    // ------------------------------------------------------------------------

    /// Persist the PENDING record written before the handler runs
    pub async fn begin(&self, entry: NewAuditRecord) -> AuditResult<AuditRecord> {
        self.store.insert(entry).await
    }

    /// Finalise a PENDING record with the handler's outcome
    pub async fn complete(&self, id: i64, completion: AuditCompletion) -> AuditResult<AuditRecord> {
        self.store.complete(id, completion).await
    }

    /// One-shot record for events outside the request interceptor
    #[instrument(skip(self, entry), fields(action = %entry.action))]
    pub async fn record(&self, entry: NewAuditRecord) -> AuditResult<AuditRecord> {
        self.store.insert(entry).await
    }

    /// Book snapshot for an intercepted request, see [`extract_metadata`]
    pub async fn metadata_for(
        &self,
        entity: EntityType,
        method: &Method,
        entity_id: Option<&str>,
        body: Option<&JsonValue>,
    ) -> Option<BookMetadata> {
        extract_metadata(entity, method, entity_id, body, self.books.as_ref()).await
    }

    // ------------------------------------------------------------------------
    // Reporting side
    // ------------------------------------------------------------------------

    #[instrument(skip(self))]
    pub async fn find_all(&self, filters: &AuditFilters) -> AuditResult<AuditPage> {
        let (page, limit) = (filters.page(), filters.limit());
        let slice = self.store.query(filters, limit, filters.offset()).await?;

        Ok(AuditPage::new(slice.records, slice.total, page, limit))
    }

    #[instrument(skip(self))]
    pub async fn find_by_id(&self, id: i64) -> AuditResult<Option<AuditRecord>> {
        self.store.find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_stats(&self) -> AuditResult<AuditStats> {
        let total = self.store.count().await?;
        let by_action = self.store.count_by(GroupColumn::Action).await?;
        let by_status = self.store.count_by(GroupColumn::Status).await?;
        let by_level = self.store.count_by(GroupColumn::Level).await?;
        let recent = self.store.recent(RECENT_ACTIVITY_LIMIT).await?;

        Ok(AuditStats {
            total,
            by_action: by_action.into_iter().collect(),
            by_status: by_status.into_iter().collect(),
            by_level: by_level.into_iter().collect(),
            recent_activity: recent.iter().map(RecentActivity::from).collect(),
        })
    }

    async fn export_rows(&self, filters: &AuditFilters) -> AuditResult<Vec<AuditRecord>> {
        let slice = self.store.query(filters, self.export_limit, 0).await?;
        if slice.total > self.export_limit {
            warn!(
                total = slice.total,
                limit = self.export_limit,
                "Export truncated to the export limit"
            );
        }
        Ok(slice.records)
    }

    #[instrument(skip(self))]
    pub async fn export_to_csv(&self, filters: &AuditFilters) -> AuditResult<String> {
        let records = self.export_rows(filters).await?;
        audit_records_to_csv(&records)
    }

    /// Inventory export; only Book records are ever included
    #[instrument(skip(self))]
    pub async fn export_inventory_to_csv(&self, filters: &AuditFilters) -> AuditResult<String> {
        let filters = AuditFilters {
            entity_type: Some(EntityType::Book.as_str().to_string()),
            ..filters.clone()
        };
        let records = self.export_rows(&filters).await?;
        inventory_records_to_csv(&records)
    }

    #[instrument(skip(self))]
    pub async fn get_inventory_filter_options(&self) -> AuditResult<InventoryFilterOptions> {
        Ok(self.books.filter_options().await?)
    }

    /// Hard-delete records older than `days_to_keep` days
    #[instrument(skip(self))]
    pub async fn cleanup_old_logs(&self, days_to_keep: i64) -> AuditResult<u64> {
        let days_to_keep = days_to_keep.clamp(0, MAX_RETENTION_DAYS);
        let cutoff = Utc::now() - Duration::days(days_to_keep);
        let deleted = self.store.delete_before(cutoff).await?;

        info!(deleted, days_to_keep, "Cleaned up old audit records");
        Ok(deleted)
    }

    #[instrument(skip(self))]
    pub async fn delete_all_logs(&self) -> AuditResult<u64> {
        let deleted = self.store.delete_all().await?;

        warn!(deleted, "Deleted all audit records");
        Ok(deleted)
    }

    /// Derive metadata for Book records written before snapshots existed
    ///
    /// The book fields come from the stored request body. Records whose
    /// payload yields nothing, or whose update fails, are skipped.
    #[instrument(skip(self))]
    pub async fn update_metadata_for_existing_logs(&self) -> AuditResult<u64> {
        let candidates = self.store.missing_metadata().await?;
        let mut updated = 0u64;

        for record in &candidates {
            let Some(request_data) = record.request_data.as_ref() else {
                continue;
            };
            let body = request_data.get("body").unwrap_or(request_data);

            let Some(metadata) = metadata_from_body(body) else {
                continue;
            };

            match self.store.set_metadata(record.id, &metadata).await {
                Ok(()) => updated += 1,
                Err(e) => warn!(audit_id = record.id, error = %e, "Failed to backfill audit metadata"),
            }
        }

        info!(candidates = candidates.len(), updated, "Backfilled audit metadata");
        Ok(updated)
    }
}
