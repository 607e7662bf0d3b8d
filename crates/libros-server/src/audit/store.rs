//! Audit storage trait

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::error::AuditResult;
use super::models::{AuditCompletion, AuditFilters, AuditRecord, BookMetadata, GroupColumn, NewAuditRecord};

/// Records matching a query plus the total before pagination
#[derive(Debug, Clone, Default)]
pub struct AuditSlice {
    pub records: Vec<AuditRecord>,
    pub total: i64,
}

/// Backend for persisting and querying audit records
///
/// Reads only ever see live records (`deleted_at IS NULL`). Deletes are
/// hard deletes.
#[async_trait]
pub trait AuditStore: Send + Sync {
    /// Insert a record, assigning id and timestamps
    async fn insert(&self, record: NewAuditRecord) -> AuditResult<AuditRecord>;

    /// Write the outcome over a PENDING record
    ///
    /// Fails with `AlreadyCompleted` once the record left PENDING.
    async fn complete(&self, id: i64, completion: AuditCompletion) -> AuditResult<AuditRecord>;

    async fn find_by_id(&self, id: i64) -> AuditResult<Option<AuditRecord>>;

    /// Filter, sort and slice; `filters.page`/`filters.limit` are ignored in
    /// favour of the explicit `limit`/`offset`
    async fn query(&self, filters: &AuditFilters, limit: i64, offset: i64) -> AuditResult<AuditSlice>;

    async fn count(&self) -> AuditResult<i64>;

    /// `(value, count)` pairs grouped by `column`
    async fn count_by(&self, column: GroupColumn) -> AuditResult<Vec<(String, i64)>>;

    /// Newest records first
    async fn recent(&self, limit: i64) -> AuditResult<Vec<AuditRecord>>;

    /// Delete records created strictly before `cutoff`
    async fn delete_before(&self, cutoff: DateTime<Utc>) -> AuditResult<u64>;

    async fn delete_all(&self) -> AuditResult<u64>;

    /// Book records with no metadata but a stored request payload
    async fn missing_metadata(&self) -> AuditResult<Vec<AuditRecord>>;

    async fn set_metadata(&self, id: i64, metadata: &BookMetadata) -> AuditResult<()>;
}
