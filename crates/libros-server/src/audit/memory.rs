//! In-memory audit store
//!
//! Mirrors the Postgres store's filtering, ordering and join semantics so the
//! interceptor and the reporting routes can be exercised without a database.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use super::error::{AuditError, AuditResult};
use super::models::{
    AuditCompletion, AuditFilters, AuditRecord, AuditStatus, BookMetadata, GroupColumn,
    NewAuditRecord, SortField, SortOrder,
};
use super::store::{AuditSlice, AuditStore};
use crate::books::{Book, BookCatalog};

#[derive(Default)]
struct State {
    next_id: i64,
    records: Vec<AuditRecord>,
}

#[derive(Default)]
pub struct MemoryAuditStore {
    state: RwLock<State>,
    books: Option<Arc<dyn BookCatalog>>,
}

impl MemoryAuditStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Join Book records against `books` for search and inventory filters
    pub fn with_books(books: Arc<dyn BookCatalog>) -> Self {
        Self {
            state: RwLock::default(),
            books: Some(books),
        }
    }

    pub async fn len(&self) -> usize {
        self.live(&self.state.read().await.records).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Rewrite a record's creation time, used to age records in tests
    #[cfg(test)]
    pub(crate) async fn set_created_at(&self, id: i64, created_at: DateTime<Utc>) {
        let mut state = self.state.write().await;
        if let Some(record) = state.records.iter_mut().find(|r| r.id == id) {
            record.created_at = created_at;
        }
    }

    /// Soft-delete a record, used to check the live-record rule in tests
    #[cfg(test)]
    pub(crate) async fn set_deleted_at(&self, id: i64, deleted_at: DateTime<Utc>) {
        let mut state = self.state.write().await;
        if let Some(record) = state.records.iter_mut().find(|r| r.id == id) {
            record.deleted_at = Some(deleted_at);
            record.is_active = false;
        }
    }

    fn live<'a>(&self, records: &'a [AuditRecord]) -> impl Iterator<Item = &'a AuditRecord> {
        records.iter().filter(|r| r.deleted_at.is_none())
    }

    async fn joined_book(&self, record: &AuditRecord) -> Option<Book> {
        let books = self.books.as_ref()?;
        if !record.is_book() {
            return None;
        }
        let id = record.entity_id.as_deref()?.parse::<i64>().ok()?;
        books.find_by_id(id).await.ok().flatten()
    }

    async fn matches(&self, record: &AuditRecord, filters: &AuditFilters) -> bool {
        if !matches_columns(record, filters) {
            return false;
        }

        let needs_join = filters.search_term().is_some()
            || filters.author_term().is_some()
            || filters.publisher_term().is_some()
            || filters.genre_term().is_some();
        if !needs_join {
            return true;
        }

        let book = self.joined_book(record).await;
        let book = book.as_ref();
        let metadata = record.metadata.as_ref();

        if let Some(term) = filters.search_term() {
            let hit = contains(Some(&record.description), term)
                || contains(record.user_name.as_ref(), term)
                || contains(record.user_email.as_ref(), term)
                || contains(book.map(|b| &b.title), term)
                || contains(book.and_then(|b| b.author.as_ref()), term)
                || contains(book.and_then(|b| b.publisher.as_ref()), term);
            if !hit {
                return false;
            }
        }

        field_matches(
            filters.author_term(),
            book.and_then(|b| b.author.as_ref()),
            metadata.and_then(|m| m.author.as_ref()),
        ) && field_matches(
            filters.publisher_term(),
            book.and_then(|b| b.publisher.as_ref()),
            metadata.and_then(|m| m.publisher.as_ref()),
        ) && field_matches(
            filters.genre_term(),
            book.and_then(|b| b.genre.as_ref()),
            metadata.and_then(|m| m.genre.as_ref()),
        )
    }
}

/// Unset terms match; set terms must appear in the book row or the snapshot
fn field_matches(term: Option<&str>, from_book: Option<&String>, from_metadata: Option<&String>) -> bool {
    term.map_or(true, |term| contains(from_book, term) || contains(from_metadata, term))
}

fn contains(haystack: Option<&String>, needle: &str) -> bool {
    haystack.is_some_and(|h| h.to_lowercase().contains(&needle.to_lowercase()))
}

fn matches_columns(record: &AuditRecord, filters: &AuditFilters) -> bool {
    filters.user_id.map_or(true, |id| record.user_id == Some(id))
        && filters.action.map_or(true, |a| record.action == a)
        && filters
            .entity_type
            .as_deref()
            .map_or(true, |t| record.entity_type.as_deref() == Some(t))
        && filters
            .entity_id
            .as_deref()
            .map_or(true, |id| record.entity_id.as_deref() == Some(id))
        && filters.status.map_or(true, |s| record.status == s)
        && filters.level.map_or(true, |l| record.level == l)
        && filters.start_date.map_or(true, |start| record.created_at >= start)
        && filters.end_date.map_or(true, |end| record.created_at <= end)
}

fn compare(a: &AuditRecord, b: &AuditRecord, field: SortField) -> Ordering {
    let primary = match field {
        SortField::Id => a.id.cmp(&b.id),
        SortField::CreatedAt => a.created_at.cmp(&b.created_at),
        SortField::UpdatedAt => a.updated_at.cmp(&b.updated_at),
        SortField::Action => a.action.as_str().cmp(b.action.as_str()),
        SortField::EntityType => a.entity_type.cmp(&b.entity_type),
        SortField::Status => a.status.as_str().cmp(b.status.as_str()),
        SortField::Level => a.level.as_str().cmp(b.level.as_str()),
        SortField::UserName => a.user_name.cmp(&b.user_name),
        SortField::UserEmail => a.user_email.cmp(&b.user_email),
        SortField::ResponseTimeMs => a.response_time_ms.cmp(&b.response_time_ms),
        SortField::Endpoint => a.endpoint.cmp(&b.endpoint),
    };
    primary.then_with(|| a.id.cmp(&b.id))
}

fn to_usize(n: i64) -> usize {
    usize::try_from(n.max(0)).unwrap_or(usize::MAX)
}

#[async_trait]
impl AuditStore for MemoryAuditStore {
    async fn insert(&self, record: NewAuditRecord) -> AuditResult<AuditRecord> {
        let mut state = self.state.write().await;
        state.next_id += 1;
        let now = Utc::now();

        let stored = AuditRecord {
            id: state.next_id,
            is_active: true,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            user_id: record.user_id,
            user_email: record.user_email,
            user_name: record.user_name,
            action: record.action,
            entity_type: record.entity_type,
            entity_id: record.entity_id,
            description: record.description,
            request_data: record.request_data,
            response_data: record.response_data,
            status: record.status,
            level: record.level,
            ip_address: record.ip_address,
            user_agent: record.user_agent,
            endpoint: record.endpoint,
            http_method: record.http_method,
            response_time_ms: record.response_time_ms,
            error_message: record.error_message,
            metadata: record.metadata,
        };

        state.records.push(stored.clone());
        Ok(stored)
    }

    async fn complete(&self, id: i64, completion: AuditCompletion) -> AuditResult<AuditRecord> {
        let mut state = self.state.write().await;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AuditError::NotFound(id))?;

        if record.status != AuditStatus::Pending {
            return Err(AuditError::AlreadyCompleted(id));
        }

        record.status = completion.status;
        record.level = completion.level;
        record.response_data = completion.response_data;
        record.response_time_ms = Some(completion.response_time_ms);
        record.error_message = completion.error_message;
        record.updated_at = Utc::now();

        Ok(record.clone())
    }

    async fn find_by_id(&self, id: i64) -> AuditResult<Option<AuditRecord>> {
        let state = self.state.read().await;
        let found = self.live(&state.records).find(|r| r.id == id).cloned();
        Ok(found)
    }

    async fn query(&self, filters: &AuditFilters, limit: i64, offset: i64) -> AuditResult<AuditSlice> {
        let candidates: Vec<AuditRecord> = {
            let state = self.state.read().await;
            self.live(&state.records).cloned().collect()
        };

        let mut matched = Vec::with_capacity(candidates.len());
        for record in candidates {
            if self.matches(&record, filters).await {
                matched.push(record);
            }
        }

        let field = filters.sort_field();
        matched.sort_by(|a, b| match filters.sort_order() {
            SortOrder::Asc => compare(a, b, field),
            SortOrder::Desc => compare(b, a, field),
        });

        let total = i64::try_from(matched.len()).unwrap_or(i64::MAX);
        let records = matched
            .into_iter()
            .skip(to_usize(offset))
            .take(to_usize(limit))
            .collect();

        Ok(AuditSlice { records, total })
    }

    async fn count(&self) -> AuditResult<i64> {
        Ok(i64::try_from(self.len().await).unwrap_or(i64::MAX))
    }

    async fn count_by(&self, column: GroupColumn) -> AuditResult<Vec<(String, i64)>> {
        let state = self.state.read().await;
        let mut counts: BTreeMap<String, i64> = BTreeMap::new();

        for record in self.live(&state.records) {
            let key = match column {
                GroupColumn::Action => record.action.as_str(),
                GroupColumn::Status => record.status.as_str(),
                GroupColumn::Level => record.level.as_str(),
            };
            *counts.entry(key.to_string()).or_default() += 1;
        }

        Ok(counts.into_iter().collect())
    }

    async fn recent(&self, limit: i64) -> AuditResult<Vec<AuditRecord>> {
        let state = self.state.read().await;
        let mut records: Vec<AuditRecord> = self.live(&state.records).cloned().collect();
        records.sort_by(|a, b| compare(b, a, SortField::CreatedAt));
        records.truncate(to_usize(limit));
        Ok(records)
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> AuditResult<u64> {
        let mut state = self.state.write().await;
        let before = state.records.len();
        state.records.retain(|r| r.created_at >= cutoff);
        Ok((before - state.records.len()) as u64)
    }

    async fn delete_all(&self) -> AuditResult<u64> {
        let mut state = self.state.write().await;
        let removed = state.records.len() as u64;
        state.records.clear();
        Ok(removed)
    }

    async fn missing_metadata(&self) -> AuditResult<Vec<AuditRecord>> {
        let state = self.state.read().await;
        Ok(self
            .live(&state.records)
            .filter(|r| r.is_book() && r.metadata.is_none() && r.request_data.is_some())
            .cloned()
            .collect())
    }

    async fn set_metadata(&self, id: i64, metadata: &BookMetadata) -> AuditResult<()> {
        let mut state = self.state.write().await;
        let record = state
            .records
            .iter_mut()
            .find(|r| r.id == id)
            .ok_or(AuditError::NotFound(id))?;

        record.metadata = Some(metadata.clone());
        record.updated_at = Utc::now();
        Ok(())
    }
}
