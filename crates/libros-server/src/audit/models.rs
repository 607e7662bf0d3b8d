//! Audit data models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::collections::BTreeMap;

// ============================================================================
// Audit Query Constants
// ============================================================================

/// Default number of audit records returned per page
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Maximum page size accepted by `find_all`
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Row cap applied to CSV exports
pub const DEFAULT_EXPORT_LIMIT: i64 = 10_000;

/// Default retention window used by cleanup, in days
pub const DEFAULT_RETENTION_DAYS: i64 = 90;

/// Number of entries in the stats "recent activity" list
pub const RECENT_ACTIVITY_LIMIT: i64 = 10;

/// Raised when a stored string does not name a known variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

impl UnknownVariant {
    fn new(kind: &'static str, value: &str) -> Self {
        Self {
            kind,
            value: value.to_string(),
        }
    }
}

/// Audit action types
///
/// The first five are the inventory actions produced by the request
/// classifier; the rest are generic actions other layers may record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditAction {
    Added,
    Updated,
    Removed,
    Viewed,
    Searched,
    Create,
    Read,
    Update,
    Delete,
    Login,
    Logout,
    Export,
    Import,
    Search,
    Filter,
    Sort,
    Pagination,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Added => "ADDED",
            Self::Updated => "UPDATED",
            Self::Removed => "REMOVED",
            Self::Viewed => "VIEWED",
            Self::Searched => "SEARCHED",
            Self::Create => "CREATE",
            Self::Read => "READ",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Login => "LOGIN",
            Self::Logout => "LOGOUT",
            Self::Export => "EXPORT",
            Self::Import => "IMPORT",
            Self::Search => "SEARCH",
            Self::Filter => "FILTER",
            Self::Sort => "SORT",
            Self::Pagination => "PAGINATION",
        }
    }

    /// Human readable label used by the inventory export
    pub fn inventory_label(&self) -> &'static str {
        match self {
            Self::Added => "Libro agregado",
            Self::Updated => "Libro actualizado",
            Self::Removed => "Libro eliminado",
            Self::Viewed => "Libro consultado",
            Self::Searched => "Búsqueda en inventario",
            other => other.as_str(),
        }
    }
}

impl std::fmt::Display for AuditAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditAction {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let action = match s.to_ascii_uppercase().as_str() {
            "ADDED" => Self::Added,
            "UPDATED" => Self::Updated,
            "REMOVED" => Self::Removed,
            "VIEWED" => Self::Viewed,
            "SEARCHED" => Self::Searched,
            "CREATE" => Self::Create,
            "READ" => Self::Read,
            "UPDATE" => Self::Update,
            "DELETE" => Self::Delete,
            "LOGIN" => Self::Login,
            "LOGOUT" => Self::Logout,
            "EXPORT" => Self::Export,
            "IMPORT" => Self::Import,
            "SEARCH" => Self::Search,
            "FILTER" => Self::Filter,
            "SORT" => Self::Sort,
            "PAGINATION" => Self::Pagination,
            _ => return Err(UnknownVariant::new("audit action", s)),
        };
        Ok(action)
    }
}

/// Outcome of the audited request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditStatus {
    Success,
    Failure,
    Pending,
}

impl AuditStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Success => "SUCCESS",
            Self::Failure => "FAILURE",
            Self::Pending => "PENDING",
        }
    }
}

impl std::fmt::Display for AuditStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditStatus {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "SUCCESS" => Ok(Self::Success),
            "FAILURE" => Ok(Self::Failure),
            "PENDING" => Ok(Self::Pending),
            _ => Err(UnknownVariant::new("audit status", s)),
        }
    }
}

/// Severity attached to a record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AuditLevel {
    Info,
    Warning,
    Error,
    Debug,
}

impl AuditLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "INFO",
            Self::Warning => "WARNING",
            Self::Error => "ERROR",
            Self::Debug => "DEBUG",
        }
    }
}

impl std::fmt::Display for AuditLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for AuditLevel {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "INFO" => Ok(Self::Info),
            "WARNING" | "WARN" => Ok(Self::Warning),
            "ERROR" => Ok(Self::Error),
            "DEBUG" => Ok(Self::Debug),
            _ => Err(UnknownVariant::new("audit level", s)),
        }
    }
}

/// Coarse classification of the business resource a request touches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityType {
    Book,
    User,
    Auth,
    Dashboard,
    Unknown,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Book => "Book",
            Self::User => "User",
            Self::Auth => "Auth",
            Self::Dashboard => "Dashboard",
            Self::Unknown => "Unknown",
        }
    }
}

impl std::fmt::Display for EntityType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Snapshot of a book's fields at the time of the audited action
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookMetadata {
    pub title: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    pub stock: Option<i64>,
    pub price: Option<f64>,
    pub description: Option<String>,
}

impl BookMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.author.is_none()
            && self.publisher.is_none()
            && self.genre.is_none()
            && self.stock.is_none()
            && self.price.is_none()
            && self.description.is_none()
    }
}

/// Persisted audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditRecord {
    pub id: i64,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    /// Actor fields are all optional; anonymous requests are audited too
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub action: AuditAction,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub description: String,
    pub request_data: Option<JsonValue>,
    pub response_data: Option<JsonValue>,
    pub status: AuditStatus,
    pub level: AuditLevel,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub endpoint: Option<String>,
    pub http_method: Option<String>,
    pub response_time_ms: Option<i64>,
    pub error_message: Option<String>,
    /// Only ever set for `Book` records
    pub metadata: Option<BookMetadata>,
}

impl AuditRecord {
    pub fn is_book(&self) -> bool {
        self.entity_type.as_deref() == Some(EntityType::Book.as_str())
    }

    /// Name shown in reports: display name, then email, then anonymous
    pub fn actor_label(&self) -> &str {
        self.user_name
            .as_deref()
            .or(self.user_email.as_deref())
            .unwrap_or("Anónimo")
    }
}

/// Input for creating an audit record
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAuditRecord {
    pub user_id: Option<i64>,
    pub user_email: Option<String>,
    pub user_name: Option<String>,
    pub action: AuditAction,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub description: String,
    pub request_data: Option<JsonValue>,
    pub response_data: Option<JsonValue>,
    pub status: AuditStatus,
    pub level: AuditLevel,
    pub ip_address: Option<String>,
    pub user_agent: Option<String>,
    pub endpoint: Option<String>,
    pub http_method: Option<String>,
    pub response_time_ms: Option<i64>,
    pub error_message: Option<String>,
    pub metadata: Option<BookMetadata>,
}

impl NewAuditRecord {
    /// Create a builder for constructing audit records
    pub fn builder() -> NewAuditRecordBuilder {
        NewAuditRecordBuilder::default()
    }
}

/// Builder for audit records written outside the request interceptor,
/// e.g. a LOGIN entry recorded by the authentication layer
#[derive(Debug, Clone, Default)]
pub struct NewAuditRecordBuilder {
    user_id: Option<i64>,
    user_email: Option<String>,
    user_name: Option<String>,
    action: Option<AuditAction>,
    entity_type: Option<EntityType>,
    entity_id: Option<String>,
    description: Option<String>,
    request_data: Option<JsonValue>,
    status: Option<AuditStatus>,
    ip_address: Option<String>,
    user_agent: Option<String>,
    endpoint: Option<String>,
    http_method: Option<String>,
    metadata: Option<BookMetadata>,
}

impl NewAuditRecordBuilder {
    pub fn user(mut self, id: Option<i64>, email: Option<String>, name: Option<String>) -> Self {
        self.user_id = id;
        self.user_email = email;
        self.user_name = name;
        self
    }

    pub fn action(mut self, action: AuditAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn entity(mut self, entity_type: EntityType, entity_id: Option<String>) -> Self {
        self.entity_type = Some(entity_type);
        self.entity_id = entity_id;
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn request_data(mut self, data: JsonValue) -> Self {
        self.request_data = Some(data);
        self
    }

    pub fn status(mut self, status: AuditStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn ip_address(mut self, ip_address: impl Into<String>) -> Self {
        self.ip_address = Some(ip_address.into());
        self
    }

    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    pub fn endpoint(mut self, method: impl Into<String>, endpoint: impl Into<String>) -> Self {
        self.http_method = Some(method.into());
        self.endpoint = Some(endpoint.into());
        self
    }

    pub fn metadata(mut self, metadata: BookMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    /// Build the record, failing when no action was set
    ///
    /// Status defaults to SUCCESS; level is always INFO. Metadata is dropped for
    /// anything but `Book` entities.
    pub fn try_build(self) -> Result<NewAuditRecord, &'static str> {
        let action = self.action.ok_or("action is required")?;
        let is_book = self.entity_type == Some(EntityType::Book);

        Ok(NewAuditRecord {
            user_id: self.user_id,
            user_email: self.user_email,
            user_name: self.user_name,
            action,
            entity_type: self.entity_type.map(|e| e.as_str().to_string()),
            entity_id: self.entity_id,
            description: self
                .description
                .unwrap_or_else(|| action.as_str().to_string()),
            request_data: self.request_data,
            response_data: None,
            status: self.status.unwrap_or(AuditStatus::Success),
            level: AuditLevel::Info,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            endpoint: self.endpoint,
            http_method: self.http_method,
            response_time_ms: None,
            error_message: None,
            metadata: self.metadata.filter(|_| is_book),
        })
    }
}

/// Final state written over a PENDING record once the handler finished
#[derive(Debug, Clone, PartialEq)]
pub struct AuditCompletion {
    pub status: AuditStatus,
    pub level: AuditLevel,
    pub response_data: Option<JsonValue>,
    pub response_time_ms: i64,
    pub error_message: Option<String>,
}

impl AuditCompletion {
    pub fn success(response_data: Option<JsonValue>, response_time_ms: i64) -> Self {
        Self {
            status: AuditStatus::Success,
            level: AuditLevel::Info,
            response_data,
            response_time_ms,
            error_message: None,
        }
    }

    pub fn failure(error_message: impl Into<String>, response_time_ms: i64) -> Self {
        Self {
            status: AuditStatus::Failure,
            level: AuditLevel::Error,
            response_data: None,
            response_time_ms,
            error_message: Some(error_message.into()),
        }
    }
}

/// Columns `find_all` may sort by
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortField {
    Id,
    #[default]
    CreatedAt,
    UpdatedAt,
    Action,
    EntityType,
    Status,
    Level,
    UserName,
    UserEmail,
    ResponseTimeMs,
    Endpoint,
}

impl SortField {
    /// Resolve a client supplied name against the allow-list
    ///
    /// Unknown names fall back to `created_at`. Both snake_case and camelCase
    /// spellings are accepted.
    pub fn parse_or_default(name: Option<&str>) -> Self {
        match name.map(str::trim) {
            Some("id") => Self::Id,
            Some("created_at" | "createdAt") => Self::CreatedAt,
            Some("updated_at" | "updatedAt") => Self::UpdatedAt,
            Some("action") => Self::Action,
            Some("entity_type" | "entityType") => Self::EntityType,
            Some("status") => Self::Status,
            Some("level") => Self::Level,
            Some("user_name" | "userName") => Self::UserName,
            Some("user_email" | "userEmail") => Self::UserEmail,
            Some("response_time_ms" | "responseTime" | "responseTimeMs") => Self::ResponseTimeMs,
            Some("endpoint") => Self::Endpoint,
            _ => Self::CreatedAt,
        }
    }

    /// Column name, safe to interpolate into SQL
    pub fn column(&self) -> &'static str {
        match self {
            Self::Id => "id",
            Self::CreatedAt => "created_at",
            Self::UpdatedAt => "updated_at",
            Self::Action => "action",
            Self::EntityType => "entity_type",
            Self::Status => "status",
            Self::Level => "level",
            Self::UserName => "user_name",
            Self::UserEmail => "user_email",
            Self::ResponseTimeMs => "response_time_ms",
            Self::Endpoint => "endpoint",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SortOrder {
    #[serde(alias = "asc")]
    Asc,
    #[default]
    #[serde(alias = "desc")]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

/// Query parameters for listing and exporting audit records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditFilters {
    pub user_id: Option<i64>,
    pub action: Option<AuditAction>,
    pub entity_type: Option<String>,
    pub entity_id: Option<String>,
    pub status: Option<AuditStatus>,
    pub level: Option<AuditLevel>,
    /// Inclusive lower bound on `created_at`
    pub start_date: Option<DateTime<Utc>>,
    /// Inclusive upper bound on `created_at`
    pub end_date: Option<DateTime<Utc>>,
    /// Free text over description, actor fields and the joined book
    pub search: Option<String>,
    pub author: Option<String>,
    pub publisher: Option<String>,
    pub genre: Option<String>,
    pub sort_by: Option<String>,
    pub sort_order: Option<SortOrder>,
    pub page: Option<i64>,
    pub limit: Option<i64>,
}

impl AuditFilters {
    /// Page number (1-indexed), defaulting to 1
    pub fn page(&self) -> i64 {
        self.page.unwrap_or(1).max(1)
    }

    /// Page size, defaulting to 10 and clamped to 1-100
    pub fn limit(&self) -> i64 {
        self.limit
            .unwrap_or(DEFAULT_PAGE_LIMIT)
            .clamp(1, MAX_PAGE_LIMIT)
    }

    /// Rows to skip; saturates for absurd page numbers
    pub fn offset(&self) -> i64 {
        (self.page() - 1).saturating_mul(self.limit())
    }

    pub fn sort_field(&self) -> SortField {
        SortField::parse_or_default(self.sort_by.as_deref())
    }

    pub fn sort_order(&self) -> SortOrder {
        self.sort_order.unwrap_or_default()
    }

    /// Trimmed, non-empty free-text term
    pub fn search_term(&self) -> Option<&str> {
        non_blank(self.search.as_deref())
    }

    pub fn author_term(&self) -> Option<&str> {
        non_blank(self.author.as_deref())
    }

    pub fn publisher_term(&self) -> Option<&str> {
        non_blank(self.publisher.as_deref())
    }

    pub fn genre_term(&self) -> Option<&str> {
        non_blank(self.genre.as_deref())
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// One page of `find_all` results
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditPage {
    pub records: Vec<AuditRecord>,
    pub total: i64,
    pub page: i64,
    pub limit: i64,
    pub total_pages: i64,
}

impl AuditPage {
    pub fn new(records: Vec<AuditRecord>, total: i64, page: i64, limit: i64) -> Self {
        let total_pages = if total <= 0 { 0 } else { (total + limit - 1) / limit };
        Self {
            records,
            total,
            page,
            limit,
            total_pages,
        }
    }
}

/// Projection used by the stats "recent activity" list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentActivity {
    pub action: AuditAction,
    pub entity_type: Option<String>,
    pub user_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub status: AuditStatus,
}

impl From<&AuditRecord> for RecentActivity {
    fn from(record: &AuditRecord) -> Self {
        Self {
            action: record.action,
            entity_type: record.entity_type.clone(),
            user_name: record.user_name.clone(),
            created_at: record.created_at,
            status: record.status,
        }
    }
}

/// Aggregate counts over live (not soft-deleted) records
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AuditStats {
    pub total: i64,
    pub by_action: BTreeMap<String, i64>,
    pub by_status: BTreeMap<String, i64>,
    pub by_level: BTreeMap<String, i64>,
    pub recent_activity: Vec<RecentActivity>,
}

/// Columns the stats can be grouped by
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GroupColumn {
    Action,
    Status,
    Level,
}

impl GroupColumn {
    pub fn column(&self) -> &'static str {
        match self {
            Self::Action => "action",
            Self::Status => "status",
            Self::Level => "level",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_as_str_round_trips_through_from_str() {
        for action in [AuditAction::Added, AuditAction::Searched, AuditAction::Pagination] {
            assert_eq!(action.as_str().parse::<AuditAction>(), Ok(action));
        }
        assert!("DESTROYED".parse::<AuditAction>().is_err());
    }

    #[test]
    fn test_action_serialization() {
        let json = serde_json::to_string(&AuditAction::Removed).unwrap();
        assert_eq!(json, r#""REMOVED""#);

        let action: AuditAction = serde_json::from_str(r#""LOGIN""#).unwrap();
        assert_eq!(action, AuditAction::Login);
    }

    #[test]
    fn test_inventory_actions() {
        assert_eq!(AuditAction::Removed.inventory_label(), "Libro eliminado");
        assert_eq!(AuditAction::Export.inventory_label(), "EXPORT");
    }

    #[test]
    fn test_builder_requires_action() {
        assert_eq!(
            NewAuditRecord::builder().try_build().unwrap_err(),
            "action is required"
        );
    }

    #[test]
    fn test_builder_drops_metadata_for_non_book_entities() {
        let metadata = BookMetadata {
            title: Some("Rayuela".into()),
            ..Default::default()
        };

        let entry = NewAuditRecord::builder()
            .action(AuditAction::Login)
            .entity(EntityType::Auth, None)
            .metadata(metadata.clone())
            .try_build()
            .unwrap();
        assert!(entry.metadata.is_none());
        assert_eq!(entry.status, AuditStatus::Success);
        assert_eq!(entry.description, "LOGIN");

        let entry = NewAuditRecord::builder()
            .action(AuditAction::Added)
            .entity(EntityType::Book, Some("3".into()))
            .metadata(metadata.clone())
            .try_build()
            .unwrap();
        assert_eq!(entry.metadata, Some(metadata));
        assert_eq!(entry.entity_type.as_deref(), Some("Book"));
    }

    #[test]
    fn test_sort_field_allow_list() {
        assert_eq!(SortField::parse_or_default(Some("userName")), SortField::UserName);
        assert_eq!(SortField::parse_or_default(Some("status")), SortField::Status);
        assert_eq!(
            SortField::parse_or_default(Some("1; DROP TABLE audit_logs")),
            SortField::CreatedAt
        );
        assert_eq!(SortField::parse_or_default(None), SortField::CreatedAt);
    }

    #[test]
    fn test_filters_pagination_defaults_and_clamping() {
        let filters = AuditFilters::default();
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.limit(), DEFAULT_PAGE_LIMIT);
        assert_eq!(filters.offset(), 0);

        let filters = AuditFilters {
            page: Some(0),
            limit: Some(500),
            ..Default::default()
        };
        assert_eq!(filters.page(), 1);
        assert_eq!(filters.limit(), MAX_PAGE_LIMIT);

        let filters = AuditFilters {
            page: Some(3),
            limit: Some(25),
            ..Default::default()
        };
        assert_eq!(filters.offset(), 50);

        let filters = AuditFilters {
            page: Some(i64::MAX),
            limit: Some(10),
            ..Default::default()
        };
        assert_eq!(filters.offset(), i64::MAX);
    }

    #[test]
    fn test_blank_search_is_ignored() {
        let filters = AuditFilters {
            search: Some("   ".into()),
            author: Some(" Cervantes ".into()),
            ..Default::default()
        };
        assert_eq!(filters.search_term(), None);
        assert_eq!(filters.author_term(), Some("Cervantes"));
    }

    #[test]
    fn test_page_math() {
        for (total, limit, pages) in [(0, 10, 0), (1, 10, 1), (10, 10, 1), (11, 10, 2), (25, 7, 4)] {
            let page = AuditPage::new(vec![], total, 1, limit);
            assert_eq!(page.total_pages, pages, "total={} limit={}", total, limit);
        }
    }

    #[test]
    fn test_sort_order_deserializes_either_case() {
        let order: SortOrder = serde_json::from_str(r#""asc""#).unwrap();
        assert_eq!(order, SortOrder::Asc);
        let order: SortOrder = serde_json::from_str(r#""DESC""#).unwrap();
        assert_eq!(order, SortOrder::Desc);
    }
}
