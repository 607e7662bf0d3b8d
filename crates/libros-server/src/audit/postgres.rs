//! PostgreSQL audit store

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use sqlx::{types::Json, PgPool, Postgres, QueryBuilder};
use tracing::{debug, warn};

use super::error::{AuditError, AuditResult};
use super::models::{
    AuditCompletion, AuditFilters, AuditRecord, BookMetadata, GroupColumn, NewAuditRecord,
};
use super::store::{AuditSlice, AuditStore};

/// Columns of `audit_logs`, qualified with the `a` alias used by every read
const SELECT_COLUMNS: &str = r#"
    a.id, a.is_active, a.created_at, a.updated_at, a.deleted_at,
    a.user_id, a.user_email, a.user_name, a.action, a.entity_type, a.entity_id,
    a.description, a.request_data, a.response_data, a.status, a.level,
    a.ip_address, a.user_agent, a.endpoint, a.http_method,
    a.response_time_ms, a.error_message, a.metadata
"#;

const RETURNING_COLUMNS: &str = r#"
    id, is_active, created_at, updated_at, deleted_at,
    user_id, user_email, user_name, action, entity_type, entity_id,
    description, request_data, response_data, status, level,
    ip_address, user_agent, endpoint, http_method,
    response_time_ms, error_message, metadata
"#;

/// Loose join: `entity_id` is free text, books are keyed by integer id
const BOOK_JOIN: &str = r#"
    FROM audit_logs a
    LEFT JOIN books b
        ON a.entity_type = 'Book'
       AND b.id::text = a.entity_id
       AND b.deleted_at IS NULL
"#;

/// Raw row; enum columns are stored as text
#[derive(Debug, sqlx::FromRow)]
struct AuditLogRow {
    id: i64,
    is_active: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
    user_id: Option<i64>,
    user_email: Option<String>,
    user_name: Option<String>,
    action: String,
    entity_type: Option<String>,
    entity_id: Option<String>,
    description: String,
    request_data: Option<JsonValue>,
    response_data: Option<JsonValue>,
    status: String,
    level: String,
    ip_address: Option<String>,
    user_agent: Option<String>,
    endpoint: Option<String>,
    http_method: Option<String>,
    response_time_ms: Option<i64>,
    error_message: Option<String>,
    metadata: Option<JsonValue>,
}

impl TryFrom<AuditLogRow> for AuditRecord {
    type Error = AuditError;

    fn try_from(row: AuditLogRow) -> Result<Self, Self::Error> {
        let invalid = |e: super::models::UnknownVariant| {
            AuditError::InvalidRecord(format!("audit record {}: {}", row.id, e))
        };

        let metadata = match row.metadata {
            None | Some(JsonValue::Null) => None,
            Some(value) => match serde_json::from_value::<BookMetadata>(value) {
                Ok(metadata) => Some(metadata),
                Err(e) => {
                    warn!(audit_id = row.id, error = %e, "Ignoring malformed audit metadata");
                    None
                }
            },
        };

        Ok(AuditRecord {
            id: row.id,
            is_active: row.is_active,
            created_at: row.created_at,
            updated_at: row.updated_at,
            deleted_at: row.deleted_at,
            user_id: row.user_id,
            user_email: row.user_email,
            user_name: row.user_name,
            action: row.action.parse().map_err(invalid)?,
            entity_type: row.entity_type,
            entity_id: row.entity_id,
            description: row.description,
            request_data: row.request_data,
            response_data: row.response_data,
            status: row.status.parse().map_err(invalid)?,
            level: row.level.parse().map_err(invalid)?,
            ip_address: row.ip_address,
            user_agent: row.user_agent,
            endpoint: row.endpoint,
            http_method: row.http_method,
            response_time_ms: row.response_time_ms,
            error_message: row.error_message,
            metadata,
        })
    }
}

fn into_records(rows: Vec<AuditLogRow>) -> AuditResult<Vec<AuditRecord>> {
    rows.into_iter().map(AuditRecord::try_from).collect()
}

/// `%term%` for ILIKE with the term's own wildcards escaped
fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{}%", escaped)
}

/// Append `WHERE ...` for the live-record rule and every set filter
fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filters: &AuditFilters) {
    qb.push(" WHERE a.deleted_at IS NULL");

    if let Some(user_id) = filters.user_id {
        qb.push(" AND a.user_id = ").push_bind(user_id);
    }
    if let Some(action) = filters.action {
        qb.push(" AND a.action = ").push_bind(action.as_str());
    }
    if let Some(entity_type) = filters.entity_type.clone() {
        qb.push(" AND a.entity_type = ").push_bind(entity_type);
    }
    if let Some(entity_id) = filters.entity_id.clone() {
        qb.push(" AND a.entity_id = ").push_bind(entity_id);
    }
    if let Some(status) = filters.status {
        qb.push(" AND a.status = ").push_bind(status.as_str());
    }
    if let Some(level) = filters.level {
        qb.push(" AND a.level = ").push_bind(level.as_str());
    }
    if let Some(start) = filters.start_date {
        qb.push(" AND a.created_at >= ").push_bind(start);
    }
    if let Some(end) = filters.end_date {
        qb.push(" AND a.created_at <= ").push_bind(end);
    }

    if let Some(term) = filters.search_term() {
        let pattern = like_pattern(term);
        qb.push(" AND (");
        let mut first = true;
        for column in ["a.description", "a.user_name", "a.user_email", "b.title", "b.author", "b.publisher"] {
            if !first {
                qb.push(" OR ");
            }
            first = false;
            qb.push(column)
                .push(" ILIKE ")
                .push_bind(pattern.clone())
                .push(r" ESCAPE '\'");
        }
        qb.push(")");
    }

    for (term, field) in [
        (filters.author_term(), "author"),
        (filters.publisher_term(), "publisher"),
        (filters.genre_term(), "genre"),
    ] {
        if let Some(term) = term {
            let pattern = like_pattern(term);
            qb.push(format!(" AND (b.{field} ILIKE "))
                .push_bind(pattern.clone())
                .push(format!(r" ESCAPE '\' OR a.metadata->>'{field}' ILIKE "))
                .push_bind(pattern)
                .push(r" ESCAPE '\')");
        }
    }
}

/// `audit_logs` table store
#[derive(Clone)]
pub struct PgAuditStore {
    pool: PgPool,
}

impl PgAuditStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl AuditStore for PgAuditStore {
    async fn insert(&self, record: NewAuditRecord) -> AuditResult<AuditRecord> {
        let sql = format!(
            r#"
            INSERT INTO audit_logs (
                user_id, user_email, user_name, action, entity_type, entity_id,
                description, request_data, response_data, status, level,
                ip_address, user_agent, endpoint, http_method,
                response_time_ms, error_message, metadata
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16, $17, $18)
            RETURNING {RETURNING_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, AuditLogRow>(&sql)
            .bind(record.user_id)
            .bind(&record.user_email)
            .bind(&record.user_name)
            .bind(record.action.as_str())
            .bind(&record.entity_type)
            .bind(&record.entity_id)
            .bind(&record.description)
            .bind(&record.request_data)
            .bind(&record.response_data)
            .bind(record.status.as_str())
            .bind(record.level.as_str())
            .bind(&record.ip_address)
            .bind(&record.user_agent)
            .bind(&record.endpoint)
            .bind(&record.http_method)
            .bind(record.response_time_ms)
            .bind(&record.error_message)
            .bind(record.metadata.as_ref().map(Json))
            .fetch_one(&self.pool)
            .await?;

        debug!(
            audit_id = row.id,
            action = %record.action,
            status = %record.status,
            "Created audit record"
        );

        row.try_into()
    }

    async fn complete(&self, id: i64, completion: AuditCompletion) -> AuditResult<AuditRecord> {
        let sql = format!(
            r#"
            UPDATE audit_logs
            SET status = $2,
                level = $3,
                response_data = $4,
                response_time_ms = $5,
                error_message = $6,
                updated_at = NOW()
            WHERE id = $1 AND status = 'PENDING'
            RETURNING {RETURNING_COLUMNS}
            "#
        );

        let row = sqlx::query_as::<_, AuditLogRow>(&sql)
            .bind(id)
            .bind(completion.status.as_str())
            .bind(completion.level.as_str())
            .bind(&completion.response_data)
            .bind(completion.response_time_ms)
            .bind(&completion.error_message)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            let exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM audit_logs WHERE id = $1)",
            )
            .bind(id)
            .fetch_one(&self.pool)
            .await?;

            return Err(if exists {
                AuditError::AlreadyCompleted(id)
            } else {
                AuditError::NotFound(id)
            });
        };

        debug!(audit_id = id, status = %completion.status, "Completed audit record");

        row.try_into()
    }

    async fn find_by_id(&self, id: i64) -> AuditResult<Option<AuditRecord>> {
        let sql = format!(
            "SELECT {SELECT_COLUMNS} FROM audit_logs a WHERE a.id = $1 AND a.deleted_at IS NULL"
        );

        sqlx::query_as::<_, AuditLogRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(AuditRecord::try_from)
            .transpose()
    }

    async fn query(&self, filters: &AuditFilters, limit: i64, offset: i64) -> AuditResult<AuditSlice> {
        let mut count: QueryBuilder<'static, Postgres> = QueryBuilder::new("SELECT COUNT(*)");
        count.push(BOOK_JOIN);
        push_filters(&mut count, filters);

        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select: QueryBuilder<'static, Postgres> =
            QueryBuilder::new(format!("SELECT {SELECT_COLUMNS}"));
        select.push(BOOK_JOIN);
        push_filters(&mut select, filters);

        let order = filters.sort_order().as_sql();
        select.push(format!(
            " ORDER BY a.{} {order} NULLS LAST, a.id {order}",
            filters.sort_field().column()
        ));
        select.push(" LIMIT ").push_bind(limit);
        select.push(" OFFSET ").push_bind(offset);

        let rows: Vec<AuditLogRow> = select.build_query_as().fetch_all(&self.pool).await?;

        debug!(count = rows.len(), total, "Queried audit records");

        Ok(AuditSlice {
            records: into_records(rows)?,
            total,
        })
    }

    async fn count(&self) -> AuditResult<i64> {
        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM audit_logs WHERE deleted_at IS NULL",
        )
        .fetch_one(&self.pool)
        .await?;

        Ok(total)
    }

    async fn count_by(&self, column: GroupColumn) -> AuditResult<Vec<(String, i64)>> {
        let column = column.column();
        let sql = format!(
            r#"
            SELECT {column}, COUNT(*)
            FROM audit_logs
            WHERE deleted_at IS NULL
            GROUP BY {column}
            ORDER BY {column}
            "#
        );

        let counts = sqlx::query_as::<_, (String, i64)>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(counts)
    }

    async fn recent(&self, limit: i64) -> AuditResult<Vec<AuditRecord>> {
        let sql = format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM audit_logs a
            WHERE a.deleted_at IS NULL
            ORDER BY a.created_at DESC, a.id DESC
            LIMIT $1
            "#
        );

        let rows = sqlx::query_as::<_, AuditLogRow>(&sql)
            .bind(limit)
            .fetch_all(&self.pool)
            .await?;

        into_records(rows)
    }

    async fn delete_before(&self, cutoff: DateTime<Utc>) -> AuditResult<u64> {
        let result = sqlx::query("DELETE FROM audit_logs WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn delete_all(&self) -> AuditResult<u64> {
        let result = sqlx::query("DELETE FROM audit_logs")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }

    async fn missing_metadata(&self) -> AuditResult<Vec<AuditRecord>> {
        let sql = format!(
            r#"
            SELECT {SELECT_COLUMNS}
            FROM audit_logs a
            WHERE a.deleted_at IS NULL
              AND a.entity_type = 'Book'
              AND (a.metadata IS NULL OR a.metadata = 'null'::jsonb)
              AND a.request_data IS NOT NULL
            ORDER BY a.id
            "#
        );

        let rows = sqlx::query_as::<_, AuditLogRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        into_records(rows)
    }

    async fn set_metadata(&self, id: i64, metadata: &BookMetadata) -> AuditResult<()> {
        let result = sqlx::query(
            "UPDATE audit_logs SET metadata = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(id)
        .bind(Json(metadata))
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(AuditError::NotFound(id));
        }

        Ok(())
    }
}
