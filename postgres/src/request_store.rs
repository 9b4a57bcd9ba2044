//! `PostgreSQL` request store implementation.

use chrono::{DateTime, Utc};
use maker_checker_core::error::{CheckerError, Result};
use maker_checker_core::providers::RequestStore;
use maker_checker_core::query::RequestQuery;
use maker_checker_core::state::{NewRequest, Request, RequestId, RequestStatus};
use sqlx::postgres::{PgPool, PgPoolOptions};
use sqlx::{Postgres, QueryBuilder};

const COLUMNS: &str = "id, maker_id, target_id, payload, status, created_at, deleted_at";

/// One `approval_requests` row.
#[derive(Debug, sqlx::FromRow)]
struct RequestRow {
    id: String,
    maker_id: String,
    target_id: String,
    payload: String,
    status: i16,
    created_at: DateTime<Utc>,
    deleted_at: Option<DateTime<Utc>>,
}

impl TryFrom<RequestRow> for Request {
    type Error = CheckerError;

    fn try_from(row: RequestRow) -> Result<Self> {
        let status = RequestStatus::from_code(i64::from(row.status)).map_err(|_| {
            CheckerError::StorageFailure(format!(
                "request {} has unknown status code {}",
                row.id, row.status
            ))
        })?;

        Ok(Self {
            id: RequestId(row.id),
            maker_id: row.maker_id,
            target_id: row.target_id,
            payload: row.payload,
            status,
            created_at: row.created_at,
            deleted_at: row.deleted_at,
        })
    }
}

fn storage_failure(context: &str, error: &sqlx::Error) -> CheckerError {
    CheckerError::StorageFailure(format!("{context}: {error}"))
}

/// `PostgreSQL` request store.
///
/// Cloning is cheap; clones share the connection pool.
#[derive(Debug, Clone)]
pub struct PostgresRequestStore {
    /// `PostgreSQL` connection pool.
    pool: PgPool,
}

impl PostgresRequestStore {
    /// Create a store over an existing connection pool.
    #[must_use]
    pub const fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connect to `database_url` with a pool of at most `max_connections`.
    ///
    /// # Errors
    ///
    /// Returns [`CheckerError::StorageFailure`] if the connection fails.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await
            .map_err(|e| storage_failure("Failed to connect", &e))?;

        Ok(Self::new(pool))
    }

    /// Run database migrations.
    ///
    /// # Errors
    ///
    /// Returns [`CheckerError::StorageFailure`] if migrations fail.
    pub async fn migrate(&self) -> Result<()> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| CheckerError::StorageFailure(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get the underlying connection pool.
    #[must_use]
    pub const fn pool(&self) -> &PgPool {
        &self.pool
    }
}

impl RequestStore for PostgresRequestStore {
    async fn create(&self, request: NewRequest) -> Result<Request> {
        let id = RequestId::generate();

        let row: RequestRow = sqlx::query_as(&format!(
            "INSERT INTO approval_requests (id, maker_id, target_id, payload, status, created_at) \
             VALUES ($1, $2, $3, $4, $5, $6) \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(&request.maker_id)
        .bind(&request.target_id)
        .bind(&request.payload)
        .bind(request.status.code())
        .bind(request.created_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| storage_failure("Failed to insert request", &e))?;

        metrics::counter!("request_store.postgres.inserted").increment(1);
        tracing::debug!(request_id = %id, "Request row inserted");

        row.try_into()
    }

    async fn conditional_update_status(
        &self,
        id: &RequestId,
        expected: RequestStatus,
        new: RequestStatus,
    ) -> Result<Request> {
        let updated: Option<RequestRow> = sqlx::query_as(&format!(
            "UPDATE approval_requests SET status = $3 \
             WHERE id = $1 AND status = $2 \
             RETURNING {COLUMNS}"
        ))
        .bind(id.as_str())
        .bind(expected.code())
        .bind(new.code())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_failure("Failed to update request status", &e))?;

        if let Some(row) = updated {
            return row.try_into();
        }

        // Nothing matched: either the row is missing or its status moved on.
        let current = self.get_by_id(id).await?;
        tracing::debug!(
            request_id = %id,
            expected = %expected,
            actual = %current.status,
            "Status compare-and-swap lost"
        );
        metrics::counter!("request_store.postgres.cas_conflicts").increment(1);
        Err(CheckerError::Conflict(id.clone()))
    }

    async fn find(&self, query: &RequestQuery) -> Result<Vec<Request>> {
        let mut builder: QueryBuilder<'_, Postgres> =
            QueryBuilder::new(format!("SELECT {COLUMNS} FROM approval_requests WHERE TRUE"));

        if let Some(target_id) = &query.target_id {
            builder.push(" AND target_id = ").push_bind(target_id);
        }
        if let Some(maker_id) = &query.maker_id {
            builder.push(" AND maker_id = ").push_bind(maker_id);
        }
        if let Some(status) = query.status {
            builder.push(" AND status = ").push_bind(status.code());
        }

        builder
            .push(" ORDER BY created_at, id LIMIT ")
            .push_bind(i64::try_from(query.limit).unwrap_or(i64::MAX))
            .push(" OFFSET ")
            .push_bind(i64::try_from(query.skip).unwrap_or(i64::MAX));

        let rows: Vec<RequestRow> = builder
            .build_query_as()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| storage_failure("Failed to list requests", &e))?;

        rows.into_iter().map(Request::try_from).collect()
    }

    async fn get_by_id(&self, id: &RequestId) -> Result<Request> {
        let row: Option<RequestRow> = sqlx::query_as(&format!(
            "SELECT {COLUMNS} FROM approval_requests WHERE id = $1"
        ))
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| storage_failure("Failed to get request", &e))?;

        row.ok_or_else(|| CheckerError::NotFound(id.clone()))?
            .try_into()
    }
}
