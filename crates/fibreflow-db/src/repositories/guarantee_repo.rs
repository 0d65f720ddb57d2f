//! Guarantee repository implementation
//!
//! PostgreSQL-backed storage for project guarantees. The classifier only
//! reads through `find_active_for_project`; the CRUD surface backs the
//! administrative endpoints.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fibreflow_core::{
    models::Guarantee,
    traits::{GuaranteeRepository, Repository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of GuaranteeRepository
pub struct PgGuaranteeRepository {
    pool: PgPool,
}

impl PgGuaranteeRepository {
    /// Create a new guarantee repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, project_id, active, expires_at,
    incident_limit, incident_count, dr_numbers, service_types,
    created_at, updated_at
"#;

#[async_trait]
impl Repository<Guarantee, Uuid> for PgGuaranteeRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Guarantee>> {
        debug!("Finding guarantee by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, GuaranteeRow>(&format!(
            "SELECT {} FROM guarantees WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding guarantee {}: {}", id, e);
            AppError::Database(format!("Failed to find guarantee: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<Guarantee>> {
        debug!("Finding guarantees with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, GuaranteeRow>(&format!(
            "SELECT {} FROM guarantees ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding guarantees: {}", e);
            AppError::Database(format!("Failed to fetch guarantees: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM guarantees")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting guarantees: {}", e);
                AppError::Database(format!("Failed to count guarantees: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &Guarantee) -> AppResult<Guarantee> {
        debug!("Creating guarantee for project: {}", entity.project_id);

        let row = sqlx::query_as::<sqlx::Postgres, GuaranteeRow>(&format!(
            r#"
            INSERT INTO guarantees (
                project_id, active, expires_at,
                incident_limit, incident_count, dr_numbers, service_types
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(entity.project_id)
        .bind(entity.active)
        .bind(entity.expires_at)
        .bind(entity.incident_limit)
        .bind(entity.incident_count)
        .bind(&entity.dr_numbers)
        .bind(&entity.service_types)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating guarantee: {}", e);
            AppError::Database(format!("Failed to create guarantee: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &Guarantee) -> AppResult<Guarantee> {
        debug!("Updating guarantee: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, GuaranteeRow>(&format!(
            r#"
            UPDATE guarantees
            SET active = $2,
                expires_at = $3,
                incident_limit = $4,
                incident_count = $5,
                dr_numbers = $6,
                service_types = $7,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(entity.id)
        .bind(entity.active)
        .bind(entity.expires_at)
        .bind(entity.incident_limit)
        .bind(entity.incident_count)
        .bind(&entity.dr_numbers)
        .bind(&entity.service_types)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating guarantee {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update guarantee: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting guarantee: {}", id);

        let result = sqlx::query("DELETE FROM guarantees WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting guarantee {}: {}", id, e);
                AppError::Database(format!("Failed to delete guarantee: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl GuaranteeRepository for PgGuaranteeRepository {
    #[instrument(skip(self))]
    async fn find_active_for_project(&self, project_id: Uuid) -> AppResult<Option<Guarantee>> {
        debug!("Finding active guarantee for project: {}", project_id);

        // In-force filter mirrors Guarantee::is_in_force so that callers get
        // the same answer whether they test in SQL or on the model.
        let result = sqlx::query_as::<sqlx::Postgres, GuaranteeRow>(&format!(
            r#"
            SELECT {}
            FROM guarantees
            WHERE project_id = $1
                AND active = TRUE
                AND (expires_at IS NULL OR expires_at > NOW())
                AND (incident_limit IS NULL OR incident_count < incident_limit)
            ORDER BY created_at ASC
            LIMIT 1
            "#,
            SELECT_COLUMNS
        ))
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error finding active guarantee for project {}: {}",
                project_id, e
            );
            AppError::Database(format!("Failed to find active guarantee: {}", e))
        })?;

        if result.is_none() {
            debug!("No active guarantee for project: {}", project_id);
        }

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct GuaranteeRow {
    id: Uuid,
    project_id: Uuid,
    active: bool,
    expires_at: Option<DateTime<Utc>>,
    incident_limit: Option<i32>,
    incident_count: i32,
    dr_numbers: Option<Vec<String>>,
    service_types: Option<Vec<String>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<GuaranteeRow> for Guarantee {
    fn from(row: GuaranteeRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            active: row.active,
            expires_at: row.expires_at,
            incident_limit: row.incident_limit,
            incident_count: row.incident_count,
            dr_numbers: row.dr_numbers,
            service_types: row.service_types,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
