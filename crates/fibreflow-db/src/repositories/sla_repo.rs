//! SLA configuration repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fibreflow_core::{
    models::SlaConfig,
    traits::{Repository, SlaConfigRepository},
    AppError, AppResult,
};
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of SlaConfigRepository
pub struct PgSlaConfigRepository {
    pool: PgPool,
}

impl PgSlaConfigRepository {
    /// Create a new SLA config repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, name, response_target_minutes, resolution_target_minutes,
    created_at, updated_at
"#;

#[async_trait]
impl Repository<SlaConfig, Uuid> for PgSlaConfigRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<SlaConfig>> {
        debug!("Finding SLA config by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, SlaConfigRow>(&format!(
            "SELECT {} FROM sla_configs WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding SLA config {}: {}", id, e);
            AppError::Database(format!("Failed to find SLA config: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<SlaConfig>> {
        debug!("Finding SLA configs with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, SlaConfigRow>(&format!(
            "SELECT {} FROM sla_configs ORDER BY name LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding SLA configs: {}", e);
            AppError::Database(format!("Failed to fetch SLA configs: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM sla_configs")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting SLA configs: {}", e);
                AppError::Database(format!("Failed to count SLA configs: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &SlaConfig) -> AppResult<SlaConfig> {
        debug!("Creating SLA config: {}", entity.name);

        let row = sqlx::query_as::<sqlx::Postgres, SlaConfigRow>(&format!(
            r#"
            INSERT INTO sla_configs (name, response_target_minutes, resolution_target_minutes)
            VALUES ($1, $2, $3)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(&entity.name)
        .bind(entity.response_target_minutes)
        .bind(entity.resolution_target_minutes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating SLA config: {}", e);
            AppError::Database(format!("Failed to create SLA config: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &SlaConfig) -> AppResult<SlaConfig> {
        debug!("Updating SLA config: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, SlaConfigRow>(&format!(
            r#"
            UPDATE sla_configs
            SET name = $2,
                response_target_minutes = $3,
                resolution_target_minutes = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(entity.id)
        .bind(&entity.name)
        .bind(entity.response_target_minutes)
        .bind(entity.resolution_target_minutes)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating SLA config {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update SLA config: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting SLA config: {}", id);

        let result = sqlx::query("DELETE FROM sla_configs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting SLA config {}: {}", id, e);
                AppError::Database(format!("Failed to delete SLA config: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl SlaConfigRepository for PgSlaConfigRepository {}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct SlaConfigRow {
    id: Uuid,
    name: String,
    response_target_minutes: i32,
    resolution_target_minutes: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<SlaConfigRow> for SlaConfig {
    fn from(row: SlaConfigRow) -> Self {
        Self {
            id: row.id,
            name: row.name,
            response_target_minutes: row.response_target_minutes,
            resolution_target_minutes: row.resolution_target_minutes,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
