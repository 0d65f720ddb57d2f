//! Service contract repository implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fibreflow_core::{
    models::ServiceContract,
    traits::{ContractRepository, Repository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of ContractRepository
pub struct PgContractRepository {
    pool: PgPool,
}

impl PgContractRepository {
    /// Create a new contract repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, project_id, client_name, active, expires_at,
    monthly_fee, sla_config_ids, created_at, updated_at
"#;

#[async_trait]
impl Repository<ServiceContract, Uuid> for PgContractRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<ServiceContract>> {
        debug!("Finding contract by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, ContractRow>(&format!(
            "SELECT {} FROM service_contracts WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding contract {}: {}", id, e);
            AppError::Database(format!("Failed to find contract: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<ServiceContract>> {
        debug!("Finding contracts with limit {} offset {}", limit, offset);

        let rows = sqlx::query_as::<sqlx::Postgres, ContractRow>(&format!(
            "SELECT {} FROM service_contracts ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding contracts: {}", e);
            AppError::Database(format!("Failed to fetch contracts: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM service_contracts")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting contracts: {}", e);
                AppError::Database(format!("Failed to count contracts: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &ServiceContract) -> AppResult<ServiceContract> {
        debug!("Creating contract for project: {}", entity.project_id);

        let row = sqlx::query_as::<sqlx::Postgres, ContractRow>(&format!(
            r#"
            INSERT INTO service_contracts (
                project_id, client_name, active, expires_at,
                monthly_fee, sla_config_ids
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(entity.project_id)
        .bind(&entity.client_name)
        .bind(entity.active)
        .bind(entity.expires_at)
        .bind(entity.monthly_fee)
        .bind(&entity.sla_config_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating contract: {}", e);
            AppError::Database(format!("Failed to create contract: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &ServiceContract) -> AppResult<ServiceContract> {
        debug!("Updating contract: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, ContractRow>(&format!(
            r#"
            UPDATE service_contracts
            SET client_name = $2,
                active = $3,
                expires_at = $4,
                monthly_fee = $5,
                sla_config_ids = $6,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(entity.id)
        .bind(&entity.client_name)
        .bind(entity.active)
        .bind(entity.expires_at)
        .bind(entity.monthly_fee)
        .bind(&entity.sla_config_ids)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error updating contract {}: {}", entity.id, e);
            AppError::Database(format!("Failed to update contract: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting contract: {}", id);

        let result = sqlx::query("DELETE FROM service_contracts WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting contract {}: {}", id, e);
                AppError::Database(format!("Failed to delete contract: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl ContractRepository for PgContractRepository {
    #[instrument(skip(self))]
    async fn find_active_for_project(
        &self,
        project_id: Uuid,
    ) -> AppResult<Option<ServiceContract>> {
        debug!("Finding active contract for project: {}", project_id);

        let result = sqlx::query_as::<sqlx::Postgres, ContractRow>(&format!(
            r#"
            SELECT {}
            FROM service_contracts
            WHERE project_id = $1
                AND active = TRUE
                AND (expires_at IS NULL OR expires_at > NOW())
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
                "Database error finding active contract for project {}: {}",
                project_id, e
            );
            AppError::Database(format!("Failed to find active contract: {}", e))
        })?;

        if result.is_none() {
            debug!("No active contract for project: {}", project_id);
        }

        Ok(result.map(Into::into))
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct ContractRow {
    id: Uuid,
    project_id: Uuid,
    client_name: Option<String>,
    active: bool,
    expires_at: Option<DateTime<Utc>>,
    monthly_fee: Decimal,
    sla_config_ids: Vec<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<ContractRow> for ServiceContract {
    fn from(row: ContractRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            client_name: row.client_name,
            active: row.active,
            expires_at: row.expires_at,
            monthly_fee: row.monthly_fee,
            sla_config_ids: row.sla_config_ids,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_conversion() {
        let now = Utc::now();
        let sla_id = Uuid::new_v4();
        let row = ContractRow {
            id: Uuid::new_v4(),
            project_id: Uuid::new_v4(),
            client_name: None,
            active: true,
            expires_at: None,
            monthly_fee: dec!(3000),
            sla_config_ids: vec![sla_id],
            created_at: now,
            updated_at: now,
        };

        let contract: ServiceContract = row.into();
        assert!(contract.is_in_force());
        assert!(contract.references_sla(sla_id));
        assert_eq!(contract.daily_equivalent_fee(30), dec!(100));
    }
}
