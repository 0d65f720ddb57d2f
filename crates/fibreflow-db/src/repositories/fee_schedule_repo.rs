//! Fee schedule repository implementation
//!
//! PostgreSQL-backed storage for fee schedule entries. `find_matching`
//! returns every candidate whose scope fields match or are wildcards;
//! specificity ranking is a pure function in the service layer, not a SQL
//! ordering clause.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use fibreflow_core::{
    models::{FeeScheduleEntry, TicketPriority, TicketType},
    traits::{FeeScheduleRepository, Repository},
    AppError, AppResult,
};
use rust_decimal::Decimal;
use sqlx::PgPool;
use tracing::{debug, error, instrument};
use uuid::Uuid;

/// PostgreSQL implementation of FeeScheduleRepository
pub struct PgFeeScheduleRepository {
    pool: PgPool,
}

impl PgFeeScheduleRepository {
    /// Create a new fee schedule repository
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

const SELECT_COLUMNS: &str = r#"
    id, project_id, service_type, ticket_type, priority,
    base_fee, hourly_rate, travel_fee, created_at, updated_at
"#;

#[async_trait]
impl Repository<FeeScheduleEntry, Uuid> for PgFeeScheduleRepository {
    #[instrument(skip(self))]
    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<FeeScheduleEntry>> {
        debug!("Finding fee schedule entry by id: {}", id);

        let result = sqlx::query_as::<sqlx::Postgres, FeeScheduleRow>(&format!(
            "SELECT {} FROM fee_schedule_entries WHERE id = $1",
            SELECT_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding fee schedule entry {}: {}", id, e);
            AppError::Database(format!("Failed to find fee schedule entry: {}", e))
        })?;

        Ok(result.map(Into::into))
    }

    #[instrument(skip(self))]
    async fn find_all(&self, limit: i64, offset: i64) -> AppResult<Vec<FeeScheduleEntry>> {
        debug!(
            "Finding fee schedule entries with limit {} offset {}",
            limit, offset
        );

        let rows = sqlx::query_as::<sqlx::Postgres, FeeScheduleRow>(&format!(
            "SELECT {} FROM fee_schedule_entries ORDER BY created_at DESC LIMIT $1 OFFSET $2",
            SELECT_COLUMNS
        ))
        .bind(limit)
        .bind(offset)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error finding fee schedule entries: {}", e);
            AppError::Database(format!("Failed to fetch fee schedule entries: {}", e))
        })?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    #[instrument(skip(self))]
    async fn count(&self) -> AppResult<i64> {
        let result: (i64,) = sqlx::query_as("SELECT COUNT(*) FROM fee_schedule_entries")
            .fetch_one(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error counting fee schedule entries: {}", e);
                AppError::Database(format!("Failed to count fee schedule entries: {}", e))
            })?;

        Ok(result.0)
    }

    #[instrument(skip(self, entity))]
    async fn create(&self, entity: &FeeScheduleEntry) -> AppResult<FeeScheduleEntry> {
        debug!("Creating fee schedule entry");

        let row = sqlx::query_as::<sqlx::Postgres, FeeScheduleRow>(&format!(
            r#"
            INSERT INTO fee_schedule_entries (
                project_id, service_type, ticket_type, priority,
                base_fee, hourly_rate, travel_fee
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(entity.project_id)
        .bind(&entity.service_type)
        .bind(entity.ticket_type.map(|t| t.to_string()))
        .bind(entity.priority.map(|p| p.to_string()))
        .bind(entity.base_fee)
        .bind(entity.hourly_rate)
        .bind(entity.travel_fee)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!("Database error creating fee schedule entry: {}", e);
            AppError::Database(format!("Failed to create fee schedule entry: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self, entity))]
    async fn update(&self, entity: &FeeScheduleEntry) -> AppResult<FeeScheduleEntry> {
        debug!("Updating fee schedule entry: {}", entity.id);

        let row = sqlx::query_as::<sqlx::Postgres, FeeScheduleRow>(&format!(
            r#"
            UPDATE fee_schedule_entries
            SET project_id = $2,
                service_type = $3,
                ticket_type = $4,
                priority = $5,
                base_fee = $6,
                hourly_rate = $7,
                travel_fee = $8,
                updated_at = NOW()
            WHERE id = $1
            RETURNING {}
            "#,
            SELECT_COLUMNS
        ))
        .bind(entity.id)
        .bind(entity.project_id)
        .bind(&entity.service_type)
        .bind(entity.ticket_type.map(|t| t.to_string()))
        .bind(entity.priority.map(|p| p.to_string()))
        .bind(entity.base_fee)
        .bind(entity.hourly_rate)
        .bind(entity.travel_fee)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error updating fee schedule entry {}: {}",
                entity.id, e
            );
            AppError::Database(format!("Failed to update fee schedule entry: {}", e))
        })?;

        Ok(row.into())
    }

    #[instrument(skip(self))]
    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        debug!("Deleting fee schedule entry: {}", id);

        let result = sqlx::query("DELETE FROM fee_schedule_entries WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                error!("Database error deleting fee schedule entry {}: {}", id, e);
                AppError::Database(format!("Failed to delete fee schedule entry: {}", e))
            })?;

        Ok(result.rows_affected() > 0)
    }
}

#[async_trait]
impl FeeScheduleRepository for PgFeeScheduleRepository {
    #[instrument(skip(self))]
    async fn find_matching(
        &self,
        project_id: Uuid,
        ticket_type: TicketType,
        priority: TicketPriority,
        service_type: Option<&str>,
    ) -> AppResult<Vec<FeeScheduleEntry>> {
        debug!(
            "Finding fee schedule entries for project={} type={} priority={} service={:?}",
            project_id, ticket_type, priority, service_type
        );

        // Each scope column must equal the input or be NULL (wildcard).
        // With a NULL $4 the equality arm is never true, so service-scoped
        // entries cannot match a request that carries no service type.
        let rows = sqlx::query_as::<sqlx::Postgres, FeeScheduleRow>(&format!(
            r#"
            SELECT {}
            FROM fee_schedule_entries
            WHERE (project_id = $1 OR project_id IS NULL)
                AND (ticket_type = $2 OR ticket_type IS NULL)
                AND (priority = $3 OR priority IS NULL)
                AND (service_type = $4 OR service_type IS NULL)
            "#,
            SELECT_COLUMNS
        ))
        .bind(project_id)
        .bind(ticket_type.to_string())
        .bind(priority.to_string())
        .bind(service_type)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            error!(
                "Database error finding fee schedule entries for project {}: {}",
                project_id, e
            );
            AppError::Database(format!("Failed to find fee schedule entries: {}", e))
        })?;

        debug!("Found {} candidate fee schedule entries", rows.len());

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

/// Helper struct for mapping database rows
#[derive(Debug, sqlx::FromRow)]
struct FeeScheduleRow {
    id: Uuid,
    project_id: Option<Uuid>,
    service_type: Option<String>,
    ticket_type: Option<String>,
    priority: Option<String>,
    base_fee: Decimal,
    hourly_rate: Option<Decimal>,
    travel_fee: Option<Decimal>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<FeeScheduleRow> for FeeScheduleEntry {
    fn from(row: FeeScheduleRow) -> Self {
        Self {
            id: row.id,
            project_id: row.project_id,
            service_type: row.service_type,
            ticket_type: row.ticket_type.as_deref().and_then(TicketType::parse),
            priority: row.priority.as_deref().and_then(TicketPriority::parse),
            base_fee: row.base_fee,
            hourly_rate: row.hourly_rate,
            travel_fee: row.travel_fee,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibreflow_core::models::SpecificityTier;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_conversion() {
        let now = Utc::now();
        let row = FeeScheduleRow {
            id: Uuid::new_v4(),
            project_id: None,
            service_type: Some("fibre_repair".to_string()),
            ticket_type: Some("repair".to_string()),
            priority: Some("high".to_string()),
            base_fee: dec!(750),
            hourly_rate: Some(dec!(200)),
            travel_fee: None,
            created_at: now,
            updated_at: now,
        };

        let entry: FeeScheduleEntry = row.into();
        assert_eq!(entry.ticket_type, Some(TicketType::Repair));
        assert_eq!(entry.priority, Some(TicketPriority::High));
        assert_eq!(entry.specificity(), SpecificityTier::ServiceType);
    }

    #[test]
    fn test_row_conversion_unknown_enum_degrades_to_wildcard() {
        let now = Utc::now();
        let row = FeeScheduleRow {
            id: Uuid::new_v4(),
            project_id: None,
            service_type: None,
            ticket_type: Some("not_a_type".to_string()),
            priority: None,
            base_fee: dec!(100),
            hourly_rate: None,
            travel_fee: None,
            created_at: now,
            updated_at: now,
        };

        let entry: FeeScheduleEntry = row.into();
        assert_eq!(entry.ticket_type, None);
        assert_eq!(entry.specificity(), SpecificityTier::Global);
    }
}
