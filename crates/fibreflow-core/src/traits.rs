//! Common traits for repositories and services
//!
//! Defines abstractions for database access and business logic. The
//! classifier takes these as capabilities so tests can substitute in-memory
//! fakes for the PostgreSQL implementations.

use crate::error::AppError;
use crate::models::{
    BillingClassification, BillingRequest, FeeScheduleEntry, Guarantee, ServiceContract, SlaConfig,
    TicketPriority, TicketType,
};
use async_trait::async_trait;
use serde::{de::DeserializeOwned, Serialize};
use uuid::Uuid;

/// Generic repository trait for CRUD operations
#[async_trait]
pub trait Repository<T, ID>: Send + Sync {
    /// Find entity by ID
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, AppError>;

    /// Find all entities with pagination
    async fn find_all(&self, limit: i64, offset: i64) -> Result<Vec<T>, AppError>;

    /// Count total entities
    async fn count(&self) -> Result<i64, AppError>;

    /// Create a new entity
    async fn create(&self, entity: &T) -> Result<T, AppError>;

    /// Update an existing entity
    async fn update(&self, entity: &T) -> Result<T, AppError>;

    /// Delete entity by ID
    async fn delete(&self, id: ID) -> Result<bool, AppError>;
}

/// Guarantee repository trait with specialized methods
#[async_trait]
pub trait GuaranteeRepository: Repository<Guarantee, Uuid> {
    /// Find the first in-force guarantee for a project
    ///
    /// In force means active, unexpired, and under the incident limit.
    /// Returns None when the project has no usable guarantee.
    async fn find_active_for_project(&self, project_id: Uuid)
        -> Result<Option<Guarantee>, AppError>;
}

/// Service contract repository trait with specialized methods
#[async_trait]
pub trait ContractRepository: Repository<ServiceContract, Uuid> {
    /// Find the active, unexpired contract for a project
    async fn find_active_for_project(
        &self,
        project_id: Uuid,
    ) -> Result<Option<ServiceContract>, AppError>;
}

/// SLA configuration repository trait
#[async_trait]
pub trait SlaConfigRepository: Repository<SlaConfig, Uuid> {}

/// Fee schedule repository trait with specialized methods
#[async_trait]
pub trait FeeScheduleRepository: Repository<FeeScheduleEntry, Uuid> {
    /// Find every entry whose scope fields each match the input or are unset
    ///
    /// Ranking by specificity happens in the service layer, not in SQL.
    async fn find_matching(
        &self,
        project_id: Uuid,
        ticket_type: TicketType,
        priority: TicketPriority,
        service_type: Option<&str>,
    ) -> Result<Vec<FeeScheduleEntry>, AppError>;
}

/// Billing classification service trait
#[async_trait]
pub trait ClassificationService: Send + Sync {
    /// Classify a ticket's billing: guarantee, SLA, or billable
    async fn classify(&self, request: &BillingRequest)
        -> Result<BillingClassification, AppError>;
}

/// Cache service trait
#[async_trait]
pub trait CacheService: Send + Sync {
    /// Get value from cache
    async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError>;

    /// Set value in cache with TTL
    async fn set<T: Serialize + Send + Sync>(
        &self,
        key: &str,
        value: &T,
        ttl_secs: u64,
    ) -> Result<(), AppError>;

    /// Delete value from cache
    async fn delete(&self, key: &str) -> Result<bool, AppError>;

    /// Check if key exists
    async fn exists(&self, key: &str) -> Result<bool, AppError>;

    /// Set expiration
    async fn expire(&self, key: &str, ttl_secs: u64) -> Result<bool, AppError>;
}

/// Pagination parameters
#[derive(Debug, Clone, Default)]
pub struct Pagination {
    pub page: i64,
    pub per_page: i64,
}

impl Pagination {
    pub fn new(page: i64, per_page: i64) -> Self {
        Self {
            page: page.max(1),
            per_page: per_page.clamp(1, 1000),
        }
    }

    pub fn offset(&self) -> i64 {
        (self.page - 1) * self.per_page
    }

    pub fn limit(&self) -> i64 {
        self.per_page
    }
}

/// Paginated response wrapper
#[derive(Debug, Clone, Serialize)]
pub struct PaginatedResponse<T> {
    pub data: Vec<T>,
    pub pagination: PaginationMeta,
}

/// Pagination metadata
#[derive(Debug, Clone, Serialize)]
pub struct PaginationMeta {
    pub total: i64,
    pub page: i64,
    pub per_page: i64,
    pub total_pages: i64,
}

impl PaginationMeta {
    pub fn new(total: i64, page: i64, per_page: i64) -> Self {
        let total_pages = if per_page > 0 {
            (total + per_page - 1) / per_page
        } else {
            0
        };

        Self {
            total,
            page,
            per_page,
            total_pages,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pagination() {
        let p = Pagination::new(1, 10);
        assert_eq!(p.offset(), 0);
        assert_eq!(p.limit(), 10);

        let p = Pagination::new(3, 20);
        assert_eq!(p.offset(), 40);
        assert_eq!(p.limit(), 20);
    }

    #[test]
    fn test_pagination_bounds() {
        let p = Pagination::new(0, 10); // page 0 becomes 1
        assert_eq!(p.page, 1);

        let p = Pagination::new(1, 2000); // per_page capped at 1000
        assert_eq!(p.per_page, 1000);
    }

    #[test]
    fn test_pagination_meta() {
        let meta = PaginationMeta::new(95, 1, 10);
        assert_eq!(meta.total_pages, 10);

        let meta = PaginationMeta::new(101, 1, 10);
        assert_eq!(meta.total_pages, 11);
    }
}
