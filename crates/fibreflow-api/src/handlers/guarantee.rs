//! Guarantee handlers
//!
//! HTTP handlers for guarantee administration. Every mutation drops the
//! project's cached billing lookups so the next classification sees fresh
//! records.

use crate::dto::guarantee::{GuaranteeCreateRequest, GuaranteeResponse, GuaranteeUpdateRequest};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use fibreflow_cache::RedisCache;
use fibreflow_core::traits::Repository;
use fibreflow_core::AppError;
use fibreflow_db::PgGuaranteeRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// List guarantees with pagination
///
/// GET /api/v1/guarantees
#[instrument(skip(pool))]
pub async fn list_guarantees(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(page = query.page, per_page = query.per_page, "Listing guarantees");

    let repo = PgGuaranteeRepository::new(pool.get_ref().clone());
    let guarantees = repo.find_all(query.limit(), query.offset()).await?;
    let total = repo.count().await?;

    let response_data: Vec<GuaranteeResponse> =
        guarantees.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a new guarantee
///
/// POST /api/v1/guarantees
#[instrument(skip(pool, cache, req))]
pub async fn create_guarantee(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<GuaranteeCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Guarantee creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(project_id = %req.project_id, "Creating guarantee");

    let repo = PgGuaranteeRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_guarantee()).await?;

    info!(id = %created.id, project_id = %created.project_id, "Guarantee created");

    if let Err(e) = cache.invalidate_project(created.project_id).await {
        warn!(project_id = %created.project_id, "Cache invalidation failed: {}", e);
    }

    let response = GuaranteeResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(response, "Guarantee created")))
}

/// Get a single guarantee by ID
///
/// GET /api/v1/guarantees/{id}
#[instrument(skip(pool))]
pub async fn get_guarantee(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let guarantee_id = path.into_inner();
    debug!(id = %guarantee_id, "Getting guarantee");

    let repo = PgGuaranteeRepository::new(pool.get_ref().clone());
    let guarantee = repo
        .find_by_id(guarantee_id)
        .await?
        .ok_or_else(|| AppError::GuaranteeNotFound(guarantee_id.to_string()))?;

    let response = GuaranteeResponse::from(guarantee);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Update a guarantee
///
/// PUT /api/v1/guarantees/{id}
#[instrument(skip(pool, cache, req))]
pub async fn update_guarantee(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<Uuid>,
    req: web::Json<GuaranteeUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Guarantee update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let guarantee_id = path.into_inner();
    debug!(id = %guarantee_id, "Updating guarantee");

    let repo = PgGuaranteeRepository::new(pool.get_ref().clone());
    let mut guarantee = repo
        .find_by_id(guarantee_id)
        .await?
        .ok_or_else(|| AppError::GuaranteeNotFound(guarantee_id.to_string()))?;

    if let Some(active) = req.active {
        guarantee.active = active;
    }
    if let Some(expires_at) = req.expires_at {
        guarantee.expires_at = Some(expires_at);
    }
    if let Some(limit) = req.incident_limit {
        guarantee.incident_limit = Some(limit);
    }
    if let Some(count) = req.incident_count {
        guarantee.incident_count = count;
    }
    if let Some(ref drops) = req.dr_numbers {
        guarantee.dr_numbers = Some(drops.clone());
    }
    if let Some(ref types) = req.service_types {
        guarantee.service_types = Some(types.clone());
    }

    let updated = repo.update(&guarantee).await?;

    info!(id = %updated.id, "Guarantee updated");

    if let Err(e) = cache.invalidate_project(updated.project_id).await {
        warn!(project_id = %updated.project_id, "Cache invalidation failed: {}", e);
    }

    let response = GuaranteeResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(response, "Guarantee updated")))
}

/// Delete a guarantee
///
/// DELETE /api/v1/guarantees/{id}
#[instrument(skip(pool, cache))]
pub async fn delete_guarantee(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let guarantee_id = path.into_inner();
    debug!(id = %guarantee_id, "Deleting guarantee");

    let repo = PgGuaranteeRepository::new(pool.get_ref().clone());
    let guarantee = repo
        .find_by_id(guarantee_id)
        .await?
        .ok_or_else(|| AppError::GuaranteeNotFound(guarantee_id.to_string()))?;

    repo.delete(guarantee_id).await?;

    info!(id = %guarantee_id, "Guarantee deleted");

    if let Err(e) = cache.invalidate_project(guarantee.project_id).await {
        warn!(project_id = %guarantee.project_id, "Cache invalidation failed: {}", e);
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Configure guarantee routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/guarantees")
            .route("", web::get().to(list_guarantees))
            .route("", web::post().to(create_guarantee))
            .route("/{id}", web::get().to(get_guarantee))
            .route("/{id}", web::put().to(update_guarantee))
            .route("/{id}", web::delete().to(delete_guarantee)),
    );
}
