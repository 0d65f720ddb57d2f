//! Fee schedule handlers
//!
//! HTTP handlers for fee schedule administration. Fee schedule lookups are
//! not cached, so mutations need no invalidation.

use crate::dto::fee_schedule::{
    FeeScheduleCreateRequest, FeeScheduleResponse, FeeScheduleUpdateRequest,
};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use fibreflow_core::traits::Repository;
use fibreflow_core::AppError;
use fibreflow_db::PgFeeScheduleRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// List fee schedule entries with pagination
///
/// GET /api/v1/fee-schedules
#[instrument(skip(pool))]
pub async fn list_fee_schedules(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        page = query.page,
        per_page = query.per_page,
        "Listing fee schedule entries"
    );

    let repo = PgFeeScheduleRepository::new(pool.get_ref().clone());
    let entries = repo.find_all(query.limit(), query.offset()).await?;
    let total = repo.count().await?;

    let response_data: Vec<FeeScheduleResponse> = entries.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a new fee schedule entry
///
/// POST /api/v1/fee-schedules
#[instrument(skip(pool, req))]
pub async fn create_fee_schedule(
    pool: web::Data<PgPool>,
    req: web::Json<FeeScheduleCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Fee schedule creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    if req.base_fee.is_sign_negative() {
        return Err(AppError::Validation(
            "base_fee must not be negative".to_string(),
        ));
    }

    debug!("Creating fee schedule entry");

    let repo = PgFeeScheduleRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_entry()).await?;

    info!(id = %created.id, "Fee schedule entry created");

    let response = FeeScheduleResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(
        response,
        "Fee schedule entry created",
    )))
}

/// Get a single fee schedule entry by ID
///
/// GET /api/v1/fee-schedules/{id}
#[instrument(skip(pool))]
pub async fn get_fee_schedule(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let entry_id = path.into_inner();
    debug!(id = %entry_id, "Getting fee schedule entry");

    let repo = PgFeeScheduleRepository::new(pool.get_ref().clone());
    let entry = repo
        .find_by_id(entry_id)
        .await?
        .ok_or_else(|| AppError::FeeScheduleNotFound(entry_id.to_string()))?;

    let response = FeeScheduleResponse::from(entry);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Update a fee schedule entry's pricing fields
///
/// PUT /api/v1/fee-schedules/{id}
///
/// Scope fields are immutable; re-scoping means creating a new entry so the
/// newest-wins tie-break stays meaningful.
#[instrument(skip(pool, req))]
pub async fn update_fee_schedule(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<FeeScheduleUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Fee schedule update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let entry_id = path.into_inner();
    debug!(id = %entry_id, "Updating fee schedule entry");

    let repo = PgFeeScheduleRepository::new(pool.get_ref().clone());
    let mut entry = repo
        .find_by_id(entry_id)
        .await?
        .ok_or_else(|| AppError::FeeScheduleNotFound(entry_id.to_string()))?;

    if let Some(base_fee) = req.base_fee {
        if base_fee.is_sign_negative() {
            return Err(AppError::Validation(
                "base_fee must not be negative".to_string(),
            ));
        }
        entry.base_fee = base_fee;
    }
    if let Some(hourly_rate) = req.hourly_rate {
        entry.hourly_rate = Some(hourly_rate);
    }
    if let Some(travel_fee) = req.travel_fee {
        entry.travel_fee = Some(travel_fee);
    }

    let updated = repo.update(&entry).await?;

    info!(id = %updated.id, "Fee schedule entry updated");

    let response = FeeScheduleResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(
        response,
        "Fee schedule entry updated",
    )))
}

/// Delete a fee schedule entry
///
/// DELETE /api/v1/fee-schedules/{id}
#[instrument(skip(pool))]
pub async fn delete_fee_schedule(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let entry_id = path.into_inner();
    debug!(id = %entry_id, "Deleting fee schedule entry");

    let repo = PgFeeScheduleRepository::new(pool.get_ref().clone());
    let deleted = repo.delete(entry_id).await?;

    if !deleted {
        return Err(AppError::FeeScheduleNotFound(entry_id.to_string()));
    }

    info!(id = %entry_id, "Fee schedule entry deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure fee schedule routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/fee-schedules")
            .route("", web::get().to(list_fee_schedules))
            .route("", web::post().to(create_fee_schedule))
            .route("/{id}", web::get().to(get_fee_schedule))
            .route("/{id}", web::put().to(update_fee_schedule))
            .route("/{id}", web::delete().to(delete_fee_schedule)),
    );
}
