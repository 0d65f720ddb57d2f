//! SLA configuration handlers
//!
//! HTTP handlers for SLA config administration. SLA configs are looked up
//! fresh per classification, so no cache invalidation is needed here.

use crate::dto::sla::{SlaConfigCreateRequest, SlaConfigResponse, SlaConfigUpdateRequest};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use fibreflow_core::traits::Repository;
use fibreflow_core::AppError;
use fibreflow_db::PgSlaConfigRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// List SLA configs with pagination
///
/// GET /api/v1/sla-configs
#[instrument(skip(pool))]
pub async fn list_sla_configs(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(page = query.page, per_page = query.per_page, "Listing SLA configs");

    let repo = PgSlaConfigRepository::new(pool.get_ref().clone());
    let configs = repo.find_all(query.limit(), query.offset()).await?;
    let total = repo.count().await?;

    let response_data: Vec<SlaConfigResponse> = configs.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a new SLA config
///
/// POST /api/v1/sla-configs
#[instrument(skip(pool, req))]
pub async fn create_sla_config(
    pool: web::Data<PgPool>,
    req: web::Json<SlaConfigCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("SLA config creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let sla_config = req.to_sla_config();
    if !sla_config.targets_consistent() {
        return Err(AppError::Validation(
            "Response target must not exceed resolution target".to_string(),
        ));
    }

    debug!(name = %req.name, "Creating SLA config");

    let repo = PgSlaConfigRepository::new(pool.get_ref().clone());
    let created = repo.create(&sla_config).await?;

    info!(id = %created.id, name = %created.name, "SLA config created");

    let response = SlaConfigResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(response, "SLA config created")))
}

/// Get a single SLA config by ID
///
/// GET /api/v1/sla-configs/{id}
#[instrument(skip(pool))]
pub async fn get_sla_config(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let sla_id = path.into_inner();
    debug!(id = %sla_id, "Getting SLA config");

    let repo = PgSlaConfigRepository::new(pool.get_ref().clone());
    let config = repo
        .find_by_id(sla_id)
        .await?
        .ok_or_else(|| AppError::SlaConfigNotFound(sla_id.to_string()))?;

    let response = SlaConfigResponse::from(config);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Update an SLA config
///
/// PUT /api/v1/sla-configs/{id}
#[instrument(skip(pool, req))]
pub async fn update_sla_config(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
    req: web::Json<SlaConfigUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("SLA config update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let sla_id = path.into_inner();
    debug!(id = %sla_id, "Updating SLA config");

    let repo = PgSlaConfigRepository::new(pool.get_ref().clone());
    let mut config = repo
        .find_by_id(sla_id)
        .await?
        .ok_or_else(|| AppError::SlaConfigNotFound(sla_id.to_string()))?;

    if let Some(ref name) = req.name {
        config.name = name.clone();
    }
    if let Some(response_target) = req.response_target_minutes {
        config.response_target_minutes = response_target;
    }
    if let Some(resolution_target) = req.resolution_target_minutes {
        config.resolution_target_minutes = resolution_target;
    }

    if !config.targets_consistent() {
        return Err(AppError::Validation(
            "Response target must not exceed resolution target".to_string(),
        ));
    }

    let updated = repo.update(&config).await?;

    info!(id = %updated.id, "SLA config updated");

    let response = SlaConfigResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(response, "SLA config updated")))
}

/// Delete an SLA config
///
/// DELETE /api/v1/sla-configs/{id}
#[instrument(skip(pool))]
pub async fn delete_sla_config(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let sla_id = path.into_inner();
    debug!(id = %sla_id, "Deleting SLA config");

    let repo = PgSlaConfigRepository::new(pool.get_ref().clone());
    let deleted = repo.delete(sla_id).await?;

    if !deleted {
        return Err(AppError::SlaConfigNotFound(sla_id.to_string()));
    }

    info!(id = %sla_id, "SLA config deleted");

    Ok(HttpResponse::NoContent().finish())
}

/// Configure SLA config routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/sla-configs")
            .route("", web::get().to(list_sla_configs))
            .route("", web::post().to(create_sla_config))
            .route("/{id}", web::get().to(get_sla_config))
            .route("/{id}", web::put().to(update_sla_config))
            .route("/{id}", web::delete().to(delete_sla_config)),
    );
}
