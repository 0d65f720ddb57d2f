//! Service contract handlers
//!
//! HTTP handlers for contract administration. Mutations invalidate the
//! project's cached lookups, same as the guarantee handlers.

use crate::dto::contract::{ContractCreateRequest, ContractResponse, ContractUpdateRequest};
use crate::dto::{ApiResponse, PaginationParams};
use actix_web::{web, HttpResponse};
use fibreflow_cache::RedisCache;
use fibreflow_core::traits::Repository;
use fibreflow_core::AppError;
use fibreflow_db::PgContractRepository;
use sqlx::PgPool;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

/// List contracts with pagination
///
/// GET /api/v1/contracts
#[instrument(skip(pool))]
pub async fn list_contracts(
    pool: web::Data<PgPool>,
    query: web::Query<PaginationParams>,
) -> Result<HttpResponse, AppError> {
    query.validate().map_err(|e| {
        warn!("Pagination validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(page = query.page, per_page = query.per_page, "Listing contracts");

    let repo = PgContractRepository::new(pool.get_ref().clone());
    let contracts = repo.find_all(query.limit(), query.offset()).await?;
    let total = repo.count().await?;

    let response_data: Vec<ContractResponse> = contracts.into_iter().map(Into::into).collect();

    Ok(HttpResponse::Ok().json(query.paginate(response_data, total)))
}

/// Create a new contract
///
/// POST /api/v1/contracts
#[instrument(skip(pool, cache, req))]
pub async fn create_contract(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    req: web::Json<ContractCreateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Contract creation validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(project_id = %req.project_id, "Creating contract");

    let repo = PgContractRepository::new(pool.get_ref().clone());
    let created = repo.create(&req.to_contract()).await?;

    info!(id = %created.id, project_id = %created.project_id, "Contract created");

    if let Err(e) = cache.invalidate_project(created.project_id).await {
        warn!(project_id = %created.project_id, "Cache invalidation failed: {}", e);
    }

    let response = ContractResponse::from(created);
    Ok(HttpResponse::Created().json(ApiResponse::with_message(response, "Contract created")))
}

/// Get a single contract by ID
///
/// GET /api/v1/contracts/{id}
#[instrument(skip(pool))]
pub async fn get_contract(
    pool: web::Data<PgPool>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let contract_id = path.into_inner();
    debug!(id = %contract_id, "Getting contract");

    let repo = PgContractRepository::new(pool.get_ref().clone());
    let contract = repo
        .find_by_id(contract_id)
        .await?
        .ok_or_else(|| AppError::ContractNotFound(contract_id.to_string()))?;

    let response = ContractResponse::from(contract);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Update a contract
///
/// PUT /api/v1/contracts/{id}
#[instrument(skip(pool, cache, req))]
pub async fn update_contract(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<Uuid>,
    req: web::Json<ContractUpdateRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Contract update validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    let contract_id = path.into_inner();
    debug!(id = %contract_id, "Updating contract");

    let repo = PgContractRepository::new(pool.get_ref().clone());
    let mut contract = repo
        .find_by_id(contract_id)
        .await?
        .ok_or_else(|| AppError::ContractNotFound(contract_id.to_string()))?;

    if let Some(ref name) = req.client_name {
        contract.client_name = Some(name.clone());
    }
    if let Some(active) = req.active {
        contract.active = active;
    }
    if let Some(expires_at) = req.expires_at {
        contract.expires_at = Some(expires_at);
    }
    if let Some(fee) = req.monthly_fee {
        contract.monthly_fee = fee;
    }
    if let Some(ref sla_ids) = req.sla_config_ids {
        contract.sla_config_ids = sla_ids.clone();
    }

    let updated = repo.update(&contract).await?;

    info!(id = %updated.id, "Contract updated");

    if let Err(e) = cache.invalidate_project(updated.project_id).await {
        warn!(project_id = %updated.project_id, "Cache invalidation failed: {}", e);
    }

    let response = ContractResponse::from(updated);
    Ok(HttpResponse::Ok().json(ApiResponse::with_message(response, "Contract updated")))
}

/// Delete a contract
///
/// DELETE /api/v1/contracts/{id}
#[instrument(skip(pool, cache))]
pub async fn delete_contract(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    let contract_id = path.into_inner();
    debug!(id = %contract_id, "Deleting contract");

    let repo = PgContractRepository::new(pool.get_ref().clone());
    let contract = repo
        .find_by_id(contract_id)
        .await?
        .ok_or_else(|| AppError::ContractNotFound(contract_id.to_string()))?;

    repo.delete(contract_id).await?;

    info!(id = %contract_id, "Contract deleted");

    if let Err(e) = cache.invalidate_project(contract.project_id).await {
        warn!(project_id = %contract.project_id, "Cache invalidation failed: {}", e);
    }

    Ok(HttpResponse::NoContent().finish())
}

/// Configure contract routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/contracts")
            .route("", web::get().to(list_contracts))
            .route("", web::post().to(create_contract))
            .route("/{id}", web::get().to(get_contract))
            .route("/{id}", web::put().to(update_contract))
            .route("/{id}", web::delete().to(delete_contract)),
    );
}
