//! Billing classification handler
//!
//! The single read-only endpoint the ticket form calls to preview how a
//! ticket will be billed. Classification never mutates anything; persisting
//! the outcome is the ticket flow's job.

use crate::dto::billing::{ClassifyRequest, ClassifyResponse};
use crate::dto::ApiResponse;
use actix_web::{web, HttpResponse};
use fibreflow_cache::RedisCache;
use fibreflow_core::config::AppConfig;
use fibreflow_core::traits::ClassificationService;
use fibreflow_core::AppError;
use fibreflow_db::{
    PgContractRepository, PgFeeScheduleRepository, PgGuaranteeRepository, PgSlaConfigRepository,
};
use fibreflow_services::BillingClassifier;
use sqlx::PgPool;
use std::sync::Arc;
use tracing::{debug, instrument, warn};
use validator::Validate;

/// Classify a ticket's billing
///
/// POST /api/v1/billing/classify
#[instrument(skip(pool, cache, config, req))]
pub async fn classify(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
    config: web::Data<AppConfig>,
    req: web::Json<ClassifyRequest>,
) -> Result<HttpResponse, AppError> {
    req.validate().map_err(|e| {
        warn!("Classification request validation failed: {}", e);
        AppError::Validation(e.to_string())
    })?;

    debug!(
        project_id = %req.project_id,
        ticket_type = %req.ticket_type,
        priority = %req.priority,
        "Classifying ticket billing"
    );

    let classifier = BillingClassifier::with_config(
        Arc::new(PgGuaranteeRepository::new(pool.get_ref().clone())),
        Arc::new(PgContractRepository::new(pool.get_ref().clone())),
        Arc::new(PgSlaConfigRepository::new(pool.get_ref().clone())),
        Arc::new(PgFeeScheduleRepository::new(pool.get_ref().clone())),
        Arc::new(cache.get_ref().clone()),
        &config.billing,
    );

    let classification = classifier.classify(&req.to_billing_request()).await?;

    debug!(
        billing_type = %classification.billing_type,
        requires_approval = classification.requires_approval,
        "Classification complete"
    );

    let response = ClassifyResponse::from(classification);
    Ok(HttpResponse::Ok().json(ApiResponse::success(response)))
}

/// Configure billing routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(web::scope("/billing").route("/classify", web::post().to(classify)));
}
