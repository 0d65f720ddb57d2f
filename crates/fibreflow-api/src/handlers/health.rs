//! Health check handler

use actix_web::{web, HttpResponse};
use fibreflow_cache::RedisCache;
use sqlx::PgPool;
use tracing::warn;

/// Health check with dependency probes
///
/// GET /api/v1/health
pub async fn health_check(
    pool: web::Data<PgPool>,
    cache: web::Data<RedisCache>,
) -> HttpResponse {
    let database_ok = sqlx::query("SELECT 1")
        .execute(pool.get_ref())
        .await
        .map_err(|e| warn!("Health check: database probe failed: {}", e))
        .is_ok();

    let cache_ok = cache
        .ping()
        .await
        .map_err(|e| warn!("Health check: redis probe failed: {}", e))
        .is_ok();

    let status = if database_ok && cache_ok {
        "healthy"
    } else {
        "degraded"
    };

    HttpResponse::Ok().json(serde_json::json!({
        "status": status,
        "service": "fibreflow-billing",
        "version": env!("CARGO_PKG_VERSION"),
        "database": database_ok,
        "cache": cache_ok,
    }))
}

/// Configure health routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check));
}
