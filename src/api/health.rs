use actix_web::{web, HttpResponse};
use serde::Serialize;

use crate::database::Store;

#[derive(Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
    /// `mongodb` or `memory`
    pub store: &'static str,
    pub timestamp: i64,
}

/// Liveness only: the store is named, not pinged.
#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses((status = 200, description = "Service is up", body = HealthResponse))
)]
pub async fn health_check(store: web::Data<dyn Store>) -> HttpResponse {
    HttpResponse::Ok().json(HealthResponse {
        status: "ok",
        service: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        store: store.backend(),
        timestamp: chrono::Utc::now().timestamp(),
    })
}
