use actix_web::{web, HttpResponse};

use super::classes::POPULAR_LIMIT;
use crate::database::Store;
use crate::models::InstructorSummary;
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/instructors",
    tag = "Instructors",
    responses((status = 200, description = "Instructors with their classes", body = [InstructorSummary]))
)]
pub async fn get_instructors(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("🥋 GET /instructors");
    Ok(HttpResponse::Ok().json(store.instructors().await?))
}

#[utoipa::path(
    get,
    path = "/instructors/popular",
    tag = "Instructors",
    responses((status = 200, description = "Top instructors by total students", body = [InstructorSummary]))
)]
pub async fn get_popular_instructors(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("🔥 GET /instructors/popular");
    Ok(HttpResponse::Ok().json(store.popular_instructors(POPULAR_LIMIT).await?))
}
