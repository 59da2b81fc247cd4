use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{
    parse_object_id, Class, CreateClassRequest, FeedbackRequest, InsertOutcome, PopularClass,
    UpdateOutcome, UpdateStatusRequest,
};
use crate::services::Claims;
use crate::utils::AppError;

pub const POPULAR_LIMIT: usize = 6;

#[utoipa::path(
    get,
    path = "/classes",
    tag = "Classes",
    responses((status = 200, description = "Approved classes", body = [Class]))
)]
pub async fn get_approved_classes(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📚 GET /classes");
    Ok(HttpResponse::Ok().json(store.approved_classes().await?))
}

#[utoipa::path(
    get,
    path = "/classes/all",
    tag = "Classes",
    responses((status = 200, description = "Every class regardless of status", body = [Class]))
)]
pub async fn get_all_classes(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("📚 GET /classes/all");
    Ok(HttpResponse::Ok().json(store.all_classes().await?))
}

#[utoipa::path(
    get,
    path = "/classes/popular",
    tag = "Classes",
    responses((status = 200, description = "Top classes by enrolled students", body = [PopularClass]))
)]
pub async fn get_popular_classes(store: web::Data<dyn Store>) -> Result<HttpResponse, AppError> {
    log::info!("🔥 GET /classes/popular");
    Ok(HttpResponse::Ok().json(store.popular_classes(POPULAR_LIMIT).await?))
}

#[utoipa::path(
    get,
    path = "/classes/instructor/{email}",
    tag = "Classes",
    params(("email" = String, Path, description = "Instructor email")),
    responses(
        (status = 200, description = "Classes taught by the instructor", body = [Class]),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_instructor_classes(
    store: web::Data<dyn Store>,
    user: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    log::info!("📚 GET /classes/instructor/{} (by {})", email, user.email);

    Ok(HttpResponse::Ok().json(store.classes_by_instructor(&email).await?))
}

#[utoipa::path(
    post,
    path = "/classes",
    tag = "Classes",
    request_body = CreateClassRequest,
    responses(
        (status = 201, description = "Class submitted for review", body = InsertOutcome),
        (status = 400, description = "Invalid class data")
    )
)]
pub async fn create_class(
    store: web::Data<dyn Store>,
    request: web::Json<CreateClassRequest>,
) -> Result<HttpResponse, AppError> {
    let class = request.into_inner().into_class()?;
    log::info!("➕ POST /classes - '{}' by {}", class.title, class.instructor_email);

    let id = store.insert_class(class).await?;
    Ok(HttpResponse::Created().json(InsertOutcome::new(id)))
}

#[utoipa::path(
    patch,
    path = "/classes/{id}/status",
    tag = "Classes",
    params(("id" = String, Path, description = "Class id")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = UpdateOutcome),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such class")
    ),
    security(("bearer_auth" = []))
)]
pub async fn update_class_status(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<UpdateStatusRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🛡️  PATCH /classes/{}/status -> {}", id, request.status.as_str());

    let outcome = store.set_class_status(id, request.status).await?;
    if !outcome.matched() {
        return Err(AppError::NotFound(format!("class {}", id)));
    }
    Ok(HttpResponse::Ok().json(outcome))
}

#[utoipa::path(
    patch,
    path = "/classes/{id}/feedback",
    tag = "Classes",
    params(("id" = String, Path, description = "Class id")),
    request_body = FeedbackRequest,
    responses(
        (status = 200, description = "Feedback stored", body = UpdateOutcome),
        (status = 403, description = "Caller is not an admin"),
        (status = 404, description = "No such class")
    ),
    security(("bearer_auth" = []))
)]
pub async fn set_class_feedback(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    request: web::Json<FeedbackRequest>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🛡️  PATCH /classes/{}/feedback", id);

    let outcome = store.set_class_feedback(id, &request.feedback).await?;
    if !outcome.matched() {
        return Err(AppError::NotFound(format!("class {}", id)));
    }
    Ok(HttpResponse::Ok().json(outcome))
}

/// Takes one seat. The raw outcome is returned as-is: `matchedCount == 0`
/// means the class does not exist or is already full.
#[utoipa::path(
    patch,
    path = "/classes/{id}/seats",
    tag = "Classes",
    params(("id" = String, Path, description = "Class id")),
    responses(
        (status = 200, description = "Update outcome", body = UpdateOutcome),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearer_auth" = []))
)]
pub async fn decrement_seat(
    store: web::Data<dyn Store>,
    user: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🎟️  PATCH /classes/{}/seats (by {})", id, user.email);

    let outcome = store.decrement_seat(id).await?;
    if !outcome.matched() {
        log::warn!("⚠️  No seat taken for class {}: missing or full", id);
    }
    Ok(HttpResponse::Ok().json(outcome))
}
