use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{parse_object_id, BookedClassView, CreateBookingRequest, InsertOutcome};
use crate::services::Claims;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/booked-classes",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    responses(
        (status = 201, description = "Booking stored", body = InsertOutcome),
        (status = 400, description = "Invalid booking data")
    )
)]
pub async fn create_booking(
    store: web::Data<dyn Store>,
    request: web::Json<CreateBookingRequest>,
) -> Result<HttpResponse, AppError> {
    let booking = request.into_inner().into_booking()?;
    log::info!("📌 POST /booked-classes - {} -> {}", booking.student_email, booking.class_id);

    let id = store.insert_booking(booking).await?;
    Ok(HttpResponse::Created().json(InsertOutcome::new(id)))
}

#[utoipa::path(
    get,
    path = "/booked-classes/{email}",
    tag = "Bookings",
    params(("email" = String, Path, description = "Student email")),
    responses((status = 200, description = "Bookings joined with their class", body = [BookedClassView]))
)]
pub async fn get_booked_classes(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    log::info!("📌 GET /booked-classes/{}", email);

    Ok(HttpResponse::Ok().json(store.booked_classes(&email).await?))
}

#[utoipa::path(
    delete,
    path = "/booked-classes/{id}",
    tag = "Bookings",
    params(("id" = String, Path, description = "Booking id")),
    responses(
        (status = 200, description = "Booking removed"),
        (status = 404, description = "No such booking")
    ),
    security(("bearer_auth" = []))
)]
pub async fn delete_booking(
    store: web::Data<dyn Store>,
    user: web::ReqData<Claims>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let id = parse_object_id(&path)?;
    log::info!("🗑️  DELETE /booked-classes/{} (by {})", id, user.email);

    match store.delete_booking(id).await? {
        0 => Err(AppError::NotFound(format!("booking {}", id))),
        deleted => Ok(HttpResponse::Ok().json(serde_json::json!({
            "acknowledged": true,
            "deletedCount": deleted
        }))),
    }
}
