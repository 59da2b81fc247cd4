use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{CreateUserRequest, InsertOutcome, User, UserInsert};
use crate::utils::AppError;

#[utoipa::path(
    get,
    path = "/users/{email}",
    tag = "Users",
    params(("email" = String, Path, description = "User email")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 404, description = "No user with that email")
    )
)]
pub async fn get_user(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    log::info!("👤 GET /users/{}", email);

    match store.find_user(&email).await? {
        Some(user) => Ok(HttpResponse::Ok().json(user)),
        None => Err(AppError::NotFound(format!("user {}", email))),
    }
}

/// Called on every sign-in; only the first call for an email stores anything.
#[utoipa::path(
    post,
    path = "/users",
    tag = "Users",
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = InsertOutcome),
        (status = 200, description = "User already exists")
    )
)]
pub async fn create_user(
    store: web::Data<dyn Store>,
    request: web::Json<CreateUserRequest>,
) -> Result<HttpResponse, AppError> {
    let user = request.into_inner().into_user()?;
    log::info!("📝 POST /users - email: {}", user.email);

    match store.insert_user(user).await? {
        UserInsert::Created(id) => Ok(HttpResponse::Created().json(InsertOutcome::new(id))),
        UserInsert::AlreadyExists => Ok(HttpResponse::Ok().json(serde_json::json!({
            "success": true,
            "message": "user already exists"
        }))),
    }
}
