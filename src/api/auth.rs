use actix_web::{web, HttpResponse};

use crate::services::auth_service::{IssueTokenRequest, JwtService, TokenResponse};
use crate::utils::AppError;

/// Signs whatever identity the client presents. See DESIGN.md on why the
/// email is not checked against `users` here.
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "Auth",
    request_body = IssueTokenRequest,
    responses(
        (status = 200, description = "Signed token valid for one hour", body = TokenResponse),
        (status = 400, description = "Payload without an email")
    )
)]
pub async fn issue_token(
    jwt: web::Data<JwtService>,
    request: web::Json<IssueTokenRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("🔐 POST /jwt - email: {}", request.email);

    let token = jwt.issue(request.into_inner())?;
    Ok(HttpResponse::Ok().json(TokenResponse { token }))
}
