use actix_web::{web, HttpResponse};

use crate::database::Store;
use crate::models::{
    InsertOutcome, PaymentIntentRequest, PaymentIntentResponse, PaymentView, PaymentsQuery,
    RecordPaymentRequest,
};
use crate::services::payment_service::{to_minor_units, PaymentGateway};
use crate::services::Claims;
use crate::utils::AppError;

#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "Payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret for the new intent", body = PaymentIntentResponse),
        (status = 502, description = "Payment provider failure")
    ),
    security(("bearer_auth" = []))
)]
pub async fn create_payment_intent(
    gateway: web::Data<dyn PaymentGateway>,
    user: web::ReqData<Claims>,
    request: web::Json<PaymentIntentRequest>,
) -> Result<HttpResponse, AppError> {
    log::info!("💳 POST /create-payment-intent - {} for {}", request.price, user.email);

    let amount = to_minor_units(request.price)?;
    let client_secret = gateway.create_payment_intent(amount).await?;

    Ok(HttpResponse::Ok().json(PaymentIntentResponse { client_secret }))
}

#[utoipa::path(
    post,
    path = "/payments",
    tag = "Payments",
    request_body = RecordPaymentRequest,
    responses(
        (status = 201, description = "Payment recorded", body = InsertOutcome),
        (status = 400, description = "Invalid payment data")
    ),
    security(("bearer_auth" = []))
)]
pub async fn record_payment(
    store: web::Data<dyn Store>,
    request: web::Json<RecordPaymentRequest>,
) -> Result<HttpResponse, AppError> {
    let payment = request.into_inner().into_payment()?;
    log::info!("💰 POST /payments - {} paid {} for {}", payment.user_email, payment.amount, payment.class_id);

    let id = store.insert_payment(payment).await?;
    Ok(HttpResponse::Created().json(InsertOutcome::new(id)))
}

#[utoipa::path(
    get,
    path = "/payments/{email}",
    tag = "Payments",
    params(("email" = String, Path, description = "Payer email")),
    responses(
        (status = 200, description = "Payments joined with their class", body = [PaymentView])
    ),
    security(("bearer_auth" = []))
)]
pub async fn get_payments(
    store: web::Data<dyn Store>,
    path: web::Path<String>,
    query: web::Query<PaymentsQuery>,
) -> Result<HttpResponse, AppError> {
    let email = path.into_inner();
    let order = query.sort.unwrap_or_default();
    log::info!("💰 GET /payments/{} ({:?})", email, order);

    Ok(HttpResponse::Ok().json(store.payments(&email, order).await?))
}
