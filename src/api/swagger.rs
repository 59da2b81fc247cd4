use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ninja School API",
        version = "1.0.0",
        description = "Class booking backend: browse classes and instructors, book classes, pay, and moderate submissions.\n\n**Authentication:** protected endpoints take a JWT Bearer token from `POST /jwt`, valid for one hour. Moderation endpoints additionally require the `admin` role."
    ),
    paths(
        // Auth & users
        crate::api::auth::issue_token,
        crate::api::users::get_user,
        crate::api::users::create_user,

        // Classes
        crate::api::classes::get_approved_classes,
        crate::api::classes::get_all_classes,
        crate::api::classes::get_popular_classes,
        crate::api::classes::get_instructor_classes,
        crate::api::classes::create_class,
        crate::api::classes::update_class_status,
        crate::api::classes::set_class_feedback,
        crate::api::classes::decrement_seat,

        // Bookings
        crate::api::bookings::create_booking,
        crate::api::bookings::get_booked_classes,
        crate::api::bookings::delete_booking,

        // Instructors
        crate::api::instructors::get_instructors,
        crate::api::instructors::get_popular_instructors,

        // Payments
        crate::api::payments::create_payment_intent,
        crate::api::payments::record_payment,
        crate::api::payments::get_payments,

        // Health
        crate::api::health::health_check,
    ),
    components(
        schemas(
            crate::services::auth_service::IssueTokenRequest,
            crate::services::auth_service::TokenResponse,
            crate::models::User,
            crate::models::Role,
            crate::models::CreateUserRequest,
            crate::models::Class,
            crate::models::ClassStatus,
            crate::models::CreateClassRequest,
            crate::models::UpdateStatusRequest,
            crate::models::FeedbackRequest,
            crate::models::BookedClass,
            crate::models::CreateBookingRequest,
            crate::models::Payment,
            crate::models::RecordPaymentRequest,
            crate::models::PaymentIntentRequest,
            crate::models::PaymentIntentResponse,
            crate::models::SortOrder,
            crate::models::PopularClass,
            crate::models::InstructorSummary,
            crate::models::BookedClassView,
            crate::models::PaymentView,
            crate::models::InsertOutcome,
            crate::models::UpdateOutcome,
            crate::api::health::HealthResponse,
        )
    ),
    tags(
        (name = "Auth", description = "Token issuance."),
        (name = "Users", description = "User lookup and first sign-in registration."),
        (name = "Classes", description = "Class catalog, moderation, and seat capacity."),
        (name = "Bookings", description = "Student bookings joined with class details."),
        (name = "Instructors", description = "Instructors with their classes and enrollment totals."),
        (name = "Payments", description = "Card payment intents and payment history."),
        (name = "Health", description = "Service health."),
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Token from POST /jwt"))
                        .build(),
                ),
            );
        }
    }
}
