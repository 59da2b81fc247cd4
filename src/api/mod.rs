pub mod auth;
pub mod bookings;
pub mod classes;
pub mod health;
pub mod instructors;
pub mod payments;
pub mod swagger;
pub mod users;

use actix_web::{guard, web};
use std::fmt::Display;

use crate::middleware::{AuthMiddleware, RequireRole};
use crate::utils::AppError;

/// Extractor failures (bad JSON, query or path) answer with the same
/// `{"success":false,"error":..}` body as every other error.
fn invalid_input(err: impl Display) -> actix_web::Error {
    AppError::Validation(err.to_string()).into()
}

/// Full route table. Expects `Data<dyn Store>`, `Data<JwtService>` and
/// `Data<dyn PaymentGateway>` to be registered on the app.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(|err, _| invalid_input(err)))
        .app_data(web::QueryConfig::default().error_handler(|err, _| invalid_input(err)))
        .app_data(web::PathConfig::default().error_handler(|err, _| invalid_input(err)));

    cfg
        // Health check
        .route("/health", web::get().to(health::health_check))
        // Auth
        .route("/jwt", web::post().to(auth::issue_token))
        // Users
        .service(
            web::scope("/users")
                .route("", web::post().to(users::create_user))
                .route("/{email}", web::get().to(users::get_user)),
        )
        // Classes
        .service(
            web::scope("/classes")
                .route("", web::get().to(classes::get_approved_classes))
                .route("", web::post().to(classes::create_class))
                .route("/all", web::get().to(classes::get_all_classes))
                .route("/popular", web::get().to(classes::get_popular_classes))
                .service(
                    web::resource("/instructor/{email}")
                        .wrap(AuthMiddleware)
                        .route(web::get().to(classes::get_instructor_classes)),
                )
                // Admin only: role gate runs after token verification
                .service(
                    web::resource("/{id}/status")
                        .wrap(RequireRole::admin())
                        .wrap(AuthMiddleware)
                        .route(web::patch().to(classes::update_class_status)),
                )
                .service(
                    web::resource("/{id}/feedback")
                        .wrap(RequireRole::admin())
                        .wrap(AuthMiddleware)
                        .route(web::patch().to(classes::set_class_feedback)),
                )
                .service(
                    web::resource("/{id}/seats")
                        .wrap(AuthMiddleware)
                        .route(web::patch().to(classes::decrement_seat)),
                ),
        )
        // Bookings
        .service(
            web::scope("/booked-classes")
                .route("", web::post().to(bookings::create_booking))
                .service(
                    web::resource("/{id}")
                        .guard(guard::Delete())
                        .wrap(AuthMiddleware)
                        .route(web::delete().to(bookings::delete_booking)),
                )
                .route("/{email}", web::get().to(bookings::get_booked_classes)),
        )
        // Instructors
        .service(
            web::scope("/instructors")
                .route("", web::get().to(instructors::get_instructors))
                .route("/popular", web::get().to(instructors::get_popular_instructors)),
        )
        // Payments: every endpoint requires a token
        .service(
            web::resource("/create-payment-intent")
                .wrap(AuthMiddleware)
                .route(web::post().to(payments::create_payment_intent)),
        )
        .service(
            web::scope("/payments")
                .wrap(AuthMiddleware)
                .route("", web::post().to(payments::record_payment))
                .route("/{email}", web::get().to(payments::get_payments)),
        );
}
