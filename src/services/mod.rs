pub mod auth_service;
pub mod payment_service;

pub use auth_service::{require_role, Claims, JwtService};
pub use payment_service::{PaymentGateway, StripeGateway};
