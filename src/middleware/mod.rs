pub mod auth;
pub mod role;
pub mod security_headers;

pub use auth::AuthMiddleware;
pub use role::RequireRole;
pub use security_headers::SecurityHeaders;
