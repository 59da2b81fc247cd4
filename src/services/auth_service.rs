use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::database::Store;
use crate::models::{Role, User};
use crate::utils::AppError;

/// Credentials are valid for one hour from issuance.
pub const TOKEN_TTL_SECS: i64 = 60 * 60;

const RESERVED_CLAIMS: [&str; 4] = ["email", "iat", "exp", "jti"];

// JWT Claims
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    pub email: String,
    /// Whatever else the caller put in the payload at issuance.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
    pub iat: usize, // issued at
    pub exp: usize, // expiration
    pub jti: String, // JWT ID
}

/// Identity payload to sign. Only `email` is required; other fields ride along.
#[derive(Debug, Clone, Deserialize, utoipa::ToSchema)]
pub struct IssueTokenRequest {
    pub email: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Signs and verifies HS256 bearer tokens with the configured secret.
#[derive(Clone)]
pub struct JwtService {
    secret: String,
}

impl JwtService {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Signs the payload as given. The caller's claim to `email` is not checked
    /// against stored users here.
    pub fn issue(&self, request: IssueTokenRequest) -> Result<String, AppError> {
        self.issue_at(request, Utc::now())
    }

    fn issue_at(&self, request: IssueTokenRequest, now: DateTime<Utc>) -> Result<String, AppError> {
        let email = request.email.trim().to_string();
        if email.is_empty() {
            return Err(AppError::Validation("email is required".into()));
        }

        let mut extra = request.extra;
        for key in RESERVED_CLAIMS {
            extra.remove(key);
        }

        let claims = Claims {
            email,
            extra,
            iat: now.timestamp() as usize,
            exp: (now + Duration::seconds(TOKEN_TTL_SECS)).timestamp() as usize,
            jti: Uuid::new_v4().to_string(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.secret.as_bytes()),
        )
        .map_err(signing_failed)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, AppError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.leeway = 0;
        validation.validate_aud = false;
        validation.set_required_spec_claims(&["exp"]);

        let data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.secret.as_bytes()),
            &validation,
        )?;
        Ok(data.claims)
    }
}

/// Signing only fails on a broken key setup, never on caller input.
fn signing_failed(e: jsonwebtoken::errors::Error) -> AppError {
    AppError::Internal(format!("failed to sign token: {}", e))
}

/// Looks up the caller and fails with `Forbidden` unless their stored role is `required`.
pub async fn require_role(store: &dyn Store, email: &str, required: Role) -> Result<User, AppError> {
    match store.find_user(email).await? {
        Some(user) if user.role == required => Ok(user),
        Some(user) => Err(AppError::Forbidden(format!(
            "{} role required, {} has role {}",
            required, email, user.role
        ))),
        None => Err(AppError::Forbidden(format!("no user registered for {}", email))),
    }
}
