use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// A completed payment. Immutable once recorded; `_id` doubles as the recency key.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Payment {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::hex_id::serialize"
    )]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub user_email: String,
    pub class_id: String,
    pub amount: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub created_at: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecordPaymentRequest {
    pub user_email: String,
    pub class_id: String,
    pub amount: f64,
    pub transaction_id: Option<String>,
}

impl RecordPaymentRequest {
    pub fn into_payment(self) -> Result<Payment, AppError> {
        if self.user_email.trim().is_empty() {
            return Err(AppError::Validation("userEmail is required".into()));
        }
        if !self.amount.is_finite() || self.amount < 0.0 {
            return Err(AppError::Validation(format!("invalid amount: {}", self.amount)));
        }
        let class_id = super::parse_object_id(&self.class_id)?;

        Ok(Payment {
            id: None,
            user_email: self.user_email.trim().to_string(),
            class_id: class_id.to_hex(),
            amount: self.amount,
            transaction_id: self.transaction_id,
            created_at: chrono::Utc::now().timestamp(),
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct PaymentIntentRequest {
    /// Price in major currency units (e.g. dollars).
    pub price: f64,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    /// Direction as used in a `$sort` stage.
    pub fn direction(&self) -> i32 {
        match self {
            SortOrder::Asc => 1,
            SortOrder::Desc => -1,
        }
    }
}

#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PaymentsQuery {
    /// `asc` (default) or `desc`, by insertion order.
    pub sort: Option<SortOrder>,
}
