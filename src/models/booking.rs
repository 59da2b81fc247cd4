use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

/// A student's seat reservation. `class_id` holds the class `_id` as hex.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookedClass {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::hex_id::serialize"
    )]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub student_email: String,
    pub class_id: String,
    #[serde(default)]
    pub booked_at: i64,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    pub student_email: String,
    pub class_id: String,
}

impl CreateBookingRequest {
    pub fn into_booking(self) -> Result<BookedClass, AppError> {
        if self.student_email.trim().is_empty() {
            return Err(AppError::Validation("studentEmail is required".into()));
        }
        let class_id = super::parse_object_id(&self.class_id)?;

        Ok(BookedClass {
            id: None,
            student_email: self.student_email.trim().to_string(),
            class_id: class_id.to_hex(),
            booked_at: chrono::Utc::now().timestamp(),
        })
    }
}
