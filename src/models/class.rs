use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

use crate::utils::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ClassStatus {
    #[default]
    Pending,
    Approved,
    Denied,
}

impl ClassStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClassStatus::Pending => "pending",
            ClassStatus::Approved => "approved",
            ClassStatus::Denied => "denied",
        }
    }
}

/// A class offered by an instructor. Enrollment is never stored, see [`Class::enrolled_students`].
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Class {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::hex_id::serialize"
    )]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default)]
    pub instructor_name: String,
    pub instructor_email: String,
    #[serde(default)]
    pub price: f64,
    pub total_seats: i64,
    pub available_seats: i64,
    #[serde(default)]
    pub status: ClassStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub feedback: Option<String>,
}

impl Class {
    pub fn enrolled_students(&self) -> i64 {
        self.total_seats - self.available_seats
    }
}

/// Submission from an instructor. Every new class starts pending with all seats free.
#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateClassRequest {
    pub title: String,
    pub image: Option<String>,
    #[serde(default)]
    pub instructor_name: String,
    pub instructor_email: String,
    #[serde(default)]
    pub price: f64,
    pub total_seats: i64,
}

impl CreateClassRequest {
    pub fn into_class(self) -> Result<Class, AppError> {
        if self.title.trim().is_empty() {
            return Err(AppError::Validation("class title is required".into()));
        }
        if self.instructor_email.trim().is_empty() {
            return Err(AppError::Validation("instructorEmail is required".into()));
        }
        if self.total_seats < 0 {
            return Err(AppError::Validation(format!(
                "totalSeats must be >= 0, got {}",
                self.total_seats
            )));
        }
        if !self.price.is_finite() || self.price < 0.0 {
            return Err(AppError::Validation(format!("invalid price: {}", self.price)));
        }

        Ok(Class {
            id: None,
            title: self.title.trim().to_string(),
            image: self.image,
            instructor_name: self.instructor_name,
            instructor_email: self.instructor_email.trim().to_string(),
            price: self.price,
            total_seats: self.total_seats,
            available_seats: self.total_seats,
            status: ClassStatus::Pending,
            feedback: None,
        })
    }
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct UpdateStatusRequest {
    pub status: ClassStatus,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct FeedbackRequest {
    pub feedback: String,
}
