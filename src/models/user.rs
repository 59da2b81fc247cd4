use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::utils::AppError;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    Student,
    Instructor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Student => "student",
            Role::Instructor => "instructor",
            Role::Admin => "admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Platform user, looked up by email.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    #[serde(
        rename = "_id",
        default,
        skip_serializing_if = "Option::is_none",
        serialize_with = "super::hex_id::serialize"
    )]
    #[schema(value_type = Option<String>)]
    pub id: Option<ObjectId>,
    pub email: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo: Option<String>,
    #[serde(default)]
    pub role: Role,
}

#[derive(Debug, Deserialize, utoipa::ToSchema)]
pub struct CreateUserRequest {
    pub email: String,
    #[serde(default)]
    pub name: String,
    pub photo: Option<String>,
}

impl CreateUserRequest {
    /// New users always start as students; roles are granted elsewhere.
    pub fn into_user(self) -> Result<User, AppError> {
        let email = self.email.trim().to_string();
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::Validation(format!("'{}' is not a valid email", email)));
        }

        Ok(User {
            id: None,
            email,
            name: self.name.trim().to_string(),
            photo: self.photo,
            role: Role::Student,
        })
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum UserInsert {
    Created(String),
    AlreadyExists,
}
