pub mod booking;
pub mod class;
pub mod payment;
pub mod user;
pub mod views;

pub use booking::*;
pub use class::*;
pub use payment::*;
pub use user::*;
pub use views::*;

use mongodb::bson::oid::ObjectId;
use serde::{Deserialize, Serialize};

/// Result of a single-document insert, shaped like the driver's own result.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InsertOutcome {
    pub acknowledged: bool,
    pub inserted_id: String,
}

impl InsertOutcome {
    pub fn new(inserted_id: String) -> Self {
        InsertOutcome {
            acknowledged: true,
            inserted_id,
        }
    }
}

/// Result of a single-document update. `matched_count == 0` means no row matched the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub matched_count: u64,
    pub modified_count: u64,
}

impl UpdateOutcome {
    pub fn matched(&self) -> bool {
        self.matched_count > 0
    }
}

/// Stored documents keep a native ObjectId; API responses carry it as a hex string.
pub(crate) mod hex_id {
    use super::ObjectId;
    use serde::Serializer;

    pub fn serialize<S>(id: &Option<ObjectId>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match id {
            Some(id) => serializer.serialize_str(&id.to_hex()),
            None => serializer.serialize_none(),
        }
    }
}

/// Parses a path or body id, reporting a validation error for anything that is not 24 hex digits.
pub fn parse_object_id(raw: &str) -> Result<ObjectId, crate::utils::AppError> {
    Ok(ObjectId::parse_str(raw.trim())?)
}
