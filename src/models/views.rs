//! Read views produced by the aggregation layer. Each one embeds a stored
//! document and adds the derived or joined fields.

use serde::{Deserialize, Serialize};

use super::{BookedClass, Class, Payment, User};

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PopularClass {
    #[serde(flatten)]
    pub class: Class,
    pub enrolled_students: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct InstructorSummary {
    #[serde(flatten)]
    pub instructor: User,
    #[serde(default)]
    pub classes: Vec<Class>,
    #[serde(default)]
    pub total_students: i64,
}

/// `class_info` holds the joined class, or nothing when the reference dangles.
#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookedClassView {
    #[serde(flatten)]
    pub booking: BookedClass,
    #[serde(default)]
    pub class_info: Vec<Class>,
}

#[derive(Debug, Clone, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PaymentView {
    #[serde(flatten)]
    pub payment: Payment,
    #[serde(default)]
    pub class_info: Vec<Class>,
}
