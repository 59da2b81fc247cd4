//! Fixtures shared by the unit and HTTP tests.

use async_trait::async_trait;

use crate::models::{Class, ClassStatus, Role, User};
use crate::services::PaymentGateway;
use crate::utils::AppError;

/// An approved class with the given capacity.
pub fn class(title: &str, instructor_email: &str, total_seats: i64, available_seats: i64) -> Class {
    Class {
        id: None,
        title: title.to_string(),
        image: None,
        instructor_name: "Sensei".to_string(),
        instructor_email: instructor_email.to_string(),
        price: 25.0,
        total_seats,
        available_seats,
        status: ClassStatus::Approved,
        feedback: None,
    }
}

pub fn instructor(email: &str) -> User {
    User {
        id: None,
        email: email.to_string(),
        name: email.split('@').next().unwrap_or_default().to_string(),
        photo: None,
        role: Role::Instructor,
    }
}

pub fn user_with_role(email: &str, role: Role) -> User {
    User {
        role,
        ..instructor(email)
    }
}

/// Answers every intent with a deterministic secret derived from the amount.
pub struct FakeGateway;

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_payment_intent(&self, amount: i64) -> Result<String, AppError> {
        Ok(format!("pi_{}_secret_test", amount))
    }
}
