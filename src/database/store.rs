use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;

use crate::models::{
    BookedClass, BookedClassView, Class, ClassStatus, InstructorSummary, Payment, PaymentView,
    PopularClass, SortOrder, UpdateOutcome, User, UserInsert,
};
use crate::utils::AppError;

/// Typed access to the four collections plus the derived read views.
///
/// Handlers receive one shared instance for the lifetime of the process. Every
/// view that needs a join is answered by the store in a single round trip.
#[async_trait]
pub trait Store: Send + Sync {
    /// Short backend name, reported by the health check.
    fn backend(&self) -> &'static str;

    // users
    async fn find_user(&self, email: &str) -> Result<Option<User>, AppError>;
    async fn insert_user(&self, user: User) -> Result<UserInsert, AppError>;

    // classes
    async fn insert_class(&self, class: Class) -> Result<String, AppError>;
    async fn approved_classes(&self) -> Result<Vec<Class>, AppError>;
    async fn all_classes(&self) -> Result<Vec<Class>, AppError>;
    async fn classes_by_instructor(&self, email: &str) -> Result<Vec<Class>, AppError>;
    async fn set_class_status(&self, id: ObjectId, status: ClassStatus) -> Result<UpdateOutcome, AppError>;
    async fn set_class_feedback(&self, id: ObjectId, feedback: &str) -> Result<UpdateOutcome, AppError>;
    /// Atomically takes one seat. Matches nothing when the class is missing or already full.
    async fn decrement_seat(&self, id: ObjectId) -> Result<UpdateOutcome, AppError>;

    // bookings
    async fn insert_booking(&self, booking: BookedClass) -> Result<String, AppError>;
    /// Returns the number of deleted bookings (0 or 1).
    async fn delete_booking(&self, id: ObjectId) -> Result<u64, AppError>;

    // payments
    async fn insert_payment(&self, payment: Payment) -> Result<String, AppError>;

    // aggregations
    async fn popular_classes(&self, limit: usize) -> Result<Vec<PopularClass>, AppError>;
    async fn instructors(&self) -> Result<Vec<InstructorSummary>, AppError>;
    async fn popular_instructors(&self, limit: usize) -> Result<Vec<InstructorSummary>, AppError>;
    async fn booked_classes(&self, student_email: &str) -> Result<Vec<BookedClassView>, AppError>;
    async fn payments(&self, user_email: &str, order: SortOrder) -> Result<Vec<PaymentView>, AppError>;
}
