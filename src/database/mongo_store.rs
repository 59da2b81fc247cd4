use async_trait::async_trait;
use futures::stream::TryStreamExt;
use mongodb::bson::{doc, oid::ObjectId, Document};
use mongodb::error::{ErrorKind, WriteFailure};
use mongodb::Collection;
use serde::de::DeserializeOwned;

use super::{pipelines, MongoDB, Store, BOOKED_CLASSES, CLASSES, PAYMENTS, USERS};
use crate::models::{
    BookedClass, BookedClassView, Class, ClassStatus, InstructorSummary, Payment, PaymentView,
    PopularClass, SortOrder, UpdateOutcome, User, UserInsert,
};
use crate::utils::AppError;

const DUPLICATE_KEY: i32 = 11000;

/// [`Store`] backed by MongoDB. Views run as aggregation pipelines server-side.
#[derive(Clone)]
pub struct MongoStore {
    db: MongoDB,
}

impl MongoStore {
    pub fn new(db: MongoDB) -> Self {
        Self { db }
    }

    fn users(&self) -> Collection<User> {
        self.db.collection(USERS)
    }

    fn classes(&self) -> Collection<Class> {
        self.db.collection(CLASSES)
    }

    async fn find_classes(&self, filter: Document) -> Result<Vec<Class>, AppError> {
        let cursor = self.classes().find(filter).await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update_class(&self, filter: Document, update: Document) -> Result<UpdateOutcome, AppError> {
        let result = self.classes().update_one(filter, update).await?;
        Ok(UpdateOutcome {
            matched_count: result.matched_count,
            modified_count: result.modified_count,
        })
    }

    async fn aggregate<T>(&self, collection: &str, pipeline: Vec<Document>) -> Result<Vec<T>, AppError>
    where
        T: DeserializeOwned + Unpin + Send + Sync,
    {
        let cursor = self
            .db
            .collection::<Document>(collection)
            .aggregate(pipeline)
            .await?;
        Ok(cursor.with_type::<T>().try_collect().await?)
    }
}

fn inserted_hex(id: &mongodb::bson::Bson) -> String {
    id.as_object_id().map(|oid| oid.to_hex()).unwrap_or_default()
}

fn is_duplicate_key(e: &mongodb::error::Error) -> bool {
    matches!(
        e.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(we)) if we.code == DUPLICATE_KEY
    )
}

#[async_trait]
impl Store for MongoStore {
    fn backend(&self) -> &'static str {
        "mongodb"
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, AppError> {
        Ok(self.users().find_one(doc! { "email": email }).await?)
    }

    async fn insert_user(&self, user: User) -> Result<UserInsert, AppError> {
        if self.find_user(&user.email).await?.is_some() {
            return Ok(UserInsert::AlreadyExists);
        }

        match self.users().insert_one(&user).await {
            Ok(result) => Ok(UserInsert::Created(inserted_hex(&result.inserted_id))),
            // lost a race against a concurrent sign-in for the same email
            Err(e) if is_duplicate_key(&e) => Ok(UserInsert::AlreadyExists),
            Err(e) => Err(e.into()),
        }
    }

    async fn insert_class(&self, class: Class) -> Result<String, AppError> {
        let result = self.classes().insert_one(&class).await?;
        Ok(inserted_hex(&result.inserted_id))
    }

    async fn approved_classes(&self) -> Result<Vec<Class>, AppError> {
        self.find_classes(doc! { "status": ClassStatus::Approved.as_str() }).await
    }

    async fn all_classes(&self) -> Result<Vec<Class>, AppError> {
        self.find_classes(doc! {}).await
    }

    async fn classes_by_instructor(&self, email: &str) -> Result<Vec<Class>, AppError> {
        self.find_classes(doc! { "instructorEmail": email }).await
    }

    async fn set_class_status(&self, id: ObjectId, status: ClassStatus) -> Result<UpdateOutcome, AppError> {
        self.update_class(
            doc! { "_id": id },
            doc! { "$set": { "status": status.as_str() } },
        )
        .await
    }

    async fn set_class_feedback(&self, id: ObjectId, feedback: &str) -> Result<UpdateOutcome, AppError> {
        self.update_class(
            doc! { "_id": id },
            doc! { "$set": { "feedback": feedback } },
        )
        .await
    }

    async fn decrement_seat(&self, id: ObjectId) -> Result<UpdateOutcome, AppError> {
        self.update_class(
            pipelines::decrement_seat_filter(id),
            pipelines::decrement_seat_update(),
        )
        .await
    }

    async fn insert_booking(&self, booking: BookedClass) -> Result<String, AppError> {
        let result = self
            .db
            .collection::<BookedClass>(BOOKED_CLASSES)
            .insert_one(&booking)
            .await?;
        Ok(inserted_hex(&result.inserted_id))
    }

    async fn delete_booking(&self, id: ObjectId) -> Result<u64, AppError> {
        let result = self
            .db
            .collection::<BookedClass>(BOOKED_CLASSES)
            .delete_one(doc! { "_id": id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn insert_payment(&self, payment: Payment) -> Result<String, AppError> {
        let result = self
            .db
            .collection::<Payment>(PAYMENTS)
            .insert_one(&payment)
            .await?;
        Ok(inserted_hex(&result.inserted_id))
    }

    async fn popular_classes(&self, limit: usize) -> Result<Vec<PopularClass>, AppError> {
        self.aggregate(CLASSES, pipelines::popular_classes(limit)).await
    }

    async fn instructors(&self) -> Result<Vec<InstructorSummary>, AppError> {
        self.aggregate(USERS, pipelines::instructors()).await
    }

    async fn popular_instructors(&self, limit: usize) -> Result<Vec<InstructorSummary>, AppError> {
        self.aggregate(USERS, pipelines::popular_instructors(limit)).await
    }

    async fn booked_classes(&self, student_email: &str) -> Result<Vec<BookedClassView>, AppError> {
        self.aggregate(BOOKED_CLASSES, pipelines::booked_classes(student_email))
            .await
    }

    async fn payments(&self, user_email: &str, order: SortOrder) -> Result<Vec<PaymentView>, AppError> {
        self.aggregate(PAYMENTS, pipelines::payments(user_email, order))
            .await
    }
}
