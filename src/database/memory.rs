use async_trait::async_trait;
use mongodb::bson::oid::ObjectId;
use tokio::sync::RwLock;

use super::Store;
use crate::models::{
    BookedClass, BookedClassView, Class, ClassStatus, InstructorSummary, Payment, PaymentView,
    PopularClass, Role, SortOrder, UpdateOutcome, User, UserInsert,
};
use crate::utils::AppError;

#[derive(Default)]
struct Collections {
    users: Vec<User>,
    classes: Vec<Class>,
    bookings: Vec<BookedClass>,
    payments: Vec<Payment>,
}

/// In-process [`Store`] with the same view semantics as the MongoDB pipelines.
///
/// Collections are kept in insertion order, which stands in for natural
/// storage order; rankings use a stable sort so ties keep that order.
#[derive(Default)]
pub struct MemoryStore {
    inner: RwLock<Collections>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn class_info(classes: &[Class], class_id: &str) -> Vec<Class> {
    let Ok(id) = ObjectId::parse_str(class_id) else {
        return Vec::new();
    };

    classes
        .iter()
        .filter(|c| c.id == Some(id))
        .cloned()
        .collect()
}

fn instructor_summaries(data: &Collections) -> Vec<InstructorSummary> {
    data.users
        .iter()
        .filter(|u| u.role == Role::Instructor)
        .map(|u| {
            let classes: Vec<Class> = data
                .classes
                .iter()
                .filter(|c| c.instructor_email == u.email)
                .cloned()
                .collect();
            let total_students = classes.iter().map(Class::enrolled_students).sum();

            InstructorSummary {
                instructor: u.clone(),
                classes,
                total_students,
            }
        })
        .collect()
}

fn update_class<F>(data: &mut Collections, id: ObjectId, apply: F) -> UpdateOutcome
where
    F: FnOnce(&mut Class) -> bool,
{
    match data.classes.iter_mut().find(|c| c.id == Some(id)) {
        Some(class) => {
            let modified = apply(class);
            UpdateOutcome {
                matched_count: 1,
                modified_count: u64::from(modified),
            }
        }
        None => UpdateOutcome {
            matched_count: 0,
            modified_count: 0,
        },
    }
}

#[async_trait]
impl Store for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_user(&self, email: &str) -> Result<Option<User>, AppError> {
        let data = self.inner.read().await;
        Ok(data.users.iter().find(|u| u.email == email).cloned())
    }

    async fn insert_user(&self, mut user: User) -> Result<UserInsert, AppError> {
        let mut data = self.inner.write().await;
        if data.users.iter().any(|u| u.email == user.email) {
            return Ok(UserInsert::AlreadyExists);
        }

        let id = ObjectId::new();
        user.id = Some(id);
        data.users.push(user);
        Ok(UserInsert::Created(id.to_hex()))
    }

    async fn insert_class(&self, mut class: Class) -> Result<String, AppError> {
        let id = ObjectId::new();
        class.id = Some(id);
        self.inner.write().await.classes.push(class);
        Ok(id.to_hex())
    }

    async fn approved_classes(&self) -> Result<Vec<Class>, AppError> {
        let data = self.inner.read().await;
        Ok(data
            .classes
            .iter()
            .filter(|c| c.status == ClassStatus::Approved)
            .cloned()
            .collect())
    }

    async fn all_classes(&self) -> Result<Vec<Class>, AppError> {
        Ok(self.inner.read().await.classes.clone())
    }

    async fn classes_by_instructor(&self, email: &str) -> Result<Vec<Class>, AppError> {
        let data = self.inner.read().await;
        Ok(data
            .classes
            .iter()
            .filter(|c| c.instructor_email == email)
            .cloned()
            .collect())
    }

    async fn set_class_status(&self, id: ObjectId, status: ClassStatus) -> Result<UpdateOutcome, AppError> {
        let mut data = self.inner.write().await;
        Ok(update_class(&mut data, id, |class| {
            let changed = class.status != status;
            class.status = status;
            changed
        }))
    }

    async fn set_class_feedback(&self, id: ObjectId, feedback: &str) -> Result<UpdateOutcome, AppError> {
        let mut data = self.inner.write().await;
        Ok(update_class(&mut data, id, |class| {
            let changed = class.feedback.as_deref() != Some(feedback);
            class.feedback = Some(feedback.to_string());
            changed
        }))
    }

    async fn decrement_seat(&self, id: ObjectId) -> Result<UpdateOutcome, AppError> {
        let mut data = self.inner.write().await;
        // same filter as the MongoDB update: only classes with a free seat match
        match data
            .classes
            .iter_mut()
            .find(|c| c.id == Some(id) && c.available_seats > 0)
        {
            Some(class) => {
                class.available_seats -= 1;
                Ok(UpdateOutcome {
                    matched_count: 1,
                    modified_count: 1,
                })
            }
            None => Ok(UpdateOutcome {
                matched_count: 0,
                modified_count: 0,
            }),
        }
    }

    async fn insert_booking(&self, mut booking: BookedClass) -> Result<String, AppError> {
        let id = ObjectId::new();
        booking.id = Some(id);
        self.inner.write().await.bookings.push(booking);
        Ok(id.to_hex())
    }

    async fn delete_booking(&self, id: ObjectId) -> Result<u64, AppError> {
        let mut data = self.inner.write().await;
        let before = data.bookings.len();
        data.bookings.retain(|b| b.id != Some(id));
        Ok((before - data.bookings.len()) as u64)
    }

    async fn insert_payment(&self, mut payment: Payment) -> Result<String, AppError> {
        let id = ObjectId::new();
        payment.id = Some(id);
        self.inner.write().await.payments.push(payment);
        Ok(id.to_hex())
    }

    async fn popular_classes(&self, limit: usize) -> Result<Vec<PopularClass>, AppError> {
        let data = self.inner.read().await;
        let mut ranked: Vec<PopularClass> = data
            .classes
            .iter()
            .map(|c| PopularClass {
                enrolled_students: c.enrolled_students(),
                class: c.clone(),
            })
            .collect();

        ranked.sort_by(|a, b| b.enrolled_students.cmp(&a.enrolled_students));
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn instructors(&self) -> Result<Vec<InstructorSummary>, AppError> {
        let data = self.inner.read().await;
        Ok(instructor_summaries(&data))
    }

    async fn popular_instructors(&self, limit: usize) -> Result<Vec<InstructorSummary>, AppError> {
        let data = self.inner.read().await;
        let mut ranked = instructor_summaries(&data);

        ranked.sort_by(|a, b| b.total_students.cmp(&a.total_students));
        ranked.truncate(limit);
        Ok(ranked)
    }

    async fn booked_classes(&self, student_email: &str) -> Result<Vec<BookedClassView>, AppError> {
        let data = self.inner.read().await;
        Ok(data
            .bookings
            .iter()
            .filter(|b| b.student_email == student_email)
            .map(|b| BookedClassView {
                class_info: class_info(&data.classes, &b.class_id),
                booking: b.clone(),
            })
            .collect())
    }

    async fn payments(&self, user_email: &str, order: SortOrder) -> Result<Vec<PaymentView>, AppError> {
        let data = self.inner.read().await;
        let mut views: Vec<PaymentView> = data
            .payments
            .iter()
            .filter(|p| p.user_email == user_email)
            .map(|p| PaymentView {
                class_info: class_info(&data.classes, &p.class_id),
                payment: p.clone(),
            })
            .collect();

        views.sort_by(|a, b| a.payment.id.cmp(&b.payment.id));
        if order == SortOrder::Desc {
            views.reverse();
        }
        Ok(views)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{class, instructor};

    const POPULAR_LIMIT: usize = 6;

    #[tokio::test]
    async fn popular_classes_rank_by_enrollment() {
        let store = MemoryStore::new();
        let b = store.insert_class(class("B", "x@school.dev", 5, 5)).await.unwrap();
        let a = store.insert_class(class("A", "x@school.dev", 10, 3)).await.unwrap();

        let popular = store.popular_classes(POPULAR_LIMIT).await.unwrap();

        assert_eq!(popular.len(), 2);
        assert_eq!(popular[0].class.id.unwrap().to_hex(), a);
        assert_eq!(popular[0].enrolled_students, 7);
        assert_eq!(popular[1].class.id.unwrap().to_hex(), b);
        assert_eq!(popular[1].enrolled_students, 0);
    }

    #[tokio::test]
    async fn popular_classes_return_at_most_six_in_non_increasing_order() {
        let store = MemoryStore::new();
        for (i, available) in [9, 2, 7, 0, 5, 5, 8, 1].into_iter().enumerate() {
            store
                .insert_class(class(&format!("c{}", i), "x@school.dev", 10, available))
                .await
                .unwrap();
        }

        let popular = store.popular_classes(POPULAR_LIMIT).await.unwrap();

        assert_eq!(popular.len(), 6);
        for entry in &popular {
            assert_eq!(
                entry.enrolled_students,
                entry.class.total_seats - entry.class.available_seats
            );
        }
        assert!(popular
            .windows(2)
            .all(|w| w[0].enrolled_students >= w[1].enrolled_students));
        // the two classes with 5 free seats tie; insertion order wins
        assert_eq!(popular[3].class.title, "c4");
        assert_eq!(popular[4].class.title, "c5");
    }

    #[tokio::test]
    async fn instructors_are_left_joined_with_their_classes() {
        let store = MemoryStore::new();
        store.insert_user(instructor("busy@school.dev")).await.unwrap();
        store.insert_user(instructor("idle@school.dev")).await.unwrap();
        store
            .insert_user(User {
                role: Role::Student,
                ..instructor("kid@school.dev")
            })
            .await
            .unwrap();
        store.insert_class(class("A", "busy@school.dev", 10, 4)).await.unwrap();
        store.insert_class(class("B", "busy@school.dev", 8, 7)).await.unwrap();

        let all = store.instructors().await.unwrap();

        assert_eq!(all.len(), 2);
        assert_eq!(all[0].instructor.email, "busy@school.dev");
        assert_eq!(all[0].classes.len(), 2);
        assert_eq!(all[0].total_students, 7);
        assert_eq!(all[1].instructor.email, "idle@school.dev");
        assert!(all[1].classes.is_empty());
        assert_eq!(all[1].total_students, 0);
    }

    #[tokio::test]
    async fn popular_instructors_sum_enrollment_across_classes() {
        let store = MemoryStore::new();
        store.insert_user(instructor("idle@school.dev")).await.unwrap();
        store.insert_user(instructor("mid@school.dev")).await.unwrap();
        store.insert_user(instructor("top@school.dev")).await.unwrap();
        store.insert_class(class("A", "mid@school.dev", 10, 8)).await.unwrap();
        store.insert_class(class("B", "top@school.dev", 10, 5)).await.unwrap();
        store.insert_class(class("C", "top@school.dev", 4, 0)).await.unwrap();

        let ranked = store.popular_instructors(POPULAR_LIMIT).await.unwrap();

        let emails: Vec<_> = ranked.iter().map(|i| i.instructor.email.as_str()).collect();
        assert_eq!(emails, ["top@school.dev", "mid@school.dev", "idle@school.dev"]);
        for entry in &ranked {
            let expected: i64 = entry.classes.iter().map(Class::enrolled_students).sum();
            assert_eq!(entry.total_students, expected);
        }
        assert_eq!(ranked[0].total_students, 9);
        assert_eq!(ranked[2].total_students, 0);
    }

    #[tokio::test]
    async fn decrement_seat_never_goes_negative() {
        let store = MemoryStore::new();
        let id = store.insert_class(class("A", "x@school.dev", 2, 1)).await.unwrap();
        let id = ObjectId::parse_str(&id).unwrap();

        let first = store.decrement_seat(id).await.unwrap();
        let second = store.decrement_seat(id).await.unwrap();

        assert!(first.matched());
        assert!(!second.matched());
        let classes = store.all_classes().await.unwrap();
        assert_eq!(classes[0].available_seats, 0);
    }

    #[tokio::test]
    async fn decrement_seat_on_unknown_class_matches_nothing() {
        let store = MemoryStore::new();
        let outcome = store.decrement_seat(ObjectId::new()).await.unwrap();
        assert_eq!(outcome.matched_count, 0);
    }

    #[tokio::test]
    async fn booked_classes_embed_the_referenced_class() {
        let store = MemoryStore::new();
        let class_id = store.insert_class(class("A", "x@school.dev", 10, 3)).await.unwrap();
        let booking = |class_id: &str| BookedClass {
            id: None,
            student_email: "kid@school.dev".into(),
            class_id: class_id.to_string(),
            booked_at: 0,
        };
        store.insert_booking(booking(&class_id)).await.unwrap();
        store.insert_booking(booking(&ObjectId::new().to_hex())).await.unwrap();
        store.insert_booking(booking("garbage")).await.unwrap();

        let views = store.booked_classes("kid@school.dev").await.unwrap();

        assert_eq!(views.len(), 3);
        assert_eq!(views[0].class_info.len(), 1);
        assert_eq!(views[0].class_info[0].id.unwrap().to_hex(), views[0].booking.class_id);
        assert!(views[1].class_info.is_empty());
        assert!(views[2].class_info.is_empty());
        assert!(store.booked_classes("other@school.dev").await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn payments_follow_requested_order() {
        let store = MemoryStore::new();
        let class_id = store.insert_class(class("A", "x@school.dev", 10, 3)).await.unwrap();
        for amount in [10.0, 20.0, 30.0] {
            store
                .insert_payment(Payment {
                    id: None,
                    user_email: "kid@school.dev".into(),
                    class_id: class_id.clone(),
                    amount,
                    transaction_id: None,
                    created_at: 0,
                })
                .await
                .unwrap();
        }

        let asc = store.payments("kid@school.dev", SortOrder::Asc).await.unwrap();
        let desc = store.payments("kid@school.dev", SortOrder::Desc).await.unwrap();

        let amounts = |views: &[PaymentView]| views.iter().map(|v| v.payment.amount).collect::<Vec<_>>();
        assert_eq!(amounts(&asc[..]), [10.0, 20.0, 30.0]);
        assert_eq!(amounts(&desc[..]), [30.0, 20.0, 10.0]);
        assert!(asc.iter().all(|v| v.class_info.len() == 1));
    }

    #[tokio::test]
    async fn deleting_a_missing_booking_reports_zero() {
        let store = MemoryStore::new();
        assert_eq!(store.delete_booking(ObjectId::new()).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn users_are_unique_by_email() {
        let store = MemoryStore::new();
        let first = store.insert_user(instructor("a@school.dev")).await.unwrap();
        let second = store.insert_user(instructor("a@school.dev")).await.unwrap();

        assert!(matches!(first, UserInsert::Created(_)));
        assert_eq!(second, UserInsert::AlreadyExists);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_decrements_never_oversell() {
        const FREE_SEATS: i64 = 5;
        const ATTEMPTS: usize = 32;

        let store = std::sync::Arc::new(MemoryStore::new());
        let id = store
            .insert_class(class("Rush hour", "x@school.dev", 20, FREE_SEATS))
            .await
            .unwrap();
        let id = ObjectId::parse_str(&id).unwrap();

        let handles: Vec<_> = (0..ATTEMPTS)
            .map(|_| {
                let store = store.clone();
                tokio::spawn(async move { store.decrement_seat(id).await })
            })
            .collect();

        let mut taken = 0;
        for handle in handles {
            if handle.await.unwrap().unwrap().matched() {
                taken += 1;
            }
        }

        assert_eq!(taken, FREE_SEATS);
        let classes = store.all_classes().await.unwrap();
        assert_eq!(classes[0].available_seats, 0);
    }
}
