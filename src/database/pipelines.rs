//! Aggregation pipelines behind the derived read views, plus the guarded
//! seat update.
//!
//! Enrollment is always computed as `totalSeats - availableSeats`. Rankings
//! sort on `_id` as a secondary key so ties keep insertion order.

use mongodb::bson::{doc, oid::ObjectId, Document};

use super::CLASSES;
use crate::models::SortOrder;

fn enrolled_expr(prefix: &str) -> Document {
    doc! {
        "$subtract": [
            format!("{}totalSeats", prefix),
            format!("{}availableSeats", prefix)
        ]
    }
}

/// Joins `classId` (stored as hex) to the class `_id`. Bad or dangling ids yield `[]`.
fn class_info_lookup() -> Document {
    doc! {
        "$lookup": {
            "from": CLASSES,
            "let": {
                "classId": {
                    "$convert": {
                        "input": "$classId",
                        "to": "objectId",
                        "onError": null,
                        "onNull": null
                    }
                }
            },
            "pipeline": [
                { "$match": { "$expr": { "$eq": ["$_id", "$$classId"] } } }
            ],
            "as": "classInfo"
        }
    }
}

pub fn popular_classes(limit: usize) -> Vec<Document> {
    vec![
        doc! { "$addFields": { "enrolledStudents": enrolled_expr("$") } },
        doc! { "$sort": { "enrolledStudents": -1, "_id": 1 } },
        doc! { "$limit": limit as i64 }
    ]
}

/// Every instructor left-joined with their classes, with the student total.
pub fn instructors() -> Vec<Document> {
    vec![
        doc! { "$match": { "role": "instructor" } },
        doc! {
            "$lookup": {
                "from": CLASSES,
                "localField": "email",
                "foreignField": "instructorEmail",
                "as": "classes"
            }
        },
        doc! {
            "$addFields": {
                "totalStudents": {
                    "$sum": {
                        "$map": {
                            "input": "$classes",
                            "as": "c",
                            "in": enrolled_expr("$$c.")
                        }
                    }
                }
            }
        }
    ]
}

pub fn popular_instructors(limit: usize) -> Vec<Document> {
    let mut pipeline = instructors();
    pipeline.push(doc! { "$sort": { "totalStudents": -1, "_id": 1 } });
    pipeline.push(doc! { "$limit": limit as i64 });
    pipeline
}

pub fn booked_classes(student_email: &str) -> Vec<Document> {
    vec![
        doc! { "$match": { "studentEmail": student_email } },
        class_info_lookup()
    ]
}

pub fn payments(user_email: &str, order: SortOrder) -> Vec<Document> {
    vec![
        doc! { "$match": { "userEmail": user_email } },
        doc! { "$sort": { "_id": order.direction() } },
        class_info_lookup()
    ]
}

/// Matches the class only while it still has a free seat, so the decrement
/// can never take `availableSeats` below zero.
pub fn decrement_seat_filter(id: ObjectId) -> Document {
    doc! { "_id": id, "availableSeats": { "$gt": 0 } }
}

pub fn decrement_seat_update() -> Document {
    doc! { "$inc": { "availableSeats": -1 } }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stage_names(pipeline: &[Document]) -> Vec<String> {
        pipeline
            .iter()
            .map(|stage| stage.keys().next().cloned().unwrap_or_default())
            .collect()
    }

    #[test]
    fn popular_classes_ranks_by_enrollment_and_limits() {
        let pipeline = popular_classes(6);
        assert_eq!(stage_names(&pipeline), ["$addFields", "$sort", "$limit"]);

        let added = pipeline[0].get_document("$addFields").unwrap();
        assert_eq!(
            added.get_document("enrolledStudents").unwrap(),
            &doc! { "$subtract": ["$totalSeats", "$availableSeats"] }
        );

        let sort = pipeline[1].get_document("$sort").unwrap();
        assert_eq!(sort, &doc! { "enrolledStudents": -1, "_id": 1 });
        assert_eq!(pipeline[2].get_i64("$limit").unwrap(), 6);
    }

    #[test]
    fn instructors_left_join_on_email() {
        let pipeline = instructors();
        assert_eq!(stage_names(&pipeline), ["$match", "$lookup", "$addFields"]);
        assert_eq!(pipeline[0], doc! { "$match": { "role": "instructor" } });

        let lookup = pipeline[1].get_document("$lookup").unwrap();
        assert_eq!(lookup.get_str("from").unwrap(), CLASSES);
        assert_eq!(lookup.get_str("localField").unwrap(), "email");
        assert_eq!(lookup.get_str("foreignField").unwrap(), "instructorEmail");
    }

    #[test]
    fn popular_instructors_extend_the_instructor_pipeline() {
        let pipeline = popular_instructors(6);
        assert_eq!(
            stage_names(&pipeline),
            ["$match", "$lookup", "$addFields", "$sort", "$limit"]
        );
        assert_eq!(
            pipeline[3].get_document("$sort").unwrap(),
            &doc! { "totalStudents": -1, "_id": 1 }
        );
    }

    #[test]
    fn payments_sort_follows_requested_order() {
        let asc = payments("kid@school.dev", SortOrder::Asc);
        let desc = payments("kid@school.dev", SortOrder::Desc);

        assert_eq!(asc[1], doc! { "$sort": { "_id": 1 } });
        assert_eq!(desc[1], doc! { "$sort": { "_id": -1 } });
        assert_eq!(stage_names(&desc), ["$match", "$sort", "$lookup"]);
    }

    #[test]
    fn class_join_tolerates_unparsable_ids() {
        let pipeline = booked_classes("kid@school.dev");
        let lookup = pipeline[1].get_document("$lookup").unwrap();
        let convert = lookup
            .get_document("let")
            .and_then(|l| l.get_document("classId"))
            .and_then(|c| c.get_document("$convert"))
            .unwrap();

        assert!(convert.contains_key("onError"));
        assert_eq!(lookup.get_str("as").unwrap(), "classInfo");
    }

    #[test]
    fn seat_decrement_only_matches_classes_with_free_seats() {
        let id = ObjectId::new();

        let filter = decrement_seat_filter(id);
        assert_eq!(filter.get_object_id("_id").unwrap(), id);
        assert_eq!(
            filter.get_document("availableSeats").unwrap(),
            &doc! { "$gt": 0 }
        );

        assert_eq!(
            decrement_seat_update(),
            doc! { "$inc": { "availableSeats": -1 } }
        );
    }
}
