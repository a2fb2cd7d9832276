//! Integration-style tests for the courses module.
//!
//! Key points:
//! - Each test runs on a fresh in-memory SQLite DB and applies migrations.
//! - Service is constructed with the SeaORM-backed repositories.
//! - The local client is tested against the same Service.

mod common;

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait};
use uuid::Uuid;

use common::*;
use courses::contract::{
    client::CoursesApi,
    error::CoursesError,
    model::{AttendanceKey, CoursePatch, CourseState, EnrollmentState, NewClass},
};
use courses::domain::error::DomainError;
use courses::domain::repo::{is_unique_violation, AttendanceRepository, CourseFilter};
use courses::gateways::local::CoursesLocalClient;
use courses::infra::storage::{
    apply_unique_constraints,
    entity::{attendance, class, enrollment, notice},
    sea_orm_repo::SeaOrmAttendanceRepository,
};

fn key(student_id: Uuid, course_id: Uuid, class_id: Uuid) -> AttendanceKey {
    AttendanceKey {
        student_id,
        course_id,
        class_id,
    }
}

#[tokio::test]
async fn created_course_reads_back_unchanged() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let teacher = seed_user(&db, "Grace", "teacher").await;

    let created = svc
        .create_course(new_course("Geometry", teacher, CourseState::InProgress))
        .await?;
    let fetched = svc.get_course(created.id).await?;

    assert_eq!(fetched.name, "Geometry");
    assert_eq!(fetched.description, "Geometry description");
    assert_eq!(fetched.state, CourseState::InProgress);
    assert_eq!(fetched.start_date, day(2024, 3, 1));
    assert_eq!(fetched.end_date, day(2024, 7, 1));
    assert_eq!(fetched.teacher_id, teacher);
    assert!(fetched.enrollments.is_empty());
    Ok(())
}

#[tokio::test]
async fn course_validation_rejects_bad_input() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let teacher = Uuid::new_v4();

    let mut blank = new_course("  ", teacher, CourseState::Available);
    assert!(matches!(
        svc.create_course(blank.clone()).await,
        Err(DomainError::Validation { .. })
    ));

    blank.name = "Backwards".into();
    blank.end_date = day(2024, 1, 1);
    match svc.create_course(blank).await {
        Err(DomainError::Validation { field, .. }) => assert_eq!(field, "end_date"),
        other => panic!("expected end_date validation, got {other:?}"),
    }

    let course = seed_course(&svc, teacher).await;
    let patch = CoursePatch {
        start_date: Some(day(2025, 1, 1)),
        ..Default::default()
    };
    assert!(matches!(
        svc.update_course(course.id, patch).await,
        Err(DomainError::Validation { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn stats_without_classes_are_zero() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let course = seed_course(&svc, Uuid::new_v4()).await;

    let stats = svc
        .student_attendance_stats(course.id, Uuid::new_v4())
        .await?;
    assert_eq!(stats.total_classes, 0);
    assert_eq!(stats.attended_classes, 0);
    assert_eq!(stats.attendance_percentage, 0.0);
    Ok(())
}

#[tokio::test]
async fn stats_count_only_present_records() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let classes = seed_classes(&svc, course.id, 3).await;

    svc.mark_attendance(key(student, course.id, classes[0]), true)
        .await?;
    svc.mark_attendance(key(student, course.id, classes[1]), true)
        .await?;
    svc.mark_attendance(key(student, course.id, classes[2]), false)
        .await?;

    let stats = svc.student_attendance_stats(course.id, student).await?;
    assert_eq!(stats.total_classes, 3);
    assert_eq!(stats.attended_classes, 2);
    assert_eq!(stats.attendance_percentage, 66.67);
    Ok(())
}

#[tokio::test]
async fn course_stats_divide_by_roster_size() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let a = seed_user(&db, "Ada", "student").await;
    let b = seed_user(&db, "Alan", "student").await;
    let c = seed_user(&db, "Edsger", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    for s in [a, b, c] {
        svc.enroll_student(course.id, s).await?;
    }
    let classes = seed_classes(&svc, course.id, 2).await;

    svc.mark_attendance(key(a, course.id, classes[0]), true)
        .await?;
    svc.mark_attendance(key(b, course.id, classes[0]), true)
        .await?;
    svc.mark_attendance(key(c, course.id, classes[0]), false)
        .await?;

    let stats = svc.course_attendance_stats(course.id).await?;
    assert_eq!(stats.total_classes, 2);
    assert_eq!(stats.classes[0].class_id, classes[0]);
    assert_eq!(stats.classes[0].attended, 2);
    assert_eq!(stats.classes[0].total_students, 3);
    assert_eq!(stats.classes[0].attendance_percentage, 66.67);
    assert_eq!(stats.classes[1].attended, 0);
    assert_eq!(stats.classes[1].attendance_percentage, 0.0);
    Ok(())
}

#[tokio::test]
async fn course_stats_ignore_unenrolled_students() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let a = seed_user(&db, "Ada", "student").await;
    let b = seed_user(&db, "Alan", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    for s in [a, b] {
        svc.enroll_student(course.id, s).await?;
    }
    let classes = seed_classes(&svc, course.id, 1).await;
    svc.mark_attendance(key(a, course.id, classes[0]), true)
        .await?;
    svc.mark_attendance(key(b, course.id, classes[0]), true)
        .await?;

    // The record survives unenrollment but no longer counts for the class.
    svc.unenroll_student(course.id, b).await?;
    assert_eq!(svc.list_student_attendance(course.id, b).await?.len(), 1);

    let stats = svc.course_attendance_stats(course.id).await?;
    assert_eq!(stats.classes[0].attended, 1);
    assert_eq!(stats.classes[0].total_students, 1);
    assert_eq!(stats.classes[0].attendance_percentage, 100.0);

    // A present record of a student who was never enrolled is ignored too.
    let outsider = seed_user(&db, "Grace", "student").await;
    svc.mark_attendance(key(outsider, course.id, classes[0]), true)
        .await?;
    let stats = svc.course_attendance_stats(course.id).await?;
    assert_eq!(stats.classes[0].attended, 1);
    assert!(stats.classes[0].attendance_percentage <= 100.0);
    Ok(())
}

#[tokio::test]
async fn marking_twice_keeps_one_record() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let classes = seed_classes(&svc, course.id, 1).await;
    let k = key(student, course.id, classes[0]);

    svc.mark_attendance(k, true).await?;
    let second = svc.mark_attendance(k, false).await;
    assert!(matches!(
        second,
        Err(DomainError::AttendanceAlreadyMarked { .. })
    ));

    let stored = svc.list_student_attendance(course.id, student).await?;
    assert_eq!(stored.len(), 1);
    assert!(stored[0].present);
    Ok(())
}

#[tokio::test]
async fn marking_checks_references() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let other = seed_course(&svc, Uuid::new_v4()).await;
    let classes = seed_classes(&svc, course.id, 1).await;

    let unknown_course = svc
        .mark_attendance(key(student, Uuid::new_v4(), classes[0]), true)
        .await;
    assert!(matches!(unknown_course, Err(DomainError::CourseNotFound { .. })));

    let foreign_class = svc
        .mark_attendance(key(student, other.id, classes[0]), true)
        .await;
    assert!(matches!(foreign_class, Err(DomainError::ClassNotFound { .. })));

    let unknown_student = svc
        .mark_attendance(key(Uuid::new_v4(), course.id, classes[0]), true)
        .await;
    assert!(matches!(
        unknown_student,
        Err(DomainError::StudentNotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn correcting_missing_record_stores_nothing() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let classes = seed_classes(&svc, course.id, 1).await;

    let result = svc
        .correct_attendance(key(student, course.id, classes[0]), true)
        .await;
    assert!(matches!(result, Err(DomainError::AttendanceNotFound { .. })));
    assert_eq!(attendance::Entity::find().count(&db).await?, 0);
    Ok(())
}

#[tokio::test]
async fn correction_sets_the_supplied_value() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let classes = seed_classes(&svc, course.id, 1).await;
    let k = key(student, course.id, classes[0]);

    let marked = svc.mark_attendance(k, false).await?;
    let corrected = svc.correct_attendance(k, true).await?;
    assert_eq!(corrected.id, marked.id);
    assert!(corrected.present);

    // Explicit set, not a toggle: repeating keeps the value.
    let again = svc.correct_attendance(k, true).await?;
    assert!(again.present);

    let stats = svc.student_attendance_stats(course.id, student).await?;
    assert_eq!(stats.attended_classes, 1);
    Ok(())
}

#[tokio::test]
async fn enrolling_twice_leaves_roster_unchanged() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;

    let enrolled = svc.enroll_student(course.id, student).await?;
    assert_eq!(enrolled.enrollments.len(), 1);
    assert_eq!(enrolled.enrollments[0].state, EnrollmentState::InProgress);

    let again = svc.enroll_student(course.id, student).await;
    assert!(matches!(again, Err(DomainError::AlreadyEnrolled { .. })));
    assert_eq!(svc.get_course(course.id).await?.enrollments.len(), 1);
    Ok(())
}

#[tokio::test]
async fn enrolling_in_finished_course_is_refused() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    svc.change_state(course.id, CourseState::Finished).await?;

    let result = svc.enroll_student(course.id, student).await;
    match result {
        Err(DomainError::CourseUnavailable { state, .. }) => {
            assert_eq!(state, CourseState::Finished)
        }
        other => panic!("expected CourseUnavailable, got {other:?}"),
    }
    assert!(svc.get_course(course.id).await?.enrollments.is_empty());
    Ok(())
}

#[tokio::test]
async fn enrolling_unknown_student_is_not_found() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let course = seed_course(&svc, Uuid::new_v4()).await;

    let result = svc.enroll_student(course.id, Uuid::new_v4()).await;
    assert!(matches!(result, Err(DomainError::StudentNotFound { .. })));
    Ok(())
}

#[tokio::test]
async fn unenrolling_stranger_is_a_no_op() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let enrolled = seed_user(&db, "Ada", "student").await;
    let stranger = seed_user(&db, "Alan", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    svc.enroll_student(course.id, enrolled).await?;

    let after = svc.unenroll_student(course.id, stranger).await?;
    assert_eq!(after.enrollments.len(), 1);
    assert_eq!(after.enrollments[0].student_id, enrolled);
    Ok(())
}

#[tokio::test]
async fn roster_keeps_order_across_changes() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let a = seed_user(&db, "Ada", "student").await;
    let b = seed_user(&db, "Alan", "student").await;
    let c = seed_user(&db, "Edsger", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    for s in [a, b, c] {
        svc.enroll_student(course.id, s).await?;
    }

    svc.change_student_state(course.id, b, EnrollmentState::Passed)
        .await?;
    svc.unenroll_student(course.id, a).await?;

    let course = svc.get_course(course.id).await?;
    let roster: Vec<_> = course
        .enrollments
        .iter()
        .map(|e| (e.student_id, e.state))
        .collect();
    assert_eq!(
        roster,
        vec![
            (b, EnrollmentState::Passed),
            (c, EnrollmentState::InProgress)
        ]
    );

    let missing = svc
        .change_student_state(course.id, a, EnrollmentState::Failed)
        .await;
    assert!(matches!(missing, Err(DomainError::NotEnrolled { .. })));
    Ok(())
}

#[tokio::test]
async fn details_expand_relations() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let teacher = seed_user(&db, "Grace", "teacher,admin").await;
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, teacher).await;
    svc.enroll_student(course.id, student).await?;
    seed_classes(&svc, course.id, 2).await;
    svc.create_notice(course.id, "Welcome".into()).await?;

    let details = svc.get_course_details(course.id).await?;
    let teacher_ref = details.teacher.expect("teacher resolved");
    assert_eq!(teacher_ref.display_name, "Grace");
    assert_eq!(teacher_ref.roles.len(), 2);
    assert_eq!(details.classes.len(), 2);
    assert_eq!(details.notices.len(), 1);
    assert_eq!(details.students.len(), 1);
    assert_eq!(
        details.students[0].student.as_ref().map(|u| u.id),
        Some(student)
    );
    Ok(())
}

#[tokio::test]
async fn details_keep_dangling_teacher_as_none() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let course = seed_course(&svc, Uuid::new_v4()).await;

    let details = svc.get_course_details(course.id).await?;
    assert!(details.teacher.is_none());
    Ok(())
}

#[tokio::test]
async fn listing_by_teacher_filters_courses() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let grace = Uuid::new_v4();
    let alan = Uuid::new_v4();
    seed_course(&svc, grace).await;
    seed_course(&svc, grace).await;
    seed_course(&svc, alan).await;

    let all = svc.list_courses(CourseFilter::default()).await?;
    assert_eq!(all.len(), 3);
    let graces = svc
        .list_courses(CourseFilter {
            teacher_id: Some(grace),
        })
        .await?;
    assert_eq!(graces.len(), 2);
    assert!(graces.iter().all(|c| c.teacher_id == grace));

    let changed = svc.change_teacher(graces[0].id, alan).await?;
    assert_eq!(changed.teacher_id, alan);
    Ok(())
}

#[tokio::test]
async fn deleting_course_cascades() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let keeper = seed_course(&svc, Uuid::new_v4()).await;
    svc.enroll_student(course.id, student).await?;
    let classes = seed_classes(&svc, course.id, 2).await;
    seed_classes(&svc, keeper.id, 1).await;
    svc.mark_attendance(key(student, course.id, classes[0]), true)
        .await?;
    svc.create_notice(course.id, "Exam on Friday".into())
        .await?;

    svc.delete_course(course.id).await?;

    assert!(matches!(
        svc.get_course(course.id).await,
        Err(DomainError::CourseNotFound { .. })
    ));
    assert_eq!(class::Entity::find().count(&db).await?, 1);
    assert_eq!(attendance::Entity::find().count(&db).await?, 0);
    assert_eq!(notice::Entity::find().count(&db).await?, 0);
    assert_eq!(enrollment::Entity::find().count(&db).await?, 0);

    assert!(matches!(
        svc.delete_course(course.id).await,
        Err(DomainError::CourseNotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn deleting_class_drops_its_attendance() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let classes = seed_classes(&svc, course.id, 2).await;
    svc.mark_attendance(key(student, course.id, classes[0]), true)
        .await?;
    svc.mark_attendance(key(student, course.id, classes[1]), true)
        .await?;

    svc.delete_class(classes[0]).await?;

    let left = svc.list_student_attendance(course.id, student).await?;
    assert_eq!(left.len(), 1);
    assert_eq!(left[0].class_id, classes[1]);
    let stats = svc.student_attendance_stats(course.id, student).await?;
    assert_eq!(stats.total_classes, 1);
    assert_eq!(stats.attendance_percentage, 100.0);
    Ok(())
}

#[tokio::test]
async fn class_crud() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let course = seed_course(&svc, Uuid::new_v4()).await;

    let created = svc
        .create_class(
            course.id,
            NewClass {
                name: "Intro".into(),
                date: at(2024, 3, 10),
            },
        )
        .await?;
    let updated = svc
        .update_class(
            created.id,
            courses::contract::model::ClassPatch {
                name: Some("Introduction".into()),
                date: None,
            },
        )
        .await?;
    assert_eq!(updated.name, "Introduction");
    assert_eq!(updated.date, at(2024, 3, 10));
    assert_eq!(svc.get_class(created.id).await?.name, "Introduction");

    let missing_course = svc
        .create_class(
            Uuid::new_v4(),
            NewClass {
                name: "Orphan".into(),
                date: Utc::now(),
            },
        )
        .await;
    assert!(matches!(
        missing_course,
        Err(DomainError::CourseNotFound { .. })
    ));

    assert_eq!(svc.list_classes(None).await?.len(), 1);
    svc.delete_class(created.id).await?;
    assert!(matches!(
        svc.get_class(created.id).await,
        Err(DomainError::ClassNotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn notices_newest_first() -> Result<()> {
    let db = create_test_db().await;
    let svc = service_on(&db);
    let course = seed_course(&svc, Uuid::new_v4()).await;

    let first = svc.create_notice(course.id, "first".into()).await?;
    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let second = svc.create_notice(course.id, "second".into()).await?;

    let listed = svc.list_notices(course.id).await?;
    let ids: Vec<_> = listed.iter().map(|n| n.id).collect();
    assert_eq!(ids, vec![second.id, first.id]);

    let edited = svc.update_notice(first.id, "first, edited".into()).await?;
    assert_eq!(edited.content, "first, edited");
    assert!(matches!(
        svc.create_notice(course.id, "   ".into()).await,
        Err(DomainError::Validation { .. })
    ));

    svc.delete_notice(second.id).await?;
    assert!(matches!(
        svc.delete_notice(second.id).await,
        Err(DomainError::NoticeNotFound { .. })
    ));
    Ok(())
}

#[tokio::test]
async fn unique_index_surfaces_as_typed_violation() -> Result<()> {
    let db = create_test_db().await;
    apply_unique_constraints(&db).await?;
    // Idempotent on restart.
    apply_unique_constraints(&db).await?;

    let svc = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let course = seed_course(&svc, Uuid::new_v4()).await;
    let classes = seed_classes(&svc, course.id, 1).await;
    let record = svc
        .mark_attendance(key(student, course.id, classes[0]), true)
        .await?;

    // Bypass the service check, as a racing writer would.
    let repo = SeaOrmAttendanceRepository::new(db.clone());
    let mut duplicate = record.clone();
    duplicate.id = Uuid::new_v4();
    let err = repo.insert(duplicate).await.expect_err("duplicate rejected");
    assert!(is_unique_violation(&err), "got {err:#}");
    assert_eq!(attendance::Entity::find().count(&db).await?, 1);
    Ok(())
}

#[tokio::test]
async fn test_local_client() -> Result<()> {
    let db = create_test_db().await;
    let service = service_on(&db);
    let student = seed_user(&db, "Ada", "student").await;
    let teacher = Uuid::new_v4();
    let client: Arc<dyn CoursesApi> = Arc::new(CoursesLocalClient::new(service.clone()));

    let course = client
        .create_course(new_course("Logic", teacher, CourseState::Available))
        .await?;
    assert_eq!(client.get_course(course.id).await?.name, "Logic");
    assert_eq!(client.list_courses(Some(teacher)).await?.len(), 1);

    client.enroll_student(course.id, student).await?;
    let again = client.enroll_student(course.id, student).await;
    assert!(matches!(again, Err(CoursesError::Conflict { .. })));

    let updated = client
        .change_student_state(course.id, student, EnrollmentState::Withdrawn)
        .await?;
    assert_eq!(
        updated.enrollment(student).map(|e| e.state),
        Some(EnrollmentState::Withdrawn)
    );

    let classes = seed_classes(&service, course.id, 2).await;
    client
        .mark_attendance(key(student, course.id, classes[0]), true)
        .await?;
    let stats = client.student_attendance_stats(course.id, student).await?;
    assert_eq!(stats.attendance_percentage, 50.0);
    let course_stats = client.course_attendance_stats(course.id).await?;
    assert_eq!(course_stats.classes.len(), 2);

    let details = client.get_course_details(course.id).await?;
    assert_eq!(details.students.len(), 1);

    let missing = client.get_course(Uuid::new_v4()).await;
    assert!(matches!(missing, Err(CoursesError::NotFound { .. })));
    Ok(())
}
