#![allow(dead_code)]
//! Shared fixtures: a migrated in-memory SQLite database per test plus helpers
//! to seed users, courses and classes.

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use sea_orm::{ActiveModelTrait, Database, DatabaseConnection, Set};
use sea_orm_migration::MigratorTrait;
use uuid::Uuid;

use courses::contract::model::{Course, CourseState, NewClass, NewCourse};
use courses::domain::service::{Service, ServiceConfig};
use courses::infra::storage::{entity::user, repositories, Migrator};

/// Create a fresh test database for each test (in-memory SQLite) and run migrations.
pub async fn create_test_db() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to test database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to run migrations");
    db
}

pub fn service_on(db: &DatabaseConnection) -> Arc<Service> {
    Arc::new(Service::new(
        repositories(db.clone()),
        ServiceConfig::default(),
    ))
}

/// Users belong to the identity service; tests write them directly.
pub async fn seed_user(db: &DatabaseConnection, name: &str, roles: &str) -> Uuid {
    let id = Uuid::new_v4();
    user::ActiveModel {
        id: Set(id),
        display_name: Set(name.to_owned()),
        roles: Set(roles.to_owned()),
    }
    .insert(db)
    .await
    .expect("seed user");
    id
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

pub fn at(y: i32, m: u32, d: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, 10, 0, 0)
        .single()
        .expect("valid timestamp")
}

pub fn new_course(name: &str, teacher_id: Uuid, state: CourseState) -> NewCourse {
    NewCourse {
        name: name.to_owned(),
        description: format!("{name} description"),
        state,
        start_date: day(2024, 3, 1),
        end_date: day(2024, 7, 1),
        teacher_id,
    }
}

pub async fn seed_course(svc: &Service, teacher_id: Uuid) -> Course {
    svc.create_course(new_course("Algebra", teacher_id, CourseState::Available))
        .await
        .expect("create course")
}

/// Create `n` classes on consecutive days; returns their ids in date order.
pub async fn seed_classes(svc: &Service, course_id: Uuid, n: u32) -> Vec<Uuid> {
    let mut ids = Vec::new();
    for i in 0..n {
        let class = svc
            .create_class(
                course_id,
                NewClass {
                    name: format!("Session {}", i + 1),
                    date: at(2024, 3, 4 + i),
                },
            )
            .await
            .expect("create class");
        ids.push(class.id);
    }
    ids
}
