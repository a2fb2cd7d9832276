use std::sync::Arc;

use uuid::Uuid;

use crate::contract::model::{Class, Course, UserRef};
use crate::domain::error::DomainError;
use crate::domain::repo::{
    is_unique_violation, AttendanceRepository, ClassesRepository, CoursesRepository,
    NoticesRepository, UsersDirectory,
};

mod attendance;
mod class;
mod course;
mod notice;

pub use attendance::{attendance_percentage, parse_presence};

/// Domain service with business rules for courses, classes, attendance and notices.
/// Depends only on the repository ports, not on infra types.
#[derive(Clone)]
pub struct Service {
    courses: Arc<dyn CoursesRepository>,
    classes: Arc<dyn ClassesRepository>,
    attendance: Arc<dyn AttendanceRepository>,
    notices: Arc<dyn NoticesRepository>,
    users: Arc<dyn UsersDirectory>,
    config: ServiceConfig,
}

/// Configuration for the domain service
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub max_name_length: usize,
    pub max_notice_length: usize,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            max_name_length: 120,
            max_notice_length: 2000,
        }
    }
}

/// The set of persistence ports the service is wired with.
#[derive(Clone)]
pub struct Repositories {
    pub courses: Arc<dyn CoursesRepository>,
    pub classes: Arc<dyn ClassesRepository>,
    pub attendance: Arc<dyn AttendanceRepository>,
    pub notices: Arc<dyn NoticesRepository>,
    pub users: Arc<dyn UsersDirectory>,
}

impl Service {
    /// Create a service with dependencies.
    pub fn new(repos: Repositories, config: ServiceConfig) -> Self {
        Self {
            courses: repos.courses,
            classes: repos.classes,
            attendance: repos.attendance,
            notices: repos.notices,
            users: repos.users,
            config,
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    // --- lookup helpers shared by the operation groups ---

    async fn load_course(&self, id: Uuid) -> Result<Course, DomainError> {
        self.courses
            .find_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::course_not_found(id))
    }

    async fn load_class(&self, id: Uuid) -> Result<Class, DomainError> {
        self.classes
            .find_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::class_not_found(id))
    }

    async fn load_student(&self, id: Uuid) -> Result<UserRef, DomainError> {
        self.users
            .find_by_id(id)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::student_not_found(id))
    }

    fn validate_name(&self, field: &str, name: &str) -> Result<(), DomainError> {
        if name.trim().is_empty() {
            return Err(DomainError::validation(field, "must not be empty"));
        }
        let len = name.chars().count();
        if len > self.config.max_name_length {
            return Err(DomainError::validation(
                field,
                format!(
                    "too long: {} characters (max: {})",
                    len, self.config.max_name_length
                ),
            ));
        }
        Ok(())
    }
}

/// Map an adapter failure to the domain.
fn storage(e: anyhow::Error) -> DomainError {
    DomainError::database(e.to_string())
}

/// Map a write failure, turning a violated unique index into `on_conflict`.
fn storage_write(e: anyhow::Error, on_conflict: impl FnOnce() -> DomainError) -> DomainError {
    if is_unique_violation(&e) {
        on_conflict()
    } else {
        storage(e)
    }
}
