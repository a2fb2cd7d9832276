//! Persistence ports for the domain layer.
//!
//! Every trait is object-safe and async-friendly via `async_trait`, so the
//! service can hold `Arc<dyn ...>` handles and tests can swap in mocks.
//! Implementations report storage failures as `anyhow::Error`; a violated
//! unique index must be reported as [`UniqueViolation`] somewhere in the
//! error chain so the service can turn it into a conflict.

use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::model::{Attendance, AttendanceKey, Class, Course, Notice, UserRef};

/// Raised by adapters when an insert or update hits a unique index.
#[derive(Debug, thiserror::Error)]
#[error("unique constraint violated: {0}")]
pub struct UniqueViolation(pub String);

/// Returns true when `err` carries a [`UniqueViolation`] anywhere in its chain.
pub fn is_unique_violation(err: &anyhow::Error) -> bool {
    err.chain().any(|cause| cause.is::<UniqueViolation>())
}

/// Filter for course listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CourseFilter {
    pub teacher_id: Option<Uuid>,
}

#[async_trait]
pub trait CoursesRepository: Send + Sync {
    /// Load a course (with its enrollment set) by id.
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Course>>;
    /// List courses matching the filter, oldest first.
    async fn find(&self, filter: CourseFilter) -> anyhow::Result<Vec<Course>>;
    /// Insert a fully-formed course.
    async fn insert(&self, course: Course) -> anyhow::Result<()>;
    /// Save the course row and replace its enrollment set in one step.
    async fn update(&self, course: Course) -> anyhow::Result<()>;
    /// Delete a course together with its classes, attendance, notices and
    /// enrollments. Returns true if the course existed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

#[async_trait]
pub trait ClassesRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Class>>;
    /// Classes of a course ordered by date; all classes when `course_id` is None.
    async fn find_by_course(&self, course_id: Option<Uuid>) -> anyhow::Result<Vec<Class>>;
    async fn count_by_course(&self, course_id: Uuid) -> anyhow::Result<u64>;
    async fn insert(&self, class: Class) -> anyhow::Result<()>;
    async fn update(&self, class: Class) -> anyhow::Result<()>;
    /// Delete a class and its attendance records. Returns true if it existed.
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Filter for attendance reads. Unset fields match everything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AttendanceFilter {
    pub course_id: Option<Uuid>,
    pub student_id: Option<Uuid>,
    pub class_id: Option<Uuid>,
    pub present: Option<bool>,
}

#[async_trait]
pub trait AttendanceRepository: Send + Sync {
    async fn find_one(&self, key: AttendanceKey) -> anyhow::Result<Option<Attendance>>;
    /// Records matching the filter ordered by date.
    async fn find(&self, filter: AttendanceFilter) -> anyhow::Result<Vec<Attendance>>;
    async fn count(&self, filter: AttendanceFilter) -> anyhow::Result<u64>;
    async fn insert(&self, record: Attendance) -> anyhow::Result<()>;
    async fn update(&self, record: Attendance) -> anyhow::Result<()>;
}

#[async_trait]
pub trait NoticesRepository: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Notice>>;
    /// Notices of a course, newest first.
    async fn find_by_course(&self, course_id: Uuid) -> anyhow::Result<Vec<Notice>>;
    async fn insert(&self, notice: Notice) -> anyhow::Result<()>;
    async fn update(&self, notice: Notice) -> anyhow::Result<()>;
    async fn delete(&self, id: Uuid) -> anyhow::Result<bool>;
}

/// Read-only access to users owned by the identity service.
#[async_trait]
pub trait UsersDirectory: Send + Sync {
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRef>>;
    /// Resolve many references at once; unknown ids are simply absent.
    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<UserRef>>;
}
