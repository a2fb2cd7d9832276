use thiserror::Error;
use uuid::Uuid;

use crate::contract::model::CourseState;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Course not found: {id}")]
    CourseNotFound { id: Uuid },

    #[error("Class not found: {id}")]
    ClassNotFound { id: Uuid },

    #[error("Student not found: {id}")]
    StudentNotFound { id: Uuid },

    #[error("Attendance not found for student {student_id} in class {class_id}")]
    AttendanceNotFound { student_id: Uuid, class_id: Uuid },

    #[error("Notice not found: {id}")]
    NoticeNotFound { id: Uuid },

    #[error("Student {student_id} is not enrolled in course {course_id}")]
    NotEnrolled { course_id: Uuid, student_id: Uuid },

    #[error("Attendance already marked for student {student_id} in class {class_id}")]
    AttendanceAlreadyMarked { student_id: Uuid, class_id: Uuid },

    #[error("Student {student_id} is already enrolled in course {course_id}")]
    AlreadyEnrolled { course_id: Uuid, student_id: Uuid },

    #[error("Course {id} is not open for enrollment (state: {})", state.as_str())]
    CourseUnavailable { id: Uuid, state: CourseState },

    #[error("Invalid presence flag: {value}")]
    InvalidPresence { value: String },

    #[error("Validation failed: {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Database error: {message}")]
    Database { message: String },
}

impl DomainError {
    pub fn course_not_found(id: Uuid) -> Self {
        Self::CourseNotFound { id }
    }

    pub fn class_not_found(id: Uuid) -> Self {
        Self::ClassNotFound { id }
    }

    pub fn student_not_found(id: Uuid) -> Self {
        Self::StudentNotFound { id }
    }

    pub fn attendance_not_found(student_id: Uuid, class_id: Uuid) -> Self {
        Self::AttendanceNotFound {
            student_id,
            class_id,
        }
    }

    pub fn notice_not_found(id: Uuid) -> Self {
        Self::NoticeNotFound { id }
    }

    pub fn not_enrolled(course_id: Uuid, student_id: Uuid) -> Self {
        Self::NotEnrolled {
            course_id,
            student_id,
        }
    }

    pub fn attendance_already_marked(student_id: Uuid, class_id: Uuid) -> Self {
        Self::AttendanceAlreadyMarked {
            student_id,
            class_id,
        }
    }

    pub fn already_enrolled(course_id: Uuid, student_id: Uuid) -> Self {
        Self::AlreadyEnrolled {
            course_id,
            student_id,
        }
    }

    pub fn course_unavailable(id: Uuid, state: CourseState) -> Self {
        Self::CourseUnavailable { id, state }
    }

    pub fn invalid_presence(value: impl Into<String>) -> Self {
        Self::InvalidPresence {
            value: value.into(),
        }
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn database(message: impl Into<String>) -> Self {
        Self::Database {
            message: message.into(),
        }
    }
}
