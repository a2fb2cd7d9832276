use thiserror::Error;

use crate::domain::error::DomainError;

/// Errors that are safe to expose to other modules
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoursesError {
    #[error("{message}")]
    NotFound { message: String },

    #[error("{message}")]
    Conflict { message: String },

    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("{message}")]
    Unavailable { message: String },

    #[error("Internal error")]
    Internal,
}

impl CoursesError {
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::NotFound {
            message: message.into(),
        }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::Conflict {
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn internal() -> Self {
        Self::Internal
    }
}

impl From<DomainError> for CoursesError {
    fn from(domain_error: DomainError) -> Self {
        use DomainError::*;
        let message = domain_error.to_string();
        match domain_error {
            CourseNotFound { .. }
            | ClassNotFound { .. }
            | StudentNotFound { .. }
            | AttendanceNotFound { .. }
            | NoticeNotFound { .. }
            | NotEnrolled { .. } => Self::not_found(message),
            AttendanceAlreadyMarked { .. } | AlreadyEnrolled { .. } => Self::conflict(message),
            CourseUnavailable { .. } => Self::unavailable(message),
            InvalidPresence { .. } | Validation { .. } => Self::validation(message),
            Database { .. } => Self::internal(),
        }
    }
}
