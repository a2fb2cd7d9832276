use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

/// Lifecycle state of a course. Only `Available` accepts new enrollments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CourseState {
    Available,
    InProgress,
    Finished,
}

impl CourseState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "Available",
            Self::InProgress => "InProgress",
            Self::Finished => "Finished",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "Available" => Some(Self::Available),
            "InProgress" => Some(Self::InProgress),
            "Finished" => Some(Self::Finished),
            _ => None,
        }
    }
}

/// State of a single student inside a course roster.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EnrollmentState {
    InProgress,
    Passed,
    Failed,
    Withdrawn,
}

impl EnrollmentState {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::InProgress => "InProgress",
            Self::Passed => "Passed",
            Self::Failed => "Failed",
            Self::Withdrawn => "Withdrawn",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw {
            "InProgress" => Some(Self::InProgress),
            "Passed" => Some(Self::Passed),
            "Failed" => Some(Self::Failed),
            "Withdrawn" => Some(Self::Withdrawn),
            _ => None,
        }
    }
}

/// Roster entry: one per student, in enrollment order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Enrollment {
    pub student_id: Uuid,
    pub state: EnrollmentState,
    pub enrolled_at: DateTime<Utc>,
}

/// Pure course model for inter-module communication (no serde)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Course {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub state: CourseState,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher_id: Uuid,
    pub enrollments: Vec<Enrollment>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Course {
    pub fn enrollment(&self, student_id: Uuid) -> Option<&Enrollment> {
        self.enrollments.iter().find(|e| e.student_id == student_id)
    }

    pub fn is_enrolled(&self, student_id: Uuid) -> bool {
        self.enrollment(student_id).is_some()
    }
}

/// Data for creating a new course
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCourse {
    pub name: String,
    pub description: String,
    pub state: CourseState,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher_id: Uuid,
}

/// Partial update data for a course
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CoursePatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<CourseState>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub teacher_id: Option<Uuid>,
}

/// A course with its references resolved to full records.
///
/// User references that no longer resolve are kept as `None` rather than
/// failing the whole read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CourseDetails {
    pub course: Course,
    pub teacher: Option<UserRef>,
    pub classes: Vec<Class>,
    pub notices: Vec<Notice>,
    pub students: Vec<EnrolledStudent>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnrolledStudent {
    pub enrollment: Enrollment,
    pub student: Option<UserRef>,
}

/// One scheduled session of a course.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Class {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewClass {
    pub name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ClassPatch {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

/// Identity of an attendance record: at most one record exists per key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AttendanceKey {
    pub student_id: Uuid,
    pub course_id: Uuid,
    pub class_id: Uuid,
}

/// Per-student, per-class presence record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attendance {
    pub id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub date: DateTime<Utc>,
    pub present: bool,
    pub updated_at: DateTime<Utc>,
}

impl Attendance {
    pub fn key(&self) -> AttendanceKey {
        AttendanceKey {
            student_id: self.student_id,
            course_id: self.course_id,
            class_id: self.class_id,
        }
    }
}

/// Course-scoped announcement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub id: Uuid,
    pub course_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin,
    Teacher,
    Student,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Teacher => "teacher",
            Self::Student => "student",
        }
    }

    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "admin" => Some(Self::Admin),
            "teacher" => Some(Self::Teacher),
            "student" => Some(Self::Student),
            _ => None,
        }
    }
}

/// Read-only view of a user owned by the identity service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRef {
    pub id: Uuid,
    pub display_name: String,
    pub roles: Vec<Role>,
}

/// Attendance summary of one student in one course.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StudentAttendanceStats {
    pub total_classes: u64,
    pub attended_classes: u64,
    /// Rounded to two decimals; `0.0` when the course has no classes.
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassAttendanceStats {
    pub class_id: Uuid,
    pub attended: u64,
    pub total_students: u64,
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CourseAttendanceStats {
    pub total_classes: u64,
    pub classes: Vec<ClassAttendanceStats>,
}
