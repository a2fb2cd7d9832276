use async_trait::async_trait;
use uuid::Uuid;

use crate::contract::{
    error::CoursesError,
    model::{
        Attendance, AttendanceKey, Course, CourseAttendanceStats, CourseDetails, EnrollmentState,
        NewCourse, StudentAttendanceStats,
    },
};

/// Public API trait for the courses module that other modules can use
#[async_trait]
pub trait CoursesApi: Send + Sync {
    /// Get a course by ID
    async fn get_course(&self, id: Uuid) -> Result<Course, CoursesError>;

    /// Get a course with teacher, classes, notices and students resolved
    async fn get_course_details(&self, id: Uuid) -> Result<CourseDetails, CoursesError>;

    /// List courses, optionally only those taught by `teacher_id`
    async fn list_courses(&self, teacher_id: Option<Uuid>) -> Result<Vec<Course>, CoursesError>;

    /// Create a new course
    async fn create_course(&self, new_course: NewCourse) -> Result<Course, CoursesError>;

    /// Enroll a student into an open course
    async fn enroll_student(&self, course_id: Uuid, student_id: Uuid)
        -> Result<Course, CoursesError>;

    /// Change the roster state of an enrolled student
    async fn change_student_state(
        &self,
        course_id: Uuid,
        student_id: Uuid,
        state: EnrollmentState,
    ) -> Result<Course, CoursesError>;

    /// Mark attendance once for the given key
    async fn mark_attendance(
        &self,
        key: AttendanceKey,
        present: bool,
    ) -> Result<Attendance, CoursesError>;

    /// Attendance summary of a student in a course
    async fn student_attendance_stats(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<StudentAttendanceStats, CoursesError>;

    /// Per-class attendance summary of a course
    async fn course_attendance_stats(
        &self,
        course_id: Uuid,
    ) -> Result<CourseAttendanceStats, CoursesError>;
}
