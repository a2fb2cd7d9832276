use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::contract::{
    client::CoursesApi,
    error::CoursesError,
    model::{
        Attendance, AttendanceKey, Course, CourseAttendanceStats, CourseDetails, EnrollmentState,
        NewCourse, StudentAttendanceStats,
    },
};
use crate::domain::repo::CourseFilter;
use crate::domain::service::Service;

/// Local implementation of the CoursesApi trait that delegates to the domain service
pub struct CoursesLocalClient {
    service: Arc<Service>,
}

impl CoursesLocalClient {
    pub fn new(service: Arc<Service>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl CoursesApi for CoursesLocalClient {
    async fn get_course(&self, id: Uuid) -> Result<Course, CoursesError> {
        self.service.get_course(id).await.map_err(Into::into)
    }

    async fn get_course_details(&self, id: Uuid) -> Result<CourseDetails, CoursesError> {
        self.service.get_course_details(id).await.map_err(Into::into)
    }

    async fn list_courses(&self, teacher_id: Option<Uuid>) -> Result<Vec<Course>, CoursesError> {
        self.service
            .list_courses(CourseFilter { teacher_id })
            .await
            .map_err(Into::into)
    }

    async fn create_course(&self, new_course: NewCourse) -> Result<Course, CoursesError> {
        self.service
            .create_course(new_course)
            .await
            .map_err(Into::into)
    }

    async fn enroll_student(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<Course, CoursesError> {
        self.service
            .enroll_student(course_id, student_id)
            .await
            .map_err(Into::into)
    }

    async fn change_student_state(
        &self,
        course_id: Uuid,
        student_id: Uuid,
        state: EnrollmentState,
    ) -> Result<Course, CoursesError> {
        self.service
            .change_student_state(course_id, student_id, state)
            .await
            .map_err(Into::into)
    }

    async fn mark_attendance(
        &self,
        key: AttendanceKey,
        present: bool,
    ) -> Result<Attendance, CoursesError> {
        self.service
            .mark_attendance(key, present)
            .await
            .map_err(Into::into)
    }

    async fn student_attendance_stats(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<StudentAttendanceStats, CoursesError> {
        self.service
            .student_attendance_stats(course_id, student_id)
            .await
            .map_err(Into::into)
    }

    async fn course_attendance_stats(
        &self,
        course_id: Uuid,
    ) -> Result<CourseAttendanceStats, CoursesError> {
        self.service
            .course_attendance_stats(course_id)
            .await
            .map_err(Into::into)
    }
}
