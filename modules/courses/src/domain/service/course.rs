use std::collections::HashMap;

use chrono::Utc;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{storage, storage_write, Service};
use crate::contract::model::{
    Course, CourseDetails, CoursePatch, CourseState, EnrolledStudent, Enrollment,
    EnrollmentState, NewCourse,
};
use crate::domain::error::DomainError;
use crate::domain::repo::CourseFilter;

impl Service {
    #[instrument(name = "courses.service.list_courses", skip(self))]
    pub async fn list_courses(&self, filter: CourseFilter) -> Result<Vec<Course>, DomainError> {
        debug!("Listing courses");
        let courses = self.courses.find(filter).await.map_err(storage)?;
        debug!("Listed {} courses", courses.len());
        Ok(courses)
    }

    #[instrument(name = "courses.service.get_course", skip(self), fields(course_id = %id))]
    pub async fn get_course(&self, id: Uuid) -> Result<Course, DomainError> {
        debug!("Getting course by id");
        self.load_course(id).await
    }

    /// Load a course and expand teacher, classes, notices and students.
    #[instrument(
        name = "courses.service.get_course_details",
        skip(self),
        fields(course_id = %id)
    )]
    pub async fn get_course_details(&self, id: Uuid) -> Result<CourseDetails, DomainError> {
        debug!("Getting course with expanded relations");
        let course = self.load_course(id).await?;

        let classes = self
            .classes
            .find_by_course(Some(id))
            .await
            .map_err(storage)?;
        let notices = self.notices.find_by_course(id).await.map_err(storage)?;

        let mut ids: Vec<Uuid> = course.enrollments.iter().map(|e| e.student_id).collect();
        ids.push(course.teacher_id);
        let mut users: HashMap<Uuid, _> = self
            .users
            .find_many(&ids)
            .await
            .map_err(storage)?
            .into_iter()
            .map(|u| (u.id, u))
            .collect();

        let teacher = users.get(&course.teacher_id).cloned();
        let students = course
            .enrollments
            .iter()
            .map(|enrollment| EnrolledStudent {
                enrollment: enrollment.clone(),
                student: users.remove(&enrollment.student_id),
            })
            .collect();

        Ok(CourseDetails {
            course,
            teacher,
            classes,
            notices,
            students,
        })
    }

    #[instrument(
        name = "courses.service.create_course",
        skip(self),
        fields(name = %new_course.name, teacher_id = %new_course.teacher_id)
    )]
    pub async fn create_course(&self, new_course: NewCourse) -> Result<Course, DomainError> {
        info!("Creating new course");

        self.validate_name("name", &new_course.name)?;
        validate_dates(new_course.start_date, new_course.end_date)?;

        let now = Utc::now();
        let course = Course {
            id: Uuid::new_v4(),
            name: new_course.name,
            description: new_course.description,
            state: new_course.state,
            start_date: new_course.start_date,
            end_date: new_course.end_date,
            teacher_id: new_course.teacher_id,
            enrollments: Vec::new(),
            created_at: now,
            updated_at: now,
        };

        self.courses
            .insert(course.clone())
            .await
            .map_err(storage)?;

        info!("Successfully created course with id={}", course.id);
        Ok(course)
    }

    #[instrument(name = "courses.service.update_course", skip(self), fields(course_id = %id))]
    pub async fn update_course(&self, id: Uuid, patch: CoursePatch) -> Result<Course, DomainError> {
        info!("Updating course");

        if let Some(ref name) = patch.name {
            self.validate_name("name", name)?;
        }

        let mut current = self.load_course(id).await?;

        if let Some(name) = patch.name {
            current.name = name;
        }
        if let Some(description) = patch.description {
            current.description = description;
        }
        if let Some(state) = patch.state {
            current.state = state;
        }
        if let Some(start_date) = patch.start_date {
            current.start_date = start_date;
        }
        if let Some(end_date) = patch.end_date {
            current.end_date = end_date;
        }
        if let Some(teacher_id) = patch.teacher_id {
            current.teacher_id = teacher_id;
        }
        validate_dates(current.start_date, current.end_date)?;

        self.save_course(current).await
    }

    #[instrument(name = "courses.service.delete_course", skip(self), fields(course_id = %id))]
    pub async fn delete_course(&self, id: Uuid) -> Result<(), DomainError> {
        info!("Deleting course");

        let deleted = self.courses.delete(id).await.map_err(storage)?;
        if !deleted {
            return Err(DomainError::course_not_found(id));
        }

        info!("Successfully deleted course");
        Ok(())
    }

    /// Set the course state. Any state is accepted from any other state.
    #[instrument(
        name = "courses.service.change_state",
        skip(self),
        fields(course_id = %id, state = state.as_str())
    )]
    pub async fn change_state(&self, id: Uuid, state: CourseState) -> Result<Course, DomainError> {
        info!("Changing course state");
        let mut course = self.load_course(id).await?;
        course.state = state;
        self.save_course(course).await
    }

    /// Reassign the teacher. Role checks belong to the authorization layer.
    #[instrument(
        name = "courses.service.change_teacher",
        skip(self),
        fields(course_id = %id, teacher_id = %teacher_id)
    )]
    pub async fn change_teacher(&self, id: Uuid, teacher_id: Uuid) -> Result<Course, DomainError> {
        info!("Changing course teacher");
        let mut course = self.load_course(id).await?;
        course.teacher_id = teacher_id;
        self.save_course(course).await
    }

    #[instrument(
        name = "courses.service.enroll_student",
        skip(self),
        fields(course_id = %course_id, student_id = %student_id)
    )]
    pub async fn enroll_student(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<Course, DomainError> {
        info!("Enrolling student");

        let mut course = self.load_course(course_id).await?;
        if course.state != CourseState::Available {
            return Err(DomainError::course_unavailable(course_id, course.state));
        }
        self.load_student(student_id).await?;
        if course.is_enrolled(student_id) {
            return Err(DomainError::already_enrolled(course_id, student_id));
        }

        course.enrollments.push(Enrollment {
            student_id,
            state: EnrollmentState::InProgress,
            enrolled_at: Utc::now(),
        });
        course.updated_at = Utc::now();

        self.courses
            .update(course.clone())
            .await
            .map_err(|e| {
                storage_write(e, || DomainError::already_enrolled(course_id, student_id))
            })?;

        info!("Successfully enrolled student");
        Ok(course)
    }

    #[instrument(
        name = "courses.service.change_student_state",
        skip(self),
        fields(course_id = %course_id, student_id = %student_id, state = state.as_str())
    )]
    pub async fn change_student_state(
        &self,
        course_id: Uuid,
        student_id: Uuid,
        state: EnrollmentState,
    ) -> Result<Course, DomainError> {
        info!("Changing student state");

        let mut course = self.load_course(course_id).await?;
        let entry = course
            .enrollments
            .iter_mut()
            .find(|e| e.student_id == student_id)
            .ok_or_else(|| DomainError::not_enrolled(course_id, student_id))?;
        entry.state = state;

        self.save_course(course).await
    }

    /// Remove a student from the roster. Removing a student that is not
    /// enrolled succeeds without changes.
    #[instrument(
        name = "courses.service.unenroll_student",
        skip(self),
        fields(course_id = %course_id, student_id = %student_id)
    )]
    pub async fn unenroll_student(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<Course, DomainError> {
        info!("Unenrolling student");

        let mut course = self.load_course(course_id).await?;
        self.load_student(student_id).await?;

        let before = course.enrollments.len();
        course.enrollments.retain(|e| e.student_id != student_id);
        if course.enrollments.len() == before {
            debug!("Student was not enrolled; nothing to remove");
        }

        self.save_course(course).await
    }

    async fn save_course(&self, mut course: Course) -> Result<Course, DomainError> {
        course.updated_at = Utc::now();
        self.courses
            .update(course.clone())
            .await
            .map_err(storage)?;
        Ok(course)
    }
}

fn validate_dates(
    start: chrono::NaiveDate,
    end: chrono::NaiveDate,
) -> Result<(), DomainError> {
    if end < start {
        return Err(DomainError::validation(
            "end_date",
            format!("{end} is before start date {start}"),
        ));
    }
    Ok(())
}
