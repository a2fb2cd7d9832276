use std::collections::HashSet;

use chrono::Utc;
use serde_json::Value;
use tracing::{debug, info, instrument};
use uuid::Uuid;

use super::{storage, storage_write, Service};
use crate::contract::model::{
    Attendance, AttendanceKey, ClassAttendanceStats, CourseAttendanceStats,
    StudentAttendanceStats,
};
use crate::domain::error::DomainError;
use crate::domain::repo::AttendanceFilter;

impl Service {
    /// Create the attendance record for `key`. A key can be marked only once;
    /// later changes go through [`Service::correct_attendance`].
    #[instrument(
        name = "courses.service.mark_attendance",
        skip(self),
        fields(course_id = %key.course_id, class_id = %key.class_id, student_id = %key.student_id)
    )]
    pub async fn mark_attendance(
        &self,
        key: AttendanceKey,
        present: bool,
    ) -> Result<Attendance, DomainError> {
        info!("Marking attendance");

        self.load_course(key.course_id).await?;
        let class = self.load_class(key.class_id).await?;
        if class.course_id != key.course_id {
            return Err(DomainError::class_not_found(key.class_id));
        }
        self.load_student(key.student_id).await?;

        if self
            .attendance
            .find_one(key)
            .await
            .map_err(storage)?
            .is_some()
        {
            return Err(DomainError::attendance_already_marked(
                key.student_id,
                key.class_id,
            ));
        }

        let now = Utc::now();
        let record = Attendance {
            id: Uuid::new_v4(),
            course_id: key.course_id,
            student_id: key.student_id,
            class_id: key.class_id,
            date: now,
            present,
            updated_at: now,
        };

        self.attendance.insert(record.clone()).await.map_err(|e| {
            storage_write(e, || {
                DomainError::attendance_already_marked(key.student_id, key.class_id)
            })
        })?;

        info!("Successfully marked attendance with id={}", record.id);
        Ok(record)
    }

    /// Set `present` on an existing record to the supplied value.
    #[instrument(
        name = "courses.service.correct_attendance",
        skip(self),
        fields(course_id = %key.course_id, class_id = %key.class_id, student_id = %key.student_id)
    )]
    pub async fn correct_attendance(
        &self,
        key: AttendanceKey,
        present: bool,
    ) -> Result<Attendance, DomainError> {
        info!("Correcting attendance");

        let mut record = self
            .attendance
            .find_one(key)
            .await
            .map_err(storage)?
            .ok_or_else(|| DomainError::attendance_not_found(key.student_id, key.class_id))?;

        record.present = present;
        record.updated_at = Utc::now();

        self.attendance
            .update(record.clone())
            .await
            .map_err(storage)?;

        info!("Successfully corrected attendance");
        Ok(record)
    }

    #[instrument(
        name = "courses.service.list_student_attendance",
        skip(self),
        fields(course_id = %course_id, student_id = %student_id)
    )]
    pub async fn list_student_attendance(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<Vec<Attendance>, DomainError> {
        debug!("Listing student attendance");
        self.load_course(course_id).await?;

        self.attendance
            .find(AttendanceFilter {
                course_id: Some(course_id),
                student_id: Some(student_id),
                ..Default::default()
            })
            .await
            .map_err(storage)
    }

    /// Attendance summary of one student. The class count comes from the
    /// class collection, and only records with `present == true` count as
    /// attended.
    #[instrument(
        name = "courses.service.student_attendance_stats",
        skip(self),
        fields(course_id = %course_id, student_id = %student_id)
    )]
    pub async fn student_attendance_stats(
        &self,
        course_id: Uuid,
        student_id: Uuid,
    ) -> Result<StudentAttendanceStats, DomainError> {
        debug!("Computing student attendance stats");
        self.load_course(course_id).await?;

        let total_classes = self
            .classes
            .count_by_course(course_id)
            .await
            .map_err(storage)?;
        let attended_classes = self
            .attendance
            .count(AttendanceFilter {
                course_id: Some(course_id),
                student_id: Some(student_id),
                present: Some(true),
                ..Default::default()
            })
            .await
            .map_err(storage)?;

        Ok(StudentAttendanceStats {
            total_classes,
            attended_classes,
            attendance_percentage: attendance_percentage(attended_classes, total_classes),
        })
    }

    /// Per-class attendance of a course relative to its current roster size.
    /// Only present records of currently enrolled students are counted, so a
    /// class never goes above 100%.
    #[instrument(
        name = "courses.service.course_attendance_stats",
        skip(self),
        fields(course_id = %course_id)
    )]
    pub async fn course_attendance_stats(
        &self,
        course_id: Uuid,
    ) -> Result<CourseAttendanceStats, DomainError> {
        debug!("Computing course attendance stats");
        let course = self.load_course(course_id).await?;
        let roster: HashSet<Uuid> = course.enrollments.iter().map(|e| e.student_id).collect();
        let total_students = roster.len() as u64;

        let classes = self
            .classes
            .find_by_course(Some(course_id))
            .await
            .map_err(storage)?;

        let mut per_class = Vec::with_capacity(classes.len());
        for class in &classes {
            let attended = self
                .attendance
                .find(AttendanceFilter {
                    course_id: Some(course_id),
                    class_id: Some(class.id),
                    present: Some(true),
                    ..Default::default()
                })
                .await
                .map_err(storage)?
                .iter()
                .filter(|record| roster.contains(&record.student_id))
                .count() as u64;
            per_class.push(ClassAttendanceStats {
                class_id: class.id,
                attended,
                total_students,
                attendance_percentage: attendance_percentage(attended, total_students),
            });
        }

        Ok(CourseAttendanceStats {
            total_classes: classes.len() as u64,
            classes: per_class,
        })
    }
}

/// `part / whole * 100` rounded to two decimals, `0.0` for an empty whole.
pub fn attendance_percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    let raw = part as f64 / whole as f64 * 100.0;
    (raw * 100.0).round() / 100.0
}

/// Coerce a JSON presence flag: booleans, `"true"`/`"false"` and `0`/`1`.
pub fn parse_presence(raw: &Value) -> Result<bool, DomainError> {
    match raw {
        Value::Bool(b) => Ok(*b),
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" => Ok(true),
            "false" => Ok(false),
            _ => Err(DomainError::invalid_presence(raw.to_string())),
        },
        Value::Number(n) => match n.as_u64() {
            Some(1) => Ok(true),
            Some(0) => Ok(false),
            _ => Err(DomainError::invalid_presence(raw.to_string())),
        },
        _ => Err(DomainError::invalid_presence(raw.to_string())),
    }
}
