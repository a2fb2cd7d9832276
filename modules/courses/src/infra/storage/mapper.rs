//! Conversions between SeaORM rows and contract models.
//!
//! Enumerations are stored as text, so reading them back is fallible.

use anyhow::anyhow;

use crate::contract::model::{
    Attendance, Class, Course, CourseState, Enrollment, EnrollmentState, Notice, Role, UserRef,
};
use crate::infra::storage::entity::{attendance, class, course, enrollment, notice, user};

/// Build a course from its row and its roster rows (already in position order).
pub fn course_from_rows(
    row: course::Model,
    roster: Vec<enrollment::Model>,
) -> anyhow::Result<Course> {
    let state = CourseState::parse(&row.state)
        .ok_or_else(|| anyhow!("course {} has unknown state '{}'", row.id, row.state))?;
    let enrollments = roster
        .into_iter()
        .map(enrollment_from_row)
        .collect::<anyhow::Result<Vec<_>>>()?;

    Ok(Course {
        id: row.id,
        name: row.name,
        description: row.description,
        state,
        start_date: row.start_date,
        end_date: row.end_date,
        teacher_id: row.teacher_id,
        enrollments,
        created_at: row.created_at,
        updated_at: row.updated_at,
    })
}

fn enrollment_from_row(row: enrollment::Model) -> anyhow::Result<Enrollment> {
    let state = EnrollmentState::parse(&row.state).ok_or_else(|| {
        anyhow!(
            "enrollment of student {} has unknown state '{}'",
            row.student_id,
            row.state
        )
    })?;
    Ok(Enrollment {
        student_id: row.student_id,
        state,
        enrolled_at: row.enrolled_at,
    })
}

impl From<class::Model> for Class {
    fn from(row: class::Model) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            name: row.name,
            date: row.date,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl From<attendance::Model> for Attendance {
    fn from(row: attendance::Model) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            student_id: row.student_id,
            class_id: row.class_id,
            date: row.date,
            present: row.present,
            updated_at: row.updated_at,
        }
    }
}

impl From<notice::Model> for Notice {
    fn from(row: notice::Model) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Unknown role names are skipped rather than rejected.
impl From<user::Model> for UserRef {
    fn from(row: user::Model) -> Self {
        Self {
            id: row.id,
            display_name: row.display_name,
            roles: row.roles.split(',').filter_map(Role::parse).collect(),
        }
    }
}
