//! Opt-in unique indexes for the attendance key and roster entries.
//!
//! Existing databases may already hold duplicates, so these are applied at
//! startup only when `courses.enforce_unique_constraints` is set. Creation
//! fails if duplicates are present.

use anyhow::Context;
use sea_orm::DatabaseConnection;
use sea_orm_migration::prelude::*;
use tracing::info;

use crate::infra::storage::migrations::{Attendance, CourseEnrollments};

pub async fn apply_unique_constraints(conn: &DatabaseConnection) -> anyhow::Result<()> {
    let manager = SchemaManager::new(conn);

    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .unique()
                .name("ux_attendance_key")
                .table(Attendance::Table)
                .col(Attendance::StudentId)
                .col(Attendance::CourseId)
                .col(Attendance::ClassId)
                .to_owned(),
        )
        .await
        .context("unique attendance index failed (duplicate records?)")?;

    manager
        .create_index(
            Index::create()
                .if_not_exists()
                .unique()
                .name("ux_course_enrollments_student")
                .table(CourseEnrollments::Table)
                .col(CourseEnrollments::CourseId)
                .col(CourseEnrollments::StudentId)
                .to_owned(),
        )
        .await
        .context("unique roster index failed (duplicate enrollments?)")?;

    info!("Unique constraints on attendance and enrollments are in place");
    Ok(())
}
