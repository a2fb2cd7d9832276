//! SeaORM-backed implementations of the domain ports.
//!
//! Every repository is generic over `C: ConnectionTrait + TransactionTrait`, so
//! it can be built over a `DatabaseConnection` or over a transaction. Writes
//! that touch more than one table open their own transaction on `C`.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use anyhow::Context;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, DatabaseConnection, DbErr,
    EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, Set, SqlErr, TransactionTrait,
};
use uuid::Uuid;

use crate::contract::model::{Attendance, AttendanceKey, Class, Course, Notice, UserRef};
use crate::domain::repo::{
    AttendanceFilter, AttendanceRepository, ClassesRepository, CourseFilter, CoursesRepository,
    NoticesRepository, UniqueViolation, UsersDirectory,
};
use crate::domain::service::Repositories;
use crate::infra::storage::entity::{attendance, class, course, enrollment, notice, user};
use crate::infra::storage::mapper::course_from_rows;

/// Attach `what` to a write failure, surfacing unique index hits as [`UniqueViolation`].
fn write_err(err: DbErr, what: &'static str) -> anyhow::Error {
    match err.sql_err() {
        Some(SqlErr::UniqueConstraintViolation(detail)) => {
            anyhow::Error::new(UniqueViolation(detail)).context(what)
        }
        _ => anyhow::Error::new(err).context(what),
    }
}

/// Wire every port over one shared connection.
pub fn repositories(conn: DatabaseConnection) -> Repositories {
    Repositories {
        courses: Arc::new(SeaOrmCoursesRepository::new(conn.clone())),
        classes: Arc::new(SeaOrmClassesRepository::new(conn.clone())),
        attendance: Arc::new(SeaOrmAttendanceRepository::new(conn.clone())),
        notices: Arc::new(SeaOrmNoticesRepository::new(conn.clone())),
        users: Arc::new(SeaOrmUsersDirectory::new(conn)),
    }
}

// --- courses ---

pub struct SeaOrmCoursesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmCoursesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn course_row(c: &Course) -> course::ActiveModel {
    course::ActiveModel {
        id: Set(c.id),
        name: Set(c.name.clone()),
        description: Set(c.description.clone()),
        state: Set(c.state.as_str().to_owned()),
        start_date: Set(c.start_date),
        end_date: Set(c.end_date),
        teacher_id: Set(c.teacher_id),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

/// Bring the roster rows of `course` in line with `course.enrollments`.
async fn sync_roster<T>(txn: &T, course: &Course) -> anyhow::Result<()>
where
    T: ConnectionTrait,
{
    let keep: Vec<Uuid> = course.enrollments.iter().map(|e| e.student_id).collect();

    let mut removal = enrollment::Entity::delete_many()
        .filter(enrollment::Column::CourseId.eq(course.id));
    if !keep.is_empty() {
        removal = removal.filter(enrollment::Column::StudentId.is_not_in(keep));
    }
    removal
        .exec(txn)
        .await
        .context("roster cleanup failed")?;

    for (position, entry) in course.enrollments.iter().enumerate() {
        let position = i32::try_from(position).context("roster too large")?;
        let updated = enrollment::Entity::update_many()
            .col_expr(
                enrollment::Column::State,
                sea_orm::sea_query::Expr::value(entry.state.as_str()),
            )
            .col_expr(
                enrollment::Column::Position,
                sea_orm::sea_query::Expr::value(position),
            )
            .filter(enrollment::Column::CourseId.eq(course.id))
            .filter(enrollment::Column::StudentId.eq(entry.student_id))
            .exec(txn)
            .await
            .context("roster update failed")?;

        if updated.rows_affected == 0 {
            enrollment::ActiveModel {
                id: Set(Uuid::new_v4()),
                course_id: Set(course.id),
                student_id: Set(entry.student_id),
                state: Set(entry.state.as_str().to_owned()),
                position: Set(position),
                enrolled_at: Set(entry.enrolled_at),
            }
            .insert(txn)
            .await
            .map_err(|e| write_err(e, "roster insert failed"))?;
        }
    }
    Ok(())
}

#[async_trait::async_trait]
impl<C> CoursesRepository for SeaOrmCoursesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Course>> {
        let Some(row) = course::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?
        else {
            return Ok(None);
        };
        let roster = enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.eq(id))
            .order_by_asc(enrollment::Column::Position)
            .all(&self.conn)
            .await
            .context("roster lookup failed")?;
        course_from_rows(row, roster).map(Some)
    }

    async fn find(&self, filter: CourseFilter) -> anyhow::Result<Vec<Course>> {
        let mut query = course::Entity::find();
        if let Some(teacher_id) = filter.teacher_id {
            query = query.filter(course::Column::TeacherId.eq(teacher_id));
        }
        let rows = query
            .order_by_asc(course::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("course listing failed")?;
        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let ids: Vec<Uuid> = rows.iter().map(|r| r.id).collect();
        let mut rosters: HashMap<Uuid, Vec<enrollment::Model>> = HashMap::new();
        for entry in enrollment::Entity::find()
            .filter(enrollment::Column::CourseId.is_in(ids))
            .order_by_asc(enrollment::Column::Position)
            .all(&self.conn)
            .await
            .context("roster listing failed")?
        {
            rosters.entry(entry.course_id).or_default().push(entry);
        }

        rows.into_iter()
            .map(|row| {
                let roster = rosters.remove(&row.id).unwrap_or_default();
                course_from_rows(row, roster)
            })
            .collect()
    }

    async fn insert(&self, c: Course) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        course_row(&c)
            .insert(&txn)
            .await
            .map_err(|e| write_err(e, "insert failed"))?;
        sync_roster(&txn, &c).await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn update(&self, c: Course) -> anyhow::Result<()> {
        let txn = self.conn.begin().await.context("begin failed")?;
        course_row(&c)
            .update(&txn)
            .await
            .map_err(|e| write_err(e, "update failed"))?;
        sync_roster(&txn, &c).await?;
        txn.commit().await.context("commit failed")?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        attendance::Entity::delete_many()
            .filter(attendance::Column::CourseId.eq(id))
            .exec(&txn)
            .await
            .context("attendance cleanup failed")?;
        class::Entity::delete_many()
            .filter(class::Column::CourseId.eq(id))
            .exec(&txn)
            .await
            .context("class cleanup failed")?;
        notice::Entity::delete_many()
            .filter(notice::Column::CourseId.eq(id))
            .exec(&txn)
            .await
            .context("notice cleanup failed")?;
        enrollment::Entity::delete_many()
            .filter(enrollment::Column::CourseId.eq(id))
            .exec(&txn)
            .await
            .context("roster cleanup failed")?;
        let res = course::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }
}

// --- classes ---

pub struct SeaOrmClassesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmClassesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn class_row(c: Class) -> class::ActiveModel {
    class::ActiveModel {
        id: Set(c.id),
        course_id: Set(c.course_id),
        name: Set(c.name),
        date: Set(c.date),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    }
}

#[async_trait::async_trait]
impl<C> ClassesRepository for SeaOrmClassesRepository<C>
where
    C: ConnectionTrait + TransactionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Class>> {
        let found = class::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_course(&self, course_id: Option<Uuid>) -> anyhow::Result<Vec<Class>> {
        let mut query = class::Entity::find();
        if let Some(course_id) = course_id {
            query = query.filter(class::Column::CourseId.eq(course_id));
        }
        let rows = query
            .order_by_asc(class::Column::Date)
            .order_by_asc(class::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("class listing failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count_by_course(&self, course_id: Uuid) -> anyhow::Result<u64> {
        class::Entity::find()
            .filter(class::Column::CourseId.eq(course_id))
            .count(&self.conn)
            .await
            .context("class count failed")
    }

    async fn insert(&self, c: Class) -> anyhow::Result<()> {
        let _ = class_row(c)
            .insert(&self.conn)
            .await
            .map_err(|e| write_err(e, "insert failed"))?;
        Ok(())
    }

    async fn update(&self, c: Class) -> anyhow::Result<()> {
        let _ = class_row(c)
            .update(&self.conn)
            .await
            .map_err(|e| write_err(e, "update failed"))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let txn = self.conn.begin().await.context("begin failed")?;
        attendance::Entity::delete_many()
            .filter(attendance::Column::ClassId.eq(id))
            .exec(&txn)
            .await
            .context("attendance cleanup failed")?;
        let res = class::Entity::delete_by_id(id)
            .exec(&txn)
            .await
            .context("delete failed")?;
        txn.commit().await.context("commit failed")?;
        Ok(res.rows_affected > 0)
    }
}

// --- attendance ---

pub struct SeaOrmAttendanceRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmAttendanceRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn attendance_row(a: Attendance) -> attendance::ActiveModel {
    attendance::ActiveModel {
        id: Set(a.id),
        course_id: Set(a.course_id),
        student_id: Set(a.student_id),
        class_id: Set(a.class_id),
        date: Set(a.date),
        present: Set(a.present),
        updated_at: Set(a.updated_at),
    }
}

fn attendance_condition(filter: AttendanceFilter) -> Condition {
    let mut cond = Condition::all();
    if let Some(id) = filter.course_id {
        cond = cond.add(attendance::Column::CourseId.eq(id));
    }
    if let Some(id) = filter.student_id {
        cond = cond.add(attendance::Column::StudentId.eq(id));
    }
    if let Some(id) = filter.class_id {
        cond = cond.add(attendance::Column::ClassId.eq(id));
    }
    if let Some(present) = filter.present {
        cond = cond.add(attendance::Column::Present.eq(present));
    }
    cond
}

#[async_trait::async_trait]
impl<C> AttendanceRepository for SeaOrmAttendanceRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_one(&self, key: AttendanceKey) -> anyhow::Result<Option<Attendance>> {
        let found = attendance::Entity::find()
            .filter(attendance::Column::CourseId.eq(key.course_id))
            .filter(attendance::Column::StudentId.eq(key.student_id))
            .filter(attendance::Column::ClassId.eq(key.class_id))
            .order_by_asc(attendance::Column::Date)
            .one(&self.conn)
            .await
            .context("find_one failed")?;
        Ok(found.map(Into::into))
    }

    async fn find(&self, filter: AttendanceFilter) -> anyhow::Result<Vec<Attendance>> {
        let rows = attendance::Entity::find()
            .filter(attendance_condition(filter))
            .order_by_asc(attendance::Column::Date)
            .all(&self.conn)
            .await
            .context("attendance listing failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn count(&self, filter: AttendanceFilter) -> anyhow::Result<u64> {
        attendance::Entity::find()
            .filter(attendance_condition(filter))
            .count(&self.conn)
            .await
            .context("attendance count failed")
    }

    async fn insert(&self, a: Attendance) -> anyhow::Result<()> {
        let _ = attendance_row(a)
            .insert(&self.conn)
            .await
            .map_err(|e| write_err(e, "insert failed"))?;
        Ok(())
    }

    async fn update(&self, a: Attendance) -> anyhow::Result<()> {
        let _ = attendance_row(a)
            .update(&self.conn)
            .await
            .map_err(|e| write_err(e, "update failed"))?;
        Ok(())
    }
}

// --- notices ---

pub struct SeaOrmNoticesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmNoticesRepository<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

fn notice_row(n: Notice) -> notice::ActiveModel {
    notice::ActiveModel {
        id: Set(n.id),
        course_id: Set(n.course_id),
        content: Set(n.content),
        created_at: Set(n.created_at),
        updated_at: Set(n.updated_at),
    }
}

#[async_trait::async_trait]
impl<C> NoticesRepository for SeaOrmNoticesRepository<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<Notice>> {
        let found = notice::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("find_by_id failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_by_course(&self, course_id: Uuid) -> anyhow::Result<Vec<Notice>> {
        let rows = notice::Entity::find()
            .filter(notice::Column::CourseId.eq(course_id))
            .order_by_desc(notice::Column::CreatedAt)
            .all(&self.conn)
            .await
            .context("notice listing failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn insert(&self, n: Notice) -> anyhow::Result<()> {
        let _ = notice_row(n)
            .insert(&self.conn)
            .await
            .map_err(|e| write_err(e, "insert failed"))?;
        Ok(())
    }

    async fn update(&self, n: Notice) -> anyhow::Result<()> {
        let _ = notice_row(n)
            .update(&self.conn)
            .await
            .map_err(|e| write_err(e, "update failed"))?;
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> anyhow::Result<bool> {
        let res = notice::Entity::delete_by_id(id)
            .exec(&self.conn)
            .await
            .context("delete failed")?;
        Ok(res.rows_affected > 0)
    }
}

// --- users (read-only) ---

pub struct SeaOrmUsersDirectory<C>
where
    C: ConnectionTrait + Send + Sync,
{
    conn: C,
}

impl<C> SeaOrmUsersDirectory<C>
where
    C: ConnectionTrait + Send + Sync,
{
    pub fn new(conn: C) -> Self {
        Self { conn }
    }
}

#[async_trait::async_trait]
impl<C> UsersDirectory for SeaOrmUsersDirectory<C>
where
    C: ConnectionTrait + Send + Sync + 'static,
{
    async fn find_by_id(&self, id: Uuid) -> anyhow::Result<Option<UserRef>> {
        let found = user::Entity::find_by_id(id)
            .one(&self.conn)
            .await
            .context("user lookup failed")?;
        Ok(found.map(Into::into))
    }

    async fn find_many(&self, ids: &[Uuid]) -> anyhow::Result<Vec<UserRef>> {
        let unique: HashSet<Uuid> = ids.iter().copied().collect();
        if unique.is_empty() {
            return Ok(Vec::new());
        }
        let rows = user::Entity::find()
            .filter(user::Column::Id.is_in(unique))
            .all(&self.conn)
            .await
            .context("user batch lookup failed")?;
        Ok(rows.into_iter().map(Into::into).collect())
    }
}
