use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::contract::model::{
    Attendance, Class, ClassAttendanceStats, ClassPatch, Course, CourseAttendanceStats,
    CourseDetails, CoursePatch, CourseState, EnrolledStudent, Enrollment, EnrollmentState,
    NewClass, NewCourse, Notice, Role, StudentAttendanceStats, UserRef,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum CourseStateDto {
    Available,
    InProgress,
    Finished,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum EnrollmentStateDto {
    InProgress,
    Passed,
    Failed,
    Withdrawn,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum RoleDto {
    Admin,
    Teacher,
    Student,
}

/// REST DTO for a course with its roster
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub state: CourseStateDto,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher_id: Uuid,
    pub students: Vec<EnrollmentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrollmentDto {
    pub student_id: Uuid,
    pub state: EnrollmentStateDto,
    pub enrolled_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct UserRefDto {
    pub id: Uuid,
    pub display_name: String,
    pub roles: Vec<RoleDto>,
}

/// Roster entry with the student record resolved (`null` when unknown).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct EnrolledStudentDto {
    pub student_id: Uuid,
    pub state: EnrollmentStateDto,
    pub enrolled_at: DateTime<Utc>,
    pub student: Option<UserRefDto>,
}

/// REST DTO for a course with teacher, classes, notices and students expanded
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseDetailsDto {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub state: CourseStateDto,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher_id: Uuid,
    pub teacher: Option<UserRefDto>,
    pub classes: Vec<ClassDto>,
    pub notices: Vec<NoticeDto>,
    pub students: Vec<EnrolledStudentDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateCourseReq {
    pub name: String,
    #[serde(default)]
    pub description: String,
    /// Defaults to `Available`.
    pub state: Option<CourseStateDto>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub teacher_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateCourseReq {
    pub name: Option<String>,
    pub description: Option<String>,
    pub state: Option<CourseStateDto>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub teacher_id: Option<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeCourseStateReq {
    pub state: CourseStateDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeTeacherReq {
    pub teacher_id: Uuid,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ChangeStudentStateReq {
    pub state: EnrollmentStateDto,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCoursesQuery {
    pub teacher_id: Option<Uuid>,
}

/// Presence flag as sent by clients: a boolean, `"true"`/`"false"`, or `0`/`1`.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceReq {
    /// Missing or null is rejected by presence parsing like any other bad value.
    #[serde(default)]
    #[schema(value_type = bool)]
    pub present: serde_json::Value,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AttendanceDto {
    pub id: Uuid,
    pub course_id: Uuid,
    pub student_id: Uuid,
    pub class_id: Uuid,
    pub date: DateTime<Utc>,
    pub present: bool,
    pub updated_at: DateTime<Utc>,
}

// Statistics keep the field names existing clients already consume.

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct StudentAttendanceStatsDto {
    #[serde(rename = "totalClases")]
    pub total_classes: u64,
    #[serde(rename = "clasesAsistidas")]
    pub attended_classes: u64,
    #[serde(rename = "porcentajeAsistencia")]
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassAttendanceStatsDto {
    #[serde(rename = "claseId")]
    pub class_id: Uuid,
    #[serde(rename = "asistenciasClase")]
    pub attended: u64,
    #[serde(rename = "totalAlumnos")]
    pub total_students: u64,
    #[serde(rename = "porcentajeAsistenciasClase")]
    pub attendance_percentage: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseAttendanceStatsDto {
    #[serde(rename = "totalClases")]
    pub total_classes: u64,
    #[serde(rename = "estadisticasClases")]
    pub classes: Vec<ClassAttendanceStatsDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ClassDto {
    pub id: Uuid,
    pub course_id: Uuid,
    pub name: String,
    pub date: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CreateClassReq {
    pub name: String,
    pub date: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema, Default)]
pub struct UpdateClassReq {
    pub name: Option<String>,
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoticeDto {
    pub id: Uuid,
    pub course_id: Uuid,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct NoticeReq {
    pub content: String,
}

// Conversion implementations between REST DTOs and contract models

impl From<CourseState> for CourseStateDto {
    fn from(state: CourseState) -> Self {
        match state {
            CourseState::Available => Self::Available,
            CourseState::InProgress => Self::InProgress,
            CourseState::Finished => Self::Finished,
        }
    }
}

impl From<CourseStateDto> for CourseState {
    fn from(state: CourseStateDto) -> Self {
        match state {
            CourseStateDto::Available => Self::Available,
            CourseStateDto::InProgress => Self::InProgress,
            CourseStateDto::Finished => Self::Finished,
        }
    }
}

impl From<EnrollmentState> for EnrollmentStateDto {
    fn from(state: EnrollmentState) -> Self {
        match state {
            EnrollmentState::InProgress => Self::InProgress,
            EnrollmentState::Passed => Self::Passed,
            EnrollmentState::Failed => Self::Failed,
            EnrollmentState::Withdrawn => Self::Withdrawn,
        }
    }
}

impl From<EnrollmentStateDto> for EnrollmentState {
    fn from(state: EnrollmentStateDto) -> Self {
        match state {
            EnrollmentStateDto::InProgress => Self::InProgress,
            EnrollmentStateDto::Passed => Self::Passed,
            EnrollmentStateDto::Failed => Self::Failed,
            EnrollmentStateDto::Withdrawn => Self::Withdrawn,
        }
    }
}

impl From<Role> for RoleDto {
    fn from(role: Role) -> Self {
        match role {
            Role::Admin => Self::Admin,
            Role::Teacher => Self::Teacher,
            Role::Student => Self::Student,
        }
    }
}

impl From<Enrollment> for EnrollmentDto {
    fn from(e: Enrollment) -> Self {
        Self {
            student_id: e.student_id,
            state: e.state.into(),
            enrolled_at: e.enrolled_at,
        }
    }
}

impl From<UserRef> for UserRefDto {
    fn from(user: UserRef) -> Self {
        Self {
            id: user.id,
            display_name: user.display_name,
            roles: user.roles.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<EnrolledStudent> for EnrolledStudentDto {
    fn from(entry: EnrolledStudent) -> Self {
        Self {
            student_id: entry.enrollment.student_id,
            state: entry.enrollment.state.into(),
            enrolled_at: entry.enrollment.enrolled_at,
            student: entry.student.map(Into::into),
        }
    }
}

impl From<Course> for CourseDto {
    fn from(course: Course) -> Self {
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            state: course.state.into(),
            start_date: course.start_date,
            end_date: course.end_date,
            teacher_id: course.teacher_id,
            students: course.enrollments.into_iter().map(Into::into).collect(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl From<CourseDetails> for CourseDetailsDto {
    fn from(details: CourseDetails) -> Self {
        let course = details.course;
        Self {
            id: course.id,
            name: course.name,
            description: course.description,
            state: course.state.into(),
            start_date: course.start_date,
            end_date: course.end_date,
            teacher_id: course.teacher_id,
            teacher: details.teacher.map(Into::into),
            classes: details.classes.into_iter().map(Into::into).collect(),
            notices: details.notices.into_iter().map(Into::into).collect(),
            students: details.students.into_iter().map(Into::into).collect(),
            created_at: course.created_at,
            updated_at: course.updated_at,
        }
    }
}

impl From<CreateCourseReq> for NewCourse {
    fn from(req: CreateCourseReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            state: req.state.map(Into::into).unwrap_or(CourseState::Available),
            start_date: req.start_date,
            end_date: req.end_date,
            teacher_id: req.teacher_id,
        }
    }
}

impl From<UpdateCourseReq> for CoursePatch {
    fn from(req: UpdateCourseReq) -> Self {
        Self {
            name: req.name,
            description: req.description,
            state: req.state.map(Into::into),
            start_date: req.start_date,
            end_date: req.end_date,
            teacher_id: req.teacher_id,
        }
    }
}

impl From<Attendance> for AttendanceDto {
    fn from(a: Attendance) -> Self {
        Self {
            id: a.id,
            course_id: a.course_id,
            student_id: a.student_id,
            class_id: a.class_id,
            date: a.date,
            present: a.present,
            updated_at: a.updated_at,
        }
    }
}

impl From<StudentAttendanceStats> for StudentAttendanceStatsDto {
    fn from(s: StudentAttendanceStats) -> Self {
        Self {
            total_classes: s.total_classes,
            attended_classes: s.attended_classes,
            attendance_percentage: s.attendance_percentage,
        }
    }
}

impl From<ClassAttendanceStats> for ClassAttendanceStatsDto {
    fn from(s: ClassAttendanceStats) -> Self {
        Self {
            class_id: s.class_id,
            attended: s.attended,
            total_students: s.total_students,
            attendance_percentage: s.attendance_percentage,
        }
    }
}

impl From<CourseAttendanceStats> for CourseAttendanceStatsDto {
    fn from(s: CourseAttendanceStats) -> Self {
        Self {
            total_classes: s.total_classes,
            classes: s.classes.into_iter().map(Into::into).collect(),
        }
    }
}

impl From<Class> for ClassDto {
    fn from(c: Class) -> Self {
        Self {
            id: c.id,
            course_id: c.course_id,
            name: c.name,
            date: c.date,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

impl From<CreateClassReq> for NewClass {
    fn from(req: CreateClassReq) -> Self {
        Self {
            name: req.name,
            date: req.date,
        }
    }
}

impl From<UpdateClassReq> for ClassPatch {
    fn from(req: UpdateClassReq) -> Self {
        Self {
            name: req.name,
            date: req.date,
        }
    }
}

impl From<Notice> for NoticeDto {
    fn from(n: Notice) -> Self {
        Self {
            id: n.id,
            course_id: n.course_id,
            content: n.content,
            created_at: n.created_at,
            updated_at: n.updated_at,
        }
    }
}
