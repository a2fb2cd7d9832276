use utoipa::OpenApi;

use crate::api::rest::{dto, error, handlers};

#[derive(OpenApi)]
#[openapi(
    info(title = "Course management API", description = "Courses, classes, attendance and notices"),
    paths(
        handlers::list_courses,
        handlers::list_teacher_courses,
        handlers::get_course,
        handlers::create_course,
        handlers::update_course,
        handlers::delete_course,
        handlers::change_course_state,
        handlers::change_course_teacher,
        handlers::enroll_student,
        handlers::change_student_state,
        handlers::unenroll_student,
        handlers::mark_attendance,
        handlers::correct_attendance,
        handlers::list_student_attendance,
        handlers::student_attendance_stats,
        handlers::course_attendance_stats,
        handlers::list_all_classes,
        handlers::list_course_classes,
        handlers::create_class,
        handlers::get_class,
        handlers::update_class,
        handlers::delete_class,
        handlers::list_notices,
        handlers::create_notice,
        handlers::update_notice,
        handlers::delete_notice,
    ),
    components(schemas(
        dto::CourseStateDto,
        dto::EnrollmentStateDto,
        dto::RoleDto,
        dto::CourseDto,
        dto::EnrollmentDto,
        dto::UserRefDto,
        dto::EnrolledStudentDto,
        dto::CourseDetailsDto,
        dto::CreateCourseReq,
        dto::UpdateCourseReq,
        dto::ChangeCourseStateReq,
        dto::ChangeTeacherReq,
        dto::ChangeStudentStateReq,
        dto::AttendanceReq,
        dto::AttendanceDto,
        dto::StudentAttendanceStatsDto,
        dto::ClassAttendanceStatsDto,
        dto::CourseAttendanceStatsDto,
        dto::ClassDto,
        dto::CreateClassReq,
        dto::UpdateClassReq,
        dto::NoticeDto,
        dto::NoticeReq,
        error::ErrorBody,
    )),
    tags(
        (name = "courses", description = "Course lifecycle"),
        (name = "enrollment", description = "Course roster"),
        (name = "attendance", description = "Attendance records and statistics"),
        (name = "classes", description = "Scheduled sessions"),
        (name = "notices", description = "Course announcements"),
    )
)]
pub struct CoursesApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_attendance_paths() {
        let doc = CoursesApiDoc::openapi();
        let paths = &doc.paths.paths;
        assert!(paths.contains_key("/courses/{id}/attendance/stats"));
        assert!(paths
            .contains_key("/courses/{id}/classes/{class_id}/students/{student_id}/attendance"));
        let schemas = doc.components.expect("components").schemas;
        assert!(schemas.contains_key("ErrorBody"));
    }
}
