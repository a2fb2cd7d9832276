use std::sync::Arc;

use axum::{http::StatusCode, Extension};
use tracing::{error, info};
use uuid::Uuid;

use crate::api::rest::dto::{
    AttendanceDto, AttendanceReq, ChangeCourseStateReq, ChangeStudentStateReq, ChangeTeacherReq,
    ClassDto, CourseAttendanceStatsDto, CourseDetailsDto, CourseDto, CreateClassReq,
    CreateCourseReq, ListCoursesQuery, NoticeDto, NoticeReq, StudentAttendanceStatsDto,
    UpdateClassReq, UpdateCourseReq,
};
use crate::api::rest::error::{map_domain_error, ApiError, ErrorBody, RequestCtx};
use crate::api::rest::extract::{Json, Path, Query};
use crate::contract::model::AttendanceKey;
use crate::domain::repo::CourseFilter;
use crate::domain::service::{parse_presence, Service};

// --- courses ---

/// List courses, optionally filtered by teacher
#[utoipa::path(
    get,
    path = "/courses",
    tag = "courses",
    params(ListCoursesQuery),
    responses(
        (status = 200, description = "List of courses", body = [CourseDto]),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn list_courses(
    Extension(svc): Extension<Arc<Service>>,
    Query(query): Query<ListCoursesQuery>,
    ctx: RequestCtx,
) -> Result<Json<Vec<CourseDto>>, ApiError> {
    info!("Listing courses with query: {:?}", query);

    let filter = CourseFilter {
        teacher_id: query.teacher_id,
    };
    match svc.list_courses(filter).await {
        Ok(courses) => Ok(Json(courses.into_iter().map(CourseDto::from).collect())),
        Err(e) => {
            error!("Failed to list courses: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Courses taught by one teacher
#[utoipa::path(
    get,
    path = "/teachers/{teacher_id}/courses",
    tag = "courses",
    params(("teacher_id" = Uuid, Path, description = "Teacher UUID")),
    responses(
        (status = 200, description = "Courses of the teacher", body = [CourseDto]),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn list_teacher_courses(
    Extension(svc): Extension<Arc<Service>>,
    Path(teacher_id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<Json<Vec<CourseDto>>, ApiError> {
    info!("Listing courses of teacher {}", teacher_id);

    let filter = CourseFilter {
        teacher_id: Some(teacher_id),
    };
    match svc.list_courses(filter).await {
        Ok(courses) => Ok(Json(courses.into_iter().map(CourseDto::from).collect())),
        Err(e) => {
            error!("Failed to list courses of teacher {}: {}", teacher_id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Get a course with teacher, classes, notices and students expanded
#[utoipa::path(
    get,
    path = "/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Course found", body = CourseDetailsDto),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn get_course(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<Json<CourseDetailsDto>, ApiError> {
    info!("Getting course with id: {}", id);

    match svc.get_course_details(id).await {
        Ok(details) => Ok(Json(CourseDetailsDto::from(details))),
        Err(e) => {
            error!("Failed to get course {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Create a new course
#[utoipa::path(
    post,
    path = "/courses",
    tag = "courses",
    request_body = CreateCourseReq,
    responses(
        (status = 201, description = "Created course", body = CourseDto),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn create_course(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
    Json(req_body): Json<CreateCourseReq>,
) -> Result<(StatusCode, Json<CourseDto>), ApiError> {
    info!("Creating course: {:?}", req_body);

    match svc.create_course(req_body.into()).await {
        Ok(course) => Ok((StatusCode::CREATED, Json(CourseDto::from(course)))),
        Err(e) => {
            error!("Failed to create course: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Update an existing course
#[utoipa::path(
    put,
    path = "/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course UUID")),
    request_body = UpdateCourseReq,
    responses(
        (status = 200, description = "Updated course", body = CourseDto),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn update_course(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
    Json(req_body): Json<UpdateCourseReq>,
) -> Result<Json<CourseDto>, ApiError> {
    info!("Updating course {} with: {:?}", id, req_body);

    match svc.update_course(id, req_body.into()).await {
        Ok(course) => Ok(Json(CourseDto::from(course))),
        Err(e) => {
            error!("Failed to update course {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Delete a course with its classes, attendance, notices and roster
#[utoipa::path(
    delete,
    path = "/courses/{id}",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course UUID")),
    responses(
        (status = 204, description = "Course deleted"),
        (status = 404, description = "Not Found", body = ErrorBody),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn delete_course(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<StatusCode, ApiError> {
    info!("Deleting course: {}", id);

    match svc.delete_course(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete course {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/courses/{id}/state",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course UUID")),
    request_body = ChangeCourseStateReq,
    responses(
        (status = 200, description = "Course with new state", body = CourseDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn change_course_state(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
    Json(req_body): Json<ChangeCourseStateReq>,
) -> Result<Json<CourseDto>, ApiError> {
    info!("Changing state of course {} to {:?}", id, req_body.state);

    match svc.change_state(id, req_body.state.into()).await {
        Ok(course) => Ok(Json(CourseDto::from(course))),
        Err(e) => {
            error!("Failed to change state of course {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/courses/{id}/teacher",
    tag = "courses",
    params(("id" = Uuid, Path, description = "Course UUID")),
    request_body = ChangeTeacherReq,
    responses(
        (status = 200, description = "Course with new teacher", body = CourseDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn change_course_teacher(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
    Json(req_body): Json<ChangeTeacherReq>,
) -> Result<Json<CourseDto>, ApiError> {
    info!("Changing teacher of course {} to {}", id, req_body.teacher_id);

    match svc.change_teacher(id, req_body.teacher_id).await {
        Ok(course) => Ok(Json(CourseDto::from(course))),
        Err(e) => {
            error!("Failed to change teacher of course {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

// --- roster ---

/// Enroll a student into an `Available` course
#[utoipa::path(
    post,
    path = "/courses/{id}/students/{student_id}",
    tag = "enrollment",
    params(
        ("id" = Uuid, Path, description = "Course UUID"),
        ("student_id" = Uuid, Path, description = "Student UUID")
    ),
    responses(
        (status = 200, description = "Course with updated roster", body = CourseDto),
        (status = 400, description = "Already enrolled or course not open", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn enroll_student(
    Extension(svc): Extension<Arc<Service>>,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
    ctx: RequestCtx,
) -> Result<Json<CourseDto>, ApiError> {
    info!("Enrolling student {} into course {}", student_id, id);

    match svc.enroll_student(id, student_id).await {
        Ok(course) => Ok(Json(CourseDto::from(course))),
        Err(e) => {
            error!("Failed to enroll student {} into {}: {}", student_id, id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    patch,
    path = "/courses/{id}/students/{student_id}",
    tag = "enrollment",
    params(
        ("id" = Uuid, Path, description = "Course UUID"),
        ("student_id" = Uuid, Path, description = "Student UUID")
    ),
    request_body = ChangeStudentStateReq,
    responses(
        (status = 200, description = "Course with updated roster", body = CourseDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn change_student_state(
    Extension(svc): Extension<Arc<Service>>,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
    ctx: RequestCtx,
    Json(req_body): Json<ChangeStudentStateReq>,
) -> Result<Json<CourseDto>, ApiError> {
    info!(
        "Changing state of student {} in course {} to {:?}",
        student_id, id, req_body.state
    );

    match svc
        .change_student_state(id, student_id, req_body.state.into())
        .await
    {
        Ok(course) => Ok(Json(CourseDto::from(course))),
        Err(e) => {
            error!("Failed to change student state: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/courses/{id}/students/{student_id}",
    tag = "enrollment",
    params(
        ("id" = Uuid, Path, description = "Course UUID"),
        ("student_id" = Uuid, Path, description = "Student UUID")
    ),
    responses(
        (status = 200, description = "Course with updated roster", body = CourseDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn unenroll_student(
    Extension(svc): Extension<Arc<Service>>,
    Path((id, student_id)): Path<(Uuid, Uuid)>,
    ctx: RequestCtx,
) -> Result<Json<CourseDto>, ApiError> {
    info!("Unenrolling student {} from course {}", student_id, id);

    match svc.unenroll_student(id, student_id).await {
        Ok(course) => Ok(Json(CourseDto::from(course))),
        Err(e) => {
            error!("Failed to unenroll student {} from {}: {}", student_id, id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

// --- attendance ---

/// Mark attendance once per student and class
#[utoipa::path(
    post,
    path = "/courses/{id}/classes/{class_id}/students/{student_id}/attendance",
    tag = "attendance",
    params(
        ("id" = Uuid, Path, description = "Course UUID"),
        ("class_id" = Uuid, Path, description = "Class UUID"),
        ("student_id" = Uuid, Path, description = "Student UUID")
    ),
    request_body = AttendanceReq,
    responses(
        (status = 201, description = "Attendance recorded", body = AttendanceDto),
        (status = 400, description = "Invalid flag or already marked", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn mark_attendance(
    Extension(svc): Extension<Arc<Service>>,
    Path((course_id, class_id, student_id)): Path<(Uuid, Uuid, Uuid)>,
    ctx: RequestCtx,
    Json(req_body): Json<AttendanceReq>,
) -> Result<(StatusCode, Json<AttendanceDto>), ApiError> {
    info!(
        "Marking attendance of student {} in class {} of course {}",
        student_id, class_id, course_id
    );

    let key = AttendanceKey {
        student_id,
        course_id,
        class_id,
    };
    let result = match parse_presence(&req_body.present) {
        Ok(present) => svc.mark_attendance(key, present).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(record) => Ok((StatusCode::CREATED, Json(AttendanceDto::from(record)))),
        Err(e) => {
            error!("Failed to mark attendance: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Set the presence flag of an existing record
#[utoipa::path(
    put,
    path = "/courses/{id}/classes/{class_id}/students/{student_id}/attendance",
    tag = "attendance",
    params(
        ("id" = Uuid, Path, description = "Course UUID"),
        ("class_id" = Uuid, Path, description = "Class UUID"),
        ("student_id" = Uuid, Path, description = "Student UUID")
    ),
    request_body = AttendanceReq,
    responses(
        (status = 200, description = "Attendance corrected", body = AttendanceDto),
        (status = 400, description = "Invalid flag", body = ErrorBody),
        (status = 404, description = "No record for this key", body = ErrorBody)
    )
)]
pub async fn correct_attendance(
    Extension(svc): Extension<Arc<Service>>,
    Path((course_id, class_id, student_id)): Path<(Uuid, Uuid, Uuid)>,
    ctx: RequestCtx,
    Json(req_body): Json<AttendanceReq>,
) -> Result<Json<AttendanceDto>, ApiError> {
    info!(
        "Correcting attendance of student {} in class {} of course {}",
        student_id, class_id, course_id
    );

    let key = AttendanceKey {
        student_id,
        course_id,
        class_id,
    };
    let result = match parse_presence(&req_body.present) {
        Ok(present) => svc.correct_attendance(key, present).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(record) => Ok(Json(AttendanceDto::from(record))),
        Err(e) => {
            error!("Failed to correct attendance: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    get,
    path = "/courses/{id}/students/{student_id}/attendance",
    tag = "attendance",
    params(
        ("id" = Uuid, Path, description = "Course UUID"),
        ("student_id" = Uuid, Path, description = "Student UUID")
    ),
    responses(
        (status = 200, description = "Attendance records by date", body = [AttendanceDto]),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn list_student_attendance(
    Extension(svc): Extension<Arc<Service>>,
    Path((course_id, student_id)): Path<(Uuid, Uuid)>,
    ctx: RequestCtx,
) -> Result<Json<Vec<AttendanceDto>>, ApiError> {
    info!(
        "Listing attendance of student {} in course {}",
        student_id, course_id
    );

    match svc.list_student_attendance(course_id, student_id).await {
        Ok(records) => Ok(Json(records.into_iter().map(AttendanceDto::from).collect())),
        Err(e) => {
            error!("Failed to list attendance: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    get,
    path = "/courses/{id}/students/{student_id}/attendance/stats",
    tag = "attendance",
    params(
        ("id" = Uuid, Path, description = "Course UUID"),
        ("student_id" = Uuid, Path, description = "Student UUID")
    ),
    responses(
        (status = 200, description = "Attendance summary", body = StudentAttendanceStatsDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn student_attendance_stats(
    Extension(svc): Extension<Arc<Service>>,
    Path((course_id, student_id)): Path<(Uuid, Uuid)>,
    ctx: RequestCtx,
) -> Result<Json<StudentAttendanceStatsDto>, ApiError> {
    info!(
        "Computing attendance stats of student {} in course {}",
        student_id, course_id
    );

    match svc.student_attendance_stats(course_id, student_id).await {
        Ok(stats) => Ok(Json(stats.into())),
        Err(e) => {
            error!("Failed to compute student stats: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    get,
    path = "/courses/{id}/attendance/stats",
    tag = "attendance",
    params(("id" = Uuid, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Per-class attendance summary", body = CourseAttendanceStatsDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn course_attendance_stats(
    Extension(svc): Extension<Arc<Service>>,
    Path(course_id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<Json<CourseAttendanceStatsDto>, ApiError> {
    info!("Computing attendance stats of course {}", course_id);

    match svc.course_attendance_stats(course_id).await {
        Ok(stats) => Ok(Json(stats.into())),
        Err(e) => {
            error!("Failed to compute course stats: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

// --- classes ---

#[utoipa::path(
    get,
    path = "/classes",
    tag = "classes",
    responses(
        (status = 200, description = "All classes", body = [ClassDto]),
        (status = 500, description = "Internal Server Error", body = ErrorBody)
    )
)]
pub async fn list_all_classes(
    Extension(svc): Extension<Arc<Service>>,
    ctx: RequestCtx,
) -> Result<Json<Vec<ClassDto>>, ApiError> {
    info!("Listing all classes");

    match svc.list_classes(None).await {
        Ok(classes) => Ok(Json(classes.into_iter().map(ClassDto::from).collect())),
        Err(e) => {
            error!("Failed to list classes: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    get,
    path = "/courses/{id}/classes",
    tag = "classes",
    params(("id" = Uuid, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Classes of the course by date", body = [ClassDto]),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn list_course_classes(
    Extension(svc): Extension<Arc<Service>>,
    Path(course_id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<Json<Vec<ClassDto>>, ApiError> {
    info!("Listing classes of course {}", course_id);

    match svc.list_classes(Some(course_id)).await {
        Ok(classes) => Ok(Json(classes.into_iter().map(ClassDto::from).collect())),
        Err(e) => {
            error!("Failed to list classes of course {}: {}", course_id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    post,
    path = "/courses/{id}/classes",
    tag = "classes",
    params(("id" = Uuid, Path, description = "Course UUID")),
    request_body = CreateClassReq,
    responses(
        (status = 201, description = "Created class", body = ClassDto),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn create_class(
    Extension(svc): Extension<Arc<Service>>,
    Path(course_id): Path<Uuid>,
    ctx: RequestCtx,
    Json(req_body): Json<CreateClassReq>,
) -> Result<(StatusCode, Json<ClassDto>), ApiError> {
    info!("Creating class in course {}: {:?}", course_id, req_body);

    match svc.create_class(course_id, req_body.into()).await {
        Ok(class) => Ok((StatusCode::CREATED, Json(ClassDto::from(class)))),
        Err(e) => {
            error!("Failed to create class: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    get,
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = Uuid, Path, description = "Class UUID")),
    responses(
        (status = 200, description = "Class found", body = ClassDto),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn get_class(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<Json<ClassDto>, ApiError> {
    info!("Getting class with id: {}", id);

    match svc.get_class(id).await {
        Ok(class) => Ok(Json(ClassDto::from(class))),
        Err(e) => {
            error!("Failed to get class {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    put,
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = Uuid, Path, description = "Class UUID")),
    request_body = UpdateClassReq,
    responses(
        (status = 200, description = "Updated class", body = ClassDto),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_class(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
    Json(req_body): Json<UpdateClassReq>,
) -> Result<Json<ClassDto>, ApiError> {
    info!("Updating class {} with: {:?}", id, req_body);

    match svc.update_class(id, req_body.into()).await {
        Ok(class) => Ok(Json(ClassDto::from(class))),
        Err(e) => {
            error!("Failed to update class {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

/// Delete a class and its attendance records
#[utoipa::path(
    delete,
    path = "/classes/{id}",
    tag = "classes",
    params(("id" = Uuid, Path, description = "Class UUID")),
    responses(
        (status = 204, description = "Class deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_class(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<StatusCode, ApiError> {
    info!("Deleting class: {}", id);

    match svc.delete_class(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete class {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

// --- notices ---

#[utoipa::path(
    get,
    path = "/courses/{id}/notices",
    tag = "notices",
    params(("id" = Uuid, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Notices, newest first", body = [NoticeDto]),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn list_notices(
    Extension(svc): Extension<Arc<Service>>,
    Path(course_id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<Json<Vec<NoticeDto>>, ApiError> {
    info!("Listing notices of course {}", course_id);

    match svc.list_notices(course_id).await {
        Ok(notices) => Ok(Json(notices.into_iter().map(NoticeDto::from).collect())),
        Err(e) => {
            error!("Failed to list notices of course {}: {}", course_id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    post,
    path = "/courses/{id}/notices",
    tag = "notices",
    params(("id" = Uuid, Path, description = "Course UUID")),
    request_body = NoticeReq,
    responses(
        (status = 201, description = "Created notice", body = NoticeDto),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn create_notice(
    Extension(svc): Extension<Arc<Service>>,
    Path(course_id): Path<Uuid>,
    ctx: RequestCtx,
    Json(req_body): Json<NoticeReq>,
) -> Result<(StatusCode, Json<NoticeDto>), ApiError> {
    info!("Creating notice in course {}", course_id);

    match svc.create_notice(course_id, req_body.content).await {
        Ok(notice) => Ok((StatusCode::CREATED, Json(NoticeDto::from(notice)))),
        Err(e) => {
            error!("Failed to create notice: {}", e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    put,
    path = "/notices/{id}",
    tag = "notices",
    params(("id" = Uuid, Path, description = "Notice UUID")),
    request_body = NoticeReq,
    responses(
        (status = 200, description = "Updated notice", body = NoticeDto),
        (status = 400, description = "Bad Request", body = ErrorBody),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn update_notice(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
    Json(req_body): Json<NoticeReq>,
) -> Result<Json<NoticeDto>, ApiError> {
    info!("Updating notice {}", id);

    match svc.update_notice(id, req_body.content).await {
        Ok(notice) => Ok(Json(NoticeDto::from(notice))),
        Err(e) => {
            error!("Failed to update notice {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}

#[utoipa::path(
    delete,
    path = "/notices/{id}",
    tag = "notices",
    params(("id" = Uuid, Path, description = "Notice UUID")),
    responses(
        (status = 204, description = "Notice deleted"),
        (status = 404, description = "Not Found", body = ErrorBody)
    )
)]
pub async fn delete_notice(
    Extension(svc): Extension<Arc<Service>>,
    Path(id): Path<Uuid>,
    ctx: RequestCtx,
) -> Result<StatusCode, ApiError> {
    info!("Deleting notice: {}", id);

    match svc.delete_notice(id).await {
        Ok(()) => Ok(StatusCode::NO_CONTENT),
        Err(e) => {
            error!("Failed to delete notice {}: {}", id, e);
            Err(map_domain_error(&e, &ctx))
        }
    }
}
