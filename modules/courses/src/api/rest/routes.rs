use std::sync::Arc;

use axum::{
    routing::{get, patch, post, put},
    Extension, Router,
};

use crate::api::rest::handlers;
use crate::domain::service::Service;

/// Mount every courses endpoint on `router` with the service attached.
pub fn register_routes(router: Router, service: Arc<Service>) -> Router {
    let courses = Router::new()
        .route(
            "/courses",
            get(handlers::list_courses).post(handlers::create_course),
        )
        .route(
            "/courses/{id}",
            get(handlers::get_course)
                .put(handlers::update_course)
                .delete(handlers::delete_course),
        )
        .route("/courses/{id}/state", patch(handlers::change_course_state))
        .route(
            "/courses/{id}/teacher",
            patch(handlers::change_course_teacher),
        )
        .route(
            "/teachers/{teacher_id}/courses",
            get(handlers::list_teacher_courses),
        )
        .route(
            "/courses/{id}/students/{student_id}",
            post(handlers::enroll_student)
                .patch(handlers::change_student_state)
                .delete(handlers::unenroll_student),
        )
        .route(
            "/courses/{id}/classes/{class_id}/students/{student_id}/attendance",
            post(handlers::mark_attendance).put(handlers::correct_attendance),
        )
        .route(
            "/courses/{id}/students/{student_id}/attendance",
            get(handlers::list_student_attendance),
        )
        .route(
            "/courses/{id}/students/{student_id}/attendance/stats",
            get(handlers::student_attendance_stats),
        )
        .route(
            "/courses/{id}/attendance/stats",
            get(handlers::course_attendance_stats),
        )
        .route("/classes", get(handlers::list_all_classes))
        .route(
            "/courses/{id}/classes",
            get(handlers::list_course_classes).post(handlers::create_class),
        )
        .route(
            "/classes/{id}",
            get(handlers::get_class)
                .put(handlers::update_class)
                .delete(handlers::delete_class),
        )
        .route(
            "/courses/{id}/notices",
            get(handlers::list_notices).post(handlers::create_notice),
        )
        .route(
            "/notices/{id}",
            put(handlers::update_notice).delete(handlers::delete_notice),
        )
        .layer(Extension(service));

    router.merge(courses)
}
