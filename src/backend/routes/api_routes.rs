/**
 * API Route Handlers
 *
 * This module mounts every resource under `/api`:
 *
 * - `/api/subjects` - subject catalogue
 * - `/api/teachers` - teachers, search, by subject, by status
 * - `/api/classes` - classes, by teacher
 * - `/api/students` - students, search, by class, by status, soft/hard delete
 * - `/api/attendance` - daily records, bulk entry, history, reports
 */

use axum::routing::{delete, get, post, put};
use axum::Router;

use crate::backend::server::state::AppState;
use crate::backend::{attendance, classes, students, subjects, teachers};

/// Configure API routes
///
/// # Arguments
///
/// * `router` - The router to add routes to
///
/// # Returns
///
/// Router with API routes configured
pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    let router = subject_routes(router);
    let router = teacher_routes(router);
    let router = class_routes(router);
    let router = student_routes(router);
    attendance_routes(router)
}

fn subject_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/subjects",
            get(subjects::list_subjects).post(subjects::create_subject),
        )
        .route(
            "/api/subjects/{id}",
            get(subjects::get_subject)
                .put(subjects::update_subject)
                .delete(subjects::delete_subject),
        )
}

fn teacher_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/teachers",
            get(teachers::list_teachers).post(teachers::create_teacher),
        )
        .route("/api/teachers/search", get(teachers::search_teachers))
        .route("/api/teachers/subject/{id}", get(teachers::teachers_by_subject))
        .route("/api/teachers/active", get(teachers::active_teachers))
        .route("/api/teachers/inactive", get(teachers::inactive_teachers))
        .route(
            "/api/teachers/{id}",
            get(teachers::get_teacher)
                .put(teachers::update_teacher)
                .delete(teachers::delete_teacher),
        )
}

fn class_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/classes",
            get(classes::list_classes).post(classes::create_class),
        )
        .route("/api/classes/teacher/{id}", get(classes::classes_by_teacher))
        .route(
            "/api/classes/{id}",
            get(classes::get_class)
                .put(classes::update_class)
                .delete(classes::delete_class),
        )
}

fn student_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/students",
            get(students::list_students).post(students::create_student),
        )
        .route("/api/students/search", get(students::search_students))
        .route("/api/students/class/{id}", get(students::students_by_class))
        .route("/api/students/active", get(students::active_students))
        .route("/api/students/inactive", get(students::inactive_students))
        .route(
            "/api/students/{id}",
            get(students::get_student)
                .put(students::update_student)
                .delete(students::delete_student),
        )
        .route("/api/students/{id}/hard", delete(students::hard_delete_student))
}

fn attendance_routes(router: Router<AppState>) -> Router<AppState> {
    router
        .route(
            "/api/attendance",
            get(attendance::list_attendance).post(attendance::mark_attendance),
        )
        .route("/api/attendance/bulk", post(attendance::mark_bulk_attendance))
        .route("/api/attendance/student/{id}", get(attendance::student_history))
        .route(
            "/api/attendance/student/{id}/summary",
            get(attendance::student_summary),
        )
        .route(
            "/api/attendance/class/{id}/date/{date}",
            get(attendance::class_attendance_on_date),
        )
        .route(
            "/api/attendance/report/class/{id}",
            get(attendance::class_report),
        )
        .route(
            "/api/attendance/{id}",
            put(attendance::update_attendance).delete(attendance::delete_attendance),
        )
}
