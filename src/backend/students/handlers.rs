//! Student HTTP Handlers
//!
//! `DELETE /api/students/{id}` only marks the student inactive;
//! `DELETE /api/students/{id}/hard` removes the row and its attendance.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::extract::ValidJson;
use crate::shared::school::student::StudentListQuery;
use crate::shared::school::{PageQuery, SearchQuery, Student, StudentDetail, StudentRequest, StudentStatus};
use crate::shared::validation::{self, parse_id};
use crate::shared::ApiResponse;

/// `GET /api/students`
pub async fn list_students(
    State(pool): State<SqlitePool>,
    Query(query): Query<StudentListQuery>,
) -> Result<Json<ApiResponse<Vec<Student>>>, BackendError> {
    let filter = query.filter()?;
    let pagination = query.pagination()?;

    let students = db::list(&pool, &filter, pagination).await?;
    let total = db::count(&pool, &filter).await?;
    Ok(Json(ApiResponse::page(students, total, pagination)))
}

/// `GET /api/students/search?q=`
pub async fn search_students(
    State(pool): State<SqlitePool>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Student>>>, BackendError> {
    let pagination = query.pagination()?;
    let students = db::search(&pool, query.term()?, pagination).await?;
    Ok(Json(ApiResponse::window(students, pagination)))
}

/// `GET /api/students/class/{id}`
pub async fn students_by_class(
    State(pool): State<SqlitePool>,
    Path(class_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Student>>>, BackendError> {
    let class_id = parse_id(&class_id, "class")?;
    let pagination = query.pagination()?;
    let students = db::find_by_class(&pool, class_id, pagination).await?;
    Ok(Json(ApiResponse::window(students, pagination)))
}

/// `GET /api/students/active`
pub async fn active_students(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Student>>>, BackendError> {
    let pagination = query.pagination()?;
    let students = db::find_by_status(&pool, StudentStatus::Active, pagination).await?;
    Ok(Json(ApiResponse::window(students, pagination)))
}

/// `GET /api/students/inactive`
pub async fn inactive_students(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Student>>>, BackendError> {
    let pagination = query.pagination()?;
    let students = db::find_by_status(&pool, StudentStatus::Inactive, pagination).await?;
    Ok(Json(ApiResponse::window(students, pagination)))
}

/// `GET /api/students/{id}`
pub async fn get_student(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<StudentDetail>>, BackendError> {
    let id = parse_id(&id, "student")?;
    let student = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Student", id))?;
    Ok(Json(ApiResponse::ok(student)))
}

/// `POST /api/students`
pub async fn create_student(
    State(pool): State<SqlitePool>,
    ValidJson(request): ValidJson<StudentRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Student>>), BackendError> {
    let input = request.validate(validation::today())?;
    let student = db::create(&pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(student).with_message("Student created successfully")),
    ))
}

/// `PUT /api/students/{id}`
pub async fn update_student(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<StudentRequest>,
) -> Result<Json<ApiResponse<Student>>, BackendError> {
    let id = parse_id(&id, "student")?;
    let student = db::update(&pool, id, &request, validation::today()).await?;
    Ok(Json(
        ApiResponse::ok(student).with_message("Student updated successfully"),
    ))
}

/// `DELETE /api/students/{id}`
pub async fn delete_student(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Student>>, BackendError> {
    let id = parse_id(&id, "student")?;
    let student = db::soft_delete(&pool, id).await?;
    Ok(Json(
        ApiResponse::ok(student).with_message("Student marked as inactive"),
    ))
}

/// `DELETE /api/students/{id}/hard`
pub async fn hard_delete_student(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let id = parse_id(&id, "student")?;
    db::hard_delete(&pool, id).await?;
    Ok(Json(ApiResponse::message("Student permanently deleted")))
}
