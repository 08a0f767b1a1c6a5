//! Teacher HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use sqlx::SqlitePool;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::extract::ValidJson;
use crate::shared::school::{PageQuery, Pagination, SearchQuery, Teacher, TeacherRequest, TeacherStatus};
use crate::shared::validation::{self, parse_id};
use crate::shared::ApiResponse;

/// Query string of `GET /api/teachers`
#[derive(Debug, Default, Deserialize)]
pub struct TeacherListQuery {
    pub page: Option<String>,
    pub limit: Option<String>,
    pub status: Option<String>,
}

/// `GET /api/teachers`
pub async fn list_teachers(
    State(pool): State<SqlitePool>,
    Query(query): Query<TeacherListQuery>,
) -> Result<Json<ApiResponse<Vec<Teacher>>>, BackendError> {
    let pagination = Pagination::from_query(query.page.as_deref(), query.limit.as_deref())?;
    let status = query
        .status
        .as_deref()
        .map(TeacherStatus::parse)
        .transpose()?;

    let teachers = db::list(&pool, status, pagination).await?;
    let total = db::count(&pool, status).await?;
    Ok(Json(ApiResponse::page(teachers, total, pagination)))
}

/// `GET /api/teachers/search?q=`
pub async fn search_teachers(
    State(pool): State<SqlitePool>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<Teacher>>>, BackendError> {
    let pagination = query.pagination()?;
    let teachers = db::search(&pool, query.term()?, pagination).await?;
    Ok(Json(ApiResponse::window(teachers, pagination)))
}

/// `GET /api/teachers/subject/{id}`
pub async fn teachers_by_subject(
    State(pool): State<SqlitePool>,
    Path(subject_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Teacher>>>, BackendError> {
    let subject_id = parse_id(&subject_id, "subject")?;
    let pagination = query.pagination()?;
    let teachers = db::find_by_subject(&pool, subject_id, pagination).await?;
    Ok(Json(ApiResponse::window(teachers, pagination)))
}

/// `GET /api/teachers/active`
pub async fn active_teachers(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Teacher>>>, BackendError> {
    let pagination = query.pagination()?;
    let teachers = db::find_by_status(&pool, TeacherStatus::Active, pagination).await?;
    Ok(Json(ApiResponse::window(teachers, pagination)))
}

/// `GET /api/teachers/inactive`
pub async fn inactive_teachers(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Teacher>>>, BackendError> {
    let pagination = query.pagination()?;
    let teachers = db::find_by_status(&pool, TeacherStatus::Inactive, pagination).await?;
    Ok(Json(ApiResponse::window(teachers, pagination)))
}

/// `GET /api/teachers/{id}`
pub async fn get_teacher(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Teacher>>, BackendError> {
    let id = parse_id(&id, "teacher")?;
    let teacher = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Teacher", id))?;
    Ok(Json(ApiResponse::ok(teacher)))
}

/// `POST /api/teachers`
pub async fn create_teacher(
    State(pool): State<SqlitePool>,
    ValidJson(request): ValidJson<TeacherRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Teacher>>), BackendError> {
    let input = request.validate(validation::today())?;
    let teacher = db::create(&pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(teacher).with_message("Teacher created successfully")),
    ))
}

/// `PUT /api/teachers/{id}`
pub async fn update_teacher(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<TeacherRequest>,
) -> Result<Json<ApiResponse<Teacher>>, BackendError> {
    let id = parse_id(&id, "teacher")?;
    let teacher = db::update(&pool, id, &request, validation::today()).await?;
    Ok(Json(
        ApiResponse::ok(teacher).with_message("Teacher updated successfully"),
    ))
}

/// `DELETE /api/teachers/{id}`
pub async fn delete_teacher(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let id = parse_id(&id, "teacher")?;
    db::delete(&pool, id).await?;
    Ok(Json(ApiResponse::message("Teacher deleted successfully")))
}
