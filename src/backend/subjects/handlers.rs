//! Subject HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::extract::ValidJson;
use crate::shared::school::{PageQuery, Subject, SubjectRequest};
use crate::shared::validation::parse_id;
use crate::shared::ApiResponse;

/// `GET /api/subjects`
pub async fn list_subjects(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Subject>>>, BackendError> {
    let pagination = query.pagination()?;
    let subjects = db::list(&pool, pagination).await?;
    let total = db::count(&pool).await?;
    Ok(Json(ApiResponse::page(subjects, total, pagination)))
}

/// `GET /api/subjects/{id}`
pub async fn get_subject(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<Subject>>, BackendError> {
    let id = parse_id(&id, "subject")?;
    let subject = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Subject", id))?;
    Ok(Json(ApiResponse::ok(subject)))
}

/// `POST /api/subjects`
pub async fn create_subject(
    State(pool): State<SqlitePool>,
    ValidJson(request): ValidJson<SubjectRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Subject>>), BackendError> {
    let input = request.validate()?;
    let subject = db::create(&pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(subject).with_message("Subject created successfully")),
    ))
}

/// `PUT /api/subjects/{id}`
pub async fn update_subject(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<SubjectRequest>,
) -> Result<Json<ApiResponse<Subject>>, BackendError> {
    let id = parse_id(&id, "subject")?;
    let subject = db::update(&pool, id, &request).await?;
    Ok(Json(
        ApiResponse::ok(subject).with_message("Subject updated successfully"),
    ))
}

/// `DELETE /api/subjects/{id}`
pub async fn delete_subject(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let id = parse_id(&id, "subject")?;
    db::delete(&pool, id).await?;
    Ok(Json(ApiResponse::message("Subject deleted successfully")))
}
