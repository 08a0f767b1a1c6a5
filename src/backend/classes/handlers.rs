//! Class HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use sqlx::SqlitePool;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::extract::ValidJson;
use crate::shared::school::{Class, ClassDetail, ClassRequest, PageQuery};
use crate::shared::validation::{self, parse_id};
use crate::shared::ApiResponse;

/// `GET /api/classes`
pub async fn list_classes(
    State(pool): State<SqlitePool>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Class>>>, BackendError> {
    let pagination = query.pagination()?;
    let classes = db::list(&pool, pagination).await?;
    let total = db::count(&pool).await?;
    Ok(Json(ApiResponse::page(classes, total, pagination)))
}

/// `GET /api/classes/teacher/{id}`
pub async fn classes_by_teacher(
    State(pool): State<SqlitePool>,
    Path(teacher_id): Path<String>,
    Query(query): Query<PageQuery>,
) -> Result<Json<ApiResponse<Vec<Class>>>, BackendError> {
    let teacher_id = parse_id(&teacher_id, "teacher")?;
    let pagination = query.pagination()?;
    let classes = db::find_by_teacher(&pool, teacher_id, pagination).await?;
    Ok(Json(ApiResponse::window(classes, pagination)))
}

/// `GET /api/classes/{id}`
pub async fn get_class(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<ClassDetail>>, BackendError> {
    let id = parse_id(&id, "class")?;
    let class = db::find_by_id(&pool, id)
        .await?
        .ok_or_else(|| BackendError::not_found("Class", id))?;
    Ok(Json(ApiResponse::ok(class)))
}

/// `POST /api/classes`
pub async fn create_class(
    State(pool): State<SqlitePool>,
    ValidJson(request): ValidJson<ClassRequest>,
) -> Result<(StatusCode, Json<ApiResponse<Class>>), BackendError> {
    let input = request.validate(validation::today())?;
    let class = db::create(&pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(class).with_message("Class created successfully")),
    ))
}

/// `PUT /api/classes/{id}`
pub async fn update_class(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<ClassRequest>,
) -> Result<Json<ApiResponse<Class>>, BackendError> {
    let id = parse_id(&id, "class")?;
    let class = db::update(&pool, id, &request, validation::today()).await?;
    Ok(Json(ApiResponse::ok(class).with_message("Class updated successfully")))
}

/// `DELETE /api/classes/{id}`
pub async fn delete_class(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let id = parse_id(&id, "class")?;
    db::delete(&pool, id).await?;
    Ok(Json(ApiResponse::message("Class deleted successfully")))
}
