//! Attendance HTTP Handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Serialize;
use serde_json::Value;
use sqlx::SqlitePool;

use super::db;
use crate::backend::error::BackendError;
use crate::backend::extract::ValidJson;
use crate::shared::school::attendance::{validate_bulk, AttendanceListQuery, HistoryQuery, MonthQuery};
use crate::shared::school::{AttendanceRecord, AttendanceRequest, AttendanceSummary, ClassReportRow};
use crate::shared::validation::{parse_date, parse_id};
use crate::shared::ApiResponse;

/// Result of a bulk submission
#[derive(Debug, Clone, Copy, Serialize)]
pub struct BulkOutcome {
    pub affected_rows: u64,
}

/// `GET /api/attendance`
pub async fn list_attendance(
    State(pool): State<SqlitePool>,
    Query(query): Query<AttendanceListQuery>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, BackendError> {
    let filter = query.filter()?;
    let pagination = query.pagination()?;

    let records = db::list(&pool, &filter, pagination).await?;
    let total = db::count(&pool, &filter).await?;
    Ok(Json(ApiResponse::page(records, total, pagination)))
}

/// `POST /api/attendance`
pub async fn mark_attendance(
    State(pool): State<SqlitePool>,
    ValidJson(request): ValidJson<AttendanceRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AttendanceRecord>>), BackendError> {
    let input = request.validate()?;
    let record = db::create(&pool, &input).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::ok(record).with_message("Attendance marked successfully")),
    ))
}

/// `POST /api/attendance/bulk`
///
/// The body is a bare JSON array of records. Every element is checked
/// before any is stored, and failures are reported per record.
pub async fn mark_bulk_attendance(
    State(pool): State<SqlitePool>,
    ValidJson(body): ValidJson<Value>,
) -> Result<(StatusCode, Json<ApiResponse<BulkOutcome>>), BackendError> {
    let requests = parse_bulk_body(body)?;
    let inputs = validate_bulk(&requests)?;
    let affected_rows = db::create_bulk(&pool, &inputs).await?;
    Ok((
        StatusCode::CREATED,
        Json(
            ApiResponse::ok(BulkOutcome { affected_rows })
                .with_message("Bulk attendance marked successfully"),
        ),
    ))
}

fn parse_bulk_body(body: Value) -> Result<Vec<AttendanceRequest>, BackendError> {
    let Value::Array(items) = body else {
        return Err(BackendError::validation("Attendance data must be a non-empty array"));
    };

    let mut requests = Vec::with_capacity(items.len());
    let mut details = Vec::new();
    for (index, item) in items.into_iter().enumerate() {
        match serde_json::from_value::<AttendanceRequest>(item) {
            Ok(request) => requests.push(request),
            Err(err) => details.push(format!("Record {}: {}", index + 1, err)),
        }
    }

    if details.is_empty() {
        Ok(requests)
    } else {
        Err(BackendError::validation_with_details("Validation failed", details))
    }
}

/// `GET /api/attendance/student/{id}?from=&to=`
pub async fn student_history(
    State(pool): State<SqlitePool>,
    Path(student_id): Path<String>,
    Query(query): Query<HistoryQuery>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, BackendError> {
    let student_id = parse_id(&student_id, "student")?;
    let range = query.range()?;
    let records = db::history(&pool, student_id, range).await?;
    Ok(Json(ApiResponse::list(records)))
}

/// `GET /api/attendance/student/{id}/summary?month=&year=`
pub async fn student_summary(
    State(pool): State<SqlitePool>,
    Path(student_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ApiResponse<AttendanceSummary>>, BackendError> {
    let student_id = parse_id(&student_id, "student")?;
    let (month, year) = query.month_year()?;
    let summary = db::monthly_summary(&pool, student_id, month, year).await?;
    Ok(Json(ApiResponse::ok(summary)))
}

/// `GET /api/attendance/class/{id}/date/{date}`
pub async fn class_attendance_on_date(
    State(pool): State<SqlitePool>,
    Path((class_id, date)): Path<(String, String)>,
) -> Result<Json<ApiResponse<Vec<AttendanceRecord>>>, BackendError> {
    let class_id = parse_id(&class_id, "class")?;
    let date = parse_date(&date, "date")?;
    let records = db::class_on_date(&pool, class_id, date).await?;
    Ok(Json(ApiResponse::list(records)))
}

/// `GET /api/attendance/report/class/{id}?month=&year=`
pub async fn class_report(
    State(pool): State<SqlitePool>,
    Path(class_id): Path<String>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<ApiResponse<Vec<ClassReportRow>>>, BackendError> {
    let class_id = parse_id(&class_id, "class")?;
    let (month, year) = query.month_year()?;
    let rows = db::class_monthly_report(&pool, class_id, month, year).await?;
    Ok(Json(ApiResponse::list(rows)))
}

/// `PUT /api/attendance/{id}`
pub async fn update_attendance(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
    ValidJson(request): ValidJson<AttendanceRequest>,
) -> Result<Json<ApiResponse<AttendanceRecord>>, BackendError> {
    let id = parse_id(&id, "attendance")?;
    let input = request.validate_replacement()?;
    let record = db::update(&pool, id, &input).await?;
    Ok(Json(
        ApiResponse::ok(record).with_message("Attendance updated successfully"),
    ))
}

/// `DELETE /api/attendance/{id}`
pub async fn delete_attendance(
    State(pool): State<SqlitePool>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<()>>, BackendError> {
    let id = parse_id(&id, "attendance")?;
    db::delete(&pool, id).await?;
    Ok(Json(ApiResponse::message("Attendance deleted successfully")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;
    use serde_json::json;

    #[test]
    fn test_bulk_body_must_be_array() {
        let err = parse_bulk_body(json!({"student_id": 1})).unwrap_err();
        assert_eq!(err.message(), "Attendance data must be a non-empty array");
    }

    #[test]
    fn test_bulk_body_reports_bad_elements() {
        let err = parse_bulk_body(json!([
            {"student_id": 1, "class_id": 1, "date": "2025-03-03"},
            "not a record",
        ]))
        .unwrap_err();
        let details = err.details().unwrap();
        assert_eq!(details.len(), 1);
        assert!(details[0].starts_with("Record 2:"));
    }

    #[test]
    fn test_bulk_body_parses_records() {
        let requests = parse_bulk_body(json!([
            {"student_id": "1", "class_id": 2, "date": "2025-03-03", "status": "late"},
        ]))
        .unwrap();
        assert_eq!(requests.len(), 1);
        assert_matches!(requests[0].status.as_deref(), Some("late"));
    }
}
