//! Database operations for attendance
//!
//! Every write checks that the referenced student and class exist and that
//! the student has no other record on the same date. The unique index on
//! `(student_id, date)` backs the date check.
//!
//! Bulk submissions validate all references up front with one `IN` query
//! per table, then insert every row in a single statement. Both steps share
//! one transaction, so a batch is stored completely or not at all.

use std::collections::HashSet;

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::backend::error::BackendError;
use crate::backend::repository::{ensure_all_exist, ensure_exists, push_pagination, Conditions, Table};
use crate::shared::school::{
    AttendanceFilter, AttendanceInput, AttendanceRecord, AttendanceSummary, ClassReportRow, DateRange,
    Pagination, StatusCount,
};
use crate::shared::validation::month_bounds;

pub(crate) const SELECT_ATTENDANCE: &str = r#"
    SELECT a.id, a.student_id, s.name AS student_name, a.class_id, c.class_name,
           a.date, a.status, a.remarks, a.created_at, a.updated_at
    FROM attendance a
    JOIN students s ON s.id = a.student_id
    JOIN classes c ON c.id = a.class_id
"#;

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &AttendanceFilter) {
    let mut conditions = Conditions::new();
    if let Some(date) = filter.date {
        conditions.next(query);
        query.push("a.date = ").push_bind(date);
    }
    if let Some(class_id) = filter.class_id {
        conditions.next(query);
        query.push("a.class_id = ").push_bind(class_id);
    }
    if let Some(student_id) = filter.student_id {
        conditions.next(query);
        query.push("a.student_id = ").push_bind(student_id);
    }
    if let Some(status) = filter.status {
        conditions.next(query);
        query.push("a.status = ").push_bind(status);
    }
}

/// List records newest first, matching every filter present
pub async fn list(
    pool: &SqlitePool,
    filter: &AttendanceFilter,
    pagination: Option<Pagination>,
) -> Result<Vec<AttendanceRecord>, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_ATTENDANCE);
    push_filter(&mut query, filter);
    query.push(" ORDER BY a.date DESC, a.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<AttendanceRecord>().fetch_all(pool).await?)
}

/// Number of records matching `filter`
pub async fn count(pool: &SqlitePool, filter: &AttendanceFilter) -> Result<i64, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM attendance a");
    push_filter(&mut query, filter);
    let (total,) = query.build_query_as::<(i64,)>().fetch_one(pool).await?;
    Ok(total)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Option<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!("{SELECT_ATTENDANCE} WHERE a.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

async fn fetch_existing(conn: &mut SqliteConnection, id: i64) -> Result<AttendanceRecord, BackendError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Table::Attendance.entity(), id))
}

/// Get a record by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<AttendanceRecord>, BackendError> {
    let mut conn = pool.acquire().await?;
    Ok(fetch(&mut conn, id).await?)
}

/// Reject a second record for the same student and day
async fn ensure_day_free(
    conn: &mut SqliteConnection,
    student_id: i64,
    date: NaiveDate,
    exclude_id: Option<i64>,
) -> Result<(), BackendError> {
    let taken: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM attendance WHERE student_id = ? AND date = ? AND id != ?")
            .bind(student_id)
            .bind(date)
            .bind(exclude_id.unwrap_or(0))
            .fetch_optional(&mut *conn)
            .await?;
    match taken {
        Some(_) => Err(day_taken(student_id, date)),
        None => Ok(()),
    }
}

fn day_taken(student_id: i64, date: NaiveDate) -> BackendError {
    BackendError::conflict(format!(
        "Attendance for student {student_id} on {date} already exists"
    ))
}

/// Record one day of attendance
pub async fn create(pool: &SqlitePool, input: &AttendanceInput) -> Result<AttendanceRecord, BackendError> {
    let mut tx = pool.begin().await?;

    ensure_exists(&mut tx, Table::Students, input.student_id).await?;
    ensure_exists(&mut tx, Table::Classes, input.class_id).await?;
    ensure_day_free(&mut tx, input.student_id, input.date, None).await?;

    let id = sqlx::query(
        r#"
        INSERT INTO attendance (student_id, class_id, date, status, remarks)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(input.student_id)
    .bind(input.class_id)
    .bind(input.date)
    .bind(input.status)
    .bind(&input.remarks)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let record = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!(
        "Recorded attendance {} for student {} on {}",
        id,
        input.student_id,
        input.date
    );
    Ok(record)
}

/// Insert a validated batch atomically, returning the number of rows stored
///
/// Fails without inserting anything when any referenced student or class is
/// missing, when the batch names one student twice for the same day, or when
/// a row collides with a stored record.
pub async fn create_bulk(pool: &SqlitePool, inputs: &[AttendanceInput]) -> Result<u64, BackendError> {
    let mut seen = HashSet::with_capacity(inputs.len());
    for input in inputs {
        if !seen.insert((input.student_id, input.date)) {
            return Err(BackendError::conflict(format!(
                "Attendance for student {} on {} appears more than once in the batch",
                input.student_id, input.date
            )));
        }
    }

    let student_ids: Vec<i64> = inputs.iter().map(|i| i.student_id).collect();
    let class_ids: Vec<i64> = inputs.iter().map(|i| i.class_id).collect();

    let mut tx = pool.begin().await?;

    ensure_all_exist(&mut tx, Table::Students, &student_ids).await?;
    ensure_all_exist(&mut tx, Table::Classes, &class_ids).await?;

    let mut query =
        QueryBuilder::<Sqlite>::new("INSERT INTO attendance (student_id, class_id, date, status, remarks) ");
    query.push_values(inputs, |mut row, input| {
        row.push_bind(input.student_id)
            .push_bind(input.class_id)
            .push_bind(input.date)
            .push_bind(input.status)
            .push_bind(input.remarks.clone());
    });
    let inserted = query.build().execute(&mut *tx).await?.rows_affected();

    tx.commit().await?;

    tracing::info!("Recorded {} attendance records in bulk", inserted);
    Ok(inserted)
}

/// Replace every column of a stored record
pub async fn update(pool: &SqlitePool, id: i64, input: &AttendanceInput) -> Result<AttendanceRecord, BackendError> {
    let mut tx = pool.begin().await?;

    fetch_existing(&mut tx, id).await?;
    ensure_exists(&mut tx, Table::Students, input.student_id).await?;
    ensure_exists(&mut tx, Table::Classes, input.class_id).await?;
    ensure_day_free(&mut tx, input.student_id, input.date, Some(id)).await?;

    sqlx::query(
        r#"
        UPDATE attendance
        SET student_id = ?, class_id = ?, date = ?, status = ?, remarks = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(input.student_id)
    .bind(input.class_id)
    .bind(input.date)
    .bind(input.status)
    .bind(&input.remarks)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let record = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Updated attendance {}", id);
    Ok(record)
}

/// Remove a record
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<AttendanceRecord, BackendError> {
    let mut tx = pool.begin().await?;

    let record = fetch_existing(&mut tx, id).await?;
    sqlx::query("DELETE FROM attendance WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("Deleted attendance {}", id);
    Ok(record)
}

/// A student's records newest first, optionally within an inclusive range
pub async fn history(
    pool: &SqlitePool,
    student_id: i64,
    range: Option<DateRange>,
) -> Result<Vec<AttendanceRecord>, BackendError> {
    let mut conn = pool.acquire().await?;
    ensure_exists(&mut conn, Table::Students, student_id).await?;

    let mut query = QueryBuilder::<Sqlite>::new(SELECT_ATTENDANCE);
    query.push(" WHERE a.student_id = ").push_bind(student_id);
    if let Some(range) = range {
        query
            .push(" AND a.date BETWEEN ")
            .push_bind(range.from)
            .push(" AND ")
            .push_bind(range.to);
    }
    query.push(" ORDER BY a.date DESC, a.id ASC");

    Ok(query
        .build_query_as::<AttendanceRecord>()
        .fetch_all(&mut *conn)
        .await?)
}

/// Status counts for one student over a calendar month
pub async fn monthly_summary(
    pool: &SqlitePool,
    student_id: i64,
    month: u32,
    year: i32,
) -> Result<AttendanceSummary, BackendError> {
    let (start, end) = month_bounds(month, year)?;

    let mut conn = pool.acquire().await?;
    ensure_exists(&mut conn, Table::Students, student_id).await?;

    let breakdown = sqlx::query_as::<_, StatusCount>(
        r#"
        SELECT status, COUNT(*) AS count
        FROM attendance
        WHERE student_id = ? AND date >= ? AND date < ?
        GROUP BY status
        ORDER BY status ASC
        "#,
    )
    .bind(student_id)
    .bind(start)
    .bind(end)
    .fetch_all(&mut *conn)
    .await?;

    Ok(AttendanceSummary::new(student_id, month, year, breakdown))
}

/// Every record a class took on one day, ordered by student name
pub async fn class_on_date(
    pool: &SqlitePool,
    class_id: i64,
    date: NaiveDate,
) -> Result<Vec<AttendanceRecord>, BackendError> {
    let mut conn = pool.acquire().await?;
    ensure_exists(&mut conn, Table::Classes, class_id).await?;

    Ok(sqlx::query_as::<_, AttendanceRecord>(&format!(
        "{SELECT_ATTENDANCE} WHERE a.class_id = ? AND a.date = ? ORDER BY s.name ASC, a.id ASC"
    ))
    .bind(class_id)
    .bind(date)
    .fetch_all(&mut *conn)
    .await?)
}

/// Per-student day counts for a class over a calendar month
///
/// Every student currently in the class appears, with zeros when they have
/// no record in the month.
pub async fn class_monthly_report(
    pool: &SqlitePool,
    class_id: i64,
    month: u32,
    year: i32,
) -> Result<Vec<ClassReportRow>, BackendError> {
    let (start, end) = month_bounds(month, year)?;

    let mut conn = pool.acquire().await?;
    ensure_exists(&mut conn, Table::Classes, class_id).await?;

    let rows = sqlx::query_as::<_, ClassReportRow>(
        r#"
        SELECT s.id AS student_id, s.name AS student_name, s.student_code,
               COALESCE(SUM(CASE WHEN a.status = 'present' THEN 1 ELSE 0 END), 0) AS present_days,
               COALESCE(SUM(CASE WHEN a.status = 'absent' THEN 1 ELSE 0 END), 0) AS absent_days,
               COALESCE(SUM(CASE WHEN a.status = 'late' THEN 1 ELSE 0 END), 0) AS late_days,
               COALESCE(SUM(CASE WHEN a.status = 'excused' THEN 1 ELSE 0 END), 0) AS excused_days
        FROM students s
        LEFT JOIN attendance a
            ON a.student_id = s.id AND a.class_id = ? AND a.date >= ? AND a.date < ?
        WHERE s.class_id = ?
        GROUP BY s.id, s.name, s.student_code
        ORDER BY s.name ASC, s.id ASC
        "#,
    )
    .bind(class_id)
    .bind(start)
    .bind(end)
    .bind(class_id)
    .fetch_all(&mut *conn)
    .await?;

    tracing::debug!(
        "Class {} report for {}-{:02}: {} students",
        class_id,
        year,
        month,
        rows.len()
    );
    Ok(rows)
}
