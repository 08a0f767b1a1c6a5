//! Database operations for students
//!
//! Student codes are drawn at random inside the insert transaction and
//! redrawn on collision, at most [`MAX_CODE_ATTEMPTS`] times.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use uuid::Uuid;

use crate::backend::attendance::db::SELECT_ATTENDANCE;
use crate::backend::error::BackendError;
use crate::backend::repository::{ensure_exists, like_pattern, push_pagination, Conditions, Table};
use crate::shared::school::student::student_code;
use crate::shared::school::{
    AttendanceRecord, Pagination, Student, StudentDetail, StudentFilter, StudentInput, StudentRequest,
    StudentStatus,
};
use crate::shared::validation;

/// Draws of a random student code before giving up
pub const MAX_CODE_ATTEMPTS: usize = 10;

pub(crate) const SELECT_STUDENT: &str = r#"
    SELECT s.id, s.student_code, s.name, s.email, s.phone, s.class_id, c.class_name,
           s.enrollment_date, s.date_of_birth, s.gender, s.address, s.guardian_name,
           s.guardian_phone, s.status, s.created_at, s.updated_at
    FROM students s
    LEFT JOIN classes c ON c.id = s.class_id
"#;

fn push_filter(query: &mut QueryBuilder<'_, Sqlite>, filter: &StudentFilter) {
    let mut conditions = Conditions::new();
    if let Some(status) = filter.status {
        conditions.next(query);
        query.push("s.status = ").push_bind(status);
    }
    if let Some(class_id) = filter.class_id {
        conditions.next(query);
        query.push("s.class_id = ").push_bind(class_id);
    }
    if let Some(term) = &filter.search {
        let pattern = like_pattern(term);
        conditions.next(query);
        query
            .push(r"(s.name LIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR s.student_code LIKE ")
            .push_bind(pattern.clone())
            .push(r" ESCAPE '\' OR s.email LIKE ")
            .push_bind(pattern)
            .push(r" ESCAPE '\')");
    }
}

/// List students by ID with optional status, class and search filters
pub async fn list(
    pool: &SqlitePool,
    filter: &StudentFilter,
    pagination: Option<Pagination>,
) -> Result<Vec<Student>, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_STUDENT);
    push_filter(&mut query, filter);
    query.push(" ORDER BY s.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Student>().fetch_all(pool).await?)
}

/// Number of students matching `filter`
pub async fn count(pool: &SqlitePool, filter: &StudentFilter) -> Result<i64, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM students s");
    push_filter(&mut query, filter);
    let (total,) = query.build_query_as::<(i64,)>().fetch_one(pool).await?;
    Ok(total)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!("{SELECT_STUDENT} WHERE s.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

async fn fetch_existing(conn: &mut SqliteConnection, id: i64) -> Result<Student, BackendError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Table::Students.entity(), id))
}

/// Get a student together with their attendance, newest first
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<StudentDetail>, BackendError> {
    let mut conn = pool.acquire().await?;

    let Some(student) = fetch(&mut conn, id).await? else {
        return Ok(None);
    };

    let attendance = sqlx::query_as::<_, AttendanceRecord>(&format!(
        "{SELECT_ATTENDANCE} WHERE a.student_id = ? ORDER BY a.date DESC, a.id ASC"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(StudentDetail { student, attendance }))
}

/// Substring search over name, code and email, ordered by name
pub async fn search(
    pool: &SqlitePool,
    term: &str,
    pagination: Option<Pagination>,
) -> Result<Vec<Student>, BackendError> {
    let filter = StudentFilter {
        search: Some(term.to_string()),
        ..Default::default()
    };
    let students = list_by_name(pool, &filter, pagination).await?;
    tracing::debug!("Student search for {:?} matched {}", term, students.len());
    Ok(students)
}

/// Students enrolled in a class, ordered by name; the class must exist
pub async fn find_by_class(
    pool: &SqlitePool,
    class_id: i64,
    pagination: Option<Pagination>,
) -> Result<Vec<Student>, BackendError> {
    let mut conn = pool.acquire().await?;
    ensure_exists(&mut conn, Table::Classes, class_id).await?;

    let filter = StudentFilter {
        class_id: Some(class_id),
        ..Default::default()
    };
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_STUDENT);
    push_filter(&mut query, &filter);
    query.push(" ORDER BY s.name ASC, s.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Student>().fetch_all(&mut *conn).await?)
}

/// Students with one status, ordered by name
pub async fn find_by_status(
    pool: &SqlitePool,
    status: StudentStatus,
    pagination: Option<Pagination>,
) -> Result<Vec<Student>, BackendError> {
    let filter = StudentFilter {
        status: Some(status),
        ..Default::default()
    };
    list_by_name(pool, &filter, pagination).await
}

async fn list_by_name(
    pool: &SqlitePool,
    filter: &StudentFilter,
    pagination: Option<Pagination>,
) -> Result<Vec<Student>, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_STUDENT);
    push_filter(&mut query, filter);
    query.push(" ORDER BY s.name ASC, s.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Student>().fetch_all(pool).await?)
}

async fn ensure_email_free(
    conn: &mut SqliteConnection,
    email: Option<&str>,
    exclude_id: Option<i64>,
) -> Result<(), BackendError> {
    let Some(email) = email else {
        return Ok(());
    };
    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM students WHERE email = ? AND id != ?")
        .bind(email)
        .bind(exclude_id.unwrap_or(0))
        .fetch_optional(&mut *conn)
        .await?;
    match taken {
        Some(_) => Err(BackendError::conflict(format!("Email {email} already exists"))),
        None => Ok(()),
    }
}

/// Draw codes until one is unused
async fn unused_code(conn: &mut SqliteConnection, year: i32) -> Result<String, BackendError> {
    for attempt in 1..=MAX_CODE_ATTEMPTS {
        let code = student_code(year, Uuid::new_v4().as_u128());
        let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM students WHERE student_code = ?")
            .bind(&code)
            .fetch_optional(&mut *conn)
            .await?;
        if taken.is_none() {
            return Ok(code);
        }
        tracing::debug!("Student code {} taken (attempt {})", code, attempt);
    }
    Err(BackendError::conflict("Unable to generate a unique student code"))
}

/// Create a new student with a generated code
pub async fn create(pool: &SqlitePool, input: &StudentInput) -> Result<Student, BackendError> {
    let mut tx = pool.begin().await?;

    ensure_exists(&mut tx, Table::Classes, input.class_id).await?;
    ensure_email_free(&mut tx, input.email.as_deref(), None).await?;
    let code = unused_code(&mut tx, validation::current_year()).await?;

    let id = sqlx::query(
        r#"
        INSERT INTO students (
            student_code, name, email, phone, class_id, enrollment_date, date_of_birth,
            gender, address, guardian_name, guardian_phone, status
        )
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&code)
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(input.class_id)
    .bind(input.enrollment_date)
    .bind(input.date_of_birth)
    .bind(input.gender)
    .bind(&input.address)
    .bind(&input.guardian_name)
    .bind(&input.guardian_phone)
    .bind(input.status)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let student = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Created student {} ({})", id, code);
    Ok(student)
}

/// Merge `request` onto the stored student and save it
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    request: &StudentRequest,
    today: NaiveDate,
) -> Result<Student, BackendError> {
    let mut tx = pool.begin().await?;

    let existing = fetch_existing(&mut tx, id).await?;
    let input = request.validate_against(&existing, today)?;

    if existing.class_id != Some(input.class_id) {
        ensure_exists(&mut tx, Table::Classes, input.class_id).await?;
    }
    ensure_email_free(&mut tx, input.email.as_deref(), Some(id)).await?;

    sqlx::query(
        r#"
        UPDATE students
        SET name = ?, email = ?, phone = ?, class_id = ?, enrollment_date = ?, date_of_birth = ?,
            gender = ?, address = ?, guardian_name = ?, guardian_phone = ?, status = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(input.class_id)
    .bind(input.enrollment_date)
    .bind(input.date_of_birth)
    .bind(input.gender)
    .bind(&input.address)
    .bind(&input.guardian_name)
    .bind(&input.guardian_phone)
    .bind(input.status)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let student = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Updated student {}", id);
    Ok(student)
}

/// Mark a student inactive; the row and its attendance remain
pub async fn soft_delete(pool: &SqlitePool, id: i64) -> Result<Student, BackendError> {
    let mut tx = pool.begin().await?;

    fetch_existing(&mut tx, id).await?;
    sqlx::query("UPDATE students SET status = ?, updated_at = CURRENT_TIMESTAMP WHERE id = ?")
        .bind(StudentStatus::Inactive)
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let student = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Marked student {} inactive", id);
    Ok(student)
}

/// Remove a student permanently; attendance rows cascade
pub async fn hard_delete(pool: &SqlitePool, id: i64) -> Result<Student, BackendError> {
    let mut tx = pool.begin().await?;

    let student = fetch_existing(&mut tx, id).await?;
    sqlx::query("DELETE FROM students WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("Permanently deleted student {}", id);
    Ok(student)
}
