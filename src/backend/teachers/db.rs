//! Database operations for teachers
//!
//! Every read joins the subject name and counts the classes the teacher
//! leads, so list and detail responses share one row shape.

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::backend::error::BackendError;
use crate::backend::repository::{ensure_exists, like_pattern, push_pagination, Table};
use crate::shared::school::{Pagination, Teacher, TeacherInput, TeacherRequest, TeacherStatus};

const SELECT_TEACHER: &str = r#"
    SELECT t.id, t.name, t.email, t.phone, t.subject_id, s.subject_name, t.hire_date, t.status,
           (SELECT COUNT(*) FROM classes c WHERE c.teacher_id = t.id) AS class_count,
           t.created_at, t.updated_at
    FROM teachers t
    LEFT JOIN subjects s ON s.id = t.subject_id
"#;

/// List teachers by ID, optionally restricted to one status
pub async fn list(
    pool: &SqlitePool,
    status: Option<TeacherStatus>,
    pagination: Option<Pagination>,
) -> Result<Vec<Teacher>, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_TEACHER);
    if let Some(status) = status {
        query.push(" WHERE t.status = ").push_bind(status);
    }
    query.push(" ORDER BY t.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Teacher>().fetch_all(pool).await?)
}

/// Number of teachers, optionally restricted to one status
pub async fn count(pool: &SqlitePool, status: Option<TeacherStatus>) -> Result<i64, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM teachers");
    if let Some(status) = status {
        query.push(" WHERE status = ").push_bind(status);
    }
    let (total,) = query.build_query_as::<(i64,)>().fetch_one(pool).await?;
    Ok(total)
}

/// Get a teacher by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Teacher>, BackendError> {
    let mut conn = pool.acquire().await?;
    Ok(fetch(&mut conn, id).await?)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!("{SELECT_TEACHER} WHERE t.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

async fn fetch_existing(conn: &mut SqliteConnection, id: i64) -> Result<Teacher, BackendError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Table::Teachers.entity(), id))
}

/// Case-insensitive substring search over name and email
pub async fn search(
    pool: &SqlitePool,
    term: &str,
    pagination: Option<Pagination>,
) -> Result<Vec<Teacher>, BackendError> {
    let pattern = like_pattern(term);
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_TEACHER);
    query
        .push(r" WHERE t.name LIKE ")
        .push_bind(pattern.clone())
        .push(r" ESCAPE '\' OR t.email LIKE ")
        .push_bind(pattern)
        .push(r" ESCAPE '\' ORDER BY t.name ASC, t.id ASC");
    push_pagination(&mut query, pagination);

    let teachers = query.build_query_as::<Teacher>().fetch_all(pool).await?;
    tracing::debug!("Teacher search for {:?} matched {}", term, teachers.len());
    Ok(teachers)
}

/// Teachers assigned to a subject; the subject must exist
pub async fn find_by_subject(
    pool: &SqlitePool,
    subject_id: i64,
    pagination: Option<Pagination>,
) -> Result<Vec<Teacher>, BackendError> {
    let mut conn = pool.acquire().await?;
    ensure_exists(&mut conn, Table::Subjects, subject_id).await?;

    let mut query = QueryBuilder::<Sqlite>::new(SELECT_TEACHER);
    query
        .push(" WHERE t.subject_id = ")
        .push_bind(subject_id)
        .push(" ORDER BY t.name ASC, t.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Teacher>().fetch_all(&mut *conn).await?)
}

/// Teachers with one status, ordered by name
pub async fn find_by_status(
    pool: &SqlitePool,
    status: TeacherStatus,
    pagination: Option<Pagination>,
) -> Result<Vec<Teacher>, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_TEACHER);
    query
        .push(" WHERE t.status = ")
        .push_bind(status)
        .push(" ORDER BY t.name ASC, t.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Teacher>().fetch_all(pool).await?)
}

async fn ensure_email_free(
    conn: &mut SqliteConnection,
    email: &str,
    exclude_id: Option<i64>,
) -> Result<(), BackendError> {
    let taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM teachers WHERE email = ? AND id != ?")
        .bind(email)
        .bind(exclude_id.unwrap_or(0))
        .fetch_optional(&mut *conn)
        .await?;
    match taken {
        Some(_) => Err(BackendError::conflict(format!("Email {email} already exists"))),
        None => Ok(()),
    }
}

/// Create a new teacher
pub async fn create(pool: &SqlitePool, input: &TeacherInput) -> Result<Teacher, BackendError> {
    let mut tx = pool.begin().await?;

    ensure_exists(&mut tx, Table::Subjects, input.subject_id).await?;
    ensure_email_free(&mut tx, &input.email, None).await?;

    let id = sqlx::query(
        r#"
        INSERT INTO teachers (name, email, phone, subject_id, hire_date, status)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(input.subject_id)
    .bind(input.hire_date)
    .bind(input.status)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let teacher = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Created teacher {}", id);
    Ok(teacher)
}

/// Merge `request` onto the stored teacher and save it
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    request: &TeacherRequest,
    today: NaiveDate,
) -> Result<Teacher, BackendError> {
    let mut tx = pool.begin().await?;

    let existing = fetch_existing(&mut tx, id).await?;
    let input = request.validate_against(&existing, today)?;

    if existing.subject_id != Some(input.subject_id) {
        ensure_exists(&mut tx, Table::Subjects, input.subject_id).await?;
    }
    ensure_email_free(&mut tx, &input.email, Some(id)).await?;

    sqlx::query(
        r#"
        UPDATE teachers
        SET name = ?, email = ?, phone = ?, subject_id = ?, hire_date = ?, status = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&input.name)
    .bind(&input.email)
    .bind(&input.phone)
    .bind(input.subject_id)
    .bind(input.hire_date)
    .bind(input.status)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let teacher = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Updated teacher {}", id);
    Ok(teacher)
}

/// Delete a teacher that leads no class
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Teacher, BackendError> {
    let mut tx = pool.begin().await?;

    let teacher = fetch_existing(&mut tx, id).await?;
    if teacher.class_count > 0 {
        return Err(BackendError::conflict(format!(
            "Cannot delete teacher '{}' because they are assigned to {} class(es). Please reassign or remove classes first",
            teacher.name, teacher.class_count
        )));
    }

    sqlx::query("DELETE FROM teachers WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("Deleted teacher {}", id);
    Ok(teacher)
}
