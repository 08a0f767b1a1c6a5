//! Database operations for subjects

use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::backend::error::BackendError;
use crate::backend::repository::{push_pagination, Table};
use crate::shared::school::{Pagination, Subject, SubjectInput, SubjectRequest};

const SELECT_SUBJECT: &str = r#"
    SELECT id, subject_name, subject_code, description, created_at, updated_at
    FROM subjects
"#;

/// List subjects ordered by name
pub async fn list(pool: &SqlitePool, pagination: Option<Pagination>) -> Result<Vec<Subject>, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_SUBJECT);
    query.push(" ORDER BY subject_name ASC, id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Subject>().fetch_all(pool).await?)
}

/// Total number of subjects
pub async fn count(pool: &SqlitePool) -> Result<i64, BackendError> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM subjects")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

/// Get a subject by ID
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<Subject>, BackendError> {
    let mut conn = pool.acquire().await?;
    Ok(fetch(&mut conn, id).await?)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!("{SELECT_SUBJECT} WHERE id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

async fn fetch_existing(conn: &mut SqliteConnection, id: i64) -> Result<Subject, BackendError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Table::Subjects.entity(), id))
}

/// Reject a name or code already used by another subject
async fn ensure_unique(
    conn: &mut SqliteConnection,
    input: &SubjectInput,
    exclude_id: Option<i64>,
) -> Result<(), BackendError> {
    let exclude = exclude_id.unwrap_or(0);

    let name_taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM subjects WHERE subject_name = ? AND id != ?")
        .bind(&input.subject_name)
        .bind(exclude)
        .fetch_optional(&mut *conn)
        .await?;
    if name_taken.is_some() {
        return Err(BackendError::conflict(format!(
            "Subject name '{}' already exists",
            input.subject_name
        )));
    }

    let code_taken: Option<(i64,)> = sqlx::query_as("SELECT id FROM subjects WHERE subject_code = ? AND id != ?")
        .bind(&input.subject_code)
        .bind(exclude)
        .fetch_optional(&mut *conn)
        .await?;
    if code_taken.is_some() {
        return Err(BackendError::conflict(format!(
            "Subject code '{}' already exists",
            input.subject_code
        )));
    }

    Ok(())
}

/// Create a new subject
pub async fn create(pool: &SqlitePool, input: &SubjectInput) -> Result<Subject, BackendError> {
    let mut tx = pool.begin().await?;

    ensure_unique(&mut tx, input, None).await?;

    let id = sqlx::query(
        r#"
        INSERT INTO subjects (subject_name, subject_code, description)
        VALUES (?, ?, ?)
        "#,
    )
    .bind(&input.subject_name)
    .bind(&input.subject_code)
    .bind(&input.description)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let subject = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Created subject {} ({})", subject.id, subject.subject_code);
    Ok(subject)
}

/// Merge `request` onto the stored subject and save it
pub async fn update(pool: &SqlitePool, id: i64, request: &SubjectRequest) -> Result<Subject, BackendError> {
    let mut tx = pool.begin().await?;

    let existing = fetch_existing(&mut tx, id).await?;
    let input = request.validate_against(&existing)?;
    ensure_unique(&mut tx, &input, Some(id)).await?;

    sqlx::query(
        r#"
        UPDATE subjects
        SET subject_name = ?, subject_code = ?, description = ?, updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&input.subject_name)
    .bind(&input.subject_code)
    .bind(&input.description)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let subject = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Updated subject {}", id);
    Ok(subject)
}

/// Number of teachers assigned to a subject
pub async fn teacher_count(conn: &mut SqliteConnection, id: i64) -> Result<i64, sqlx::Error> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM teachers WHERE subject_id = ?")
        .bind(id)
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Delete a subject that no teacher references
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Subject, BackendError> {
    let mut tx = pool.begin().await?;

    let subject = fetch_existing(&mut tx, id).await?;
    let teachers = teacher_count(&mut tx, id).await?;
    if teachers > 0 {
        return Err(BackendError::conflict(format!(
            "Cannot delete subject '{}' because it is assigned to {} teacher(s). Please reassign or remove teachers first",
            subject.subject_name, teachers
        )));
    }

    sqlx::query("DELETE FROM subjects WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("Deleted subject {}", id);
    Ok(subject)
}
