//! Database operations for classes

use chrono::NaiveDate;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};

use crate::backend::error::BackendError;
use crate::backend::repository::{ensure_exists, push_pagination, Table};
use crate::backend::students::db::SELECT_STUDENT;
use crate::shared::school::{Class, ClassDetail, ClassInput, ClassRequest, Pagination, Student};

const SELECT_CLASS: &str = r#"
    SELECT c.id, c.class_name, c.grade_level, c.section, c.teacher_id, t.name AS teacher_name,
           c.academic_year,
           (SELECT COUNT(*) FROM students s WHERE s.class_id = c.id) AS student_count,
           c.created_at, c.updated_at
    FROM classes c
    LEFT JOIN teachers t ON t.id = c.teacher_id
"#;

/// List classes ordered by ID
pub async fn list(pool: &SqlitePool, pagination: Option<Pagination>) -> Result<Vec<Class>, BackendError> {
    let mut query = QueryBuilder::<Sqlite>::new(SELECT_CLASS);
    query.push(" ORDER BY c.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Class>().fetch_all(pool).await?)
}

/// Total number of classes
pub async fn count(pool: &SqlitePool) -> Result<i64, BackendError> {
    let (total,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM classes")
        .fetch_one(pool)
        .await?;
    Ok(total)
}

async fn fetch(conn: &mut SqliteConnection, id: i64) -> Result<Option<Class>, sqlx::Error> {
    sqlx::query_as::<_, Class>(&format!("{SELECT_CLASS} WHERE c.id = ?"))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await
}

async fn fetch_existing(conn: &mut SqliteConnection, id: i64) -> Result<Class, BackendError> {
    fetch(conn, id)
        .await?
        .ok_or_else(|| BackendError::not_found(Table::Classes.entity(), id))
}

/// Get a class with its teacher's subject and its students
///
/// Students are ordered by name.
pub async fn find_by_id(pool: &SqlitePool, id: i64) -> Result<Option<ClassDetail>, BackendError> {
    let mut conn = pool.acquire().await?;

    let Some(class) = fetch(&mut conn, id).await? else {
        return Ok(None);
    };

    let subject_name: Option<(String,)> = sqlx::query_as(
        r#"
        SELECT s.subject_name
        FROM teachers t
        JOIN subjects s ON s.id = t.subject_id
        WHERE t.id = ?
        "#,
    )
    .bind(class.teacher_id)
    .fetch_optional(&mut *conn)
    .await?;

    let students = sqlx::query_as::<_, Student>(&format!(
        "{SELECT_STUDENT} WHERE s.class_id = ? ORDER BY s.name ASC, s.id ASC"
    ))
    .bind(id)
    .fetch_all(&mut *conn)
    .await?;

    Ok(Some(ClassDetail {
        class,
        subject_name: subject_name.map(|(name,)| name),
        students,
    }))
}

/// Classes led by a teacher; the teacher must exist
pub async fn find_by_teacher(
    pool: &SqlitePool,
    teacher_id: i64,
    pagination: Option<Pagination>,
) -> Result<Vec<Class>, BackendError> {
    let mut conn = pool.acquire().await?;
    ensure_exists(&mut conn, Table::Teachers, teacher_id).await?;

    let mut query = QueryBuilder::<Sqlite>::new(SELECT_CLASS);
    query
        .push(" WHERE c.teacher_id = ")
        .push_bind(teacher_id)
        .push(" ORDER BY c.academic_year DESC, c.class_name ASC, c.id ASC");
    push_pagination(&mut query, pagination);

    Ok(query.build_query_as::<Class>().fetch_all(&mut *conn).await?)
}

/// Check the teacher reference and the three uniqueness rules
async fn ensure_assignable(
    conn: &mut SqliteConnection,
    input: &ClassInput,
    exclude_id: Option<i64>,
) -> Result<(), BackendError> {
    let exclude = exclude_id.unwrap_or(0);

    if let Some(teacher_id) = input.teacher_id {
        ensure_exists(conn, Table::Teachers, teacher_id).await?;

        let assigned: Option<(String,)> = sqlx::query_as(
            "SELECT class_name FROM classes WHERE teacher_id = ? AND academic_year = ? AND id != ?",
        )
        .bind(teacher_id)
        .bind(&input.academic_year)
        .bind(exclude)
        .fetch_optional(&mut *conn)
        .await?;
        if let Some((class_name,)) = assigned {
            return Err(BackendError::conflict(format!(
                "Teacher is already assigned to class '{}' for academic year {}",
                class_name, input.academic_year
            )));
        }
    }

    let name_taken: Option<(i64,)> =
        sqlx::query_as("SELECT id FROM classes WHERE class_name = ? AND academic_year = ? AND id != ?")
            .bind(&input.class_name)
            .bind(&input.academic_year)
            .bind(exclude)
            .fetch_optional(&mut *conn)
            .await?;
    if name_taken.is_some() {
        return Err(BackendError::conflict(format!(
            "Class '{}' already exists for academic year {}",
            input.class_name, input.academic_year
        )));
    }

    if let Some(section) = &input.section {
        let section_taken: Option<(i64,)> = sqlx::query_as(
            "SELECT id FROM classes WHERE grade_level = ? AND section = ? AND academic_year = ? AND id != ?",
        )
        .bind(&input.grade_level)
        .bind(section)
        .bind(&input.academic_year)
        .bind(exclude)
        .fetch_optional(&mut *conn)
        .await?;
        if section_taken.is_some() {
            return Err(BackendError::conflict(format!(
                "Grade {} section {} already exists for academic year {}",
                input.grade_level, section, input.academic_year
            )));
        }
    }

    Ok(())
}

/// Create a new class
pub async fn create(pool: &SqlitePool, input: &ClassInput) -> Result<Class, BackendError> {
    let mut tx = pool.begin().await?;

    ensure_assignable(&mut tx, input, None).await?;

    let id = sqlx::query(
        r#"
        INSERT INTO classes (class_name, grade_level, section, teacher_id, academic_year)
        VALUES (?, ?, ?, ?, ?)
        "#,
    )
    .bind(&input.class_name)
    .bind(&input.grade_level)
    .bind(&input.section)
    .bind(input.teacher_id)
    .bind(&input.academic_year)
    .execute(&mut *tx)
    .await?
    .last_insert_rowid();

    let class = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Created class {} ({} {})", id, class.class_name, class.academic_year);
    Ok(class)
}

/// Merge `request` onto the stored class and save it
pub async fn update(
    pool: &SqlitePool,
    id: i64,
    request: &ClassRequest,
    today: NaiveDate,
) -> Result<Class, BackendError> {
    let mut tx = pool.begin().await?;

    let existing = fetch_existing(&mut tx, id).await?;
    let input = request.validate_against(&existing, today)?;
    ensure_assignable(&mut tx, &input, Some(id)).await?;

    sqlx::query(
        r#"
        UPDATE classes
        SET class_name = ?, grade_level = ?, section = ?, teacher_id = ?, academic_year = ?,
            updated_at = CURRENT_TIMESTAMP
        WHERE id = ?
        "#,
    )
    .bind(&input.class_name)
    .bind(&input.grade_level)
    .bind(&input.section)
    .bind(input.teacher_id)
    .bind(&input.academic_year)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    let class = fetch_existing(&mut tx, id).await?;
    tx.commit().await?;

    tracing::info!("Updated class {}", id);
    Ok(class)
}

/// Delete a class with no enrolled students
pub async fn delete(pool: &SqlitePool, id: i64) -> Result<Class, BackendError> {
    let mut tx = pool.begin().await?;

    let class = fetch_existing(&mut tx, id).await?;
    if class.student_count > 0 {
        return Err(BackendError::conflict(format!(
            "Cannot delete class '{}' because it has {} student(s) enrolled. Please reassign or remove students first",
            class.class_name, class.student_count
        )));
    }

    sqlx::query("DELETE FROM classes WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;

    tracing::info!("Deleted class {}", id);
    Ok(class)
}
