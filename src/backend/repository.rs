//! Repository helpers shared by the resource modules
//!
//! Existence checks and query-building fragments. Helpers take a
//! `&mut SqliteConnection` so the same check runs against a pooled
//! connection or inside an open transaction (`&mut *tx`).

use std::collections::BTreeSet;

use sqlx::{QueryBuilder, Sqlite, SqliteConnection};

use crate::backend::error::BackendError;
use crate::shared::school::Pagination;

/// Tables that other rows reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Subjects,
    Teachers,
    Classes,
    Students,
    Attendance,
}

impl Table {
    pub fn name(&self) -> &'static str {
        match self {
            Table::Subjects => "subjects",
            Table::Teachers => "teachers",
            Table::Classes => "classes",
            Table::Students => "students",
            Table::Attendance => "attendance",
        }
    }

    /// Singular noun used in not-found messages
    pub fn entity(&self) -> &'static str {
        match self {
            Table::Subjects => "Subject",
            Table::Teachers => "Teacher",
            Table::Classes => "Class",
            Table::Students => "Student",
            Table::Attendance => "Attendance record",
        }
    }

    /// Plural noun used when several references are missing
    pub fn plural(&self) -> &'static str {
        match self {
            Table::Subjects => "Subjects",
            Table::Teachers => "Teachers",
            Table::Classes => "Classes",
            Table::Students => "Students",
            Table::Attendance => "Attendance records",
        }
    }
}

/// Whether a row with `id` exists in `table`
pub async fn row_exists(conn: &mut SqliteConnection, table: Table, id: i64) -> Result<bool, sqlx::Error> {
    let sql = format!("SELECT id FROM {} WHERE id = ?", table.name());
    let row: Option<(i64,)> = sqlx::query_as(&sql).bind(id).fetch_optional(&mut *conn).await?;
    Ok(row.is_some())
}

/// Fail with `NotFound` unless the row exists
pub async fn ensure_exists(conn: &mut SqliteConnection, table: Table, id: i64) -> Result<(), BackendError> {
    if row_exists(conn, table, id).await? {
        Ok(())
    } else {
        Err(BackendError::not_found(table.entity(), id))
    }
}

/// IDs from `ids` with no row in `table`, ascending and without duplicates
///
/// Issues a single `IN (...)` query regardless of how many IDs are given.
pub async fn find_missing(
    conn: &mut SqliteConnection,
    table: Table,
    ids: &[i64],
) -> Result<Vec<i64>, sqlx::Error> {
    let wanted: BTreeSet<i64> = ids.iter().copied().collect();
    if wanted.is_empty() {
        return Ok(Vec::new());
    }

    let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT id FROM {} WHERE id IN (", table.name()));
    let mut separated = query.separated(", ");
    for id in &wanted {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");

    let found = query.build_query_as::<(i64,)>().fetch_all(&mut *conn).await?;
    let found: BTreeSet<i64> = found.into_iter().map(|(id,)| id).collect();

    Ok(wanted.difference(&found).copied().collect())
}

/// Fail with `MissingReferences` listing every absent ID
pub async fn ensure_all_exist(conn: &mut SqliteConnection, table: Table, ids: &[i64]) -> Result<(), BackendError> {
    let missing = find_missing(conn, table, ids).await?;
    if missing.is_empty() {
        Ok(())
    } else {
        tracing::debug!("Missing {}: {:?}", table.name(), missing);
        Err(BackendError::missing_references(table.plural(), missing))
    }
}

/// Append `LIMIT ? OFFSET ?` when a page window is requested
pub fn push_pagination(query: &mut QueryBuilder<'_, Sqlite>, pagination: Option<Pagination>) {
    if let Some(page) = pagination {
        query.push(" LIMIT ");
        query.push_bind(page.limit);
        query.push(" OFFSET ");
        query.push_bind(page.offset());
    }
}

/// Append a condition joined with `WHERE` for the first and `AND` after
pub struct Conditions {
    started: bool,
}

impl Conditions {
    pub fn new() -> Self {
        Self { started: false }
    }

    /// Push the connective; the caller pushes the condition text after it
    pub fn next(&mut self, query: &mut QueryBuilder<'_, Sqlite>) {
        query.push(if self.started { " AND " } else { " WHERE " });
        self.started = true;
    }
}

impl Default for Conditions {
    fn default() -> Self {
        Self::new()
    }
}

/// Wrap a search term for a `LIKE` substring match
pub fn like_pattern(term: &str) -> String {
    let escaped = term
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_");
    format!("%{escaped}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_names() {
        assert_eq!(Table::Students.name(), "students");
        assert_eq!(Table::Classes.entity(), "Class");
        assert_eq!(Table::Students.plural(), "Students");
    }

    #[test]
    fn test_like_pattern_escapes_wildcards() {
        assert_eq!(like_pattern("ann"), "%ann%");
        assert_eq!(like_pattern("50%"), "%50\\%%");
        assert_eq!(like_pattern("a_b"), "%a\\_b%");
    }

    #[test]
    fn test_pagination_sql() {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM subjects");
        push_pagination(&mut query, Some(Pagination { page: 2, limit: 10 }));
        assert_eq!(query.sql(), "SELECT id FROM subjects LIMIT ? OFFSET ?");

        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM subjects");
        push_pagination(&mut query, None);
        assert_eq!(query.sql(), "SELECT id FROM subjects");
    }

    #[test]
    fn test_conditions_connectives() {
        let mut query = QueryBuilder::<Sqlite>::new("SELECT id FROM students");
        let mut conditions = Conditions::new();
        conditions.next(&mut query);
        query.push("status = ").push_bind("active");
        conditions.next(&mut query);
        query.push("class_id = ").push_bind(3_i64);
        assert_eq!(
            query.sql(),
            "SELECT id FROM students WHERE status = ? AND class_id = ?"
        );
    }
}
