//! Seed helpers
//!
//! Rows are inserted through the repositories, bypassing request
//! validation, so tests can set up any reachable state quickly.

use chrono::NaiveDate;
use rollbook::backend::{classes, students, subjects, teachers};
use rollbook::shared::school::{
    Class, ClassInput, Student, StudentInput, StudentStatus, Subject, SubjectInput, Teacher, TeacherInput,
    TeacherStatus,
};
use rollbook::shared::validation;
use sqlx::SqlitePool;

/// The academic year starting in the current calendar year
pub fn current_academic_year() -> String {
    let year = validation::current_year();
    format!("{}-{}", year, year + 1)
}

pub fn date(value: &str) -> NaiveDate {
    NaiveDate::parse_from_str(value, "%Y-%m-%d").expect("bad test date")
}

pub async fn seed_subject(pool: &SqlitePool, name: &str, code: &str) -> Subject {
    subjects::db::create(
        pool,
        &SubjectInput {
            subject_name: name.to_string(),
            subject_code: code.to_string(),
            description: None,
        },
    )
    .await
    .expect("Failed to seed subject")
}

pub async fn seed_teacher(pool: &SqlitePool, name: &str, email: &str, subject_id: i64) -> Teacher {
    teachers::db::create(
        pool,
        &TeacherInput {
            name: name.to_string(),
            email: email.to_string(),
            phone: None,
            subject_id,
            hire_date: None,
            status: TeacherStatus::Active,
        },
    )
    .await
    .expect("Failed to seed teacher")
}

pub async fn seed_class(pool: &SqlitePool, name: &str, teacher_id: Option<i64>) -> Class {
    classes::db::create(
        pool,
        &ClassInput {
            class_name: name.to_string(),
            grade_level: "5".to_string(),
            section: None,
            teacher_id,
            academic_year: current_academic_year(),
        },
    )
    .await
    .expect("Failed to seed class")
}

pub async fn seed_student(pool: &SqlitePool, name: &str, class_id: i64) -> Student {
    students::db::create(
        pool,
        &StudentInput {
            name: name.to_string(),
            email: None,
            phone: None,
            class_id,
            enrollment_date: date("2024-09-01"),
            date_of_birth: None,
            gender: None,
            address: None,
            guardian_name: None,
            guardian_phone: None,
            status: StudentStatus::Active,
        },
    )
    .await
    .expect("Failed to seed student")
}

/// A subject, a teacher of it, and a class led by that teacher
pub async fn seed_school(pool: &SqlitePool) -> (Subject, Teacher, Class) {
    let subject = seed_subject(pool, "Mathematics", "MATH").await;
    let teacher = seed_teacher(pool, "Ada Lovelace", "ada@school.org", subject.id).await;
    let class = seed_class(pool, "Grade 5 Blue", Some(teacher.id)).await;
    (subject, teacher, class)
}
