//! Class API integration tests

mod common;

use axum::http::StatusCode;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_teacher_cannot_lead_two_classes_in_one_year() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let (_, teacher, class) = seed_school(db.pool()).await;

    let response = server
        .post("/api/classes")
        .json(&json!({
            "class_name": "Grade 6 Green",
            "grade_level": "6",
            "teacher_id": teacher.id,
            "academic_year": current_academic_year()
        }))
        .await;
    let error = expect_error(&response, StatusCode::CONFLICT);
    assert_eq!(
        error,
        format!(
            "Teacher is already assigned to class '{}' for academic year {}",
            class.class_name,
            current_academic_year()
        )
    );

    // Re-saving the class that already has the teacher is not a conflict
    let response = server
        .put(&format!("/api/classes/{}", class.id))
        .json(&json!({ "teacher_id": teacher.id, "section": "A" }))
        .await;
    let updated = expect_data(&response, StatusCode::OK);
    assert_eq!(updated["section"], "A");
}

#[tokio::test]
async fn test_name_and_section_uniqueness_per_year() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let year = current_academic_year();

    let first = server
        .post("/api/classes")
        .json(&json!({
            "class_name": "Grade 3 Red",
            "grade_level": "3",
            "section": "R",
            "academic_year": year
        }))
        .await;
    expect_data(&first, StatusCode::CREATED);

    let same_name = server
        .post("/api/classes")
        .json(&json!({ "class_name": "Grade 3 Red", "grade_level": "4", "academic_year": year }))
        .await;
    let error = expect_error(&same_name, StatusCode::CONFLICT);
    assert_eq!(error, format!("Class 'Grade 3 Red' already exists for academic year {year}"));

    let same_section = server
        .post("/api/classes")
        .json(&json!({
            "class_name": "Grade 3 Rose",
            "grade_level": "3",
            "section": "R",
            "academic_year": year
        }))
        .await;
    let error = expect_error(&same_section, StatusCode::CONFLICT);
    assert_eq!(error, format!("Grade 3 section R already exists for academic year {year}"));
}

#[tokio::test]
async fn test_invalid_academic_year_is_rejected() {
    let db = TestDatabase::new().await;

    let response = db
        .server()
        .post("/api/classes")
        .json(&json!({ "class_name": "Grade 1", "grade_level": "1", "academic_year": "2025/2026" }))
        .await;
    let error = expect_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(error, "academic_year must be in YYYY-YYYY format");
}

#[tokio::test]
async fn test_unknown_teacher_is_not_found() {
    let db = TestDatabase::new().await;

    let response = db
        .server()
        .post("/api/classes")
        .json(&json!({
            "class_name": "Grade 1",
            "grade_level": "1",
            "teacher_id": 12,
            "academic_year": current_academic_year()
        }))
        .await;
    let error = expect_error(&response, StatusCode::NOT_FOUND);
    assert_eq!(error, "Teacher with ID 12 does not exist");
}

#[tokio::test]
async fn test_detail_lists_students_and_subject() {
    let db = TestDatabase::new().await;
    let (_, teacher, class) = seed_school(db.pool()).await;
    seed_student(db.pool(), "Zed Zimmer", class.id).await;
    seed_student(db.pool(), "Amy Archer", class.id).await;

    let detail = expect_data(
        &db.server().get(&format!("/api/classes/{}", class.id)).await,
        StatusCode::OK,
    );
    assert_eq!(detail["class_name"], "Grade 5 Blue");
    assert_eq!(detail["teacher_name"], teacher.name.as_str());
    assert_eq!(detail["subject_name"], "Mathematics");
    assert_eq!(detail["student_count"], 2);
    assert_eq!(detail["students"][0]["name"], "Amy Archer");
    assert_eq!(detail["students"][1]["name"], "Zed Zimmer");
}

#[tokio::test]
async fn test_empty_teacher_id_clears_assignment() {
    let db = TestDatabase::new().await;
    let (_, _, class) = seed_school(db.pool()).await;

    let response = db
        .server()
        .put(&format!("/api/classes/{}", class.id))
        .json(&json!({ "teacher_id": "" }))
        .await;
    let updated = expect_data(&response, StatusCode::OK);
    assert!(updated["teacher_id"].is_null());
    assert!(updated["teacher_name"].is_null());
}

#[tokio::test]
async fn test_delete_blocked_until_students_reassigned() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let (_, _, class) = seed_school(db.pool()).await;
    let other = seed_class(db.pool(), "Grade 5 Gold", None).await;
    let student = seed_student(db.pool(), "Amy Archer", class.id).await;

    let error = expect_error(
        &server.delete(&format!("/api/classes/{}", class.id)).await,
        StatusCode::CONFLICT,
    );
    assert_eq!(
        error,
        "Cannot delete class 'Grade 5 Blue' because it has 1 student(s) enrolled. Please reassign or remove students first"
    );

    let moved = server
        .put(&format!("/api/students/{}", student.id))
        .json(&json!({ "class_id": other.id }))
        .await;
    expect_data(&moved, StatusCode::OK);

    expect_body(
        &server.delete(&format!("/api/classes/{}", class.id)).await,
        StatusCode::OK,
    );
    assert_eq!(db.row_count("classes").await, 1);
}

#[tokio::test]
async fn test_classes_by_teacher() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let (_, teacher, class) = seed_school(db.pool()).await;

    let body = expect_body(
        &server.get(&format!("/api/classes/teacher/{}", teacher.id)).await,
        StatusCode::OK,
    );
    assert_eq!(body["count"], 1);
    assert_eq!(body["data"][0]["id"], class.id);

    let error = expect_error(&server.get("/api/classes/teacher/404").await, StatusCode::NOT_FOUND);
    assert_eq!(error, "Teacher with ID 404 does not exist");
}
