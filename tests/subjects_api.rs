//! Subject API integration tests

mod common;

use axum::http::StatusCode;
use common::*;
use pretty_assertions::assert_eq;
use serde_json::json;

#[tokio::test]
async fn test_create_normalizes_and_round_trips() {
    let db = TestDatabase::new().await;
    let server = db.server();

    let response = server
        .post("/api/subjects")
        .json(&json!({
            "subject_name": "  Mathematics ",
            "subject_code": " math-101 ",
            "description": " Numbers and shapes "
        }))
        .await;
    let created = expect_data(&response, StatusCode::CREATED);
    assert_eq!(created["subject_name"], "Mathematics");
    assert_eq!(created["subject_code"], "MATH-101");
    assert_eq!(created["description"], "Numbers and shapes");

    let id = created["id"].as_i64().unwrap();
    let fetched = expect_data(
        &server.get(&format!("/api/subjects/{id}")).await,
        StatusCode::OK,
    );
    assert_eq!(fetched, created);
}

#[tokio::test]
async fn test_create_requires_fields() {
    let db = TestDatabase::new().await;
    let server = db.server();

    let response = server
        .post("/api/subjects")
        .json(&json!({ "description": "no name" }))
        .await;
    let error = expect_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Missing required fields: subject_name, subject_code");
}

#[tokio::test]
async fn test_duplicate_code_conflicts() {
    let db = TestDatabase::new().await;
    seed_subject(db.pool(), "Mathematics", "MATH").await;

    let response = db
        .server()
        .post("/api/subjects")
        .json(&json!({ "subject_name": "Further Maths", "subject_code": "math" }))
        .await;
    let error = expect_error(&response, StatusCode::CONFLICT);
    assert_eq!(error, "Subject code 'MATH' already exists");
}

#[tokio::test]
async fn test_malformed_body_is_rejected_with_envelope() {
    let db = TestDatabase::new().await;

    let response = db
        .server()
        .post("/api/subjects")
        .content_type("application/json")
        .bytes("{not json".into())
        .await;
    let error = expect_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Malformed JSON in request body");
}

#[tokio::test]
async fn test_update_keeps_omitted_fields() {
    let db = TestDatabase::new().await;
    let subject = seed_subject(db.pool(), "Biology", "BIO").await;

    let response = db
        .server()
        .put(&format!("/api/subjects/{}", subject.id))
        .json(&json!({ "description": "Living things" }))
        .await;
    let updated = expect_data(&response, StatusCode::OK);
    assert_eq!(updated["subject_name"], "Biology");
    assert_eq!(updated["subject_code"], "BIO");
    assert_eq!(updated["description"], "Living things");
}

#[tokio::test]
async fn test_empty_update_is_rejected() {
    let db = TestDatabase::new().await;
    let subject = seed_subject(db.pool(), "Biology", "BIO").await;

    let response = db
        .server()
        .put(&format!("/api/subjects/{}", subject.id))
        .json(&json!({}))
        .await;
    let error = expect_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(error, "At least one field must be provided for update");
}

#[tokio::test]
async fn test_delete_blocked_while_teachers_assigned() {
    let db = TestDatabase::new().await;
    let server = db.server();
    let subject = seed_subject(db.pool(), "Chemistry", "CHEM").await;
    let teacher = seed_teacher(db.pool(), "Marie Curie", "marie@school.org", subject.id).await;

    let error = expect_error(
        &server.delete(&format!("/api/subjects/{}", subject.id)).await,
        StatusCode::CONFLICT,
    );
    assert_eq!(
        error,
        "Cannot delete subject 'Chemistry' because it is assigned to 1 teacher(s). Please reassign or remove teachers first"
    );

    expect_body(
        &server.delete(&format!("/api/teachers/{}", teacher.id)).await,
        StatusCode::OK,
    );
    let body = expect_body(
        &server.delete(&format!("/api/subjects/{}", subject.id)).await,
        StatusCode::OK,
    );
    assert_eq!(body["message"], "Subject deleted successfully");
    assert_eq!(db.row_count("subjects").await, 0);
}

#[tokio::test]
async fn test_invalid_and_unknown_ids() {
    let db = TestDatabase::new().await;
    let server = db.server();

    let error = expect_error(&server.get("/api/subjects/abc").await, StatusCode::BAD_REQUEST);
    assert_eq!(error, "Valid subject ID is required");

    let error = expect_error(&server.get("/api/subjects/42").await, StatusCode::NOT_FOUND);
    assert_eq!(error, "Subject with ID 42 does not exist");
}

#[tokio::test]
async fn test_pagination_returns_requested_window() {
    let db = TestDatabase::new().await;
    for n in 1..=25 {
        seed_subject(db.pool(), &format!("Subject {n:02}"), &format!("S{n:02}")).await;
    }

    let response = db
        .server()
        .get("/api/subjects")
        .add_query_param("page", 2)
        .add_query_param("limit", 10)
        .await;
    let body = expect_body(&response, StatusCode::OK);
    assert_eq!(body["total"], 25);
    assert_eq!(body["page"], 2);
    assert_eq!(body["limit"], 10);
    assert_eq!(body["count"], 10);

    let names: Vec<&str> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["subject_name"].as_str().unwrap())
        .collect();
    let expected: Vec<String> = (11..=20).map(|n| format!("Subject {n:02}")).collect();
    assert_eq!(names, expected);
}

#[tokio::test]
async fn test_bad_pagination_is_rejected() {
    let db = TestDatabase::new().await;

    let response = db
        .server()
        .get("/api/subjects")
        .add_query_param("limit", 500)
        .await;
    let error = expect_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(error, "limit must be an integer between 1 and 100");
}

#[tokio::test]
async fn test_page_beyond_offset_range_is_rejected() {
    let db = TestDatabase::new().await;
    seed_subject(db.pool(), "Mathematics", "MATH").await;

    let response = db
        .server()
        .get("/api/subjects")
        .add_query_param("page", i64::MAX)
        .add_query_param("limit", 100)
        .await;
    let error = expect_error(&response, StatusCode::BAD_REQUEST);
    assert_eq!(error, "page is too large for the requested limit");
}
