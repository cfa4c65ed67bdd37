mod common;

use common::{course_body, TestApp};
use course_service::services::providers::mock::MockProvider;
use reqwest::StatusCode;
use serde_json::{json, Value};

// =============================================================================
// Full lifecycle
// =============================================================================

#[tokio::test]
async fn course_lifecycle() {
    let app = TestApp::spawn().await;

    let response = app.post_course(&course_body("c1", "Intro to X")).await;
    assert_eq!(response.status(), StatusCode::CREATED);
    let created: Value = response.json().await.expect("Failed to parse response");
    assert_eq!(created["message"], "Course added successfully.");
    assert_eq!(created["course_id"], "c1");
    let content = created["content"].as_str().unwrap().to_string();
    assert!(!content.is_empty());

    let response = app.post_course(&course_body("c1", "Intro to X")).await;
    assert_eq!(response.status(), StatusCode::CONFLICT);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Course ID already exists.");

    let response = app.get_course("c1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"course_id": "c1", "content": content}));

    let response = app
        .put_course(
            "c1",
            &json!({
                "course_description": "Advanced X",
                "number_of_words": 80,
                "learner_type": "experts"
            }),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);
    let updated: Value = response.json().await.unwrap();
    assert_eq!(updated["message"], "Course updated successfully.");
    assert_eq!(updated["course_id"], "c1");
    assert_ne!(updated["content"], content.as_str());
    assert_eq!(
        updated["content"],
        MockProvider::response_for("Advanced X in 80 words write the course for experts.")
    );

    let response = app.delete_course("c1").await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(
        body,
        json!({"message": "Course deleted successfully.", "course_id": "c1"})
    );

    let response = app.get_course("c1").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Course not found.");
}

#[tokio::test]
async fn list_returns_every_course() {
    let app = TestApp::spawn().await;

    let response = app.list_courses().await;
    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body, json!({"courses": {}}));

    for id in ["a", "b", "c"] {
        let response = app.post_course(&course_body(id, &format!("Topic {}", id))).await;
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    let body: Value = app.list_courses().await.json().await.unwrap();
    let courses = body["courses"].as_object().unwrap();
    assert_eq!(courses.len(), 3);
    for id in ["a", "b", "c"] {
        let single: Value = app.get_course(id).await.json().await.unwrap();
        assert_eq!(courses[id], single["content"]);
    }
}

// =============================================================================
// Validation
// =============================================================================

#[tokio::test]
async fn create_rejects_invalid_input() {
    let app = TestApp::spawn().await;

    let cases = [
        json!({"course_description": "d", "number_of_words": "5", "learner_type": "l"}),
        json!({"id": "x", "course_description": "d", "number_of_words": "many", "learner_type": "l"}),
        json!({"id": "x", "course_description": "d", "number_of_words": 2.5, "learner_type": "l"}),
        json!({"id": "x", "course_description": "", "number_of_words": "5", "learner_type": "l"}),
        json!({"id": "x", "course_description": "d", "number_of_words": "5"}),
    ];

    for body in cases {
        let response = app.post_course(&body).await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body: {}", body);
        let error: Value = response.json().await.unwrap();
        assert!(error["error"].is_string());
    }

    assert_eq!(app.provider.calls(), 0);
    let body: Value = app.list_courses().await.json().await.unwrap();
    assert_eq!(body, json!({"courses": {}}));
}

#[tokio::test]
async fn malformed_json_is_a_bad_request() {
    let app = TestApp::spawn().await;

    let response = app
        .client
        .post(format!("{}/courses", app.address))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn update_unknown_id_is_not_found_even_with_bad_body() {
    let app = TestApp::spawn().await;

    let response = app.put_course("ghost", &json!({})).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = app.put_course("ghost", &course_body("ghost", "Intro")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn update_rejects_invalid_input() {
    let app = TestApp::spawn().await;
    app.post_course(&course_body("c1", "Intro")).await;

    let response = app
        .put_course(
            "c1",
            &json!({"course_description": "d", "number_of_words": "0", "learner_type": "l"}),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn delete_unknown_id_is_not_found() {
    let app = TestApp::spawn().await;

    let response = app.delete_course("ghost").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body: Value = response.json().await.unwrap();
    assert_eq!(body["error"], "Course not found.");
}

// =============================================================================
// Provider failures
// =============================================================================

#[tokio::test]
async fn failed_generation_is_reported_and_not_stored() {
    let app = TestApp::spawn_with(MockProvider::failing()).await;

    let response = app.post_course(&course_body("c1", "Intro")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let body: Value = response.json().await.unwrap();
    assert!(body["error"]
        .as_str()
        .unwrap()
        .contains("Mock provider configured to fail"));

    assert_eq!(app.get_course("c1").await.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn failed_update_keeps_existing_content() {
    let app = TestApp::spawn().await;
    let created: Value = app
        .post_course(&course_body("c1", "Intro"))
        .await
        .json()
        .await
        .unwrap();

    app.provider.set_failing(true);
    let response = app.put_course("c1", &course_body("c1", "Changed")).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

    let body: Value = app.get_course("c1").await.json().await.unwrap();
    assert_eq!(body["content"], created["content"]);
}
