use crate::helpers::{spawn_app, suggestions_body, ui_body, ux_body};
use diesel::{QueryDsl, RunQueryDsl};
use waitlist::schema::ui_ratings;

#[tokio::test]
async fn starting_a_session_returns_201_with_status_started() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.api_client.post(app.url("/feedback")).send().await.unwrap();

    // assert
    assert_eq!(201, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "started");
    assert!(body["session_id"].is_string());
    assert!(body["completed_at"].is_null());
}

#[tokio::test]
async fn status_moves_forward_through_every_step() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;

    // act
    let ui = app
        .post_json(&format!("/feedback/{}/ui", session_id), &ui_body(4))
        .await;
    let ui: serde_json::Value = ui.json().await.unwrap();
    let ux = app
        .post_json(&format!("/feedback/{}/ux", session_id), &ux_body())
        .await;
    let ux: serde_json::Value = ux.json().await.unwrap();
    let suggestions = app
        .post_json(&format!("/feedback/{}/suggestions", session_id), &suggestions_body())
        .await;
    let suggestions: serde_json::Value = suggestions.json().await.unwrap();

    // assert
    assert_eq!(ui["session"]["status"], "ui_completed");
    assert_eq!(ui["ui_ratings"]["visual_design_rating"], 4);
    assert_eq!(ux["session"]["status"], "ux_completed");
    assert_eq!(suggestions["session"]["status"], "completed");
    assert!(suggestions["session"]["completed_at"].is_string());
    assert_eq!(
        suggestions["suggestions"]["follow_up_email"],
        "follow.up@example.com"
    );
}

#[tokio::test]
async fn status_never_moves_backwards() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;
    let completed: serde_json::Value = app
        .post_json(&format!("/feedback/{}/suggestions", session_id), &suggestions_body())
        .await
        .json()
        .await
        .unwrap();

    // act
    let response = app
        .post_json(&format!("/feedback/{}/ui", session_id), &ui_body(5))
        .await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["session"]["status"], "completed");
    assert_eq!(
        body["session"]["completed_at"],
        completed["session"]["completed_at"]
    );
}

#[tokio::test]
async fn resubmitting_a_step_replaces_the_previous_answers() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;
    let path = format!("/feedback/{}/ui", session_id);
    app.post_json(&path, &ui_body(3)).await.error_for_status().unwrap();

    // act
    let response = app.post_json(&path, &ui_body(5)).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let mut conn = app.db();
    let count: i64 = ui_ratings::table.count().get_result(&mut conn).unwrap();
    assert_eq!(count, 1);
    let rating: i32 = ui_ratings::table
        .select(ui_ratings::visual_design_rating)
        .first(&mut conn)
        .unwrap();
    assert_eq!(rating, 5);
}

#[tokio::test]
async fn ratings_outside_one_to_five_are_rejected() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;
    let path = format!("/feedback/{}/ui", session_id);

    for rating in [0, 6, -1] {
        // act
        let response = app.post_json(&path, &ui_body(rating)).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "A rating of {} was not rejected.",
            rating
        );
    }

    for rating in [1, 5] {
        // act
        let response = app.post_json(&path, &ui_body(rating)).await;

        // assert
        assert_eq!(
            200,
            response.status().as_u16(),
            "A rating of {} was not accepted.",
            rating
        );
    }
}

#[tokio::test]
async fn a_low_rating_requires_a_comment() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;
    let body = serde_json::json!({
        "overall_satisfaction_rating": 2,
        "task_completion_rating": 5,
        "service_quality_rating": 5,
    });

    // act
    let response = app
        .post_json(&format!("/feedback/{}/ux", session_id), &body)
        .await;

    // assert
    assert_eq!(400, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
}

#[tokio::test]
async fn follow_up_consent_requires_an_email() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;
    let body = serde_json::json!({ "follow_up_consent": true });

    // act
    let response = app
        .post_json(&format!("/feedback/{}/suggestions", session_id), &body)
        .await;

    // assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn recommend_rating_outside_one_to_ten_is_rejected() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;
    let body = serde_json::json!({ "recommend_rating": 11 });

    // act
    let response = app
        .post_json(&format!("/feedback/{}/suggestions", session_id), &body)
        .await;

    // assert
    assert_eq!(400, response.status().as_u16());
}

#[tokio::test]
async fn unknown_sessions_return_404() {
    // arrange
    let app = spawn_app().await;
    let unknown = uuid::Uuid::new_v4().to_string();
    let test_cases = vec![unknown.as_str(), "not-a-uuid"];

    for session_id in test_cases {
        // act
        let ui = app
            .post_json(&format!("/feedback/{}/ui", session_id), &ui_body(4))
            .await;
        let fetched = app.get(&format!("/feedback/{}", session_id)).await;

        // assert
        assert_eq!(404, ui.status().as_u16(), "session id {}", session_id);
        assert_eq!(404, fetched.status().as_u16(), "session id {}", session_id);
    }
}

#[tokio::test]
async fn a_session_is_returned_with_its_sub_forms() {
    // arrange
    let app = spawn_app().await;
    let session_id = app.start_feedback().await;
    app.post_json(&format!("/feedback/{}/ux", session_id), &ux_body())
        .await
        .error_for_status()
        .unwrap();

    // act
    let response = app.get(&format!("/feedback/{}", session_id)).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["session_id"], session_id.as_str());
    assert_eq!(body["status"], "ux_completed");
    assert!(body["ui_ratings"].is_null());
    assert_eq!(body["ux_ratings"]["service_quality_rating"], 3);
    assert!(body["suggestions"].is_null());
}
