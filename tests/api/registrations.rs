use crate::helpers::{registration_body, spawn_app};
use diesel::{QueryDsl, RunQueryDsl};
use waitlist::models::Registrant;
use waitlist::schema::{creators, users};

#[tokio::test]
async fn register_user_returns_201_and_persists_the_row() {
    // arrange
    let app = spawn_app().await;
    let body = registration_body("Ursula Le Guin", "Ursula@Example.com");

    // act
    let response = app.post_json("/userdata", &body).await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["email"], "ursula@example.com");

    let saved = users::table
        .first::<Registrant>(&mut app.db())
        .expect("Result set was empty.");
    assert_eq!(saved.name, "Ursula Le Guin");
    assert_eq!(saved.email, "ursula@example.com");
    assert_eq!(saved.gender.as_deref(), Some("Female"));
    assert_eq!(saved.profession.as_deref(), Some("Paralegal"));
}

#[tokio::test]
async fn register_creator_writes_to_the_creator_list() {
    // arrange
    let app = spawn_app().await;
    let body = registration_body("Octavia Butler", "octavia@example.com");

    // act
    let response = app.post_json("/creatordata", &body).await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let mut conn = app.db();
    let creator_count: i64 = creators::table.count().get_result(&mut conn).unwrap();
    let user_count: i64 = users::table.count().get_result(&mut conn).unwrap();
    assert_eq!(creator_count, 1);
    assert_eq!(user_count, 0);
}

#[tokio::test]
async fn registering_the_same_email_twice_returns_409() {
    // arrange
    let app = spawn_app().await;
    app.post_json("/userdata", &registration_body("Le Guin", "ursula@example.com"))
        .await
        .error_for_status()
        .unwrap();

    // act
    let response = app
        .post_json("/userdata", &registration_body("Another Name", "  URSULA@example.com "))
        .await;

    // assert
    assert_eq!(409, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], false);
    assert_eq!(body["path"], "/userdata");

    let count: i64 = users::table.count().get_result(&mut app.db()).unwrap();
    assert_eq!(count, 1);
}

#[tokio::test]
async fn the_same_email_may_join_both_lists() {
    // arrange
    let app = spawn_app().await;
    let body = registration_body("Both Lists", "both@example.com");

    // act
    let as_user = app.post_json("/userdata", &body).await;
    let as_creator = app.post_json("/creatordata", &body).await;

    // assert
    assert_eq!(201, as_user.status().as_u16());
    assert_eq!(201, as_creator.status().as_u16());
}

#[tokio::test]
async fn register_returns_400_when_data_is_missing() {
    // arrange
    let app = spawn_app().await;
    let test_cases = vec![
        (
            serde_json::json!({"email": "a@example.com", "phone_number": "5551234567"}),
            "missing the name",
        ),
        (
            serde_json::json!({"name": "Ada", "phone_number": "5551234567"}),
            "missing the email",
        ),
        (
            serde_json::json!({"name": "Ada", "email": "a@example.com"}),
            "missing the phone number",
        ),
        (serde_json::json!({}), "missing everything"),
    ];

    for (invalid_body, error_message) in test_cases {
        // act
        let response = app.post_json("/userdata", &invalid_body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not fail with 400 Bad Request when the payload was {}.",
            error_message
        );
    }
}

#[tokio::test]
async fn register_returns_400_when_fields_are_present_but_invalid() {
    // arrange
    let app = spawn_app().await;
    let base = registration_body("Ada Lovelace", "ada@example.com");
    let test_cases = vec![
        ("name", serde_json::json!(""), "empty name"),
        ("name", serde_json::json!("A"), "single-character name"),
        ("name", serde_json::json!("<script>"), "name with forbidden characters"),
        ("email", serde_json::json!("definitely-not-an-email"), "invalid email"),
        ("phone_number", serde_json::json!("12345"), "too few digits"),
        ("phone_number", serde_json::json!("555-CALL-NOW"), "letters in the phone number"),
        ("gender", serde_json::json!("Robot"), "unknown gender"),
        ("profession", serde_json::json!("x".repeat(101)), "profession too long"),
    ];

    for (field, value, description) in test_cases {
        let mut body = base.clone();
        body[field] = value;

        // act
        let response = app.post_json("/userdata", &body).await;

        // assert
        assert_eq!(
            400,
            response.status().as_u16(),
            "The API did not return a 400 Bad Request when the payload had {}.",
            description
        );
    }
}

#[tokio::test]
async fn optional_fields_may_be_omitted() {
    // arrange
    let app = spawn_app().await;
    let body = serde_json::json!({
        "name": "Minimal",
        "email": "minimal@example.com",
        "phone_number": "5551234567",
        "profession": "",
    });

    // act
    let response = app.post_json("/userdata", &body).await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let created: serde_json::Value = response.json().await.unwrap();
    assert!(created["gender"].is_null());
    assert!(created["profession"].is_null());
}
