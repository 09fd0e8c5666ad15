use crate::helpers::spawn_app;
use diesel::{ExpressionMethods, QueryDsl, RunQueryDsl};
use waitlist::models::AdminUser;
use waitlist::schema::admin_users;

#[tokio::test]
async fn login_with_a_wrong_password_returns_401() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.post_login(&app.admin.username, "wrong-password").await;

    // assert
    assert_eq!(401, response.status().as_u16());
    assert_eq!(
        r#"Bearer realm="admin""#,
        response.headers()["WWW-Authenticate"]
    );
}

#[tokio::test]
async fn login_with_an_unknown_username_returns_401() {
    // arrange
    let app = spawn_app().await;

    // act
    let response = app.post_login("nobody", &app.admin.password).await;

    // assert
    assert_eq!(401, response.status().as_u16());
}

#[tokio::test]
async fn login_returns_a_token_pair_and_records_last_login() {
    // arrange
    let app = spawn_app().await;

    // act
    let tokens = app.login_tokens().await;

    // assert
    assert_eq!(tokens["token_type"], "bearer");
    assert_eq!(tokens["expires_in"], 30 * 60);
    assert!(tokens["access_token"].is_string());
    assert_eq!(tokens["refresh_token"].as_str().unwrap().len(), 43);

    let admin = admin_users::table
        .filter(admin_users::username.eq(app.admin.username.as_str()))
        .first::<AdminUser>(&mut app.db())
        .unwrap();
    assert!(admin.last_login.is_some());
    assert!(admin.is_superuser);
}

#[tokio::test]
async fn the_access_token_unlocks_admin_endpoints() {
    // arrange
    let app = spawn_app().await;
    let token = app.access_token().await;

    // act
    let response = app.get_with_token("/me", &token).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let profile: serde_json::Value = response.json().await.unwrap();
    assert_eq!(profile["username"], app.admin.username.as_str());
    assert!(profile.get("password_hash").is_none());
}

#[tokio::test]
async fn validate_accepts_live_tokens_and_rejects_others() {
    // arrange
    let app = spawn_app().await;
    let token = app.access_token().await;

    // act
    let valid = app.post_form_with_token("/validate", &[], &token).await;
    let forged = app
        .post_form_with_token("/validate", &[], "bm90.YXRva2Vu")
        .await;
    let anonymous = app.post_form("/validate", &[]).await;

    // assert
    assert_eq!(200, valid.status().as_u16());
    let body: serde_json::Value = valid.json().await.unwrap();
    assert_eq!(body["success"], true);
    assert_eq!(401, forged.status().as_u16());
    assert_eq!(401, anonymous.status().as_u16());
}

#[tokio::test]
async fn admin_endpoints_reject_missing_or_bad_tokens() {
    // arrange
    let app = spawn_app().await;
    let paths = [
        "/me",
        "/registereduserdata",
        "/registeredcreatordata",
        "/notinteresteddata",
        "/feedbackdata",
    ];

    for path in paths {
        // act
        let anonymous = app.get(path).await;
        let forged = app.get_with_token(path, "bm90.YXRva2Vu").await;

        // assert
        assert_eq!(401, anonymous.status().as_u16(), "anonymous {}", path);
        assert_eq!(
            r#"Bearer realm="admin""#,
            anonymous.headers()["WWW-Authenticate"]
        );
        assert_eq!(401, forged.status().as_u16(), "forged token on {}", path);
    }
}

#[tokio::test]
async fn refresh_rotates_the_refresh_token() {
    // arrange
    let app = spawn_app().await;
    let tokens = app.login_tokens().await;
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    // act
    let first = app
        .post_form("/refresh", &[("refresh_token", refresh_token)])
        .await;
    let replay = app
        .post_form("/refresh", &[("refresh_token", refresh_token)])
        .await;

    // assert
    assert_eq!(200, first.status().as_u16());
    let rotated: serde_json::Value = first.json().await.unwrap();
    assert_ne!(rotated["refresh_token"], tokens["refresh_token"]);
    let access_token = rotated["access_token"].as_str().unwrap();
    assert_eq!(200, app.get_with_token("/me", access_token).await.status().as_u16());

    assert_eq!(401, replay.status().as_u16());
}

#[tokio::test]
async fn logout_revokes_refresh_tokens() {
    // arrange
    let app = spawn_app().await;
    let tokens = app.login_tokens().await;
    let access_token = tokens["access_token"].as_str().unwrap();
    let refresh_token = tokens["refresh_token"].as_str().unwrap();

    // act
    let response = app.post_form_with_token("/logout", &[], access_token).await;

    // assert
    assert_eq!(200, response.status().as_u16());
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["success"], true);

    let refreshed = app
        .post_form("/refresh", &[("refresh_token", refresh_token)])
        .await;
    assert_eq!(401, refreshed.status().as_u16());
}

#[tokio::test]
async fn a_superuser_can_create_admins_who_can_log_in() {
    // arrange
    let app = spawn_app().await;
    let token = app.access_token().await;
    let body = serde_json::json!({
        "username": "helper.admin",
        "email": "helper@example.com",
        "password": "a-long-password",
    });

    // act
    let response = app.post_json_with_token("/adminusers", &body, &token).await;

    // assert
    assert_eq!(201, response.status().as_u16());
    let created: serde_json::Value = response.json().await.unwrap();
    assert_eq!(created["is_superuser"], false);
    assert!(created.get("password_hash").is_none());

    let login = app.post_login("helper.admin", "a-long-password").await;
    assert_eq!(200, login.status().as_u16());
}

#[tokio::test]
async fn only_superusers_can_create_admins() {
    // arrange
    let app = spawn_app().await;
    let token = app.access_token().await;
    let helper = serde_json::json!({
        "username": "helper",
        "email": "helper@example.com",
        "password": "a-long-password",
    });
    app.post_json_with_token("/adminusers", &helper, &token)
        .await
        .error_for_status()
        .unwrap();
    let login: serde_json::Value = app
        .post_login("helper", "a-long-password")
        .await
        .json()
        .await
        .unwrap();
    let helper_token = login["access_token"].as_str().unwrap();

    // act
    let response = app
        .post_json_with_token(
            "/adminusers",
            &serde_json::json!({
                "username": "sneaky",
                "email": "sneaky@example.com",
                "password": "a-long-password",
            }),
            helper_token,
        )
        .await;

    // assert
    assert_eq!(403, response.status().as_u16());
}

#[tokio::test]
async fn creating_an_admin_validates_and_rejects_duplicates() {
    // arrange
    let app = spawn_app().await;
    let token = app.access_token().await;
    let test_cases = vec![
        (
            serde_json::json!({"username": "ab", "email": "ab@example.com", "password": "a-long-password"}),
            400,
            "a username that is too short",
        ),
        (
            serde_json::json!({"username": "shortpass", "email": "s@example.com", "password": "short"}),
            400,
            "a password that is too short",
        ),
        (
            serde_json::json!({"username": app.admin.username, "email": "other@example.com", "password": "a-long-password"}),
            409,
            "a duplicate username",
        ),
    ];

    for (body, expected, description) in test_cases {
        // act
        let response = app.post_json_with_token("/adminusers", &body, &token).await;

        // assert
        assert_eq!(
            expected,
            response.status().as_u16(),
            "Unexpected status for {}.",
            description
        );
    }
}

#[tokio::test]
async fn inactive_admins_cannot_log_in_or_use_their_tokens() {
    // arrange
    let app = spawn_app().await;
    let token = app.access_token().await;
    diesel::update(admin_users::table.filter(admin_users::username.eq(app.admin.username.as_str())))
        .set(admin_users::is_active.eq(false))
        .execute(&mut app.db())
        .unwrap();

    // act
    let login = app.post_login(&app.admin.username, &app.admin.password).await;
    let me = app.get_with_token("/me", &token).await;

    // assert
    assert_eq!(401, login.status().as_u16());
    assert_eq!(401, me.status().as_u16());
}
