use diesel::{Connection, PgConnection, RunQueryDsl};
use once_cell::sync::Lazy;
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;
use waitlist::configuration::{get_configuration, AdminSeedSettings, DatabaseSettings};
use waitlist::startup::Application;
use waitlist::telemetry::{get_subscriber, init_subscriber};

static TRACING: Lazy<()> = Lazy::new(|| {
    let default_filter_level = "info".into();
    let subscriber_name = "test".into();
    if std::env::var("TEST_LOG").is_ok() {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::stdout);
        init_subscriber(subscriber).expect("Failed to install the test subscriber.");
    } else {
        let subscriber = get_subscriber(subscriber_name, default_filter_level, std::io::sink);
        init_subscriber(subscriber).expect("Failed to install the test subscriber.");
    }
});

pub struct TestAdmin {
    pub username: String,
    pub password: String,
}

pub struct TestApp {
    pub address: String,
    pub database: DatabaseSettings,
    pub admin: TestAdmin,
    pub api_client: reqwest::Client,
}

pub async fn spawn_app() -> TestApp {
    Lazy::force(&TRACING);

    let admin = TestAdmin {
        username: "root_admin".into(),
        password: Uuid::new_v4().to_string(),
    };

    let configuration = {
        let mut c = get_configuration().expect("Failed to read configuration.");
        c.application.port = None;
        c.application.host = "127.0.0.1".parse().expect("Invalid test host.");
        c.database.database_name = Uuid::new_v4().to_string();
        c.admin = Some(AdminSeedSettings {
            username: admin.username.clone(),
            email: "root_admin@example.com".into(),
            password: Secret::new(admin.password.clone()),
        });
        c
    };

    create_database(&configuration.database);

    let Application { server, mut port } = Application::build(&configuration)
        .await
        .expect("Failed to build the application.");
    let _ = tokio::spawn(server.launch());
    let port = port.get().await.expect("The server stopped before listening.");

    TestApp {
        address: format!("http://127.0.0.1:{}", port),
        database: configuration.database,
        admin,
        api_client: reqwest::Client::new(),
    }
}

fn create_database(settings: &DatabaseSettings) {
    let mut connection =
        PgConnection::establish(settings.connection_string_without_database().expose_secret())
            .expect("Failed to connect to Postgres.");
    diesel::sql_query(format!(r#"CREATE DATABASE "{}""#, settings.database_name))
        .execute(&mut connection)
        .expect("Failed to create the test database.");
}

impl TestApp {
    /// A direct connection to this app's database, for assertions.
    pub fn db(&self) -> PgConnection {
        PgConnection::establish(self.database.connection_string().expose_secret())
            .expect("Failed to connect to the test database.")
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.address, path)
    }

    pub async fn get(&self, path: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json(&self, path: &str, body: &serde_json::Value) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_form(&self, path: &str, form: &[(&str, &str)]) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .form(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn get_with_token(&self, path: &str, token: &str) -> reqwest::Response {
        self.api_client
            .get(self.url(path))
            .bearer_auth(token)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_form_with_token(
        &self,
        path: &str,
        form: &[(&str, &str)],
        token: &str,
    ) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .bearer_auth(token)
            .form(form)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_json_with_token(
        &self,
        path: &str,
        body: &serde_json::Value,
        token: &str,
    ) -> reqwest::Response {
        self.api_client
            .post(self.url(path))
            .bearer_auth(token)
            .json(body)
            .send()
            .await
            .expect("Failed to execute request.")
    }

    pub async fn post_login(&self, username: &str, password: &str) -> reqwest::Response {
        self.post_form("/adminlogin", &[("username", username), ("password", password)])
            .await
    }

    /// Logs the seeded superuser in and returns the whole token response.
    pub async fn login_tokens(&self) -> serde_json::Value {
        let response = self
            .post_login(&self.admin.username, &self.admin.password)
            .await;
        assert_eq!(response.status().as_u16(), 200);
        response.json().await.expect("Login response was not JSON.")
    }

    pub async fn access_token(&self) -> String {
        self.login_tokens().await["access_token"]
            .as_str()
            .expect("No access token in the login response.")
            .to_string()
    }

    pub async fn start_feedback(&self) -> String {
        let response = self.api_client
            .post(self.url("/feedback"))
            .send()
            .await
            .expect("Failed to execute request.");
        assert_eq!(response.status().as_u16(), 201);
        let body: serde_json::Value = response.json().await.expect("Body was not JSON.");
        body["session_id"]
            .as_str()
            .expect("No session id in the response.")
            .to_string()
    }
}

pub fn registration_body(name: &str, email: &str) -> serde_json::Value {
    serde_json::json!({
        "name": name,
        "email": email,
        "phone_number": "+1 (555) 123-4567",
        "gender": "Female",
        "profession": "Paralegal",
        "interest_reason": "Looking for affordable legal help",
    })
}

pub fn ui_body(rating: i32) -> serde_json::Value {
    serde_json::json!({
        "visual_design_rating": rating,
        "visual_design_comments": "Looks clean",
        "ease_of_navigation_rating": 4,
        "ease_of_navigation_comments": null,
        "mobile_responsiveness_rating": 5,
    })
}

pub fn ux_body() -> serde_json::Value {
    serde_json::json!({
        "overall_satisfaction_rating": 4,
        "task_completion_rating": 5,
        "service_quality_rating": 3,
    })
}

pub fn suggestions_body() -> serde_json::Value {
    serde_json::json!({
        "liked_features": "The lawyer search",
        "desired_features": "Document templates",
        "recommend_rating": 9,
        "follow_up_consent": true,
        "follow_up_email": "Follow.Up@Example.com",
    })
}
