use crate::authentication::{hash_refresh_token, verify_password_hash, IssuedToken, TokenIssuer};
use crate::guards::AuthenticatedAdmin;
use crate::models::{AdminUser, NewRefreshToken};
use crate::routes::{error_chain_fmt, error_response};
use crate::schema::{admin_users, refresh_tokens};
use crate::startup::WaitlistDbConn;
use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{
    BoolExpressionMethods, Connection, ExpressionMethods, OptionalExtension, PgConnection,
    QueryDsl, RunQueryDsl,
};
use rocket::form::Form;
use rocket::http::{Header, Status};
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::{Request, State};
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

/// Verified against when the username is unknown, so both paths cost one
/// argon2 verification.
const DUMMY_PASSWORD_HASH: &str = "$argon2id$v=19$m=15000,t=2,p=1$\
gZiV/M1gPc22ElAH/Jh1Hw$CWOrkoo7oJBQ/iyh7uJ0LO2aLEfrHwTWllSAxT0zRno";

#[derive(FromForm)]
pub struct LoginForm {
    username: String,
    password: String,
}

#[derive(FromForm)]
pub struct RefreshForm {
    refresh_token: String,
}

#[derive(serde::Serialize)]
pub struct TokenPair {
    access_token: String,
    token_type: &'static str,
    expires_in: i64,
    refresh_token: String,
}

#[derive(serde::Serialize)]
pub struct Acknowledgement {
    success: bool,
    message: &'static str,
}

#[derive(thiserror::Error)]
pub enum LoginError {
    #[error("Incorrect username or password.")]
    InvalidCredentials,
    #[error("The refresh token is invalid or has expired.")]
    InvalidRefreshToken,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for LoginError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for LoginError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("LoginError: {:?}", self);
        match self {
            LoginError::InvalidCredentials | LoginError::InvalidRefreshToken => {
                let mut response = error_response(Status::Unauthorized, self.to_string(), request)?;
                response.set_header(Header::new("WWW-Authenticate", r#"Bearer realm="admin""#));
                Ok(response)
            }
            LoginError::UnexpectedError(_) => error_response(
                Status::InternalServerError,
                "Failed to process the authentication request.",
                request,
            ),
        }
    }
}

#[tracing::instrument(
    name = "Admin login",
    skip(form, conn, issuer),
    fields(request_id = %Uuid::new_v4(), username = %form.username)
)]
#[post("/adminlogin", data = "<form>")]
pub async fn admin_login(
    form: Form<LoginForm>,
    conn: WaitlistDbConn,
    issuer: &State<TokenIssuer>,
) -> Result<Json<TokenPair>, LoginError> {
    let LoginForm { username, password } = form.into_inner();
    let admin = validate_credentials(&conn, username, Secret::new(password)).await?;

    let now = Utc::now();
    let access = issuer.issue_access_token(admin.id, now);
    let refresh = issuer.issue_refresh_token(now);
    let token_hash = hash_refresh_token(&refresh.token);
    let expires_at = refresh.expires_at;
    let admin_id = admin.id;

    conn.run(move |c| record_login(c, admin_id, &token_hash, expires_at, now))
        .await
        .context("Failed to record the admin login.")?;
    tracing::info!(admin_id = %admin.id, "Admin logged in");

    Ok(Json(token_pair(issuer, access, refresh)))
}

#[tracing::instrument(name = "Refresh admin tokens", skip(form, conn, issuer), fields(request_id = %Uuid::new_v4()))]
#[post("/refresh", data = "<form>")]
pub async fn refresh(
    form: Form<RefreshForm>,
    conn: WaitlistDbConn,
    issuer: &State<TokenIssuer>,
) -> Result<Json<TokenPair>, LoginError> {
    let presented_hash = hash_refresh_token(&Secret::new(form.into_inner().refresh_token));

    let now = Utc::now();
    let refresh = issuer.issue_refresh_token(now);
    let new_hash = hash_refresh_token(&refresh.token);
    let expires_at = refresh.expires_at;

    let admin_id = conn
        .run(move |c| rotate_refresh_token(c, &presented_hash, &new_hash, expires_at, now))
        .await
        .context("Failed to rotate the refresh token.")?
        .ok_or(LoginError::InvalidRefreshToken)?;

    let access = issuer.issue_access_token(admin_id, now);
    Ok(Json(token_pair(issuer, access, refresh)))
}

// Access tokens are stateless and stay valid until they expire.
#[tracing::instrument(
    name = "Admin logout",
    skip(admin, conn),
    fields(request_id = %Uuid::new_v4(), admin_id = %admin.admin_id)
)]
#[post("/logout")]
pub async fn logout(
    admin: AuthenticatedAdmin,
    conn: WaitlistDbConn,
) -> Result<Json<Acknowledgement>, LoginError> {
    let admin_id = admin.admin_id;
    let revoked = conn
        .run(move |c| revoke_refresh_tokens(c, admin_id))
        .await
        .context("Failed to revoke refresh tokens.")?;
    tracing::info!(revoked, "Admin logged out");
    Ok(Json(Acknowledgement {
        success: true,
        message: "Logged out.",
    }))
}

/// The guard does the work: reaching the body means the token is valid and its
/// admin still active.
#[tracing::instrument(
    name = "Validate access token",
    skip(admin),
    fields(admin_id = %admin.admin_id)
)]
#[post("/validate")]
pub async fn validate_token(admin: AuthenticatedAdmin) -> Json<Acknowledgement> {
    Json(Acknowledgement {
        success: true,
        message: "Token is valid.",
    })
}

#[tracing::instrument(
    name = "Current admin profile",
    skip(admin, conn),
    fields(request_id = %Uuid::new_v4(), admin_id = %admin.admin_id)
)]
#[get("/me")]
pub async fn me(admin: AuthenticatedAdmin, conn: WaitlistDbConn) -> Result<Json<AdminUser>, LoginError> {
    let admin_id = admin.admin_id;
    let profile = conn
        .run(move |c| admin_users::table.find(admin_id).first::<AdminUser>(c))
        .await
        .context("Failed to load the admin profile.")?;
    Ok(Json(profile))
}

fn token_pair(issuer: &TokenIssuer, access: IssuedToken, refresh: IssuedToken) -> TokenPair {
    TokenPair {
        access_token: access.token.expose_secret().to_string(),
        token_type: "bearer",
        expires_in: issuer.access_token_ttl().num_seconds(),
        refresh_token: refresh.token.expose_secret().to_string(),
    }
}

#[tracing::instrument(name = "Validate credentials", skip(conn, password))]
async fn validate_credentials(
    conn: &WaitlistDbConn,
    username: String,
    password: Secret<String>,
) -> Result<AdminUser, LoginError> {
    let admin = conn
        .run(move |c| {
            admin_users::table
                .filter(admin_users::username.eq(username))
                .first::<AdminUser>(c)
                .optional()
        })
        .await
        .context("Failed to perform a query to retrieve stored credentials.")?;

    let expected_password_hash = Secret::new(match &admin {
        Some(admin) => admin.password_hash.clone(),
        None => DUMMY_PASSWORD_HASH.to_string(),
    });

    let current_span = tracing::Span::current();
    let matches = rocket::tokio::task::spawn_blocking(move || {
        current_span.in_scope(|| verify_password_hash(&expected_password_hash, &password))
    })
    .await
    .context("Failed to spawn blocking task.")??;

    match admin {
        Some(admin) if matches && admin.is_active => Ok(admin),
        _ => Err(LoginError::InvalidCredentials),
    }
}

fn record_login(
    conn: &mut PgConnection,
    admin_id: Uuid,
    token_hash: &str,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<(), diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|c| {
        diesel::update(admin_users::table.find(admin_id))
            .set(admin_users::last_login.eq(now))
            .execute(c)?;
        diesel::insert_into(refresh_tokens::table)
            .values(NewRefreshToken {
                id: &Uuid::new_v4(),
                token_hash,
                admin_id: &admin_id,
                expires_at: &expires_at,
                created_at: &now,
            })
            .execute(c)?;
        Ok(())
    })
}

/// Revokes the presented token and stores its replacement. `None` when the
/// presented token is unknown, revoked, expired, or belongs to an inactive admin.
fn rotate_refresh_token(
    conn: &mut PgConnection,
    presented_hash: &str,
    new_hash: &str,
    expires_at: DateTime<Utc>,
    now: DateTime<Utc>,
) -> Result<Option<Uuid>, diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|c| {
        let current = refresh_tokens::table
            .inner_join(admin_users::table)
            .filter(refresh_tokens::token_hash.eq(presented_hash))
            .filter(
                refresh_tokens::is_revoked
                    .eq(false)
                    .and(refresh_tokens::expires_at.gt(now)),
            )
            .filter(admin_users::is_active.eq(true))
            .select((refresh_tokens::id, refresh_tokens::admin_id))
            .for_update()
            .first::<(Uuid, Uuid)>(c)
            .optional()?;
        let (token_id, admin_id) = match current {
            Some(current) => current,
            None => return Ok(None),
        };

        diesel::update(refresh_tokens::table.find(token_id))
            .set(refresh_tokens::is_revoked.eq(true))
            .execute(c)?;
        diesel::insert_into(refresh_tokens::table)
            .values(NewRefreshToken {
                id: &Uuid::new_v4(),
                token_hash: new_hash,
                admin_id: &admin_id,
                expires_at: &expires_at,
                created_at: &now,
            })
            .execute(c)?;
        Ok(Some(admin_id))
    })
}

fn revoke_refresh_tokens(conn: &mut PgConnection, admin_id: Uuid) -> Result<usize, diesel::result::Error> {
    diesel::update(
        refresh_tokens::table
            .filter(refresh_tokens::admin_id.eq(admin_id))
            .filter(refresh_tokens::is_revoked.eq(false)),
    )
    .set(refresh_tokens::is_revoked.eq(true))
    .execute(conn)
}
