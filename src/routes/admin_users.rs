use crate::authentication::compute_password_hash;
use crate::domain::NewAdmin;
use crate::guards::AuthenticatedAdmin;
use crate::models::{AdminUser, NewAdminUser};
use crate::routes::{conflict_or, error_chain_fmt, error_response};
use crate::schema::admin_users;
use crate::startup::WaitlistDbConn;
use chrono::Utc;
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::Request;
use secrecy::{ExposeSecret, Secret};
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct NewAdminData {
    username: String,
    email: String,
    password: Secret<String>,
}

impl TryFrom<NewAdminData> for NewAdmin {
    type Error = String;

    fn try_from(data: NewAdminData) -> Result<Self, Self::Error> {
        NewAdmin::parse(data.username, data.email, data.password)
    }
}

#[derive(thiserror::Error)]
pub enum CreateAdminError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Only superusers can create admin accounts.")]
    NotSuperuser,
    #[error("An admin with this username or email already exists.")]
    Duplicate,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for CreateAdminError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for CreateAdminError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("CreateAdminError: {:?}", self);
        match self {
            CreateAdminError::ValidationError(message) => {
                error_response(Status::BadRequest, message, request)
            }
            CreateAdminError::NotSuperuser => {
                error_response(Status::Forbidden, self.to_string(), request)
            }
            CreateAdminError::Duplicate => error_response(Status::Conflict, self.to_string(), request),
            CreateAdminError::UnexpectedError(_) => error_response(
                Status::InternalServerError,
                "Failed to create the admin account.",
                request,
            ),
        }
    }
}

#[tracing::instrument(
    name = "Creating an admin account",
    skip(data, conn, admin),
    fields(request_id = %Uuid::new_v4(), created_by = %admin.username, username = %data.username)
)]
#[post("/adminusers", data = "<data>")]
pub async fn create_admin_user(
    data: Json<NewAdminData>,
    conn: WaitlistDbConn,
    admin: AuthenticatedAdmin,
) -> Result<(Status, Json<AdminUser>), CreateAdminError> {
    if !admin.is_superuser {
        return Err(CreateAdminError::NotSuperuser);
    }
    let new_admin: NewAdmin = data
        .into_inner()
        .try_into()
        .map_err(CreateAdminError::ValidationError)?;
    let created = conn.run(move |c| insert_admin(c, &new_admin, false)).await?;
    Ok((Status::Created, Json(created)))
}

pub(crate) fn admin_username_exists(
    conn: &mut PgConnection,
    username: &str,
) -> Result<bool, diesel::result::Error> {
    diesel::select(diesel::dsl::exists(
        admin_users::table.filter(admin_users::username.eq(username)),
    ))
    .get_result(conn)
}

/// Hashes the password and stores a new active admin. Blocking: run it on a
/// pooled connection.
#[tracing::instrument(name = "Saving a new admin", skip(conn, new_admin), fields(username = %new_admin.username.as_ref()))]
pub(crate) fn insert_admin(
    conn: &mut PgConnection,
    new_admin: &NewAdmin,
    is_superuser: bool,
) -> Result<AdminUser, CreateAdminError> {
    let password_hash = compute_password_hash(&new_admin.password)?;
    diesel::insert_into(admin_users::table)
        .values(NewAdminUser {
            id: &Uuid::new_v4(),
            username: new_admin.username.as_ref(),
            email: new_admin.email.as_ref(),
            password_hash: password_hash.expose_secret(),
            is_active: true,
            is_superuser,
            created_at: &Utc::now(),
        })
        .get_result(conn)
        .map_err(|e| {
            conflict_or(
                e,
                CreateAdminError::Duplicate,
                "Failed to insert a new admin in the database.",
            )
        })
}
