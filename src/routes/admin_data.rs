use crate::domain::FeedbackStatus;
use crate::guards::AuthenticatedAdmin;
use crate::models::{FeedbackRecord, NotInterestedUser, Registrant};
use crate::routes::feedback::load_feedback_records;
use crate::routes::{error_chain_fmt, error_response};
use crate::schema::{creators, not_interested_users, users};
use crate::startup::WaitlistDbConn;
use anyhow::Context;
use diesel::{ExpressionMethods, PgConnection, PgTextExpressionMethods, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::Request;
use uuid::Uuid;

#[derive(thiserror::Error)]
pub enum AdminDataError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for AdminDataError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for AdminDataError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("AdminDataError: {:?}", self);
        match self {
            AdminDataError::ValidationError(message) => {
                error_response(Status::BadRequest, message, request)
            }
            AdminDataError::UnexpectedError(_) => error_response(
                Status::InternalServerError,
                "Failed to load the requested data.",
                request,
            ),
        }
    }
}

/// Case-insensitive substring filters shared by both waiting lists.
#[derive(Debug, Default, Clone)]
pub(crate) struct RegistrantFilter {
    pub name: Option<String>,
    pub profession: Option<String>,
}

impl RegistrantFilter {
    fn new(name: Option<String>, profession: Option<String>) -> RegistrantFilter {
        let pattern = |value: Option<String>| {
            value
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .map(|v| format!("%{}%", escape_like(&v)))
        };
        RegistrantFilter {
            name: pattern(name),
            profession: pattern(profession),
        }
    }
}

fn escape_like(value: &str) -> String {
    value
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

#[tracing::instrument(name = "Listing registered users", skip(admin, conn), fields(request_id = %Uuid::new_v4(), admin = %admin.username))]
#[get("/registereduserdata?<name>&<profession>")]
pub async fn registered_users(
    name: Option<String>,
    profession: Option<String>,
    admin: AuthenticatedAdmin,
    conn: WaitlistDbConn,
) -> Result<Json<Vec<Registrant>>, AdminDataError> {
    let filter = RegistrantFilter::new(name, profession);
    let rows = conn
        .run(move |c| load_users(c, &filter))
        .await
        .context("Failed to load registered users.")?;
    Ok(Json(rows))
}

#[tracing::instrument(name = "Listing registered creators", skip(admin, conn), fields(request_id = %Uuid::new_v4(), admin = %admin.username))]
#[get("/registeredcreatordata?<name>&<profession>")]
pub async fn registered_creators(
    name: Option<String>,
    profession: Option<String>,
    admin: AuthenticatedAdmin,
    conn: WaitlistDbConn,
) -> Result<Json<Vec<Registrant>>, AdminDataError> {
    let filter = RegistrantFilter::new(name, profession);
    let rows = conn
        .run(move |c| load_creators(c, &filter))
        .await
        .context("Failed to load registered creators.")?;
    Ok(Json(rows))
}

#[tracing::instrument(name = "Listing not-interested responses", skip(admin, conn), fields(request_id = %Uuid::new_v4(), admin = %admin.username))]
#[get("/notinteresteddata")]
pub async fn not_interested_records(
    admin: AuthenticatedAdmin,
    conn: WaitlistDbConn,
) -> Result<Json<Vec<NotInterestedUser>>, AdminDataError> {
    let rows = conn
        .run(load_not_interested)
        .await
        .context("Failed to load not-interested responses.")?;
    Ok(Json(rows))
}

#[tracing::instrument(name = "Listing feedback sessions", skip(admin, conn), fields(request_id = %Uuid::new_v4(), admin = %admin.username))]
#[get("/feedbackdata?<status>")]
pub async fn feedback_records(
    status: Option<String>,
    admin: AuthenticatedAdmin,
    conn: WaitlistDbConn,
) -> Result<Json<Vec<FeedbackRecord>>, AdminDataError> {
    let status = status
        .as_deref()
        .map(FeedbackStatus::parse)
        .transpose()
        .map_err(AdminDataError::ValidationError)?;
    let rows = conn
        .run(move |c| load_feedback_records(c, None, status))
        .await
        .context("Failed to load feedback sessions.")?;
    Ok(Json(rows))
}

// `users` and `creators` are distinct diesel tables, hence the twin loaders.
pub(crate) fn load_users(
    conn: &mut PgConnection,
    filter: &RegistrantFilter,
) -> Result<Vec<Registrant>, diesel::result::Error> {
    let mut query = users::table.into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(users::name.ilike(name.as_str()));
    }
    if let Some(profession) = &filter.profession {
        query = query.filter(users::profession.ilike(profession.as_str()));
    }
    query.order(users::created_at.desc()).load(conn)
}

pub(crate) fn load_creators(
    conn: &mut PgConnection,
    filter: &RegistrantFilter,
) -> Result<Vec<Registrant>, diesel::result::Error> {
    let mut query = creators::table.into_boxed();
    if let Some(name) = &filter.name {
        query = query.filter(creators::name.ilike(name.as_str()));
    }
    if let Some(profession) = &filter.profession {
        query = query.filter(creators::profession.ilike(profession.as_str()));
    }
    query.order(creators::created_at.desc()).load(conn)
}

pub(crate) fn load_not_interested(
    conn: &mut PgConnection,
) -> Result<Vec<NotInterestedUser>, diesel::result::Error> {
    not_interested_users::table
        .order(not_interested_users::created_at.desc())
        .load(conn)
}
