mod admin_data;
mod admin_users;
mod download;
mod feedback;
mod health;
mod login;
mod not_interested;
mod registrations;

pub use admin_data::*;
pub use admin_users::*;
pub use download::*;
pub use feedback::*;
pub use health::*;
pub use login::*;
pub use not_interested::*;
pub use registrations::*;

use chrono::{DateTime, Utc};
use rocket::http::Status;
use rocket::response::{status, Responder};
use rocket::serde::json::Json;
use rocket::Request;

/// Body of every error answered by the API, handlers and catchers alike.
#[derive(serde::Serialize)]
pub struct ErrorBody {
    success: bool,
    error: String,
    path: String,
    timestamp: DateTime<Utc>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>, request: &Request<'_>) -> ErrorBody {
        ErrorBody {
            success: false,
            error: error.into(),
            path: request.uri().path().to_string(),
            timestamp: Utc::now(),
        }
    }
}

pub fn error_response(
    status: Status,
    message: impl Into<String>,
    request: &Request<'_>,
) -> rocket::response::Result<'static> {
    status::Custom(status, Json(ErrorBody::new(message, request))).respond_to(request)
}

pub fn error_chain_fmt(
    e: &impl std::error::Error,
    f: &mut std::fmt::Formatter<'_>,
) -> std::fmt::Result {
    writeln!(f, "{}\n", e)?;
    let mut current = e.source();
    while let Some(cause) = current {
        writeln!(f, "Caused by:\n\t{}", cause)?;
        current = cause.source();
    }
    Ok(())
}

/// Maps a unique-constraint violation to `conflict`, any other failure to an
/// unexpected error with `context`.
pub(crate) fn conflict_or<E>(
    error: diesel::result::Error,
    conflict: E,
    context: &'static str,
) -> E
where
    E: From<anyhow::Error>,
{
    use diesel::result::{DatabaseErrorKind, Error};
    match error {
        Error::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => conflict,
        other => anyhow::Error::new(other).context(context).into(),
    }
}
