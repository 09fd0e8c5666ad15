use crate::domain::{NotInterestedReply, OptionalText, RegistrantEmail, RegistrantName};
use crate::models::{NewNotInterestedUser, NotInterestedUser};
use crate::routes::{error_chain_fmt, error_response};
use crate::startup::WaitlistDbConn;
use anyhow::Context;
use chrono::Utc;
use diesel::{PgConnection, RunQueryDsl};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::Request;
use uuid::Uuid;

const MAX_REASON_CHARS: usize = 100;

#[derive(serde::Deserialize)]
pub struct NotInterestedData {
    name: String,
    email: String,
    not_interested_reason: Option<String>,
    improvement_suggestions: Option<String>,
}

impl TryFrom<NotInterestedData> for NotInterestedReply {
    type Error = String;

    fn try_from(data: NotInterestedData) -> Result<Self, Self::Error> {
        Ok(NotInterestedReply {
            name: RegistrantName::parse(data.name)?,
            email: RegistrantEmail::parse(data.email)?,
            reason: OptionalText::parse(
                data.not_interested_reason,
                "not_interested_reason",
                Some(MAX_REASON_CHARS),
            )?,
            improvement_suggestions: OptionalText::parse(
                data.improvement_suggestions,
                "improvement_suggestions",
                None,
            )?,
        })
    }
}

#[derive(thiserror::Error)]
pub enum NotInterestedError {
    #[error("{0}")]
    ValidationError(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for NotInterestedError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for NotInterestedError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("NotInterestedError: {:?}", self);
        match self {
            NotInterestedError::ValidationError(message) => {
                error_response(Status::BadRequest, message, request)
            }
            NotInterestedError::UnexpectedError(_) => error_response(
                Status::InternalServerError,
                "Failed to save the response.",
                request,
            ),
        }
    }
}

// The same address may answer more than once; nothing is unique here.
#[tracing::instrument(
    name = "Recording a not-interested response",
    skip(data, conn),
    fields(request_id = %Uuid::new_v4(), email = %data.email)
)]
#[post("/notinteresteddata", data = "<data>")]
pub async fn record_not_interested(
    data: Json<NotInterestedData>,
    conn: WaitlistDbConn,
) -> Result<(Status, Json<NotInterestedUser>), NotInterestedError> {
    let reply: NotInterestedReply = data
        .into_inner()
        .try_into()
        .map_err(NotInterestedError::ValidationError)?;
    let saved = conn
        .run(move |c| insert_not_interested(c, &reply))
        .await
        .context("Failed to insert a not-interested response in the database.")?;
    Ok((Status::Created, Json(saved)))
}

fn insert_not_interested(
    conn: &mut PgConnection,
    reply: &NotInterestedReply,
) -> Result<NotInterestedUser, diesel::result::Error> {
    use crate::schema::not_interested_users;

    diesel::insert_into(not_interested_users::table)
        .values(NewNotInterestedUser {
            id: &Uuid::new_v4(),
            name: reply.name.as_ref(),
            email: reply.email.as_ref(),
            not_interested_reason: reply.reason.as_deref(),
            improvement_suggestions: reply.improvement_suggestions.as_deref(),
            created_at: &Utc::now(),
        })
        .get_result(conn)
}
