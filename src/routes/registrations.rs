use crate::domain::{
    Gender, NewRegistrant, OptionalText, PhoneNumber, RegistrantEmail, RegistrantName,
};
use crate::models::{NewCreator, NewUser, Registrant};
use crate::routes::{conflict_or, error_chain_fmt, error_response};
use crate::startup::WaitlistDbConn;
use chrono::Utc;
use diesel::{PgConnection, RunQueryDsl};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::Request;
use uuid::Uuid;

const MAX_PROFESSION_CHARS: usize = 100;

#[derive(serde::Deserialize)]
pub struct RegistrationData {
    name: String,
    email: String,
    phone_number: String,
    gender: Option<String>,
    profession: Option<String>,
    interest_reason: Option<String>,
}

impl TryFrom<RegistrationData> for NewRegistrant {
    type Error = String;

    fn try_from(data: RegistrationData) -> Result<Self, Self::Error> {
        let name = RegistrantName::parse(data.name)?;
        let email = RegistrantEmail::parse(data.email)?;
        let phone_number = PhoneNumber::parse(data.phone_number)?;
        let gender = match data.gender.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(gender) => Some(Gender::parse(gender)?),
        };
        let profession =
            OptionalText::parse(data.profession, "profession", Some(MAX_PROFESSION_CHARS))?;
        let interest_reason = OptionalText::parse(data.interest_reason, "interest_reason", None)?;
        Ok(NewRegistrant {
            name,
            email,
            phone_number,
            gender,
            profession,
            interest_reason,
        })
    }
}

/// The two waiting lists share a payload and a row layout.
#[derive(Debug, Clone, Copy)]
enum WaitingList {
    Users,
    Creators,
}

#[derive(thiserror::Error)]
pub enum RegisterError {
    #[error("{0}")]
    ValidationError(String),
    #[error("This email is already registered.")]
    DuplicateEmail,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for RegisterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for RegisterError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("RegisterError: {:?}", self);
        match self {
            RegisterError::ValidationError(message) => {
                error_response(Status::BadRequest, message, request)
            }
            RegisterError::DuplicateEmail => {
                error_response(Status::Conflict, self.to_string(), request)
            }
            RegisterError::UnexpectedError(_) => error_response(
                Status::InternalServerError,
                "Failed to save the registration.",
                request,
            ),
        }
    }
}

#[tracing::instrument(
    name = "Adding a user to the waiting list",
    skip(data, conn),
    fields(request_id = %Uuid::new_v4(), email = %data.email)
)]
#[post("/userdata", data = "<data>")]
pub async fn register_user(
    data: Json<RegistrationData>,
    conn: WaitlistDbConn,
) -> Result<(Status, Json<Registrant>), RegisterError> {
    register(data.into_inner(), WaitingList::Users, conn).await
}

#[tracing::instrument(
    name = "Adding a creator to the waiting list",
    skip(data, conn),
    fields(request_id = %Uuid::new_v4(), email = %data.email)
)]
#[post("/creatordata", data = "<data>")]
pub async fn register_creator(
    data: Json<RegistrationData>,
    conn: WaitlistDbConn,
) -> Result<(Status, Json<Registrant>), RegisterError> {
    register(data.into_inner(), WaitingList::Creators, conn).await
}

async fn register(
    data: RegistrationData,
    list: WaitingList,
    conn: WaitlistDbConn,
) -> Result<(Status, Json<Registrant>), RegisterError> {
    let registrant: NewRegistrant = data.try_into().map_err(RegisterError::ValidationError)?;
    let saved = conn
        .run(move |c| insert_registrant(c, &registrant, list))
        .await
        .map_err(|e| {
            conflict_or(
                e,
                RegisterError::DuplicateEmail,
                "Failed to insert a new registrant in the database.",
            )
        })?;
    Ok((Status::Created, Json(saved)))
}

#[tracing::instrument(name = "Saving new registrant details in the database", skip(conn, registrant))]
fn insert_registrant(
    conn: &mut PgConnection,
    registrant: &NewRegistrant,
    list: WaitingList,
) -> Result<Registrant, diesel::result::Error> {
    use crate::schema::{creators, users};

    let id = Uuid::new_v4();
    let now = Utc::now();
    let name = registrant.name.as_ref();
    let email = registrant.email.as_ref();
    let phone_number = registrant.phone_number.as_ref();
    let gender = registrant.gender.map(|g| g.as_str());
    let profession = registrant.profession.as_deref();
    let interest_reason = registrant.interest_reason.as_deref();

    match list {
        WaitingList::Users => diesel::insert_into(users::table)
            .values(NewUser {
                id: &id,
                name,
                email,
                phone_number,
                gender,
                profession,
                interest_reason,
                created_at: &now,
                updated_at: &now,
            })
            .get_result(conn),
        WaitingList::Creators => diesel::insert_into(creators::table)
            .values(NewCreator {
                id: &id,
                name,
                email,
                phone_number,
                gender,
                profession,
                interest_reason,
                created_at: &now,
                updated_at: &now,
            })
            .get_result(conn),
    }
}
