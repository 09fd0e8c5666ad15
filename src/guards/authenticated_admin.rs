use super::OrReject;
use crate::authentication::TokenIssuer;
use crate::guards::BearerToken;
use crate::models::AdminUser;
use crate::startup::WaitlistDbConn;
use anyhow::anyhow;
use chrono::Utc;
use diesel::{ExpressionMethods, OptionalExtension, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest};
use rocket::Request;
use secrecy::ExposeSecret;
use uuid::Uuid;

/// An active admin whose bearer token checked out.
pub struct AuthenticatedAdmin {
    pub admin_id: Uuid,
    pub username: String,
    pub is_superuser: bool,
    // prevents construction outside of this module
    _private: (),
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for AuthenticatedAdmin {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match from_request_result(request).await {
            Ok(admin) => Outcome::Success(admin),
            Err((status, e)) => {
                tracing::warn!(error.cause_chain = ?e, "Rejected an admin request");
                Outcome::Error((status, e))
            }
        }
    }
}

async fn from_request_result(
    request: &Request<'_>,
) -> Result<AuthenticatedAdmin, (Status, anyhow::Error)> {
    let issuer = request
        .rocket()
        .state::<TokenIssuer>()
        .or_reject(Status::InternalServerError, "No token issuer is managed.")?;

    let bearer = match request.guard::<BearerToken>().await {
        Outcome::Success(bearer) => bearer,
        Outcome::Error((status, e)) => return Err((status, e)),
        Outcome::Forward(_) => {
            return Err((Status::Unauthorized, anyhow!("No bearer token was presented.")))
        }
    };

    let claims = issuer
        .verify_access_token(bearer.token.expose_secret(), Utc::now())
        .or_reject(Status::Unauthorized, "The bearer token was rejected.")?;

    let conn = match request.guard::<WaitlistDbConn>().await {
        Outcome::Success(conn) => conn,
        _ => {
            return Err((
                Status::InternalServerError,
                anyhow!("Failed to retrieve a connection from the DB pool."),
            ))
        }
    };

    let admin_id = claims.admin_id;
    let admin = conn
        .run(move |c| get_active_admin(c, admin_id))
        .await
        .or_reject(
            Status::InternalServerError,
            "Failed to perform a query to load the authenticated admin.",
        )?
        .or_reject(Status::Unauthorized, "The admin is unknown or inactive.")?;

    Ok(AuthenticatedAdmin {
        admin_id: admin.id,
        username: admin.username,
        is_superuser: admin.is_superuser,
        _private: (),
    })
}

fn get_active_admin(
    conn: &mut diesel::PgConnection,
    admin_id: Uuid,
) -> Result<Option<AdminUser>, diesel::result::Error> {
    use crate::schema::admin_users;

    admin_users::table
        .filter(admin_users::id.eq(admin_id))
        .filter(admin_users::is_active.eq(true))
        .first::<AdminUser>(conn)
        .optional()
}
