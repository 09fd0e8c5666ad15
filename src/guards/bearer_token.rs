use anyhow::{anyhow, Context};
use rocket::http::Status;
use rocket::outcome::Outcome;
use rocket::request::{self, FromRequest};
use rocket::Request;
use secrecy::Secret;

/// The raw token of an `Authorization: Bearer <token>` header.
pub struct BearerToken {
    pub token: Secret<String>,
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for BearerToken {
    type Error = anyhow::Error;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        match from_request_result(request) {
            Ok(token) => Outcome::Success(token),
            Err(e) => Outcome::Error((Status::Unauthorized, e)),
        }
    }
}

fn from_request_result(request: &Request) -> Result<BearerToken, anyhow::Error> {
    let header_value = request
        .headers()
        .get_one("Authorization")
        .context("The 'Authorization' header was missing.")?;

    let token = header_value
        .strip_prefix("Bearer ")
        .context("The authorization scheme was not 'Bearer'.")?
        .trim();

    if token.is_empty() {
        return Err(anyhow!("The bearer token was empty."));
    }

    Ok(BearerToken {
        token: Secret::new(token.to_string()),
    })
}
