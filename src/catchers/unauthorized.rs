use crate::routes::ErrorBody;
use rocket::http::Header;
use rocket::serde::json::Json;
use rocket::Request;

#[catch(401)]
pub fn unauthorized_request_credentials(req: &Request) -> RequestBearerToken {
    RequestBearerToken::new(req)
}

struct BearerChallengeHeader;

impl<'h> From<BearerChallengeHeader> for Header<'h> {
    fn from(_: BearerChallengeHeader) -> Self {
        Header::new("WWW-Authenticate", r#"Bearer realm="admin""#)
    }
}

#[derive(Responder)]
#[response(status = 401)]
pub struct RequestBearerToken {
    inner: Json<ErrorBody>,
    challenge: BearerChallengeHeader,
}

impl RequestBearerToken {
    fn new(req: &Request<'_>) -> RequestBearerToken {
        RequestBearerToken {
            inner: Json(ErrorBody::new("A valid bearer token is required.", req)),
            challenge: BearerChallengeHeader,
        }
    }
}
