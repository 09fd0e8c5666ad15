use crate::routes::ErrorBody;
use rocket::http::Status;
use rocket::response::status;
use rocket::serde::json::Json;
use rocket::Request;

#[catch(400)]
pub fn bad_request(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("The request could not be understood.", req))
}

/// Rocket answers 422 when a body is missing a field or has the wrong type;
/// we treat that like any other invalid payload.
#[catch(422)]
pub fn unprocessable_entity_to_bad_request(req: &Request) -> status::Custom<Json<ErrorBody>> {
    status::Custom(
        Status::BadRequest,
        Json(ErrorBody::new("The request body is missing fields or is malformed.", req)),
    )
}

#[catch(403)]
pub fn forbidden(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("You are not allowed to perform this action.", req))
}

#[catch(404)]
pub fn not_found(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Not found.", req))
}

#[catch(500)]
pub fn internal_error(req: &Request) -> Json<ErrorBody> {
    Json(ErrorBody::new("Internal server error.", req))
}
