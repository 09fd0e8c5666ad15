mod authenticated_admin;
mod bearer_token;

use anyhow::{anyhow, Context};
pub use authenticated_admin::*;
pub use bearer_token::*;
use rocket::http::Status;

/// Turns a failed lookup into the `(Status, anyhow::Error)` pair request
/// guards fail with.
trait OrReject<T> {
    fn or_reject(self, status: Status, context: &'static str) -> Result<T, (Status, anyhow::Error)>;
}

impl<T, E> OrReject<T> for Result<T, E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn or_reject(self, status: Status, context: &'static str) -> Result<T, (Status, anyhow::Error)> {
        self.context(context).map_err(|e| (status, e))
    }
}

impl<T> OrReject<T> for Option<T> {
    fn or_reject(self, status: Status, context: &'static str) -> Result<T, (Status, anyhow::Error)> {
        self.ok_or_else(|| (status, anyhow!(context)))
    }
}
