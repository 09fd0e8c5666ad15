use crate::export::{ExportTable, Sheet, XLSX_CONTENT_TYPE};
use crate::guards::AuthenticatedAdmin;
use crate::routes::admin_data::{load_creators, load_not_interested, load_users, RegistrantFilter};
use crate::routes::feedback::load_feedback_records;
use crate::routes::{error_chain_fmt, error_response};
use crate::startup::WaitlistDbConn;
use anyhow::Context;
use chrono::Utc;
use diesel::PgConnection;
use rocket::form::Form;
use rocket::http::{ContentType, Status};
use rocket::response::Responder;
use rocket::{Request, Response};
use std::io::Cursor;
use uuid::Uuid;

#[derive(FromForm)]
pub struct DownloadForm {
    table: String,
}

/// A spreadsheet sent as a download.
pub struct XlsxAttachment {
    file_name: String,
    bytes: Vec<u8>,
}

impl<'r> Responder<'r, 'static> for XlsxAttachment {
    fn respond_to(self, _request: &'r Request<'_>) -> rocket::response::Result<'static> {
        let (top, sub) = XLSX_CONTENT_TYPE;
        Response::build()
            .header(ContentType::new(top, sub))
            .raw_header(
                "Content-Disposition",
                format!("attachment; filename=\"{}\"", self.file_name),
            )
            .sized_body(self.bytes.len(), Cursor::new(self.bytes))
            .ok()
    }
}

#[derive(thiserror::Error)]
pub enum DownloadError {
    #[error("{0}")]
    UnknownTable(String),
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for DownloadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for DownloadError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("DownloadError: {:?}", self);
        match self {
            DownloadError::UnknownTable(message) => {
                error_response(Status::BadRequest, message, request)
            }
            DownloadError::UnexpectedError(_) => error_response(
                Status::InternalServerError,
                "Failed to export the requested table.",
                request,
            ),
        }
    }
}

#[tracing::instrument(
    name = "Exporting a table",
    skip(form, admin, conn),
    fields(request_id = %Uuid::new_v4(), admin = %admin.username, table = %form.table)
)]
#[post("/downloaddata", data = "<form>")]
pub async fn download_data(
    form: Form<DownloadForm>,
    admin: AuthenticatedAdmin,
    conn: WaitlistDbConn,
) -> Result<XlsxAttachment, DownloadError> {
    let table = ExportTable::parse(&form.table).map_err(DownloadError::UnknownTable)?;
    let bytes = conn.run(move |c| export_table(c, table)).await?;
    let file_name = table.file_name(Utc::now());
    tracing::info!(%file_name, size = bytes.len(), "Table exported");
    Ok(XlsxAttachment { file_name, bytes })
}

// Runs on the pool's blocking thread, spreadsheet rendering included.
fn export_table(conn: &mut PgConnection, table: ExportTable) -> Result<Vec<u8>, anyhow::Error> {
    let name = table.as_str();
    let sheet = match table {
        ExportTable::Users => Sheet::from_rows(name, load_users(conn, &RegistrantFilter::default())?),
        ExportTable::Creators => {
            Sheet::from_rows(name, load_creators(conn, &RegistrantFilter::default())?)
        }
        ExportTable::NotInterested => Sheet::from_rows(name, load_not_interested(conn)?),
        ExportTable::Feedback => Sheet::from_rows(name, load_feedback_records(conn, None, None)?),
    };
    sheet
        .to_xlsx()
        .context("Failed to render the spreadsheet.")
}
