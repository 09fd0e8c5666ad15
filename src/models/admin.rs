use diesel::prelude::*;
use crate::schema::{admin_users, refresh_tokens};
use chrono::offset::Utc;
use chrono::DateTime;

#[derive(Queryable, serde::Serialize, Debug)]
pub struct AdminUser {
    pub id: uuid::Uuid,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = admin_users)]
pub struct NewAdminUser<'a> {
    pub id: &'a uuid::Uuid,
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub is_active: bool,
    pub is_superuser: bool,
    pub created_at: &'a DateTime<Utc>,
}

#[derive(Queryable, Debug)]
pub struct RefreshToken {
    pub id: uuid::Uuid,
    pub token_hash: String,
    pub admin_id: uuid::Uuid,
    pub expires_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub is_revoked: bool,
}

#[derive(Insertable)]
#[diesel(table_name = refresh_tokens)]
pub struct NewRefreshToken<'a> {
    pub id: &'a uuid::Uuid,
    pub token_hash: &'a str,
    pub admin_id: &'a uuid::Uuid,
    pub expires_at: &'a DateTime<Utc>,
    pub created_at: &'a DateTime<Utc>,
}
