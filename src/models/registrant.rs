use diesel::prelude::*;
use crate::schema::{creators, users};
use chrono::offset::Utc;
use chrono::DateTime;

/// A row of either waiting list; `users` and `creators` share one layout.
#[derive(Queryable, serde::Serialize, Debug)]
pub struct Registrant {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub phone_number: String,
    pub gender: Option<String>,
    pub profession: Option<String>,
    pub interest_reason: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub id: &'a uuid::Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub gender: Option<&'a str>,
    pub profession: Option<&'a str>,
    pub interest_reason: Option<&'a str>,
    pub created_at: &'a DateTime<Utc>,
    pub updated_at: &'a DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = creators)]
pub struct NewCreator<'a> {
    pub id: &'a uuid::Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub phone_number: &'a str,
    pub gender: Option<&'a str>,
    pub profession: Option<&'a str>,
    pub interest_reason: Option<&'a str>,
    pub created_at: &'a DateTime<Utc>,
    pub updated_at: &'a DateTime<Utc>,
}
