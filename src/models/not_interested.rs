use diesel::prelude::*;
use crate::schema::not_interested_users;
use chrono::offset::Utc;
use chrono::DateTime;

#[derive(Queryable, serde::Serialize, Debug)]
pub struct NotInterestedUser {
    pub id: uuid::Uuid,
    pub name: String,
    pub email: String,
    pub not_interested_reason: Option<String>,
    pub improvement_suggestions: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[diesel(table_name = not_interested_users)]
pub struct NewNotInterestedUser<'a> {
    pub id: &'a uuid::Uuid,
    pub name: &'a str,
    pub email: &'a str,
    pub not_interested_reason: Option<&'a str>,
    pub improvement_suggestions: Option<&'a str>,
    pub created_at: &'a DateTime<Utc>,
}
