use crate::domain::{AdminUsername, RegistrantEmail};
use secrecy::{ExposeSecret, Secret};

const MIN_PASSWORD_LENGTH: usize = 8;

#[derive(Debug)]
pub struct NewAdmin {
    pub username: AdminUsername,
    pub email: RegistrantEmail,
    pub password: Secret<String>,
}

impl NewAdmin {
    pub fn parse(
        username: String,
        email: String,
        password: Secret<String>,
    ) -> Result<NewAdmin, String> {
        let username = AdminUsername::parse(username)?;
        let email = RegistrantEmail::parse(email)?;
        if password.expose_secret().chars().count() < MIN_PASSWORD_LENGTH {
            return Err(format!(
                "The password must be at least {} characters long.",
                MIN_PASSWORD_LENGTH
            ));
        }
        Ok(Self {
            username,
            email,
            password,
        })
    }
}
