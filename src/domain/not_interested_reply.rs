use crate::domain::{OptionalText, RegistrantEmail, RegistrantName};

pub struct NotInterestedReply {
    pub name: RegistrantName,
    pub email: RegistrantEmail,
    pub reason: OptionalText,
    pub improvement_suggestions: OptionalText,
}
