use crate::domain::{Gender, OptionalText, PhoneNumber, RegistrantEmail, RegistrantName};

/// A validated entry for either waiting list.
pub struct NewRegistrant {
    pub name: RegistrantName,
    pub email: RegistrantEmail,
    pub phone_number: PhoneNumber,
    pub gender: Option<Gender>,
    pub profession: OptionalText,
    pub interest_reason: OptionalText,
}
