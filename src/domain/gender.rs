#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
    Other,
    PreferNotToSay,
}

impl Gender {
    pub fn parse(s: &str) -> Result<Gender, String> {
        match s.trim() {
            "Male" => Ok(Self::Male),
            "Female" => Ok(Self::Female),
            "Other" => Ok(Self::Other),
            "Prefer not to say" => Ok(Self::PreferNotToSay),
            other => Err(format!(
                "{} is not a supported gender. Use 'Male', 'Female', 'Other' or 'Prefer not to say'.",
                other
            )),
        }
    }

    /// The value stored in the `gender` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            Gender::Male => "Male",
            Gender::Female => "Female",
            Gender::Other => "Other",
            Gender::PreferNotToSay => "Prefer not to say",
        }
    }
}
