#[derive(Debug, Clone)]
pub struct AdminUsername(String);

impl AdminUsername {
    pub fn parse(s: String) -> Result<AdminUsername, String> {
        let trimmed = s.trim();
        let length = trimmed.chars().count();
        let valid_characters = trimmed
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || ['_', '.', '-'].contains(&c));
        if (3..=50).contains(&length) && valid_characters {
            Ok(Self(trimmed.to_string()))
        } else {
            Err(format!(
                "{} is not a valid username. Use 3 to 50 letters, digits, '_', '.' or '-'.",
                s
            ))
        }
    }
}

impl AsRef<str> for AdminUsername {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
