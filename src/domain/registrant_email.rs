use validator::validate_email;

const MAX_LENGTH: usize = 254;

/// A syntactically valid e-mail address, trimmed and lower-cased so that the
/// unique constraints on `users`, `creators` and `admin_users` compare like
/// with like.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegistrantEmail(String);

impl RegistrantEmail {
    pub fn parse(s: String) -> Result<RegistrantEmail, String> {
        let normalized = s.trim().to_lowercase();
        if normalized.len() > MAX_LENGTH {
            return Err(format!("{} is too long to be a valid email.", s));
        }
        if validate_email(&normalized) {
            Ok(Self(normalized))
        } else {
            Err(format!("{} is not a valid email.", s))
        }
    }
}

impl AsRef<str> for RegistrantEmail {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for RegistrantEmail {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        self.0.fmt(f)
    }
}
