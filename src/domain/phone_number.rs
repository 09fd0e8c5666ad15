const MAX_LENGTH: usize = 20;
const MIN_DIGITS: usize = 10;
const MAX_DIGITS: usize = 15;

/// A phone number as typed by the visitor (`+91 98765-43210`), kept verbatim
/// apart from surrounding whitespace.
#[derive(Debug, Clone)]
pub struct PhoneNumber(String);

impl PhoneNumber {
    pub fn parse(s: String) -> Result<PhoneNumber, String> {
        let trimmed = s.trim();
        if trimmed.chars().count() > MAX_LENGTH {
            return Err(format!("{} is too long to be a phone number.", s));
        }
        let allowed_punctuation = [' ', '+', '-', '(', ')', '.'];
        if let Some(c) = trimmed
            .chars()
            .find(|c| !c.is_ascii_digit() && !allowed_punctuation.contains(c))
        {
            return Err(format!("{} contains an invalid character '{}'.", s, c));
        }
        let digits = trimmed.chars().filter(|c| c.is_ascii_digit()).count();
        if !(MIN_DIGITS..=MAX_DIGITS).contains(&digits) {
            return Err(format!(
                "A phone number must contain between {} and {} digits.",
                MIN_DIGITS, MAX_DIGITS
            ));
        }
        Ok(Self(trimmed.to_string()))
    }
}

impl AsRef<str> for PhoneNumber {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
