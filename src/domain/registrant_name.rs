use unicode_segmentation::UnicodeSegmentation;

#[derive(Debug, Clone)]
pub struct RegistrantName(String);

impl RegistrantName {
    /// Returns the trimmed name if it satisfies all our validation
    /// constraints on registrant names, an error message otherwise.
    pub fn parse(s: String) -> Result<RegistrantName, String> {
        let trimmed = s.trim();

        // A grapheme is a "user-perceived" character: `å` is one grapheme
        // but two chars.
        let length = trimmed.graphemes(true).count();
        let is_too_short = length < 2;
        let is_too_long = length > 255;

        let forbidden_characters = ['/', '(', ')', '"', '<', '>', '\\', '{', '}'];
        let contains_forbidden_characters =
            trimmed.chars().any(|g| forbidden_characters.contains(&g));

        if is_too_short || is_too_long || contains_forbidden_characters {
            Err(format!("{} is not a valid name.", s))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }
}

impl AsRef<str> for RegistrantName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}
