/// Free text that may be left out. Blank input is treated as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OptionalText(Option<String>);

impl OptionalText {
    pub fn parse(
        value: Option<String>,
        field: &str,
        max_chars: Option<usize>,
    ) -> Result<OptionalText, String> {
        let value = match value.map(|v| v.trim().to_string()) {
            Some(v) if !v.is_empty() => v,
            _ => return Ok(Self(None)),
        };
        match max_chars {
            Some(max) if value.chars().count() > max => Err(format!(
                "{} must be at most {} characters long.",
                field, max
            )),
            _ => Ok(Self(Some(value))),
        }
    }

    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_present(&self) -> bool {
        self.0.is_some()
    }
}
