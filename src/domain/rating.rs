use crate::domain::OptionalText;

/// A survey score between 1 and 5 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rating(i32);

impl Rating {
    pub fn parse(value: i32, field: &str) -> Result<Rating, String> {
        if (1..=5).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!("{} must be between 1 and 5, got {}.", field, value))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// "How likely are you to recommend us", between 1 and 10 inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecommendScore(i32);

impl RecommendScore {
    pub fn parse(value: i32) -> Result<RecommendScore, String> {
        if (1..=10).contains(&value) {
            Ok(Self(value))
        } else {
            Err(format!(
                "recommend_rating must be between 1 and 10, got {}.",
                value
            ))
        }
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// A rating together with its optional comment.
///
/// Low ratings (2 or less) must be explained.
#[derive(Debug, Clone)]
pub struct RatedAnswer {
    pub rating: Rating,
    pub comments: OptionalText,
}

impl RatedAnswer {
    pub fn parse(
        rating: i32,
        comments: Option<String>,
        field: &str,
    ) -> Result<RatedAnswer, String> {
        let rating = Rating::parse(rating, &format!("{}_rating", field))?;
        let comments = OptionalText::parse(comments, &format!("{}_comments", field), None)?;
        if rating.value() <= 2 && !comments.is_present() {
            return Err(format!(
                "{}_comments is required for ratings of 2 or below.",
                field
            ));
        }
        Ok(Self { rating, comments })
    }
}
