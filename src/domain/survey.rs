use crate::domain::{OptionalText, RatedAnswer, RecommendScore, RegistrantEmail};

pub struct UiAnswers {
    pub visual_design: RatedAnswer,
    pub ease_of_navigation: RatedAnswer,
    pub mobile_responsiveness: RatedAnswer,
}

pub struct UxAnswers {
    pub overall_satisfaction: RatedAnswer,
    pub task_completion: RatedAnswer,
    pub service_quality: RatedAnswer,
}

pub struct SuggestionAnswers {
    pub liked_features: OptionalText,
    pub improvement_suggestions: OptionalText,
    pub desired_features: OptionalText,
    pub legal_challenges: OptionalText,
    pub additional_comments: OptionalText,
    pub recommend_rating: Option<RecommendScore>,
    pub follow_up: FollowUp,
}

/// Whether the respondent agreed to be contacted again, and where.
#[derive(Debug)]
pub enum FollowUp {
    Declined,
    Accepted(RegistrantEmail),
}

impl FollowUp {
    /// Consent requires an address; an address without consent is dropped.
    pub fn parse(consent: bool, email: Option<String>) -> Result<FollowUp, String> {
        let email = email.filter(|e| !e.trim().is_empty());
        match (consent, email) {
            (false, _) => Ok(Self::Declined),
            (true, Some(email)) => Ok(Self::Accepted(RegistrantEmail::parse(email)?)),
            (true, None) => Err("follow_up_email is required when follow-up consent is given.".into()),
        }
    }

    pub fn consent(&self) -> bool {
        matches!(self, FollowUp::Accepted(_))
    }

    pub fn email(&self) -> Option<&str> {
        match self {
            FollowUp::Declined => None,
            FollowUp::Accepted(email) => Some(email.as_ref()),
        }
    }
}
