use diesel::prelude::*;
use crate::schema::{feedback_sessions, suggestions, ui_ratings, ux_ratings};
use chrono::offset::Utc;
use chrono::DateTime;

#[derive(Queryable, serde::Serialize, Debug)]
pub struct FeedbackSession {
    #[serde(skip_serializing)]
    pub id: uuid::Uuid,
    pub session_id: uuid::Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub completed_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[diesel(table_name = feedback_sessions)]
pub struct NewFeedbackSession<'a> {
    pub id: &'a uuid::Uuid,
    pub session_id: &'a uuid::Uuid,
    pub status: &'a str,
    pub created_at: &'a DateTime<Utc>,
    pub updated_at: &'a DateTime<Utc>,
}

#[derive(Queryable, serde::Serialize, Debug)]
pub struct UiRatings {
    #[serde(skip_serializing)]
    pub id: uuid::Uuid,
    #[serde(skip_serializing)]
    pub feedback_session_id: uuid::Uuid,
    pub visual_design_rating: i32,
    pub visual_design_comments: Option<String>,
    pub ease_of_navigation_rating: i32,
    pub ease_of_navigation_comments: Option<String>,
    pub mobile_responsiveness_rating: i32,
    pub mobile_responsiveness_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// `id` is the primary key, so the changeset used by the upsert leaves it alone.
// `treat_none_as_null` so that a resubmission without a comment clears the old one.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = ui_ratings, treat_none_as_null = true)]
pub struct NewUiRatings<'a> {
    pub id: &'a uuid::Uuid,
    pub feedback_session_id: &'a uuid::Uuid,
    pub visual_design_rating: i32,
    pub visual_design_comments: Option<&'a str>,
    pub ease_of_navigation_rating: i32,
    pub ease_of_navigation_comments: Option<&'a str>,
    pub mobile_responsiveness_rating: i32,
    pub mobile_responsiveness_comments: Option<&'a str>,
    pub updated_at: &'a DateTime<Utc>,
}

#[derive(Queryable, serde::Serialize, Debug)]
pub struct UxRatings {
    #[serde(skip_serializing)]
    pub id: uuid::Uuid,
    #[serde(skip_serializing)]
    pub feedback_session_id: uuid::Uuid,
    pub overall_satisfaction_rating: i32,
    pub overall_satisfaction_comments: Option<String>,
    pub task_completion_rating: i32,
    pub task_completion_comments: Option<String>,
    pub service_quality_rating: i32,
    pub service_quality_comments: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Insertable, AsChangeset)]
#[diesel(table_name = ux_ratings, treat_none_as_null = true)]
pub struct NewUxRatings<'a> {
    pub id: &'a uuid::Uuid,
    pub feedback_session_id: &'a uuid::Uuid,
    pub overall_satisfaction_rating: i32,
    pub overall_satisfaction_comments: Option<&'a str>,
    pub task_completion_rating: i32,
    pub task_completion_comments: Option<&'a str>,
    pub service_quality_rating: i32,
    pub service_quality_comments: Option<&'a str>,
    pub updated_at: &'a DateTime<Utc>,
}

#[derive(Queryable, serde::Serialize, Debug)]
pub struct Suggestions {
    #[serde(skip_serializing)]
    pub id: uuid::Uuid,
    #[serde(skip_serializing)]
    pub feedback_session_id: uuid::Uuid,
    pub liked_features: Option<String>,
    pub improvement_suggestions: Option<String>,
    pub desired_features: Option<String>,
    pub legal_challenges: Option<String>,
    pub additional_comments: Option<String>,
    pub recommend_rating: Option<i32>,
    pub follow_up_consent: bool,
    pub follow_up_email: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// See `NewUiRatings`.
#[derive(Insertable, AsChangeset)]
#[diesel(table_name = suggestions, treat_none_as_null = true)]
pub struct NewSuggestions<'a> {
    pub id: &'a uuid::Uuid,
    pub feedback_session_id: &'a uuid::Uuid,
    pub liked_features: Option<&'a str>,
    pub improvement_suggestions: Option<&'a str>,
    pub desired_features: Option<&'a str>,
    pub legal_challenges: Option<&'a str>,
    pub additional_comments: Option<&'a str>,
    pub recommend_rating: Option<i32>,
    pub follow_up_consent: bool,
    pub follow_up_email: Option<&'a str>,
    pub updated_at: &'a DateTime<Utc>,
}

/// A session together with whichever sub-forms have been submitted.
#[derive(serde::Serialize, Debug)]
pub struct FeedbackRecord {
    #[serde(flatten)]
    pub session: FeedbackSession,
    pub ui_ratings: Option<UiRatings>,
    pub ux_ratings: Option<UxRatings>,
    pub suggestions: Option<Suggestions>,
}

impl From<(FeedbackSession, Option<UiRatings>, Option<UxRatings>, Option<Suggestions>)>
    for FeedbackRecord
{
    fn from(
        (session, ui_ratings, ux_ratings, suggestions): (
            FeedbackSession,
            Option<UiRatings>,
            Option<UxRatings>,
            Option<Suggestions>,
        ),
    ) -> Self {
        Self {
            session,
            ui_ratings,
            ux_ratings,
            suggestions,
        }
    }
}
