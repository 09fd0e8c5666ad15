use crate::domain::{
    FeedbackStatus, FollowUp, OptionalText, RatedAnswer, RecommendScore, SuggestionAnswers,
    UiAnswers, UxAnswers,
};
use crate::models::{
    FeedbackRecord, FeedbackSession, NewFeedbackSession, NewSuggestions, NewUiRatings,
    NewUxRatings, Suggestions, UiRatings, UxRatings,
};
use crate::routes::{error_chain_fmt, error_response};
use crate::schema::{feedback_sessions, suggestions, ui_ratings, ux_ratings};
use crate::startup::WaitlistDbConn;
use anyhow::Context;
use chrono::{DateTime, Utc};
use diesel::{Connection, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl};
use rocket::http::Status;
use rocket::response::Responder;
use rocket::serde::json::Json;
use rocket::Request;
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct UiRatingsData {
    visual_design_rating: i32,
    visual_design_comments: Option<String>,
    ease_of_navigation_rating: i32,
    ease_of_navigation_comments: Option<String>,
    mobile_responsiveness_rating: i32,
    mobile_responsiveness_comments: Option<String>,
}

impl TryFrom<UiRatingsData> for UiAnswers {
    type Error = String;

    fn try_from(data: UiRatingsData) -> Result<Self, Self::Error> {
        Ok(UiAnswers {
            visual_design: RatedAnswer::parse(
                data.visual_design_rating,
                data.visual_design_comments,
                "visual_design",
            )?,
            ease_of_navigation: RatedAnswer::parse(
                data.ease_of_navigation_rating,
                data.ease_of_navigation_comments,
                "ease_of_navigation",
            )?,
            mobile_responsiveness: RatedAnswer::parse(
                data.mobile_responsiveness_rating,
                data.mobile_responsiveness_comments,
                "mobile_responsiveness",
            )?,
        })
    }
}

#[derive(serde::Deserialize)]
pub struct UxRatingsData {
    overall_satisfaction_rating: i32,
    overall_satisfaction_comments: Option<String>,
    task_completion_rating: i32,
    task_completion_comments: Option<String>,
    service_quality_rating: i32,
    service_quality_comments: Option<String>,
}

impl TryFrom<UxRatingsData> for UxAnswers {
    type Error = String;

    fn try_from(data: UxRatingsData) -> Result<Self, Self::Error> {
        Ok(UxAnswers {
            overall_satisfaction: RatedAnswer::parse(
                data.overall_satisfaction_rating,
                data.overall_satisfaction_comments,
                "overall_satisfaction",
            )?,
            task_completion: RatedAnswer::parse(
                data.task_completion_rating,
                data.task_completion_comments,
                "task_completion",
            )?,
            service_quality: RatedAnswer::parse(
                data.service_quality_rating,
                data.service_quality_comments,
                "service_quality",
            )?,
        })
    }
}

#[derive(serde::Deserialize)]
pub struct SuggestionsData {
    liked_features: Option<String>,
    improvement_suggestions: Option<String>,
    desired_features: Option<String>,
    legal_challenges: Option<String>,
    additional_comments: Option<String>,
    recommend_rating: Option<i32>,
    #[serde(default)]
    follow_up_consent: bool,
    follow_up_email: Option<String>,
}

impl TryFrom<SuggestionsData> for SuggestionAnswers {
    type Error = String;

    fn try_from(data: SuggestionsData) -> Result<Self, Self::Error> {
        let recommend_rating = data.recommend_rating.map(RecommendScore::parse).transpose()?;
        Ok(SuggestionAnswers {
            liked_features: OptionalText::parse(data.liked_features, "liked_features", None)?,
            improvement_suggestions: OptionalText::parse(
                data.improvement_suggestions,
                "improvement_suggestions",
                None,
            )?,
            desired_features: OptionalText::parse(data.desired_features, "desired_features", None)?,
            legal_challenges: OptionalText::parse(data.legal_challenges, "legal_challenges", None)?,
            additional_comments: OptionalText::parse(
                data.additional_comments,
                "additional_comments",
                None,
            )?,
            recommend_rating,
            follow_up: FollowUp::parse(data.follow_up_consent, data.follow_up_email)?,
        })
    }
}

#[derive(serde::Serialize)]
pub struct UiStepSaved {
    session: FeedbackSession,
    ui_ratings: UiRatings,
}

#[derive(serde::Serialize)]
pub struct UxStepSaved {
    session: FeedbackSession,
    ux_ratings: UxRatings,
}

#[derive(serde::Serialize)]
pub struct SuggestionsStepSaved {
    session: FeedbackSession,
    suggestions: Suggestions,
}

#[derive(thiserror::Error)]
pub enum FeedbackError {
    #[error("{0}")]
    ValidationError(String),
    #[error("Feedback session not found.")]
    SessionNotFound,
    #[error(transparent)]
    UnexpectedError(#[from] anyhow::Error),
}

impl std::fmt::Debug for FeedbackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

impl<'r> Responder<'r, 'static> for FeedbackError {
    fn respond_to(self, request: &'r Request<'_>) -> rocket::response::Result<'static> {
        tracing::warn!("FeedbackError: {:?}", self);
        match self {
            FeedbackError::ValidationError(message) => {
                error_response(Status::BadRequest, message, request)
            }
            FeedbackError::SessionNotFound => {
                error_response(Status::NotFound, self.to_string(), request)
            }
            FeedbackError::UnexpectedError(_) => error_response(
                Status::InternalServerError,
                "Failed to process the feedback.",
                request,
            ),
        }
    }
}

/// A malformed id can never name a session.
fn parse_session_id(session_id: &str) -> Result<Uuid, FeedbackError> {
    Uuid::parse_str(session_id).map_err(|_| FeedbackError::SessionNotFound)
}

#[tracing::instrument(name = "Starting a feedback session", skip(conn), fields(request_id = %Uuid::new_v4()))]
#[post("/feedback")]
pub async fn start_feedback(
    conn: WaitlistDbConn,
) -> Result<(Status, Json<FeedbackSession>), FeedbackError> {
    let session = conn
        .run(insert_feedback_session)
        .await
        .context("Failed to insert a new feedback session in the database.")?;
    tracing::info!(session_id = %session.session_id, "Feedback session started");
    Ok((Status::Created, Json(session)))
}

#[tracing::instrument(
    name = "Saving UI ratings",
    skip(data, conn),
    fields(request_id = %Uuid::new_v4(), session_id = %session_id)
)]
#[post("/feedback/<session_id>/ui", data = "<data>")]
pub async fn submit_ui_feedback(
    session_id: &str,
    data: Json<UiRatingsData>,
    conn: WaitlistDbConn,
) -> Result<Json<UiStepSaved>, FeedbackError> {
    let session_id = parse_session_id(session_id)?;
    let answers: UiAnswers = data
        .into_inner()
        .try_into()
        .map_err(FeedbackError::ValidationError)?;
    let (session, ui_ratings) = conn
        .run(move |c| save_ui_ratings(c, session_id, &answers))
        .await
        .context("Failed to save the UI ratings.")?
        .ok_or(FeedbackError::SessionNotFound)?;
    Ok(Json(UiStepSaved {
        session,
        ui_ratings,
    }))
}

#[tracing::instrument(
    name = "Saving UX ratings",
    skip(data, conn),
    fields(request_id = %Uuid::new_v4(), session_id = %session_id)
)]
#[post("/feedback/<session_id>/ux", data = "<data>")]
pub async fn submit_ux_feedback(
    session_id: &str,
    data: Json<UxRatingsData>,
    conn: WaitlistDbConn,
) -> Result<Json<UxStepSaved>, FeedbackError> {
    let session_id = parse_session_id(session_id)?;
    let answers: UxAnswers = data
        .into_inner()
        .try_into()
        .map_err(FeedbackError::ValidationError)?;
    let (session, ux_ratings) = conn
        .run(move |c| save_ux_ratings(c, session_id, &answers))
        .await
        .context("Failed to save the UX ratings.")?
        .ok_or(FeedbackError::SessionNotFound)?;
    Ok(Json(UxStepSaved {
        session,
        ux_ratings,
    }))
}

#[tracing::instrument(
    name = "Saving suggestions",
    skip(data, conn),
    fields(request_id = %Uuid::new_v4(), session_id = %session_id)
)]
#[post("/feedback/<session_id>/suggestions", data = "<data>")]
pub async fn submit_suggestions(
    session_id: &str,
    data: Json<SuggestionsData>,
    conn: WaitlistDbConn,
) -> Result<Json<SuggestionsStepSaved>, FeedbackError> {
    let session_id = parse_session_id(session_id)?;
    let answers: SuggestionAnswers = data
        .into_inner()
        .try_into()
        .map_err(FeedbackError::ValidationError)?;
    let (session, suggestions) = conn
        .run(move |c| save_suggestions(c, session_id, &answers))
        .await
        .context("Failed to save the suggestions.")?
        .ok_or(FeedbackError::SessionNotFound)?;
    Ok(Json(SuggestionsStepSaved {
        session,
        suggestions,
    }))
}

#[tracing::instrument(
    name = "Fetching a feedback session",
    skip(conn),
    fields(request_id = %Uuid::new_v4())
)]
#[get("/feedback/<session_id>")]
pub async fn get_feedback(
    session_id: &str,
    conn: WaitlistDbConn,
) -> Result<Json<FeedbackRecord>, FeedbackError> {
    let session_id = parse_session_id(session_id)?;
    let record = conn
        .run(move |c| load_feedback_records(c, Some(session_id), None))
        .await
        .context("Failed to load the feedback session.")?
        .into_iter()
        .next()
        .ok_or(FeedbackError::SessionNotFound)?;
    Ok(Json(record))
}

fn insert_feedback_session(conn: &mut PgConnection) -> Result<FeedbackSession, diesel::result::Error> {
    let now = Utc::now();
    diesel::insert_into(feedback_sessions::table)
        .values(NewFeedbackSession {
            id: &Uuid::new_v4(),
            session_id: &Uuid::new_v4(),
            status: FeedbackStatus::Started.as_str(),
            created_at: &now,
            updated_at: &now,
        })
        .get_result(conn)
}

/// Sessions with every sub-form submitted so far, newest first.
pub(crate) fn load_feedback_records(
    conn: &mut PgConnection,
    session_id: Option<Uuid>,
    status: Option<FeedbackStatus>,
) -> Result<Vec<FeedbackRecord>, diesel::result::Error> {
    let mut query = feedback_sessions::table
        .left_join(ui_ratings::table)
        .left_join(ux_ratings::table)
        .left_join(suggestions::table)
        .into_boxed();
    if let Some(session_id) = session_id {
        query = query.filter(feedback_sessions::session_id.eq(session_id));
    }
    if let Some(status) = status {
        query = query.filter(feedback_sessions::status.eq(status.as_str()));
    }
    let rows = query
        .order(feedback_sessions::created_at.desc())
        .load::<(
            FeedbackSession,
            Option<UiRatings>,
            Option<UxRatings>,
            Option<Suggestions>,
        )>(conn)?;
    Ok(rows.into_iter().map(FeedbackRecord::from).collect())
}

fn lock_session(
    conn: &mut PgConnection,
    session_id: Uuid,
) -> Result<Option<FeedbackSession>, diesel::result::Error> {
    feedback_sessions::table
        .filter(feedback_sessions::session_id.eq(session_id))
        .for_update()
        .first::<FeedbackSession>(conn)
        .optional()
}

/// Moves the session to `max(current, reached)`. `completed_at` is only ever
/// set once.
fn advance_session(
    conn: &mut PgConnection,
    session: FeedbackSession,
    reached: FeedbackStatus,
    now: DateTime<Utc>,
) -> Result<FeedbackSession, diesel::result::Error> {
    let current = FeedbackStatus::parse(&session.status)
        .map_err(|e| diesel::result::Error::DeserializationError(e.into()))?;
    let next = current.advance_to(reached);
    let completed_at = match session.completed_at {
        None if next == FeedbackStatus::Completed => Some(now),
        completed_at => completed_at,
    };
    diesel::update(feedback_sessions::table.find(session.id))
        .set((
            feedback_sessions::status.eq(next.as_str()),
            feedback_sessions::updated_at.eq(now),
            feedback_sessions::completed_at.eq(completed_at),
        ))
        .get_result(conn)
}

#[tracing::instrument(name = "Upserting UI ratings", skip(conn, answers))]
fn save_ui_ratings(
    conn: &mut PgConnection,
    session_id: Uuid,
    answers: &UiAnswers,
) -> Result<Option<(FeedbackSession, UiRatings)>, diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|c| {
        let session = match lock_session(c, session_id)? {
            Some(session) => session,
            None => return Ok(None),
        };
        let now = Utc::now();
        let row = NewUiRatings {
            id: &Uuid::new_v4(),
            feedback_session_id: &session.id,
            visual_design_rating: answers.visual_design.rating.value(),
            visual_design_comments: answers.visual_design.comments.as_deref(),
            ease_of_navigation_rating: answers.ease_of_navigation.rating.value(),
            ease_of_navigation_comments: answers.ease_of_navigation.comments.as_deref(),
            mobile_responsiveness_rating: answers.mobile_responsiveness.rating.value(),
            mobile_responsiveness_comments: answers.mobile_responsiveness.comments.as_deref(),
            updated_at: &now,
        };
        let ratings = diesel::insert_into(ui_ratings::table)
            .values(&row)
            .on_conflict(ui_ratings::feedback_session_id)
            .do_update()
            .set(&row)
            .get_result::<UiRatings>(c)?;
        let session = advance_session(c, session, FeedbackStatus::UiCompleted, now)?;
        Ok(Some((session, ratings)))
    })
}

#[tracing::instrument(name = "Upserting UX ratings", skip(conn, answers))]
fn save_ux_ratings(
    conn: &mut PgConnection,
    session_id: Uuid,
    answers: &UxAnswers,
) -> Result<Option<(FeedbackSession, UxRatings)>, diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|c| {
        let session = match lock_session(c, session_id)? {
            Some(session) => session,
            None => return Ok(None),
        };
        let now = Utc::now();
        let row = NewUxRatings {
            id: &Uuid::new_v4(),
            feedback_session_id: &session.id,
            overall_satisfaction_rating: answers.overall_satisfaction.rating.value(),
            overall_satisfaction_comments: answers.overall_satisfaction.comments.as_deref(),
            task_completion_rating: answers.task_completion.rating.value(),
            task_completion_comments: answers.task_completion.comments.as_deref(),
            service_quality_rating: answers.service_quality.rating.value(),
            service_quality_comments: answers.service_quality.comments.as_deref(),
            updated_at: &now,
        };
        let ratings = diesel::insert_into(ux_ratings::table)
            .values(&row)
            .on_conflict(ux_ratings::feedback_session_id)
            .do_update()
            .set(&row)
            .get_result::<UxRatings>(c)?;
        let session = advance_session(c, session, FeedbackStatus::UxCompleted, now)?;
        Ok(Some((session, ratings)))
    })
}

#[tracing::instrument(name = "Upserting suggestions", skip(conn, answers))]
fn save_suggestions(
    conn: &mut PgConnection,
    session_id: Uuid,
    answers: &SuggestionAnswers,
) -> Result<Option<(FeedbackSession, Suggestions)>, diesel::result::Error> {
    conn.transaction::<_, diesel::result::Error, _>(|c| {
        let session = match lock_session(c, session_id)? {
            Some(session) => session,
            None => return Ok(None),
        };
        let now = Utc::now();
        let row = NewSuggestions {
            id: &Uuid::new_v4(),
            feedback_session_id: &session.id,
            liked_features: answers.liked_features.as_deref(),
            improvement_suggestions: answers.improvement_suggestions.as_deref(),
            desired_features: answers.desired_features.as_deref(),
            legal_challenges: answers.legal_challenges.as_deref(),
            additional_comments: answers.additional_comments.as_deref(),
            recommend_rating: answers.recommend_rating.map(|score| score.value()),
            follow_up_consent: answers.follow_up.consent(),
            follow_up_email: answers.follow_up.email(),
            updated_at: &now,
        };
        let suggestions = diesel::insert_into(suggestions::table)
            .values(&row)
            .on_conflict(suggestions::feedback_session_id)
            .do_update()
            .set(&row)
            .get_result::<Suggestions>(c)?;
        let session = advance_session(c, session, FeedbackStatus::Completed, now)?;
        Ok(Some((session, suggestions)))
    })
}
