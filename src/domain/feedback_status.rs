/// Progress of a feedback session through the survey.
///
/// Variants are declared in survey order so that the derived `Ord` matches
/// progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum FeedbackStatus {
    Started,
    UiCompleted,
    UxCompleted,
    Completed,
}

impl FeedbackStatus {
    pub fn parse(s: &str) -> Result<FeedbackStatus, String> {
        match s {
            "started" => Ok(Self::Started),
            "ui_completed" => Ok(Self::UiCompleted),
            "ux_completed" => Ok(Self::UxCompleted),
            "completed" => Ok(Self::Completed),
            other => Err(format!("{} is not a feedback session status.", other)),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FeedbackStatus::Started => "started",
            FeedbackStatus::UiCompleted => "ui_completed",
            FeedbackStatus::UxCompleted => "ux_completed",
            FeedbackStatus::Completed => "completed",
        }
    }

    /// The status after a step that reaches `reached` has been recorded.
    /// A session never moves backwards.
    pub fn advance_to(self, reached: FeedbackStatus) -> FeedbackStatus {
        self.max(reached)
    }
}
