mod admin_username;
mod feedback_status;
mod gender;
mod new_admin;
mod new_registrant;
mod not_interested_reply;
mod optional_text;
mod phone_number;
mod rating;
mod registrant_email;
mod registrant_name;
mod survey;

pub use admin_username::AdminUsername;
pub use feedback_status::FeedbackStatus;
pub use gender::Gender;
pub use new_admin::NewAdmin;
pub use new_registrant::NewRegistrant;
pub use not_interested_reply::NotInterestedReply;
pub use optional_text::OptionalText;
pub use phone_number::PhoneNumber;
pub use rating::{RatedAnswer, Rating, RecommendScore};
pub use registrant_email::RegistrantEmail;
pub use registrant_name::RegistrantName;
pub use survey::{FollowUp, SuggestionAnswers, UiAnswers, UxAnswers};
