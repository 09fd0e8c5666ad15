mod admin;
mod feedback;
mod not_interested;
mod registrant;

pub use admin::*;
pub use feedback::*;
pub use not_interested::*;
pub use registrant::*;
