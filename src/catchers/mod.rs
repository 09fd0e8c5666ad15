mod json_errors;
mod unauthorized;

pub use json_errors::*;
pub use unauthorized::*;
