mod password;
mod tokens;

pub use password::{compute_password_hash, verify_password_hash};
pub use tokens::{hash_refresh_token, AccessClaims, IssuedToken, TokenError, TokenIssuer};
