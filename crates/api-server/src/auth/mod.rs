//! JWT login/refresh prototype.
//!
//! Deliberately disconnected from the task endpoints: nothing in the task
//! routes checks a token. Kept as its own capability so wiring it into the
//! routing layer later stays a local change.

mod jwt;

pub use jwt::{issue_token, verify_token, Claims};

pub const ACCESS_TOKEN_TTL_MINUTES: i64 = 600;
pub const REFRESH_TOKEN_TTL_DAYS: i64 = 7;

/// Check credentials against the built-in demo user.
pub fn verify_credentials(username: &str, password: &str) -> bool {
    username == "testuser" && password == "password"
}
