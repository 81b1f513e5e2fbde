use serde::{Deserialize, Serialize};

/// The single local account, stored as-is under the `userDetails` key.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserDetails {
    pub email: String,
    pub password: String,
}

/// Result of a well-formed log-in attempt.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum LoginOutcome {
    Success,
    InvalidCredentials,
    NoAccount,
}

impl LoginOutcome {
    pub fn message(&self) -> &'static str {
        match self {
            LoginOutcome::Success => "Logged in successfully!",
            LoginOutcome::InvalidCredentials => "Invalid email or password",
            LoginOutcome::NoAccount => "No account found. Please sign up first.",
        }
    }
}
