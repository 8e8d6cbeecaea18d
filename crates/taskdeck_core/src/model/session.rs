//! Signed-in user session.

use serde::{Deserialize, Serialize};

const DEMO_USERNAME: &str = "demo_user";
const DEMO_EMAIL: &str = "demo@example.com";

/// The user currently signed in to the app.
///
/// There is no login path; a session is seeded at startup and cleared by
/// sign-out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    pub username: String,
    pub email: String,
}

impl Session {
    pub fn new(username: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
        }
    }

    /// Mock account used until a real auth backend exists.
    pub fn demo() -> Self {
        Self::new(DEMO_USERNAME, DEMO_EMAIL)
    }
}
