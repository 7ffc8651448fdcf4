use chrono::Utc;
use serde::{Deserialize, Serialize};

/// A registered account.
///
/// The password is kept and compared as plain text. This mirrors the
/// on-device app it models and is not safe for anything that leaves the device.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub created_at: i64,
}

impl User {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            created_at: Utc::now().timestamp(),
        }
    }

    /// Exact, case-sensitive credential match
    pub fn matches_credentials(&self, email: &str, password: &str) -> bool {
        self.email == email && self.password == password
    }
}
