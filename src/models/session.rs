use crate::models::User;

/// Fields of the signed-in account, present only while authenticated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub username: String,
    pub email: String,
    pub password: String,
}

impl Session {
    /// True when `user` carries exactly these three fields
    pub fn belongs_to(&self, user: &User) -> bool {
        self.username == user.username && self.email == user.email && self.password == user.password
    }
}

impl From<&User> for Session {
    fn from(user: &User) -> Self {
        Self {
            username: user.username.clone(),
            email: user.email.clone(),
            password: user.password.clone(),
        }
    }
}
