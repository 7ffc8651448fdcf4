use crate::screens::Screen;

/// What the login screen does after a submit
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Navigate(Screen),
    Rejected {
        message: String,
        /// Wrong credentials clear both inputs; form errors keep them
        clear_email: bool,
        clear_password: bool,
        /// Show the "Don't have an account? Create one" link
        offer_signup: bool,
    },
}

/// Inline messages shown under each signup input
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupFieldErrors {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl SignupFieldErrors {
    pub fn is_empty(&self) -> bool {
        self.username.is_none() && self.email.is_none() && self.password.is_none()
    }

    pub fn messages(&self) -> impl Iterator<Item = &str> {
        [&self.username, &self.email, &self.password]
            .into_iter()
            .filter_map(|m| m.as_deref())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignupOutcome {
    Navigate(Screen),
    Rejected {
        errors: SignupFieldErrors,
        clear_password: bool,
    },
}

const NOT_LOGGED_IN: &str = "Not logged in";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HomeView {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

impl HomeView {
    pub fn greeting(&self) -> String {
        format!("Welcome, {}!", self.username.as_deref().unwrap_or(""))
    }

    pub fn email_line(&self) -> &str {
        self.email.as_deref().unwrap_or(NOT_LOGGED_IN)
    }

    /// First three characters then `***`, or the whole password when revealed
    pub fn password_line(&self, reveal: bool) -> String {
        match &self.password {
            None => NOT_LOGGED_IN.to_string(),
            Some(password) if reveal => password.clone(),
            Some(password) => format!("{}***", password.chars().take(3).collect::<String>()),
        }
    }
}
