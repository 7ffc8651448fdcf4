use regex::Regex;
use serde::Deserialize;
use std::{borrow::Cow, sync::LazyLock};
use validator::{Validate, ValidationError};

/// `<non-space>@<non-space>.<non-space>` anywhere in the input
pub static EMAIL_SHAPE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\S+@\S+\.\S+").expect("email shape pattern is valid"));

pub const MIN_PASSWORD_CHARS: usize = 6;

pub fn is_email_shaped(email: &str) -> bool {
    EMAIL_SHAPE.is_match(email)
}

/// At least six characters, one of them an ASCII digit
pub fn is_strong_password(password: &str) -> bool {
    password.chars().count() >= MIN_PASSWORD_CHARS && password.chars().any(|c| c.is_ascii_digit())
}

fn failure(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

// Login form. Empty fields are reported with the shared "Missing fields"
// message; the screen decides which single error to show.
#[derive(Debug, Clone, Default, Validate, Deserialize)]
pub struct LoginRequest {
    #[validate(
        length(min = 1, code = "required", message = "Missing fields"),
        regex(path = *EMAIL_SHAPE, code = "email", message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(custom(function = "login_password"))]
    pub password: String,
}

fn login_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(failure("required", "Missing fields"));
    }
    if password.chars().count() < MIN_PASSWORD_CHARS {
        return Err(failure("length", "Password must be at least 6 characters"));
    }
    Ok(())
}

#[derive(Debug, Clone, Default, Validate, Deserialize)]
pub struct SignupRequest {
    #[validate(length(min = 1, code = "required", message = "Username is required"))]
    pub username: String,
    #[validate(
        length(min = 1, code = "required", message = "Email is required"),
        regex(path = *EMAIL_SHAPE, code = "email", message = "Please enter a valid email address")
    )]
    pub email: String,
    #[validate(custom(function = "signup_password"))]
    pub password: String,
}

fn signup_password(password: &str) -> Result<(), ValidationError> {
    if password.is_empty() {
        return Err(failure("required", "Password is required"));
    }
    if !is_strong_password(password) {
        return Err(failure(
            "weak",
            "Password must be at least 6 characters and contain a number",
        ));
    }
    Ok(())
}
