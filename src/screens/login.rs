use super::Screen;
use crate::{
    AuthStore,
    dto::{LoginOutcome, LoginRequest},
};
use tracing::info;
use validator::{Validate, ValidationErrors};

pub const INVALID_CREDENTIALS: &str = "Invalid credentials";

/// Submit the login form.
///
/// Form errors keep what was typed. A credential miss clears both inputs and
/// offers the signup link.
pub fn submit(store: &mut AuthStore, payload: &LoginRequest) -> LoginOutcome {
    if let Err(errors) = payload.validate() {
        return LoginOutcome::Rejected {
            message: first_message(&errors),
            clear_email: false,
            clear_password: false,
            offer_signup: false,
        };
    }

    if store.login(&payload.email, &payload.password) {
        info!("Login screen navigating home");
        LoginOutcome::Navigate(Screen::Home)
    } else {
        LoginOutcome::Rejected {
            message: INVALID_CREDENTIALS.to_string(),
            clear_email: true,
            clear_password: true,
            offer_signup: true,
        }
    }
}

// Missing fields first, then the email shape, then the password length.
fn first_message(errors: &ValidationErrors) -> String {
    let fields = errors.field_errors();
    let field = |name: &str| fields.get(name).map(|errs| errs.as_slice()).unwrap_or(&[]);

    let chosen = field("email")
        .iter()
        .chain(field("password"))
        .find(|e| e.code == "required")
        .or_else(|| field("email").first())
        .or_else(|| field("password").first());

    chosen
        .and_then(|e| e.message.as_ref())
        .map(|m| m.to_string())
        .unwrap_or_else(|| "Invalid input".to_string())
}
