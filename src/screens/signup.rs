use super::Screen;
use crate::{
    AuthStore,
    dto::{SignupFieldErrors, SignupOutcome, SignupRequest},
    errors::SignupError,
};
use tracing::info;
use validator::{Validate, ValidationError, ValidationErrors};

/// Submit the signup form.
///
/// Every field is checked and all messages come back together. A field
/// reports, in order: missing value, already registered, then malformed.
pub fn submit(store: &mut AuthStore, payload: &SignupRequest) -> SignupOutcome {
    let errors = field_errors(store, payload);
    if !errors.is_empty() {
        return SignupOutcome::Rejected {
            errors,
            clear_password: false,
        };
    }

    match store.signup(&payload.username, &payload.email, &payload.password) {
        Ok(()) => {
            info!("Account created, signup screen navigating home");
            SignupOutcome::Navigate(Screen::Home)
        }
        Err(e) => rejected_by_store(e),
    }
}

/// Put a store refusal on the field it is about
fn rejected_by_store(err: SignupError) -> SignupOutcome {
    let mut errors = SignupFieldErrors::default();
    match err {
        SignupError::UsernameTaken => errors.username = Some(err.to_string()),
        SignupError::EmailTaken => errors.email = Some(err.to_string()),
    }
    SignupOutcome::Rejected {
        errors,
        clear_password: true,
    }
}

fn field_errors(store: &AuthStore, payload: &SignupRequest) -> SignupFieldErrors {
    let validation = payload.validate().err().unwrap_or_else(ValidationErrors::new);
    let fields = validation.field_errors();
    let errors_for = |name: &str| fields.get(name).map(|errs| errs.as_slice()).unwrap_or(&[]);
    let required = |name: &str| message(errors_for(name).iter().find(|e| e.code == "required"));
    let other = |name: &str| message(errors_for(name).first());

    let username = required("username").or_else(|| {
        store
            .username_taken(&payload.username)
            .then(|| SignupError::UsernameTaken.to_string())
    });
    let email = required("email")
        .or_else(|| {
            store
                .email_taken(&payload.email)
                .then(|| SignupError::EmailTaken.to_string())
        })
        .or_else(|| other("email"));

    SignupFieldErrors {
        username,
        email,
        password: other("password"),
    }
}

fn message(error: Option<&ValidationError>) -> Option<String> {
    error.and_then(|e| e.message.as_ref()).map(|m| m.to_string())
}
