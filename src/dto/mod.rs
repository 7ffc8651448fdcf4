mod requests;
mod responses;

pub use requests::{EMAIL_SHAPE, LoginRequest, SignupRequest, is_email_shaped, is_strong_password};
pub use responses::{HomeView, LoginOutcome, SignupFieldErrors, SignupOutcome};
