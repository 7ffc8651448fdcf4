//! Screen controllers: validate input, call the [`AuthStore`], and decide
//! where to go next. Rendering is left to the front end.
//!
//! [`AuthStore`]: crate::AuthStore

pub mod home;
pub mod login;
pub mod signup;
pub mod splash;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Screen {
    Splash,
    Login,
    Signup,
    Home,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Splash => "Welcome",
            Screen::Login => "Login",
            Screen::Signup => "Create Account",
            Screen::Home => "Home",
        }
    }
}
