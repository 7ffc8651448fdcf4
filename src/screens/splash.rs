use super::Screen;
use crate::AuthStore;
use std::time::Duration;
use tracing::debug;

/// Hold the splash for `delay`, then pick the first real screen.
pub async fn run(store: &AuthStore, delay: Duration) -> Screen {
    tokio::time::sleep(delay).await;
    route(store)
}

/// Signed-in users go straight home; everyone else lands on signup.
pub fn route(store: &AuthStore) -> Screen {
    let next = if store.is_authenticated() {
        Screen::Home
    } else {
        Screen::Signup
    };
    debug!("Splash routing to {:?}", next);
    next
}
