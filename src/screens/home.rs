use super::Screen;
use crate::{AuthStore, dto::HomeView};

pub fn view(store: &AuthStore) -> HomeView {
    HomeView {
        username: store.username().map(str::to_string),
        email: store.email().map(str::to_string),
        password: store.password().map(str::to_string),
    }
}

pub fn logout(store: &mut AuthStore) -> Screen {
    store.logout();
    Screen::Login
}
