// ============================================================================
// ON-DEVICE ACCOUNT APP (TERMINAL FRONT END)
// ============================================================================

// - Splash, signup, login and home screens
// - Accounts held in memory
// - Signed-in session remembered across restarts in a local file
// - Configuration from the environment / .env

use authstore::{
    AuthConfig, AuthStore, FileStore,
    dto::{LoginOutcome, LoginRequest, SignupOutcome, SignupRequest},
    screens::{Screen, home, login, signup, splash},
};
use std::{error::Error, io::Write, sync::Arc};
use tokio::io::{AsyncBufReadExt, BufReader, Lines, Stdin};
use tracing::info;
use tracing_subscriber::EnvFilter;

type Input = Lines<BufReader<Stdin>>;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    dotenvy::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    let config = AuthConfig::from_env()?;
    info!("Session file: {}", config.store_path.display());
    info!(
        "Clear session on logout: {}, persist users: {}",
        config.clear_on_logout, config.persist_users
    );

    let kv = Arc::new(FileStore::new(config.store_path.clone()));
    let mut store = AuthStore::initialize(kv, config).await;

    let mut input = BufReader::new(tokio::io::stdin()).lines();
    let mut screen = Screen::Splash;

    println!("Type `quit` at any prompt to exit.");
    loop {
        let next = match screen {
            Screen::Splash => {
                println!("\n== {} ==", screen.title());
                Some(splash::run(&store, store.config().splash).await)
            }
            Screen::Login => login_screen(&mut store, &mut input).await?,
            Screen::Signup => signup_screen(&mut store, &mut input).await?,
            Screen::Home => home_screen(&mut store, &mut input).await?,
        };

        match next {
            Some(next) => screen = next,
            None => break,
        }
    }

    store.flush().await;
    info!("Goodbye");
    Ok(())
}

/// `None` on EOF or `quit`
async fn prompt(input: &mut Input, label: &str) -> std::io::Result<Option<String>> {
    print!("{label}: ");
    std::io::stdout().flush()?;
    match input.next_line().await? {
        Some(line) if line.trim() == "quit" => Ok(None),
        Some(line) => Ok(Some(line)),
        None => Ok(None),
    }
}

async fn login_screen(store: &mut AuthStore, input: &mut Input) -> std::io::Result<Option<Screen>> {
    println!("\n== {} ==  (enter `signup` as email to create an account)", Screen::Login.title());

    let Some(email) = prompt(input, "Email").await? else {
        return Ok(None);
    };
    if email == "signup" {
        return Ok(Some(Screen::Signup));
    }
    let Some(password) = prompt(input, "Password").await? else {
        return Ok(None);
    };

    match login::submit(store, &LoginRequest { email, password }) {
        LoginOutcome::Navigate(next) => Ok(Some(next)),
        LoginOutcome::Rejected {
            message,
            offer_signup,
            ..
        } => {
            println!("! {message}");
            if offer_signup {
                println!("Don't have an account? Enter `signup` to create one.");
            }
            Ok(Some(Screen::Login))
        }
    }
}

async fn signup_screen(
    store: &mut AuthStore,
    input: &mut Input,
) -> std::io::Result<Option<Screen>> {
    if store.is_authenticated() {
        return Ok(Some(Screen::Home));
    }
    println!("\n== {} ==  (enter `login` as username to sign in)", Screen::Signup.title());

    let Some(username) = prompt(input, "Username").await? else {
        return Ok(None);
    };
    if username == "login" {
        return Ok(Some(Screen::Login));
    }
    let Some(email) = prompt(input, "Email").await? else {
        return Ok(None);
    };
    let Some(password) = prompt(input, "Password").await? else {
        return Ok(None);
    };

    let payload = SignupRequest {
        username,
        email,
        password,
    };
    match signup::submit(store, &payload) {
        SignupOutcome::Navigate(next) => {
            println!("Account created successfully!");
            Ok(Some(next))
        }
        SignupOutcome::Rejected { errors, .. } => {
            for message in errors.messages() {
                println!("! {message}");
            }
            Ok(Some(Screen::Signup))
        }
    }
}

async fn home_screen(store: &mut AuthStore, input: &mut Input) -> std::io::Result<Option<Screen>> {
    let view = home::view(store);
    let mut reveal = false;
    println!("\n== {} ==", Screen::Home.title());
    println!("{}", view.greeting());
    println!("Email: {}", view.email_line());
    println!("Password: {}", view.password_line(reveal));

    loop {
        let Some(command) = prompt(input, "Command (reveal, logout)").await? else {
            return Ok(None);
        };
        match command.trim() {
            "logout" => return Ok(Some(home::logout(store))),
            "reveal" => {
                reveal = !reveal;
                println!("Password: {}", view.password_line(reveal));
            }
            other => println!("Unknown command: {other}"),
        }
    }
}
