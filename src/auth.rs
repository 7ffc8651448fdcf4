use crate::{
    config::AuthConfig,
    errors::SignupError,
    models::{Session, User},
    persist::Persister,
    storage::{EMAIL_KEY, KeyValueStore, PASSWORD_KEY, SESSION_KEYS, USERNAME_KEY, USERS_KEY},
};
use std::sync::Arc;
use tracing::{info, warn};

/// Client-side authentication state: the registered users and the
/// signed-in session.
///
/// The only constructor is [`AuthStore::initialize`], so nothing can log in
/// or sign up before the persisted session has been read. Operations take
/// `&mut self` and finish before returning; their writes to the key-value
/// store happen afterwards on a background task (see [`AuthStore::flush`]).
pub struct AuthStore {
    users: Vec<User>,
    session: Option<Session>,
    config: AuthConfig,
    persister: Persister,
}

impl AuthStore {
    /// Restore the persisted session and start the persistence writer.
    ///
    /// The session comes back only when all three keys hold non-empty values. With
    /// `persist_users` on, the saved user collection is loaded as well and the
    /// session must also belong to one of those users.
    pub async fn initialize(kv: Arc<dyn KeyValueStore>, config: AuthConfig) -> Self {
        let users = if config.persist_users {
            load_users(kv.as_ref()).await
        } else {
            Vec::new()
        };

        let username = read_key(kv.as_ref(), USERNAME_KEY).await;
        let email = read_key(kv.as_ref(), EMAIL_KEY).await;
        let password = read_key(kv.as_ref(), PASSWORD_KEY).await;

        let mut session = match (username, email, password) {
            (Some(username), Some(email), Some(password)) => Some(Session {
                username,
                email,
                password,
            }),
            _ => None,
        };

        if config.persist_users {
            if let Some(stored) = &session {
                if !users.iter().any(|u| stored.belongs_to(u)) {
                    warn!(
                        "Stored session for {} has no matching user; staying signed out",
                        stored.username
                    );
                    session = None;
                }
            }
        }

        if let Some(restored) = &session {
            info!("Restored session for {}", restored.username);
        }

        Self {
            users,
            session,
            config,
            persister: Persister::spawn(kv),
        }
    }

    /// Sign in with exact email and password. A miss clears any current
    /// session, including the persisted copy.
    pub fn login(&mut self, email: &str, password: &str) -> bool {
        let found = self
            .users
            .iter()
            .find(|u| u.matches_credentials(email, password))
            .map(Session::from);

        match found {
            Some(session) => {
                info!("User logged in: {}", session.email);
                self.start_session(session);
                true
            }
            None => {
                warn!("Login rejected for {}", email);
                self.session = None;
                self.forget_persisted_session();
                false
            }
        }
    }

    /// Register a new account and sign it in.
    ///
    /// Only uniqueness is checked here; email shape and password strength
    /// belong to the caller.
    pub fn signup(&mut self, username: &str, email: &str, password: &str) -> Result<(), SignupError> {
        if self.username_taken(username) {
            return Err(SignupError::UsernameTaken);
        }
        if self.email_taken(email) {
            return Err(SignupError::EmailTaken);
        }

        let user = User::new(username, email, password);
        let session = Session::from(&user);
        self.users.push(user);

        if self.config.persist_users {
            self.persist_users();
        }

        info!("New user registered: {}", email);
        self.start_session(session);
        Ok(())
    }

    pub fn logout(&mut self) {
        if let Some(session) = self.session.take() {
            info!("User logged out: {}", session.email);
        }
        if self.config.clear_on_logout {
            self.forget_persisted_session();
        }
    }

    /// Wait for every queued key-value write to be applied
    pub async fn flush(&self) {
        self.persister.flush().await;
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_some()
    }

    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.username.as_str())
    }

    pub fn email(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.email.as_str())
    }

    pub fn password(&self) -> Option<&str> {
        self.session.as_ref().map(|s| s.password.as_str())
    }

    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    pub fn username_taken(&self, username: &str) -> bool {
        self.users.iter().any(|u| u.username == username)
    }

    pub fn email_taken(&self, email: &str) -> bool {
        self.users.iter().any(|u| u.email == email)
    }

    fn start_session(&mut self, session: Session) {
        self.persister.set(USERNAME_KEY, &session.username);
        self.persister.set(EMAIL_KEY, &session.email);
        self.persister.set(PASSWORD_KEY, &session.password);
        self.session = Some(session);
    }

    fn forget_persisted_session(&self) {
        for key in SESSION_KEYS {
            self.persister.remove(key);
        }
    }

    fn persist_users(&self) {
        match serde_json::to_string(&self.users) {
            Ok(json) => self.persister.set(USERS_KEY, &json),
            Err(e) => warn!("Failed to serialize user collection: {}", e),
        }
    }
}

/// Empty values count as absent
async fn read_key(kv: &dyn KeyValueStore, key: &str) -> Option<String> {
    match kv.get(key).await {
        Ok(value) => value.filter(|v| !v.is_empty()),
        Err(e) => {
            warn!("Failed to read persisted key {}: {}", key, e);
            None
        }
    }
}

async fn load_users(kv: &dyn KeyValueStore) -> Vec<User> {
    let Some(json) = read_key(kv, USERS_KEY).await else {
        return Vec::new();
    };
    match serde_json::from_str::<Vec<User>>(&json) {
        Ok(users) => users,
        Err(e) => {
            warn!("Ignoring unreadable user collection: {}", e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        errors::StorageError,
        storage::{MemoryStore, StorageResult},
    };
    use async_trait::async_trait;

    /// Every call fails
    struct FailingStore;

    fn unavailable() -> StorageError {
        StorageError::Io(std::io::Error::other("storage unavailable"))
    }

    #[async_trait]
    impl KeyValueStore for FailingStore {
        async fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            Err(unavailable())
        }

        async fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(unavailable())
        }

        async fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(unavailable())
        }
    }

    async fn fresh_store() -> (Arc<MemoryStore>, AuthStore) {
        let kv = Arc::new(MemoryStore::new());
        let store = AuthStore::initialize(kv.clone(), AuthConfig::default()).await;
        (kv, store)
    }

    #[tokio::test]
    async fn starts_signed_out_with_no_users() {
        let (_, store) = fresh_store().await;
        assert!(!store.is_authenticated());
        assert!(store.session().is_none());
        assert!(store.users().is_empty());
    }

    #[tokio::test]
    async fn distinct_signups_all_succeed_and_can_log_in() {
        let (_, mut store) = fresh_store().await;
        let accounts = [
            ("alice", "alice@x.com", "abc123"),
            ("bob", "bob@x.com", "pass99"),
            ("carol", "carol@x.com", "c4rol!"),
        ];

        for (username, email, password) in accounts {
            assert_eq!(store.signup(username, email, password), Ok(()));
        }
        assert_eq!(store.users().len(), accounts.len());

        for (username, email, password) in accounts {
            store.logout();
            assert!(store.login(email, password));
            assert_eq!(store.username(), Some(username));
            assert_eq!(store.email(), Some(email));
            assert_eq!(store.password(), Some(password));
        }
    }

    #[tokio::test]
    async fn duplicate_username_wins_over_email_novelty() {
        let (_, mut store) = fresh_store().await;
        store.signup("alice", "dup@x.com", "abc123").unwrap();

        let err = store.signup("alice", "other@x.com", "xyz987").unwrap_err();
        assert_eq!(err, SignupError::UsernameTaken);

        let err = store.signup("alice", "dup@x.com", "xyz987").unwrap_err();
        assert_eq!(err, SignupError::UsernameTaken);

        assert_eq!(store.users().len(), 1);
        assert_eq!(store.username(), Some("alice"));
        assert_eq!(store.email(), Some("dup@x.com"));
        assert_eq!(store.password(), Some("abc123"));
    }

    #[tokio::test]
    async fn duplicate_email_with_novel_username_is_rejected() {
        let (_, mut store) = fresh_store().await;
        store.signup("alice", "alice@x.com", "abc123").unwrap();

        let err = store.signup("bob", "alice@x.com", "abc123").unwrap_err();
        assert_eq!(err, SignupError::EmailTaken);
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn usernames_are_case_sensitive() {
        let (_, mut store) = fresh_store().await;
        store.signup("alice", "alice@x.com", "abc123").unwrap();
        assert_eq!(store.signup("Alice", "alice2@x.com", "abc123"), Ok(()));
    }

    #[tokio::test]
    async fn signup_does_not_revalidate_input() {
        let (_, mut store) = fresh_store().await;
        assert_eq!(store.signup("weak", "not-an-email", "a"), Ok(()));
        assert!(store.is_authenticated());
    }

    #[tokio::test]
    async fn login_with_no_users_fails() {
        let (kv, mut store) = fresh_store().await;
        assert!(!store.login("bob@x.com", "whatever"));
        assert!(!store.is_authenticated());
        assert!(store.session().is_none());

        store.flush().await;
        assert!(kv.is_empty());
    }

    #[tokio::test]
    async fn wrong_password_signs_out_and_clears_storage() {
        let (kv, mut store) = fresh_store().await;
        store.signup("alice", "alice@x.com", "abc123").unwrap();
        store.flush().await;
        assert_eq!(kv.len(), 3);

        assert!(!store.login("alice@x.com", "wrong1"));
        assert!(!store.is_authenticated());
        assert_eq!(store.username(), None);

        store.flush().await;
        for key in SESSION_KEYS {
            assert_eq!(kv.get(key).await.unwrap(), None);
        }
    }

    #[tokio::test]
    async fn successful_login_persists_session_keys() {
        let (kv, mut store) = fresh_store().await;
        store.signup("alice", "alice@x.com", "abc123").unwrap();
        store.logout();
        assert!(store.login("alice@x.com", "abc123"));
        store.flush().await;

        assert_eq!(kv.get(USERNAME_KEY).await.unwrap().as_deref(), Some("alice"));
        assert_eq!(kv.get(EMAIL_KEY).await.unwrap().as_deref(), Some("alice@x.com"));
        assert_eq!(kv.get(PASSWORD_KEY).await.unwrap().as_deref(), Some("abc123"));
        assert_eq!(kv.get(USERS_KEY).await.unwrap(), None);
    }

    #[tokio::test]
    async fn logout_clears_session_fields() {
        let (_, mut store) = fresh_store().await;
        store.signup("alice", "alice@x.com", "abc123").unwrap();
        store.logout();

        assert!(!store.is_authenticated());
        assert_eq!(store.username(), None);
        assert_eq!(store.email(), None);
        assert_eq!(store.password(), None);
        assert_eq!(store.users().len(), 1);
    }

    #[tokio::test]
    async fn partial_persisted_session_is_ignored() {
        let kv = Arc::new(MemoryStore::new());
        kv.set(USERNAME_KEY, "alice").await.unwrap();
        kv.set(EMAIL_KEY, "alice@x.com").await.unwrap();

        let store = AuthStore::initialize(kv, AuthConfig::default()).await;
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn empty_persisted_values_are_not_a_session() {
        let kv = Arc::new(MemoryStore::new());
        let mut store = AuthStore::initialize(kv.clone(), AuthConfig::default()).await;
        store.signup("", "", "").unwrap();
        assert!(store.is_authenticated());
        store.flush().await;
        drop(store);

        let store = AuthStore::initialize(kv.clone(), AuthConfig::default()).await;
        assert!(!store.is_authenticated());
        assert_eq!(store.username(), None);

        kv.set(USERNAME_KEY, "alice").await.unwrap();
        kv.set(EMAIL_KEY, "alice@x.com").await.unwrap();
        let store = AuthStore::initialize(kv, AuthConfig::default()).await;
        assert!(!store.is_authenticated());
    }

    #[tokio::test]
    async fn storage_failures_never_reach_callers() {
        let mut store = AuthStore::initialize(Arc::new(FailingStore), AuthConfig::default()).await;
        assert!(!store.is_authenticated());

        assert_eq!(store.signup("alice", "alice@x.com", "abc123"), Ok(()));
        store.logout();
        assert!(store.login("alice@x.com", "abc123"));
        assert!(!store.login("alice@x.com", "nope12"));
        store.flush().await;

        assert!(store.login("alice@x.com", "abc123"));
        assert_eq!(store.username(), Some("alice"));
    }

    #[tokio::test]
    async fn failing_user_collection_read_starts_empty() {
        let config = AuthConfig {
            persist_users: true,
            ..AuthConfig::default()
        };
        let mut store = AuthStore::initialize(Arc::new(FailingStore), config).await;
        assert!(store.users().is_empty());
        assert_eq!(store.signup("bob", "bob@x.com", "pass99"), Ok(()));
        store.flush().await;
    }
}
