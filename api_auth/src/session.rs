use common::{
    env_config::AuthConfig,
    error::{AppError, Res},
};
use db::{models::user::User, store::KeyValueStore};
use std::sync::Arc;
use tokio::time::sleep;

use crate::{
    dtos::auth::{LoginRequest, RegisterRequest},
    services,
};

/// Current-user state on top of the credential store.
///
/// Login and signup report a plain `bool`; the reason of a failure is only
/// logged.
pub struct SessionManager {
    store: Arc<dyn KeyValueStore>,
    config: AuthConfig,
    user: Option<User>,
    is_loading: bool,
}

impl SessionManager {
    /// Creates a session component and restores a previously stored
    /// session, if any.
    pub fn new(store: Arc<dyn KeyValueStore>, config: AuthConfig) -> Self {
        let mut session = SessionManager {
            store,
            config,
            user: None,
            is_loading: true,
        };
        session.restore();
        session
    }

    pub fn user(&self) -> Option<&User> {
        self.user.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    /// The signed-in user, or `Unauthorized`.
    pub fn require_user(&self) -> Res<&User> {
        self.user
            .as_ref()
            .ok_or_else(|| AppError::Unauthorized("Please sign in first".to_string()))
    }

    /// Reloads the stored session pointer. A record that does not parse is
    /// removed and the session falls back to signed out.
    pub fn restore(&mut self) {
        self.is_loading = true;
        self.user = match db::user::get_current_user(self.store.as_ref()) {
            Ok(user) => user,
            Err(e) => {
                log::error!("Failed to parse stored user session: {}", e);
                if let Err(e) = db::user::remove_current_user(self.store.as_ref()) {
                    log::error!("Failed to remove corrupt session: {}", e);
                }
                None
            }
        };
        if let Some(user) = &self.user {
            log::debug!("Restored session for {}", user.email);
        }
        self.is_loading = false;
    }

    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        self.is_loading = true;
        self.simulate_latency().await;

        let request = LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = services::auth::authenticate_user(self.store.as_ref(), &request);

        let success = match result {
            Ok(user) => {
                log::info!("Signed in as {}", user.email);
                self.start_session(user);
                true
            }
            Err(AppError::Unauthorized(_)) | Err(AppError::BadRequest(_)) => {
                log::info!("Login rejected for {}", email);
                false
            }
            Err(e) => {
                log::error!("Login error (storage parsing): {}", e);
                false
            }
        };

        self.is_loading = false;
        success
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> bool {
        self.is_loading = true;
        self.simulate_latency().await;

        let request = RegisterRequest {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
        };
        let result = services::user::create_user_with_credentials(
            self.store.as_ref(),
            &request,
            self.config.hash_passwords,
        );

        let success = match result {
            Ok(user) => {
                log::info!("Created account {} for {}", user.id, user.email);
                self.start_session(user);
                true
            }
            Err(AppError::Conflict(_)) | Err(AppError::BadRequest(_)) => {
                log::info!("Signup rejected for {}", email);
                false
            }
            Err(e) => {
                log::error!("Signup error: {}", e);
                false
            }
        };

        self.is_loading = false;
        success
    }

    pub fn logout(&mut self) {
        if let Some(user) = self.user.take() {
            log::info!("Signed out {}", user.email);
        }
        if let Err(e) = db::user::remove_current_user(self.store.as_ref()) {
            log::error!("Failed to clear stored session: {}", e);
        }
    }

    fn start_session(&mut self, user: User) {
        // in-memory session stands even if the pointer cannot be written
        if let Err(e) = db::user::set_current_user(self.store.as_ref(), &user) {
            log::error!("Failed to persist session for {}: {}", user.email, e);
        }
        self.user = Some(user);
    }

    async fn simulate_latency(&self) {
        if !self.config.latency.is_zero() {
            sleep(self.config.latency).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use db::store::MemoryStore;
    use std::time::Duration;

    fn config() -> AuthConfig {
        AuthConfig {
            latency: Duration::ZERO,
            hash_passwords: false,
        }
    }

    fn session(store: &Arc<MemoryStore>) -> SessionManager {
        SessionManager::new(store.clone(), config())
    }

    #[tokio::test]
    async fn signup_signs_in_and_persists_pointer() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);
        assert!(!s.is_authenticated());
        assert!(!s.is_loading());

        assert!(s.signup("Alice", "alice@example.com", "pw").await);
        let user = s.user().unwrap().clone();
        assert_eq!(user.email, "alice@example.com");
        assert_eq!(db::user::get_current_user(store.as_ref()).unwrap(), Some(user));
    }

    #[tokio::test]
    async fn duplicate_signup_fails_without_growing_the_list() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);
        assert!(s.signup("Alice", "alice@example.com", "pw").await);
        s.logout();

        assert!(!s.signup("Alice Again", "alice@example.com", "other").await);
        assert!(!s.is_authenticated());
        assert_eq!(db::user::get_credentials(store.as_ref()).unwrap().len(), 1);
    }

    #[tokio::test]
    async fn wrong_password_keeps_current_session() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);
        assert!(s.signup("Alice", "alice@example.com", "pw").await);
        let before = s.user().cloned();

        assert!(!s.login("alice@example.com", "wrong").await);
        assert_eq!(s.user().cloned(), before);
        assert_eq!(db::user::get_current_user(store.as_ref()).unwrap(), before);
    }

    #[tokio::test]
    async fn login_after_logout() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);
        assert!(s.signup("Alice", "alice@example.com", "pw").await);
        s.logout();
        s.logout();
        assert!(!s.is_authenticated());
        assert_eq!(db::user::get_current_user(store.as_ref()).unwrap(), None);

        assert!(!s.login("", "pw").await);
        assert!(s.login("alice@example.com", "pw").await);
        assert_eq!(s.require_user().unwrap().name, "Alice");
    }

    #[tokio::test]
    async fn any_plaintext_password_can_sign_back_in() {
        let store = Arc::new(MemoryStore::new());
        let mut s = session(&store);
        assert!(s.signup("Alice", "alice@example.com", "$argon2-is-my-password").await);
        s.logout();
        assert!(s.login("alice@example.com", "$argon2-is-my-password").await);
    }

    #[tokio::test]
    async fn session_is_restored_on_start() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut s = session(&store);
            assert!(s.signup("Alice", "alice@example.com", "pw").await);
        }
        let restored = session(&store);
        assert_eq!(restored.user().unwrap().email, "alice@example.com");
    }

    #[test]
    fn corrupt_session_record_is_dropped() {
        let store = Arc::new(MemoryStore::new());
        store.set(db::CURRENT_USER_KEY, "{\"id\":").unwrap();

        let s = session(&store);
        assert!(!s.is_authenticated());
        assert!(matches!(s.require_user(), Err(AppError::Unauthorized(_))));
        assert_eq!(store.get(db::CURRENT_USER_KEY).unwrap(), None);
    }

    #[tokio::test]
    async fn corrupt_credential_list_fails_login() {
        let store = Arc::new(MemoryStore::new());
        store.set(db::USERS_KEY, "[{").unwrap();
        let mut s = session(&store);
        assert!(!s.login("alice@example.com", "pw").await);
    }

    #[tokio::test]
    async fn latency_is_applied() {
        let store = Arc::new(MemoryStore::new());
        let mut s = SessionManager::new(
            store.clone(),
            AuthConfig {
                latency: Duration::from_millis(30),
                hash_passwords: false,
            },
        );
        let started = std::time::Instant::now();
        assert!(s.signup("Alice", "alice@example.com", "pw").await);
        assert!(started.elapsed() >= Duration::from_millis(30));
    }
}
