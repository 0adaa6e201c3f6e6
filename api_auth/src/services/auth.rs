use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordVerifier},
};
use common::error::{AppError, Res};
use db::{models::user::User, store::KeyValueStore};

use crate::dtos::auth::LoginRequest;

/// Authenticates an existing user against the credential list.
///
/// Unknown email and wrong password produce the same error so callers
/// cannot tell them apart.
///
/// # Arguments
///
/// * `store` - The key-value store holding the credential list.
/// * `login_data` - The login data.
///
/// # Returns
///
/// A `Result` containing the public `User` or an `AppError` if the
/// credentials do not match or the list cannot be read.
pub fn authenticate_user(store: &dyn KeyValueStore, login_data: &LoginRequest) -> Res<User> {
    if login_data.email.is_empty() || login_data.password.is_empty() {
        return Err(AppError::BadRequest(
            "Email and password are required".to_string(),
        ));
    }

    let credentials = db::user::get_credentials(store)?;

    credentials
        .iter()
        .find(|c| c.email == login_data.email && password_matches(&c.password, &login_data.password))
        .map(|c| c.to_user())
        .ok_or_else(|| AppError::Unauthorized("Invalid credentials".to_string()))
}

/// Compares a submitted password with the stored one.
///
/// Stored values that parse as Argon2 PHC strings are verified with Argon2;
/// anything else, including plain text that merely starts with `$argon2`,
/// is compared exactly.
pub fn password_matches(stored: &str, submitted: &str) -> bool {
    if stored.starts_with("$argon2") {
        if let Ok(parsed) = PasswordHash::new(stored) {
            return Argon2::default()
                .verify_password(submitted.as_bytes(), &parsed)
                .is_ok();
        }
    }
    stored == submitted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::user::hash_password;
    use db::models::user::Credential;
    use db::store::MemoryStore;

    fn seeded(password: &str) -> MemoryStore {
        let store = MemoryStore::new();
        db::user::save_credentials(
            &store,
            &[Credential {
                id: "U-1".to_string(),
                name: "Alice".to_string(),
                email: "alice@example.com".to_string(),
                password: password.to_string(),
            }],
        )
        .unwrap();
        store
    }

    fn login(email: &str, password: &str) -> LoginRequest {
        LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        }
    }

    #[test]
    fn plaintext_match_returns_public_user() {
        let store = seeded("hunter2");
        let user = authenticate_user(&store, &login("alice@example.com", "hunter2")).unwrap();
        assert_eq!(user.id, "U-1");
        assert_eq!(user.name, "Alice");
    }

    #[test]
    fn unknown_email_and_wrong_password_look_the_same() {
        let store = seeded("hunter2");
        let wrong_password = authenticate_user(&store, &login("alice@example.com", "nope"))
            .unwrap_err()
            .to_string();
        let unknown = authenticate_user(&store, &login("bob@example.com", "hunter2"))
            .unwrap_err()
            .to_string();
        assert_eq!(wrong_password, unknown);
    }

    #[test]
    fn comparison_is_case_sensitive() {
        let store = seeded("hunter2");
        assert!(authenticate_user(&store, &login("Alice@example.com", "hunter2")).is_err());
        assert!(authenticate_user(&store, &login("alice@example.com", "HUNTER2")).is_err());
    }

    #[test]
    fn hashed_passwords_verify() {
        let hash = hash_password("hunter2").unwrap();
        let store = seeded(&hash);
        assert!(authenticate_user(&store, &login("alice@example.com", "hunter2")).is_ok());
        assert!(authenticate_user(&store, &login("alice@example.com", &hash)).is_err());
    }

    #[test]
    fn argon_prefixed_plaintext_compares_exactly() {
        let store = seeded("$argon2-is-my-password");
        assert!(authenticate_user(&store, &login("alice@example.com", "$argon2-is-my-password")).is_ok());
        assert!(authenticate_user(&store, &login("alice@example.com", "$argon2")).is_err());
    }

    #[test]
    fn empty_fields_are_rejected() {
        let store = seeded("");
        assert!(matches!(
            authenticate_user(&store, &login("alice@example.com", "")),
            Err(AppError::BadRequest(_))
        ));
    }
}
