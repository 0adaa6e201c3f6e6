use argon2::password_hash::SaltString;
use argon2::password_hash::rand_core::OsRng;
use argon2::{Argon2, password_hash::PasswordHasher};
use common::error::{AppError, Res};
use common::misc::{USER_ID_PREFIX, time_id};
use db::models::user::{Credential, User};
use db::store::KeyValueStore;

use crate::dtos::auth::RegisterRequest;

/// Appends a credential record and returns the new public user.
/// Used when signing up with name, email and password.
///
/// An unreadable credential list is logged and set aside under
/// `nexus_users.corrupt` before a fresh one is started.
pub fn create_user_with_credentials(
    store: &dyn KeyValueStore,
    req: &RegisterRequest,
    hash_passwords: bool,
) -> Res<User> {
    if req.name.is_empty() || req.email.is_empty() || req.password.is_empty() {
        return Err(AppError::BadRequest(
            "Name, email and password are required".to_string(),
        ));
    }

    let mut credentials = match db::user::get_credentials(store) {
        Ok(list) => list,
        Err(e) => {
            log::error!("Signup error (storage parsing): {}", e);
            db::user::set_aside_credentials(store)?;
            Vec::new()
        }
    };

    if db::user::exists_user_by_email(&credentials, &req.email) {
        return Err(AppError::Conflict(format!(
            "An account with email {} already exists",
            req.email
        )));
    }

    // hash the password if asked to
    let password = if hash_passwords {
        hash_password(&req.password)?
    } else {
        req.password.clone()
    };

    let credential = Credential {
        id: time_id(USER_ID_PREFIX),
        name: req.name.clone(),
        email: req.email.clone(),
        password,
    };
    let user = credential.to_user();

    credentials.push(credential);
    db::user::save_credentials(store, &credentials)?;

    Ok(user)
}

/// Produces an Argon2 PHC string for `password`.
pub fn hash_password(password: &str) -> Res<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(format!("Failed to hash password: {}", e)))
}
