use common::error::Res;

use crate::{
    CURRENT_USER_KEY, USERS_KEY,
    models::user::{Credential, User},
    store::KeyValueStore,
};

/// Reads the credential list. A missing key is an empty list; an
/// unparseable one is an error for the caller to recover from.
pub fn get_credentials(store: &dyn KeyValueStore) -> Res<Vec<Credential>> {
    match store.get(USERS_KEY)? {
        Some(raw) => Ok(serde_json::from_str(&raw)?),
        None => Ok(Vec::new()),
    }
}

/// Copies an unreadable credential list to `<USERS_KEY>.corrupt` and
/// clears the original key, so a fresh list can be started without losing
/// the old records.
pub fn set_aside_credentials(store: &dyn KeyValueStore) -> Res<()> {
    if let Some(raw) = store.get(USERS_KEY)? {
        store.set(&format!("{}.corrupt", USERS_KEY), &raw)?;
    }
    store.remove(USERS_KEY)
}

pub fn save_credentials(store: &dyn KeyValueStore, credentials: &[Credential]) -> Res<()> {
    let json = serde_json::to_string(credentials)?;
    store.set(USERS_KEY, &json)
}

pub fn exists_user_by_email(credentials: &[Credential], email: &str) -> bool {
    credentials.iter().any(|c| c.email == email)
}

/// Reads the stored session pointer.
pub fn get_current_user(store: &dyn KeyValueStore) -> Res<Option<User>> {
    match store.get(CURRENT_USER_KEY)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

pub fn set_current_user(store: &dyn KeyValueStore, user: &User) -> Res<()> {
    let json = serde_json::to_string(user)?;
    store.set(CURRENT_USER_KEY, &json)
}

pub fn remove_current_user(store: &dyn KeyValueStore) -> Res<()> {
    store.remove(CURRENT_USER_KEY)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::MemoryStore;

    fn credential(email: &str) -> Credential {
        Credential {
            id: "U-1".to_string(),
            name: "Alice".to_string(),
            email: email.to_string(),
            password: "secret".to_string(),
        }
    }

    #[test]
    fn unreadable_list_is_set_aside() {
        let store = MemoryStore::new();
        store.set(USERS_KEY, "not json").unwrap();
        set_aside_credentials(&store).unwrap();

        assert_eq!(store.get(USERS_KEY).unwrap(), None);
        assert_eq!(
            store.get("nexus_users.corrupt").unwrap().as_deref(),
            Some("not json")
        );
    }

    #[test]
    fn missing_list_is_empty() {
        let store = MemoryStore::new();
        assert!(get_credentials(&store).unwrap().is_empty());
    }

    #[test]
    fn list_round_trips_through_the_store() {
        let store = MemoryStore::new();
        save_credentials(&store, &[credential("a@x.io")]).unwrap();

        let list = get_credentials(&store).unwrap();
        assert_eq!(list.len(), 1);
        assert!(exists_user_by_email(&list, "a@x.io"));
        assert!(!exists_user_by_email(&list, "A@x.io"));
    }

    #[test]
    fn stored_layout_is_flat_json() {
        let store = MemoryStore::new();
        save_credentials(&store, &[credential("a@x.io")]).unwrap();
        let raw = store.get(USERS_KEY).unwrap().unwrap();
        assert_eq!(
            raw,
            r#"[{"id":"U-1","name":"Alice","email":"a@x.io","password":"secret"}]"#
        );
    }

    #[test]
    fn corrupt_session_is_an_error() {
        let store = MemoryStore::new();
        store.set(CURRENT_USER_KEY, "{broken").unwrap();
        assert!(get_current_user(&store).is_err());

        remove_current_user(&store).unwrap();
        assert_eq!(get_current_user(&store).unwrap(), None);
    }
}
