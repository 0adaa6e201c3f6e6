use common::error::Res;
use std::{path::Path, sync::Arc};

use crate::store::{FileStore, KeyValueStore};

pub mod data;
pub mod settings;
pub mod store;
pub mod user;

pub mod models {
    pub mod customer;
    pub mod order;
    pub mod product;
    pub mod user;
}

pub mod dtos {
    pub mod data;
}

/// Global list of credential records.
pub const USERS_KEY: &str = "nexus_users";
/// Global pointer to the signed-in user.
pub const CURRENT_USER_KEY: &str = "nexus_current_user";
/// Prefix of the per-user data partition, followed by the user's email.
pub const DATA_KEY_PREFIX: &str = "nexus_data_";
/// Branding: display name.
pub const COMPANY_NAME_KEY: &str = "companyName";
/// Branding: logo as a data-URI.
pub const COMPANY_LOGO_KEY: &str = "companyLogo";

/// Opens the file-backed key-value store used by the binary.
pub fn setup(storage_path: &Path) -> Res<Arc<dyn KeyValueStore>> {
    let store = FileStore::open(storage_path)?;
    log::debug!(
        "Opened key-value store at {} ({} entries)",
        storage_path.display(),
        store.len()
    );
    Ok(Arc::new(store))
}
