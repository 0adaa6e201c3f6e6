use common::error::Res;

use crate::{COMPANY_LOGO_KEY, COMPANY_NAME_KEY, store::KeyValueStore};

pub fn get_company_name(store: &dyn KeyValueStore) -> Res<Option<String>> {
    store.get(COMPANY_NAME_KEY)
}

pub fn set_company_name(store: &dyn KeyValueStore, name: &str) -> Res<()> {
    store.set(COMPANY_NAME_KEY, name)
}

pub fn get_company_logo(store: &dyn KeyValueStore) -> Res<Option<String>> {
    store.get(COMPANY_LOGO_KEY)
}

/// `None` removes the stored logo.
pub fn set_company_logo(store: &dyn KeyValueStore, logo: Option<&str>) -> Res<()> {
    match logo {
        Some(data_uri) => store.set(COMPANY_LOGO_KEY, data_uri),
        None => store.remove(COMPANY_LOGO_KEY),
    }
}
