use common::error::Res;
use db::store::KeyValueStore;
use std::sync::Arc;

pub const DEFAULT_COMPANY_NAME: &str = "Ezyflow";

/// Branding shown in the header: display name and optional logo.
///
/// Global, not scoped to the signed-in user.
pub struct Settings {
    store: Arc<dyn KeyValueStore>,
    company_name: String,
    logo: Option<String>,
}

impl Settings {
    /// Loads stored branding, falling back to defaults on any read error.
    pub fn load(store: Arc<dyn KeyValueStore>) -> Self {
        let company_name = db::settings::get_company_name(store.as_ref())
            .unwrap_or_else(|e| {
                log::error!("Failed to read company name: {}", e);
                None
            })
            .filter(|name| !name.is_empty())
            .unwrap_or_else(|| DEFAULT_COMPANY_NAME.to_string());
        let logo = db::settings::get_company_logo(store.as_ref())
            .unwrap_or_else(|e| {
                log::error!("Failed to read company logo: {}", e);
                None
            })
            .filter(|logo| !logo.is_empty());

        Settings {
            store,
            company_name,
            logo,
        }
    }

    pub fn company_name(&self) -> &str {
        &self.company_name
    }

    pub fn logo(&self) -> Option<&str> {
        self.logo.as_deref()
    }

    pub fn set_company_name(&mut self, name: &str) -> Res<()> {
        db::settings::set_company_name(self.store.as_ref(), name)?;
        self.company_name = name.to_string();
        Ok(())
    }

    /// `None` removes the logo.
    pub fn set_logo(&mut self, logo: Option<String>) -> Res<()> {
        db::settings::set_company_logo(self.store.as_ref(), logo.as_deref())?;
        self.logo = logo;
        Ok(())
    }
}
