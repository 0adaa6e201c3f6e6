use api_auth::SessionManager;
use api_data::{DataStore, Settings};
use assistant::TextGenerator;
use common::{env_config::Config, error::Res};
use db::store::KeyValueStore;
use std::sync::Arc;

/// Everything a command needs, wired once at start-up.
///
/// The data store follows the session: it is loaded when a user signs in
/// (or a stored session is restored) and cleared on sign-out.
pub struct AppContext {
    pub session: SessionManager,
    pub data: DataStore,
    pub settings: Settings,
    pub generator: Arc<dyn TextGenerator>,
}

impl AppContext {
    pub fn new(
        store: Arc<dyn KeyValueStore>,
        config: &Config,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let session = SessionManager::new(store.clone(), config.auth_config.clone());
        let mut data = DataStore::new(store.clone());
        if let Some(user) = session.user() {
            data.load(user);
        }
        let settings = Settings::load(store);

        AppContext {
            session,
            data,
            settings,
            generator,
        }
    }

    pub async fn login(&mut self, email: &str, password: &str) -> bool {
        if !self.session.login(email, password).await {
            return false;
        }
        if let Some(user) = self.session.user() {
            self.data.load(user);
        }
        true
    }

    pub async fn signup(&mut self, name: &str, email: &str, password: &str) -> bool {
        if !self.session.signup(name, email, password).await {
            return false;
        }
        if let Some(user) = self.session.user() {
            self.data.load(user);
        }
        true
    }

    pub fn logout(&mut self) {
        self.session.logout();
        self.data.clear();
    }

    /// The signed-in user's data, or `Unauthorized`.
    pub fn data_mut(&mut self) -> Res<&mut DataStore> {
        self.session.require_user()?;
        Ok(&mut self.data)
    }

    pub fn data(&self) -> Res<&DataStore> {
        self.session.require_user()?;
        Ok(&self.data)
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use api_data::{dtos::order::NewOrderRequest, services};
    use assistant::GenerationError;
    use async_trait::async_trait;
    use common::env_config::{AuthConfig, GeminiConfig};
    use common::error::AppError;
    use db::models::{order::OrderStatus, product::Product};
    use db::store::MemoryStore;
    use std::{path::PathBuf, time::Duration};

    pub(crate) struct Echo;

    #[async_trait]
    impl TextGenerator for Echo {
        async fn generate(&self, _prompt: &str) -> Result<String, GenerationError> {
            Ok("Generated copy.".to_string())
        }
    }

    pub(crate) fn config() -> Config {
        Config {
            environment: "test".to_string(),
            storage_path: PathBuf::from("unused.json"),
            console_logging_enabled: false,
            log_level: "off".to_string(),
            log_file: None,
            auth_config: AuthConfig {
                latency: Duration::ZERO,
                hash_passwords: false,
            },
            gemini_config: GeminiConfig {
                api_key: None,
                model: GeminiConfig::DEFAULT_MODEL.to_string(),
                base_url: GeminiConfig::DEFAULT_BASE_URL.to_string(),
            },
        }
    }

    pub(crate) fn context(store: &Arc<MemoryStore>) -> AppContext {
        AppContext::new(store.clone(), &config(), Arc::new(Echo))
    }

    fn chair() -> Product {
        Product {
            id: "P-101".to_string(),
            name: "Ergonomic Office Chair".to_string(),
            sku: "FUR-CH-01".to_string(),
            category: "Furniture".to_string(),
            price: 199.99,
            stock: 45,
            description: String::new(),
        }
    }

    #[tokio::test]
    async fn signed_out_context_refuses_data_access() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = context(&store);
        assert!(matches!(ctx.data_mut(), Err(AppError::Unauthorized(_))));
    }

    #[tokio::test]
    async fn state_survives_logout_and_login() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = context(&store);
        assert!(ctx.signup("Owner", "owner@shop.in", "pw").await);

        let data = ctx.data_mut().unwrap();
        data.add_product(chair());
        let order = services::order::create_order(
            data,
            &NewOrderRequest {
                customer_name: "Alice Freeman".to_string(),
                customer_email: "alice@example.com".to_string(),
                payment_method: "Credit Card".to_string(),
                product_ids: vec!["P-101".to_string()],
            },
        )
        .unwrap();
        data.update_order_status(&order.id, OrderStatus::Shipped);
        let saved = ctx.data().unwrap().snapshot().clone();

        ctx.logout();
        assert!(ctx.data.orders().is_empty());
        assert!(ctx.data.customers().is_empty());
        assert!(ctx.data.products().is_empty());

        assert!(ctx.login("owner@shop.in", "pw").await);
        assert_eq!(ctx.data().unwrap().snapshot(), &saved);
    }

    #[tokio::test]
    async fn restart_restores_session_and_data() {
        let store = Arc::new(MemoryStore::new());
        {
            let mut ctx = context(&store);
            assert!(ctx.signup("Owner", "owner@shop.in", "pw").await);
            ctx.data_mut().unwrap().add_product(chair());
        }

        let ctx = context(&store);
        assert!(ctx.session.is_authenticated());
        assert_eq!(ctx.data().unwrap().products().len(), 1);
    }

    #[tokio::test]
    async fn switching_users_swaps_the_working_set() {
        let store = Arc::new(MemoryStore::new());
        let mut ctx = context(&store);
        assert!(ctx.signup("One", "one@shop.in", "pw").await);
        ctx.data_mut().unwrap().add_product(chair());
        ctx.logout();

        assert!(ctx.signup("Two", "two@shop.in", "pw").await);
        assert!(ctx.data().unwrap().products().is_empty());
    }
}
