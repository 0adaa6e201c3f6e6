use db::{
    dtos::data::DataSnapshot,
    models::{
        customer::Customer,
        order::{Order, OrderStatus},
        product::Product,
        user::User,
    },
    store::KeyValueStore,
};
use std::sync::Arc;

use crate::services::sequence;

#[derive(Debug, Clone, PartialEq, Eq)]
enum State {
    Uninitialized,
    Loaded { key: String },
}

/// Orders, customers and products of the signed-in user.
///
/// While loaded, every mutation writes the whole snapshot back under the
/// user's key. Write failures are logged and never returned.
pub struct DataStore {
    store: Arc<dyn KeyValueStore>,
    state: State,
    data: DataSnapshot,
}

impl DataStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        DataStore {
            store,
            state: State::Uninitialized,
            data: DataSnapshot::default(),
        }
    }

    /// Switches to `user`'s partition. A missing or unreadable snapshot
    /// means empty collections.
    pub fn load(&mut self, user: &User) {
        let key = db::data::data_key(&user.email);
        self.data = match db::data::load_snapshot(self.store.as_ref(), &key) {
            Ok(Some(snapshot)) => snapshot,
            Ok(None) => DataSnapshot::default(),
            Err(e) => {
                log::error!("Failed to load data for {}: {}", user.email, e);
                DataSnapshot::default()
            }
        };
        log::debug!(
            "Loaded {} orders, {} customers, {} products from {}",
            self.data.orders.len(),
            self.data.customers.len(),
            self.data.products.len(),
            key
        );
        self.state = State::Loaded { key };
    }

    /// Drops the in-memory collections and suspends persistence. The
    /// stored snapshot is kept.
    pub fn clear(&mut self) {
        self.data = DataSnapshot::default();
        self.state = State::Uninitialized;
    }

    pub fn is_loaded(&self) -> bool {
        matches!(self.state, State::Loaded { .. })
    }

    pub fn storage_key(&self) -> Option<&str> {
        match &self.state {
            State::Loaded { key } => Some(key),
            State::Uninitialized => None,
        }
    }

    pub fn snapshot(&self) -> &DataSnapshot {
        &self.data
    }

    pub fn orders(&self) -> &[Order] {
        &self.data.orders
    }

    pub fn customers(&self) -> &[Customer] {
        &self.data.customers
    }

    pub fn products(&self) -> &[Product] {
        &self.data.products
    }

    pub fn find_order(&self, order_id: &str) -> Option<&Order> {
        self.data.orders.iter().find(|o| o.id == order_id)
    }

    pub fn find_product(&self, product_id: &str) -> Option<&Product> {
        self.data.products.iter().find(|p| p.id == product_id)
    }

    /// Case-insensitive lookup by name.
    pub fn find_customer_by_name(&self, name: &str) -> Option<&Customer> {
        let needle = name.to_lowercase();
        self.data
            .customers
            .iter()
            .find(|c| c.name.to_lowercase() == needle)
    }

    /// Newest first.
    pub fn add_order(&mut self, order: Order) {
        self.data.orders.insert(0, order);
        self.persist();
    }

    /// Returns whether an order with `order_id` exists. Any status may
    /// follow any status.
    pub fn update_order_status(&mut self, order_id: &str, status: OrderStatus) -> bool {
        let mut found = false;
        for order in self.data.orders.iter_mut().filter(|o| o.id == order_id) {
            order.status = status;
            found = true;
        }
        if found {
            self.persist();
        }
        found
    }

    /// No dedup: the same email may be added twice.
    pub fn add_customer(&mut self, customer: Customer) {
        self.data.customers.push(customer);
        self.persist();
    }

    pub fn add_product(&mut self, product: Product) {
        self.data.products.push(product);
        self.persist();
    }

    /// Replaces the product with the same id. Returns whether one matched.
    pub fn update_product(&mut self, product: Product) -> bool {
        let found = match self.data.products.iter_mut().find(|p| p.id == product.id) {
            Some(existing) => {
                *existing = product;
                true
            }
            None => false,
        };
        if found {
            self.persist();
        }
        found
    }

    /// Candidate id for the next order. Does not reserve it.
    pub fn next_order_id(&self) -> String {
        sequence::next_order_id(&self.data.orders)
    }

    fn persist(&self) {
        let State::Loaded { key } = &self.state else {
            log::debug!("No user signed in, change kept in memory only");
            return;
        };
        if let Err(e) = db::data::save_snapshot(self.store.as_ref(), key, &self.data) {
            log::error!("Failed to save data under {}: {}", key, e);
        }
    }
}
