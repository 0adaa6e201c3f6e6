use common::error::Res;

use crate::{DATA_KEY_PREFIX, dtos::data::DataSnapshot, store::KeyValueStore};

/// Storage key of the partition owned by `email`.
pub fn data_key(email: &str) -> String {
    format!("{}{}", DATA_KEY_PREFIX, email)
}

/// Reads a user's partition. `None` when nothing was saved yet.
pub fn load_snapshot(store: &dyn KeyValueStore, key: &str) -> Res<Option<DataSnapshot>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Overwrites a user's partition with the full snapshot.
pub fn save_snapshot(store: &dyn KeyValueStore, key: &str, snapshot: &DataSnapshot) -> Res<()> {
    let json = serde_json::to_string(snapshot)?;
    store.set(key, &json)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{Order, OrderStatus};
    use crate::store::MemoryStore;

    #[test]
    fn key_is_namespaced_by_email() {
        assert_eq!(data_key("bob@shop.in"), "nexus_data_bob@shop.in");
    }

    #[test]
    fn partial_snapshot_fills_missing_collections() {
        let store = MemoryStore::new();
        store
            .set(
                "k",
                r##"{"orders":[{"id":"#ORD-7829","customerName":"Alice Freeman","customerEmail":"alice@example.com","date":"2023-10-24","total":124.5,"status":"Delivered","items":3,"paymentMethod":"Credit Card"}]}"##,
            )
            .unwrap();

        let snapshot = load_snapshot(&store, "k").unwrap().unwrap();
        assert_eq!(snapshot.orders.len(), 1);
        assert_eq!(snapshot.orders[0].status, OrderStatus::Delivered);
        assert!(snapshot.customers.is_empty());
        assert!(snapshot.products.is_empty());
    }

    #[test]
    fn save_then_load() {
        let store = MemoryStore::new();
        let snapshot = DataSnapshot {
            orders: vec![Order {
                id: "ORDER 001".to_string(),
                customer_name: "Bob".to_string(),
                customer_email: "bob@example.com".to_string(),
                date: "2024-01-01".to_string(),
                total: 10.0,
                status: OrderStatus::Pending,
                items: 1,
                payment_method: "PayPal".to_string(),
            }],
            ..Default::default()
        };
        save_snapshot(&store, "k", &snapshot).unwrap();
        assert_eq!(load_snapshot(&store, "k").unwrap(), Some(snapshot));
        assert_eq!(load_snapshot(&store, "other").unwrap(), None);
    }
}
