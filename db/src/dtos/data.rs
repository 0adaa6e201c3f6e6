use serde::{Deserialize, Serialize};

use crate::models::{customer::Customer, order::Order, product::Product};

/// Everything one user owns, written as a single blob.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DataSnapshot {
    #[serde(default)]
    pub orders: Vec<Order>,
    #[serde(default)]
    pub customers: Vec<Customer>,
    #[serde(default)]
    pub products: Vec<Product>,
}
