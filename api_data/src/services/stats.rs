use chrono::NaiveDate;
use db::models::{
    customer::Customer,
    order::{Order, OrderStatus},
    product::Product,
};
use serde::Serialize;
use std::collections::BTreeMap;

/// Products with fewer units than this show up as low stock.
pub const LOW_STOCK_THRESHOLD: i64 = 15;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardStats {
    pub total_revenue: f64,
    pub total_orders: usize,
    pub avg_order_value: f64,
    pub status_counts: BTreeMap<OrderStatus, usize>,
    pub low_stock: Vec<Product>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CustomerStats {
    pub total_spent: f64,
    pub order_count: usize,
    pub orders: Vec<Order>,
    pub last_order_date: Option<String>,
}

pub fn dashboard_stats(orders: &[Order], products: &[Product]) -> DashboardStats {
    let total_revenue: f64 = orders.iter().map(|o| o.total).sum();
    let total_orders = orders.len();
    let avg_order_value = if total_orders > 0 {
        total_revenue / total_orders as f64
    } else {
        0.0
    };

    let mut status_counts = BTreeMap::new();
    for order in orders {
        *status_counts.entry(order.status).or_insert(0) += 1;
    }

    let low_stock = products
        .iter()
        .filter(|p| p.stock < LOW_STOCK_THRESHOLD)
        .cloned()
        .collect();

    DashboardStats {
        total_revenue,
        total_orders,
        avg_order_value,
        status_counts,
        low_stock,
    }
}

/// Order history of the customer with `email` (exact match), most recent
/// first.
pub fn customer_stats(orders: &[Order], email: &str) -> CustomerStats {
    let mut customer_orders: Vec<Order> = orders
        .iter()
        .filter(|o| o.customer_email == email)
        .cloned()
        .collect();
    customer_orders.sort_by(|a, b| date_key(&b.date).cmp(&date_key(&a.date)));

    CustomerStats {
        total_spent: customer_orders.iter().map(|o| o.total).sum(),
        order_count: customer_orders.len(),
        last_order_date: customer_orders.first().map(|o| o.date.clone()),
        orders: customer_orders,
    }
}

/// Case-insensitive substring match on name or email. A blank term
/// matches everyone.
pub fn search_customers<'a>(customers: &'a [Customer], term: &str) -> Vec<&'a Customer> {
    let needle = term.trim().to_lowercase();
    customers
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&needle) || c.email.to_lowercase().contains(&needle)
        })
        .collect()
}

// unparseable dates sort last
fn date_key(date: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(date, "%Y-%m-%d").ok()
}
