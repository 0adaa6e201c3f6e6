use common::{
    error::{AppError, Res},
    misc::{CUSTOMER_ID_PREFIX, PRODUCT_ID_PREFIX, require_non_blank, time_id, today},
};
use db::models::{
    customer::{Customer, CustomerStatus},
    order::{Order, OrderStatus, PAYMENT_METHODS},
    product::Product,
};

use crate::{
    dtos::order::{NewCustomerRequest, NewOrderRequest, NewProductRequest},
    store::DataStore,
};

/// Creates an order from the order form.
///
/// Unknown customers (by case-insensitive name) are added on the fly. The
/// total is the sum of the selected catalog prices; stock is left alone.
///
/// # Returns
///
/// The created order, or `BadRequest` when a required field is blank or
/// none of the product ids is in the catalog.
pub fn create_order(data: &mut DataStore, req: &NewOrderRequest) -> Res<Order> {
    require_non_blank("Customer name", &req.customer_name)?;
    require_non_blank("Customer email", &req.customer_email)?;
    let payment_method = PAYMENT_METHODS
        .iter()
        .find(|m| m.eq_ignore_ascii_case(req.payment_method.trim()))
        .ok_or_else(|| {
            AppError::BadRequest(format!(
                "Unknown payment method {}, expected one of {}",
                req.payment_method,
                PAYMENT_METHODS.join(", ")
            ))
        })?;
    if req.product_ids.is_empty() {
        return Err(AppError::BadRequest(
            "Select at least one product".to_string(),
        ));
    }

    let selected: Vec<&Product> = data
        .products()
        .iter()
        .filter(|p| req.product_ids.contains(&p.id))
        .collect();
    if selected.is_empty() {
        return Err(AppError::BadRequest(format!(
            "None of the products {:?} is in the catalog",
            req.product_ids
        )));
    }
    let total: f64 = selected.iter().map(|p| p.price).sum();
    let items = selected.len() as u32;

    // find or create the customer
    if data.find_customer_by_name(&req.customer_name).is_none() {
        let customer = Customer {
            id: time_id(CUSTOMER_ID_PREFIX),
            name: req.customer_name.clone(),
            email: req.customer_email.clone(),
            phone: "N/A".to_string(),
            location: "Unknown".to_string(),
            join_date: today(),
            status: CustomerStatus::Active,
            avatar: None,
        };
        log::info!("Adding new customer {} ({})", customer.name, customer.id);
        data.add_customer(customer);
    }

    let order = Order {
        id: data.next_order_id(),
        customer_name: req.customer_name.clone(),
        customer_email: req.customer_email.clone(),
        date: today(),
        total,
        status: OrderStatus::Pending,
        items,
        payment_method: payment_method.to_string(),
    };
    data.add_order(order.clone());
    log::info!("Created {} for {} ({:.2})", order.id, order.customer_name, order.total);

    Ok(order)
}

pub fn create_customer(data: &mut DataStore, req: &NewCustomerRequest) -> Res<Customer> {
    require_non_blank("Name", &req.name)?;
    require_non_blank("Email", &req.email)?;

    let customer = Customer {
        id: time_id(CUSTOMER_ID_PREFIX),
        name: req.name.clone(),
        email: req.email.clone(),
        phone: req.phone.clone(),
        location: req.location.clone(),
        join_date: today(),
        status: CustomerStatus::Active,
        avatar: None,
    };
    data.add_customer(customer.clone());
    Ok(customer)
}

pub fn create_product(data: &mut DataStore, req: &NewProductRequest) -> Res<Product> {
    require_non_blank("Name", &req.name)?;
    if !req.price.is_finite() || req.price < 0.0 {
        return Err(AppError::BadRequest(format!(
            "Invalid price {}",
            req.price
        )));
    }

    let product = Product {
        id: time_id(PRODUCT_ID_PREFIX),
        name: req.name.clone(),
        sku: req.sku.clone(),
        category: req.category.clone(),
        price: req.price,
        stock: req.stock,
        description: req.description.clone(),
    };
    data.add_product(product.clone());
    Ok(product)
}

/// Replaces one product's description, e.g. with generated copy.
pub fn apply_description(data: &mut DataStore, product_id: &str, description: &str) -> Res<Product> {
    let mut product = data
        .find_product(product_id)
        .cloned()
        .ok_or_else(|| AppError::NotFound(format!("Product {}", product_id)))?;
    product.description = description.to_string();
    data.update_product(product.clone());
    Ok(product)
}
