use db::models::order::Order;

/// Prefix of generated order ids.
pub const ORDER_ID_PREFIX: &str = "ORDER ";

/// Next `ORDER NNN` id after the highest generated one in `orders`.
///
/// Ids that are not `"ORDER "` followed only by digits (legacy `#ORD-xxxx`
/// ids included) are ignored. The number is zero-padded to width 3 and
/// grows past it when needed.
pub fn next_order_id(orders: &[Order]) -> String {
    let max = orders
        .iter()
        .filter_map(|o| parse_order_number(&o.id))
        .max()
        .unwrap_or(0);

    format!("{}{:03}", ORDER_ID_PREFIX, max.saturating_add(1))
}

/// Numeric part of a generated id, `None` for anything else.
pub fn parse_order_number(id: &str) -> Option<u64> {
    let digits = id.strip_prefix(ORDER_ID_PREFIX)?;
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    digits.parse().ok()
}
