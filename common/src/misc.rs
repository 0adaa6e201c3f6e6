use chrono::Utc;

/// Prefix for credential ids.
pub const USER_ID_PREFIX: &str = "U";
/// Prefix for customer ids.
pub const CUSTOMER_ID_PREFIX: &str = "C";
/// Prefix for product ids.
pub const PRODUCT_ID_PREFIX: &str = "P";

/// Builds a time-derived opaque id such as `U-1717171717171`.
pub fn time_id(prefix: &str) -> String {
    format!("{}-{}", prefix, Utc::now().timestamp_millis())
}

/// Today's date (UTC) as `YYYY-MM-DD`.
pub fn today() -> String {
    Utc::now().format("%Y-%m-%d").to_string()
}

/// Rejects blank values with a `BadRequest` naming the field.
pub fn require_non_blank(field: &str, value: &str) -> crate::error::Res<()> {
    if value.trim().is_empty() {
        return Err(crate::error::AppError::BadRequest(format!(
            "{} is required",
            field
        )));
    }
    Ok(())
}
