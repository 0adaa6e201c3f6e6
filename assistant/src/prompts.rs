use std::fmt;

/// Keywords used when the description form is left blank.
pub const DEFAULT_KEYWORDS: &str = "high quality, durable, modern";

/// Situations a customer email can be drafted for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EmailContext {
    #[default]
    ShippingDelay,
    ThankYou,
    PaymentIssue,
    RefundConfirmation,
    ShippingConfirmation,
}

impl EmailContext {
    /// Short label shown in pickers.
    pub fn label(&self) -> &'static str {
        match self {
            EmailContext::ShippingDelay => "Shipping Delay",
            EmailContext::ThankYou => "Thank You Note",
            EmailContext::PaymentIssue => "Payment Issue",
            EmailContext::RefundConfirmation => "Refund Confirmation",
            EmailContext::ShippingConfirmation => "Shipping Confirmation",
        }
    }

    /// Sentence handed to the model.
    pub fn as_str(&self) -> &'static str {
        match self {
            EmailContext::ShippingDelay => "Delay in shipping due to high demand",
            EmailContext::ThankYou => "Thank you for your large order",
            EmailContext::PaymentIssue => "Issue with payment method, please retry",
            EmailContext::RefundConfirmation => "Refund has been processed successfully",
            EmailContext::ShippingConfirmation => "Order has been shipped with tracking details",
        }
    }
}

impl fmt::Display for EmailContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub fn product_description_prompt(name: &str, category: &str, keywords: &str) -> String {
    let keywords = if keywords.trim().is_empty() {
        DEFAULT_KEYWORDS
    } else {
        keywords
    };
    format!(
        "Write a compelling, SEO-friendly product description (approx 50-80 words) for a product named \"{}\" in the category \"{}\". Key features/keywords: {}. Return only the description text.",
        name, category, keywords
    )
}

pub fn customer_email_prompt(
    customer_name: &str,
    order_id: &str,
    status: &str,
    context: &str,
) -> String {
    format!(
        "Write a professional and polite customer service email to {} regarding Order {}.\n\
         The current order status is: {}.\n\
         Context/Reason for email: {}.\n\
         Keep it concise, empathetic, and professional. Return only the email body text (no subject line).",
        customer_name, order_id, status, context
    )
}
