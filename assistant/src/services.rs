//! Drafting helpers used by the inventory and order views.
//!
//! They never fail: provider errors are logged and turned into a
//! placeholder the user can read.

use crate::{
    client::TextGenerator,
    error::GenerationError,
    prompts::{customer_email_prompt, product_description_prompt},
};

pub const MISSING_KEY_MESSAGE: &str = "Error: API Key missing.";

const PLACEHOLDERS: [&str; 5] = [
    MISSING_KEY_MESSAGE,
    "No description generated.",
    "Failed to generate description. Please try again.",
    "No email generated.",
    "Failed to generate email. Please try again.",
];

/// Whether `text` is one of the fallback messages rather than generated
/// content.
pub fn is_placeholder(text: &str) -> bool {
    PLACEHOLDERS.contains(&text)
}

pub async fn generate_product_description(
    generator: &dyn TextGenerator,
    name: &str,
    category: &str,
    keywords: &str,
) -> String {
    let prompt = product_description_prompt(name, category, keywords);
    match generator.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => placeholder(
            e,
            "No description generated.",
            "Failed to generate description. Please try again.",
        ),
    }
}

pub async fn generate_customer_email(
    generator: &dyn TextGenerator,
    customer_name: &str,
    order_id: &str,
    status: &str,
    context: &str,
) -> String {
    let prompt = customer_email_prompt(customer_name, order_id, status, context);
    match generator.generate(&prompt).await {
        Ok(text) => text,
        Err(e) => placeholder(
            e,
            "No email generated.",
            "Failed to generate email. Please try again.",
        ),
    }
}

fn placeholder(error: GenerationError, empty: &str, failed: &str) -> String {
    match error {
        GenerationError::MissingApiKey => {
            log::error!("API Key is missing. AI features will not work.");
            MISSING_KEY_MESSAGE.to_string()
        }
        GenerationError::EmptyResponse => empty.to_string(),
        e => {
            log::error!("Gemini API Error: {}", e);
            failed.to_string()
        }
    }
}
