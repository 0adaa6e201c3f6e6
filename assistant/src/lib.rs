pub mod client;
pub mod error;
pub mod prompts;
pub mod services;

pub use client::{GeminiClient, TextGenerator};
pub use error::GenerationError;
pub use prompts::EmailContext;
