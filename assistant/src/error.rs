use thiserror::Error;

#[derive(Error, Debug)]
pub enum GenerationError {
    #[error("API key missing")]
    MissingApiKey,

    #[error("Invalid provider URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Provider returned no text")]
    EmptyResponse,
}
