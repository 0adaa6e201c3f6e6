use thiserror::Error;

pub type Res<T> = std::result::Result<T, AppError>;

#[derive(Error, Debug)]
pub enum AppError {
    // === CONVERSION ERRORS ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // === APPLICATION ERRORS ===
    #[error("Authorization error: {0}")]
    Unauthorized(String),

    #[error("Resource conflict: {0}")]
    Conflict(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Whether the error comes from the environment (disk, codec, storage)
    /// rather than from what the caller asked for.
    pub fn is_internal(&self) -> bool {
        matches!(
            self,
            AppError::Io(_)
                | AppError::Serialization(_)
                | AppError::Storage(_)
                | AppError::Internal(_)
        )
    }

    /// Logs the error at a level matching its kind and returns the message
    /// that should be shown to the person at the terminal.
    pub fn report(&self) -> String {
        let is_dev = cfg!(debug_assertions);

        match self {
            // === CONVERSION ERRORS ===
            AppError::Io(error) => {
                log::error!("IO error: {}", error);
            }
            AppError::Serialization(error) => {
                log::error!("Serialization error: {}", error);
            }

            // === APPLICATION ERRORS ===
            AppError::Unauthorized(_)
            | AppError::Conflict(_)
            | AppError::NotFound(_)
            | AppError::BadRequest(_) => {
                log::warn!("{}", self);
                return self.to_string();
            }

            AppError::Storage(error) => {
                log::error!("Storage error: {}", error);
            }
            AppError::Internal(error) => {
                log::error!("Internal error: {}", error);
            }
        }

        if is_dev || !self.is_internal() {
            self.to_string()
        } else {
            "Internal error".to_string()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn application_errors_are_not_internal() {
        assert!(!AppError::BadRequest("x".into()).is_internal());
        assert!(!AppError::Unauthorized("x".into()).is_internal());
        assert!(AppError::Storage("disk full".into()).is_internal());
    }

    #[test]
    fn report_keeps_application_messages() {
        let err = AppError::NotFound("Order ORDER 009".to_string());
        assert_eq!(err.report(), "Resource not found: Order ORDER 009");
    }

    #[test]
    fn internal_details_only_in_debug_builds() {
        let msg = AppError::Storage("disk full".into()).report();
        if cfg!(debug_assertions) {
            assert_eq!(msg, "Storage error: disk full");
        } else {
            assert_eq!(msg, "Internal error");
        }
    }

    #[test]
    fn serde_errors_convert() {
        let err: AppError = serde_json::from_str::<u32>("nope").unwrap_err().into();
        assert!(matches!(err, AppError::Serialization(_)));
    }
}
