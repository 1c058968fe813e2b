// src/error.rs

//! Unified error handling for the price board application.

use thiserror::Error;

/// Result type alias for price board operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Form input validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Price store rejected or failed an operation
    #[error("Store error during {operation}: {message}")]
    Store { operation: String, message: String },

    /// Store call exceeded the configured wait bound
    #[error("Store timed out after {seconds}s during {operation}")]
    StoreTimeout { operation: String, seconds: u64 },
}

impl AppError {
    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create a store error with operation context.
    pub fn store(operation: impl Into<String>, message: impl std::fmt::Display) -> Self {
        Self::Store {
            operation: operation.into(),
            message: message.to_string(),
        }
    }

    /// True for errors the user can fix by retrying the same action.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AppError::Http(_) | AppError::Store { .. } | AppError::StoreTimeout { .. }
        )
    }

    /// Message suitable for direct display.
    ///
    /// Validation errors carry their own text; store and network failures
    /// collapse to one generic retry message so internal detail never
    /// reaches the user.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Validation(msg) => msg.clone(),
            AppError::Http(_) | AppError::Store { .. } | AppError::StoreTimeout { .. } => {
                "Ocorreu um erro ao acessar os preços. Por favor, tente novamente.".to_string()
            }
            other => other.to_string(),
        }
    }
}
