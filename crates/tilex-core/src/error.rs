//! Error types for Tilex

use thiserror::Error;

/// Result type alias using Tilex's Error
pub type Result<T> = std::result::Result<T, Error>;

/// Tilex error types with helpful messages and suggestions
#[derive(Error, Debug)]
pub enum Error {
    // Entity errors (E001-E099)
    #[error("Article '{0}' not found. Run `tilex articles list` to see all articles.")]
    ArticleNotFound(i64),

    // Input errors (E100-E199)
    #[error("Invalid input: {0}")]
    Validation(String),

    // Database errors (E400-E499)
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Config errors (E600-E699)
    #[error("Configuration error: {0}")]
    ConfigError(String),

    // Caller errors (E700-E799)
    #[error("Operation cancelled")]
    Cancelled,
}

impl Error {
    /// Get error code for this error type
    pub fn code(&self) -> &'static str {
        match self {
            Self::ArticleNotFound(_) => "E001",
            Self::Validation(_) => "E100",
            Self::DatabaseError(_) => "E400",
            Self::ConfigError(_) => "E600",
            Self::Cancelled => "E700",
        }
    }

    /// Get suggestion for how to fix this error
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ArticleNotFound(_) => Some("tilex articles list".to_string()),
            Self::DatabaseError(_) => Some("tilex db status".to_string()),
            Self::ConfigError(_) => Some("tilex config list".to_string()),
            _ => None,
        }
    }

    /// Whether this error means the requested entity does not exist
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::ArticleNotFound(_))
    }
}
