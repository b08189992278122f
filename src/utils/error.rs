use thiserror::Error;
use uuid::Uuid;

#[derive(Error, Debug)]
pub enum DeckError {
    #[error("invalid suit code '{0}'")]
    InvalidSuitCode(String),

    #[error("invalid rank code '{0}'")]
    InvalidRankCode(String),

    #[error("deck not found")]
    DeckNotFound,

    #[error("deck has no more cards")]
    EmptyDeck,

    #[error("deck {id} holds an undecodable card: {source}")]
    CorruptDeck {
        id: Uuid,
        #[source]
        source: Box<DeckError>,
    },

    #[cfg(feature = "redis")]
    #[error("Redis error: {0}")]
    Redis(#[from] redis::RedisError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid configuration value for {field} ('{value}'): {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

/// Coarse error kinds, so callers can branch without matching on messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Bad card codes, or a draw the deck cannot satisfy.
    InvalidInput,
    NotFound,
    Backend,
    Configuration,
}

impl DeckError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DeckError::InvalidSuitCode(_)
            | DeckError::InvalidRankCode(_)
            | DeckError::EmptyDeck => ErrorCategory::InvalidInput,
            DeckError::DeckNotFound => ErrorCategory::NotFound,
            DeckError::CorruptDeck { .. } | DeckError::IoError(_) => ErrorCategory::Backend,
            #[cfg(feature = "redis")]
            DeckError::Redis(_) => ErrorCategory::Backend,
            DeckError::ConfigError { .. }
            | DeckError::MissingConfigError { .. }
            | DeckError::InvalidConfigValueError { .. }
            | DeckError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn is_invalid_input(&self) -> bool {
        self.category() == ErrorCategory::InvalidInput
    }
}

pub type Result<T> = std::result::Result<T, DeckError>;
