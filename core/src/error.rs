use thiserror::Error;

#[derive(Debug, Error)]
pub enum TesseraError {
    /// Unknown entity, property, column or relation path segment
    #[error("Mapping error: {0}")]
    Mapping(String),

    /// A construct the active dialect cannot express, or a predicate/null
    /// combination with no defined meaning
    #[error("Unsupported feature: {0}")]
    UnsupportedFeature(String),

    /// Mapping configuration that cannot be acted on (e.g. an unrecognized
    /// optimistic-lock strategy)
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Operation not permitted in the current state
    #[error("Invalid operation: {0}")]
    InvalidOperation(String),

    /// Failure reported by the external row source
    #[error("Store error: {0}")]
    Store(String),

    /// Error parsing a TOML configuration or mapping file
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Error reading a configuration or mapping file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type for compilation and cache operations
pub type Result<T> = std::result::Result<T, TesseraError>;
