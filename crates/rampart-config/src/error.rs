use thiserror::Error;

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A config file exists but could not be read.
    #[error("failed to read config file {path}: {source}")]
    ReadError {
        /// File path
        path: String,
        /// Underlying IO error
        #[source]
        source: std::io::Error,
    },

    /// A config file is not valid TOML or does not match the schema.
    #[error("failed to parse config {path}: {source}")]
    ParseError {
        /// File path, or a placeholder for merged or embedded content
        path: String,
        /// Underlying TOML error
        #[source]
        source: toml::de::Error,
    },

    /// A field holds a value outside its accepted range.
    #[error("invalid value for {field}: {message}")]
    ValidationError {
        /// Dotted field path
        field: String,
        /// What is wrong with it
        message: String,
    },

    /// The resolved configuration could not be rendered.
    #[error("failed to render config: {0}")]
    RenderError(String),

    /// The user's home directory could not be determined.
    #[error("cannot determine home directory")]
    NoHomeDir,
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;
