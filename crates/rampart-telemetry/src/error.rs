use thiserror::Error;

/// Failures while installing the log subscriber.
#[derive(Debug, Error)]
pub enum TelemetryError {
    /// A level, format or filter directive was not understood.
    #[error("invalid logging configuration: {0}")]
    ConfigError(String),

    /// A global subscriber was already installed.
    #[error("cannot install log subscriber: {0}")]
    InitError(String),

    /// The log directory could not be prepared.
    #[error("log output unavailable: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result alias for telemetry setup.
pub type TelemetryResult<T> = Result<T, TelemetryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let err = TelemetryError::ConfigError("unknown log format: xml".to_owned());
        assert_eq!(
            err.to_string(),
            "invalid logging configuration: unknown log format: xml"
        );

        let err = TelemetryError::from(std::io::Error::from(std::io::ErrorKind::PermissionDenied));
        assert!(matches!(err, TelemetryError::IoError(_)));
    }
}
