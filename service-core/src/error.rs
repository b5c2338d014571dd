use thiserror::Error;

/// Startup and infrastructure failures. Request-level errors are owned by
/// each service.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Internal server error: {0}")]
    InternalError(#[from] anyhow::Error),

    #[error("Configuration error: {0}")]
    ConfigError(anyhow::Error),
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::ConfigError(anyhow::Error::new(err))
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::InternalError(anyhow::Error::new(err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_crate_error_becomes_config_error() {
        let err: AppError = config::ConfigError::Message("bad port".to_string()).into();
        assert!(matches!(err, AppError::ConfigError(_)));
        assert_eq!(err.to_string(), "Configuration error: bad port");
    }

    #[test]
    fn test_io_error_becomes_internal_error() {
        let err: AppError = std::io::Error::other("bind failed").into();
        assert!(matches!(err, AppError::InternalError(_)));
        assert!(err.to_string().contains("bind failed"));
    }
}
