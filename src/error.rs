//! Error types and handling for the globe weather overlay

use thiserror::Error;

/// Main error type for the globe weather application
#[derive(Error, Debug)]
pub enum GlobeError {
    /// Configuration-related errors
    #[error("Configuration error: {message}")]
    Config { message: String },

    /// Input validation errors
    #[error("Invalid input: {message}")]
    Validation { message: String },

    /// HTTP server errors
    #[error("Server error: {message}")]
    Server { message: String },

    /// I/O operation errors
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

impl GlobeError {
    /// Create a new configuration error
    pub fn config<S: Into<String>>(message: S) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a new validation error
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a new server error
    pub fn server<S: Into<String>>(message: S) -> Self {
        Self::Server {
            message: message.into(),
        }
    }

    /// Get a user-friendly error message
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            GlobeError::Config { .. } => {
                "Configuration error. Please check your config file and API key.".to_string()
            }
            GlobeError::Validation { message } => {
                format!("Invalid input: {message}")
            }
            GlobeError::Server { .. } => {
                "The overlay server could not be started. Is the port already in use?".to_string()
            }
            GlobeError::Io { .. } => {
                "File operation failed. Please check file permissions.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_creation() {
        let config_err = GlobeError::config("missing API key");
        assert!(matches!(config_err, GlobeError::Config { .. }));

        let validation_err = GlobeError::validation("zero sized viewport");
        assert!(matches!(validation_err, GlobeError::Validation { .. }));

        let server_err = GlobeError::server("bind failed");
        assert!(matches!(server_err, GlobeError::Server { .. }));
    }

    #[test]
    fn test_user_messages() {
        let config_err = GlobeError::config("test");
        assert!(config_err.user_message().contains("Configuration error"));

        let validation_err = GlobeError::validation("viewport 0x0");
        assert!(validation_err.user_message().contains("viewport 0x0"));

        let server_err = GlobeError::server("test");
        assert!(server_err.user_message().contains("port"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::AddrInUse, "address in use");
        let globe_err: GlobeError = io_err.into();
        assert!(matches!(globe_err, GlobeError::Io { .. }));
    }
}
