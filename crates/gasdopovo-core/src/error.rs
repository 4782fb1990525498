//! Error types for the lookup service

/// Result type alias using the crate's Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type
///
/// Classification never produces one of these: every HTML document maps to a
/// `QueryOutcome`. Errors only come from input handling, configuration and
/// transport.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// No identifier was supplied, or it contained no digits
    #[error("identifier is required")]
    MissingIdentifier,

    /// Identifier did not clean to the expected number of digits
    #[error("identifier must have {expected} digits, got {actual}")]
    InvalidIdentifier { expected: usize, actual: usize },

    /// Upstream could not be reached or answered with a failure status
    #[error("upstream error: {0}")]
    Upstream(String),

    /// Configuration errors
    #[error("configuration error: {0}")]
    Config(String),

    /// Network/IO errors
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Timeout errors
    #[error("operation timed out")]
    Timeout,
}

impl Error {
    /// Create a new upstream error
    pub fn upstream(msg: impl Into<String>) -> Self {
        Self::Upstream(msg.into())
    }

    /// Create a new configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Whether this error was caused by the caller's input
    pub fn is_input_error(&self) -> bool {
        matches!(self, Self::MissingIdentifier | Self::InvalidIdentifier { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_error_classification() {
        assert!(Error::MissingIdentifier.is_input_error());
        assert!(Error::InvalidIdentifier { expected: 11, actual: 3 }.is_input_error());
        assert!(!Error::upstream("connection reset").is_input_error());
        assert!(!Error::Timeout.is_input_error());
    }

    #[test]
    fn test_io_error_converts() {
        fn read_missing() -> Result<String> {
            Ok(std::fs::read_to_string("/nonexistent/gasdopovo.yaml")?)
        }

        let err = read_missing().unwrap_err();
        assert!(matches!(err, Error::Io(_)));
        assert!(!err.is_input_error());
    }

    #[test]
    fn test_variant_categories() {
        // No wildcard arm
        fn category(err: &Error) -> &'static str {
            match err {
                Error::MissingIdentifier | Error::InvalidIdentifier { .. } => "input",
                Error::Upstream(_) | Error::Timeout => "transport",
                Error::Config(_) | Error::Io(_) => "setup",
            }
        }

        assert_eq!(category(&Error::MissingIdentifier), "input");
        assert_eq!(category(&Error::Timeout), "transport");
        assert_eq!(category(&Error::config("bad selector")), "setup");
    }

    #[test]
    fn test_display() {
        let err = Error::InvalidIdentifier { expected: 11, actual: 9 };
        assert_eq!(err.to_string(), "identifier must have 11 digits, got 9");
        assert_eq!(Error::config("bad selector").to_string(), "configuration error: bad selector");
    }
}
