//! Error types for daycache
//!
//! Failures of the wrapped computation are never converted into [`Error`];
//! they reach the caller as the computation's own error type.

use std::fmt;

/// Result type alias for daycache operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for cache setup
#[derive(Debug)]
pub enum Error {
    /// Date-stamp is not `YYYY-MM-DD`
    InvalidDate {
        /// The rejected input
        input: String,
        /// Underlying chrono parse failure
        source: chrono::ParseError,
    },

    /// Configuration value could not be understood
    InvalidConfig {
        /// Name of the setting (environment variable)
        var: String,
        /// The rejected value
        value: String,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::InvalidDate { input, source } => {
                write!(f, "Invalid date-stamp '{}': {} (expected YYYY-MM-DD)", input, source)
            }
            Error::InvalidConfig { var, value } => {
                write!(f, "Invalid value for {}: '{}'", var, value)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::InvalidDate { source, .. } => Some(source),
            Error::InvalidConfig { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_invalid_date_display_and_source() {
        let source = chrono::NaiveDate::parse_from_str("21/08/2025", "%Y-%m-%d").unwrap_err();
        let err = Error::InvalidDate {
            input: "21/08/2025".to_string(),
            source,
        };

        assert!(err.to_string().contains("21/08/2025"));
        assert!(err.to_string().contains("YYYY-MM-DD"));
        assert!(err.source().is_some());
    }

    #[test]
    fn test_invalid_config_display() {
        let err = Error::InvalidConfig {
            var: "DAYCACHE_TIME_ZONE".to_string(),
            value: "mars".to_string(),
        };

        assert_eq!(err.to_string(), "Invalid value for DAYCACHE_TIME_ZONE: 'mars'");
        assert!(err.source().is_none());
    }
}
