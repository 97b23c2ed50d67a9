use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum MovieError {
    #[error("No network connection available")]
    NoConnectivity,

    #[error("API request failed: {0}")]
    ApiError(#[from] reqwest::Error),

    #[error("API returned HTTP {status} for {url}")]
    HttpStatusError { status: u16, url: String },

    #[error("Response parsing error: {message}")]
    ParseError { message: String },

    #[error("The catalog returned no usable movies")]
    EmptyResult,

    #[error("Decode error: {message}")]
    DecodeError { message: String },

    #[error("Release date '{value}' has no '-' separator")]
    FormatError { value: String },

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid URL: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("Configuration error: {field}: {message}")]
    ConfigValidationError { field: String, message: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },
}

/// Why a list request ended in the `Error` state (or why a decode failed).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum FailureReason {
    NoConnectivity,
    NetworkError,
    ParseError,
    EmptyResult,
    DecodeError,
    FormatError,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Network,
    Data,
    Configuration,
    System,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl MovieError {
    pub fn failure_reason(&self) -> FailureReason {
        match self {
            MovieError::NoConnectivity => FailureReason::NoConnectivity,
            MovieError::ApiError(_) | MovieError::HttpStatusError { .. } => {
                FailureReason::NetworkError
            }
            MovieError::ParseError { .. } => FailureReason::ParseError,
            MovieError::EmptyResult => FailureReason::EmptyResult,
            MovieError::DecodeError { .. } | MovieError::SerializationError(_) => {
                FailureReason::DecodeError
            }
            MovieError::FormatError { .. } => FailureReason::FormatError,
            MovieError::IoError(_)
            | MovieError::UrlError(_)
            | MovieError::ConfigValidationError { .. }
            | MovieError::InvalidConfigValueError { .. } => FailureReason::Configuration,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            MovieError::NoConnectivity
            | MovieError::ApiError(_)
            | MovieError::HttpStatusError { .. } => ErrorCategory::Network,
            MovieError::ParseError { .. }
            | MovieError::EmptyResult
            | MovieError::DecodeError { .. }
            | MovieError::FormatError { .. }
            | MovieError::SerializationError(_) => ErrorCategory::Data,
            MovieError::UrlError(_)
            | MovieError::ConfigValidationError { .. }
            | MovieError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            MovieError::IoError(_) => ErrorCategory::System,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            MovieError::FormatError { .. } => ErrorSeverity::Low,
            MovieError::NoConnectivity
            | MovieError::ApiError(_)
            | MovieError::HttpStatusError { .. }
            | MovieError::EmptyResult => ErrorSeverity::Medium,
            MovieError::ParseError { .. }
            | MovieError::DecodeError { .. }
            | MovieError::SerializationError(_)
            | MovieError::UrlError(_)
            | MovieError::ConfigValidationError { .. }
            | MovieError::InvalidConfigValueError { .. } => ErrorSeverity::High,
            MovieError::IoError(_) => ErrorSeverity::Critical,
        }
    }

    /// The single message shown to the user for this failure.
    pub fn user_friendly_message(&self) -> String {
        match self {
            MovieError::NoConnectivity => {
                "No internet connection. Connect to a network and try again.".to_string()
            }
            MovieError::ApiError(e) if e.is_timeout() => {
                "The movie catalog took too long to respond.".to_string()
            }
            MovieError::ApiError(_) => "Could not reach the movie catalog.".to_string(),
            MovieError::HttpStatusError { status, .. } => {
                format!("The movie catalog answered with an error (HTTP {}).", status)
            }
            MovieError::ParseError { .. } => {
                "The movie catalog sent a response that could not be read.".to_string()
            }
            MovieError::EmptyResult => "No movies found for this selection.".to_string(),
            MovieError::DecodeError { .. } | MovieError::SerializationError(_) => {
                "Saved list state could not be restored.".to_string()
            }
            MovieError::FormatError { value } => {
                format!("Release date '{}' is not in YYYY-MM-DD form.", value)
            }
            MovieError::IoError(e) => format!("File access failed: {}", e),
            MovieError::UrlError(_)
            | MovieError::ConfigValidationError { .. }
            | MovieError::InvalidConfigValueError { .. } => format!("Configuration problem: {}", self),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Network => "Check the network connection, then request the list again",
            ErrorCategory::Data => "Request the list again; if it keeps failing the API response format may have changed",
            ErrorCategory::Configuration => "Check the API key and URLs in the configuration",
            ErrorCategory::System => "Check file paths and permissions",
        }
    }
}

pub type Result<T> = std::result::Result<T, MovieError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failure_reason_mapping() {
        assert_eq!(
            MovieError::NoConnectivity.failure_reason(),
            FailureReason::NoConnectivity
        );
        assert_eq!(
            MovieError::HttpStatusError {
                status: 401,
                url: "http://localhost/3/movie/popular".to_string(),
            }
            .failure_reason(),
            FailureReason::NetworkError
        );
        assert_eq!(
            MovieError::ParseError {
                message: "eof".to_string()
            }
            .failure_reason(),
            FailureReason::ParseError
        );
        assert_eq!(MovieError::EmptyResult.failure_reason(), FailureReason::EmptyResult);
    }

    #[test]
    fn test_format_error_is_low_severity() {
        let err = MovieError::FormatError {
            value: "2014".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Data);
    }

    #[test]
    fn test_no_connectivity_message() {
        let message = MovieError::NoConnectivity.user_friendly_message();
        assert!(message.contains("No internet connection"));
        assert_eq!(
            MovieError::NoConnectivity.recovery_suggestion(),
            "Check the network connection, then request the list again"
        );
    }
}
