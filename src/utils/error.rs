use thiserror::Error;

#[derive(Error, Debug)]
pub enum AuditError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Failed to fetch '{location}': {reason}")]
    FetchError { location: String, reason: String },

    #[error("Failed to decode '{location}' as UTF-8: {reason}")]
    DecodeError { location: String, reason: String },

    #[error("Classifier request failed: {message}")]
    ClassifierError { message: String },

    #[error("Malformed finding: {message}")]
    MalformedFinding { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing required configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Configuration validation failed for {field}: {message}")]
    ConfigValidationError { field: String, message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Fetch,
    Classifier,
    Data,
    Io,
    Configuration,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl AuditError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            AuditError::HttpError(_) | AuditError::FetchError { .. } => ErrorCategory::Fetch,
            AuditError::DecodeError { .. } => ErrorCategory::Fetch,
            AuditError::ClassifierError { .. } => ErrorCategory::Classifier,
            AuditError::SerializationError(_) | AuditError::MalformedFinding { .. } => {
                ErrorCategory::Data
            }
            AuditError::IoError(_) => ErrorCategory::Io,
            AuditError::ConfigError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::ConfigValidationError { .. } => ErrorCategory::Configuration,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self {
            // 單筆 finding 壞掉不影響整份報告
            AuditError::MalformedFinding { .. } => ErrorSeverity::Low,
            AuditError::HttpError(_) | AuditError::ClassifierError { .. } => ErrorSeverity::Medium,
            AuditError::FetchError { .. }
            | AuditError::DecodeError { .. }
            | AuditError::SerializationError(_) => ErrorSeverity::High,
            AuditError::IoError(_)
            | AuditError::ConfigError { .. }
            | AuditError::MissingConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::ConfigValidationError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn recovery_suggestion(&self) -> String {
        match self {
            AuditError::HttpError(_) => {
                "Check your network connection and that the URL is reachable".to_string()
            }
            AuditError::FetchError { location, .. } => {
                format!("Verify that '{}' exists and is accessible", location)
            }
            AuditError::DecodeError { .. } => {
                "Re-save the file as UTF-8 text and try again".to_string()
            }
            AuditError::ClassifierError { .. } => {
                "Check the API key and the classifier endpoint, or raise classifier.retry_attempts"
                    .to_string()
            }
            AuditError::MalformedFinding { .. } => {
                "The classifier returned an incomplete finding; it was skipped".to_string()
            }
            AuditError::SerializationError(_) => {
                "The response body was not valid JSON; try running the audit again".to_string()
            }
            AuditError::IoError(_) => {
                "Check that the output directory exists and is writable".to_string()
            }
            AuditError::MissingConfigError { field } => match field.as_str() {
                "api_key" => "Set GEMINI_API_KEY or GOOGLE_API_KEY in the environment".to_string(),
                _ => format!("Provide a value for '{}'", field),
            },
            AuditError::ConfigError { .. }
            | AuditError::InvalidConfigValueError { .. }
            | AuditError::ConfigValidationError { .. } => {
                "Review the command line arguments and the TOML configuration file".to_string()
            }
        }
    }

    /// Process exit code for an error that ends the run. Never 0.
    pub fn exit_code(&self) -> i32 {
        match self.severity() {
            ErrorSeverity::Critical => 3,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High | ErrorSeverity::Low => 1,
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self.category() {
            ErrorCategory::Fetch => format!("Could not load the text to audit: {}", self),
            ErrorCategory::Classifier => format!("The fallacy analysis failed: {}", self),
            ErrorCategory::Data => format!("Unexpected data: {}", self),
            ErrorCategory::Io => format!("Could not write the ledger: {}", self),
            ErrorCategory::Configuration => format!("Invalid configuration: {}", self),
        }
    }
}

pub type Result<T> = std::result::Result<T, AuditError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_errors_are_high_severity() {
        let err = AuditError::FetchError {
            location: "https://example.com".to_string(),
            reason: "404 Not Found".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Fetch);
        assert_eq!(err.severity(), ErrorSeverity::High);
        assert!(err.recovery_suggestion().contains("https://example.com"));
    }

    #[test]
    fn test_missing_api_key_suggestion() {
        let err = AuditError::MissingConfigError {
            field: "api_key".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.recovery_suggestion().contains("GEMINI_API_KEY"));
        assert!(err.user_friendly_message().starts_with("Invalid configuration"));
    }

    #[test]
    fn test_malformed_finding_is_low_severity() {
        let err = AuditError::MalformedFinding {
            message: "missing quote".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Low);
        assert_eq!(err.category(), ErrorCategory::Data);
    }

    #[test]
    fn test_exit_codes_follow_severity() {
        let missing_key = AuditError::MissingConfigError {
            field: "api_key".to_string(),
        };
        let classifier = AuditError::ClassifierError {
            message: "HTTP status 503".to_string(),
        };
        let fetch = AuditError::FetchError {
            location: "missing.txt".to_string(),
            reason: "not found".to_string(),
        };
        let malformed = AuditError::MalformedFinding {
            message: "missing quote".to_string(),
        };

        assert_eq!(missing_key.exit_code(), 3);
        assert_eq!(classifier.exit_code(), 2);
        assert_eq!(fetch.exit_code(), 1);
        // 走到最外層的錯誤一律不能回傳 0
        assert_eq!(malformed.exit_code(), 1);
    }
}
