use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("CSV rendering error: {0}")]
    CsvError(#[from] csv::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Missing configuration: {field}")]
    MissingConfigError { field: String },

    #[error("Invalid value '{value}' for {field}: {reason}")]
    InvalidConfigValueError {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Reference data error: {message}")]
    ReferenceDataError { message: String },

    #[error("Please complete all fields before submitting.")]
    IncompleteSelection,

    #[error("Backend returned status {status}: {message}")]
    BackendError { status: u16, message: String },

    #[error("Transport error: {message}")]
    TransportError { message: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    Configuration,
    ReferenceData,
    Input,
    Backend,
    Network,
    Output,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ErrorSeverity {
    Low,
    Medium,
    High,
    Critical,
}

impl DirectoryError {
    pub fn category(&self) -> ErrorCategory {
        match self {
            DirectoryError::ConfigError { .. }
            | DirectoryError::MissingConfigError { .. }
            | DirectoryError::InvalidConfigValueError { .. } => ErrorCategory::Configuration,
            DirectoryError::ReferenceDataError { .. } => ErrorCategory::ReferenceData,
            DirectoryError::IncompleteSelection => ErrorCategory::Input,
            DirectoryError::BackendError { .. } | DirectoryError::SerializationError(_) => {
                ErrorCategory::Backend
            }
            DirectoryError::TransportError { .. } => ErrorCategory::Network,
            DirectoryError::CsvError(_) | DirectoryError::IoError(_) => ErrorCategory::Output,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.category() {
            ErrorCategory::Input => ErrorSeverity::Low,
            ErrorCategory::Backend | ErrorCategory::Network => ErrorSeverity::Medium,
            ErrorCategory::Output => ErrorSeverity::High,
            ErrorCategory::Configuration | ErrorCategory::ReferenceData => ErrorSeverity::Critical,
        }
    }

    /// 查詢失敗時顯示在錯誤橫幅上的文字，例如 `Error: not found`
    pub fn banner_message(&self) -> String {
        match self {
            DirectoryError::IncompleteSelection => self.to_string(),
            DirectoryError::BackendError { message, .. }
            | DirectoryError::TransportError { message } => format!("Error: {}", message),
            other => format!("Error: {}", other),
        }
    }

    pub fn user_friendly_message(&self) -> String {
        match self {
            DirectoryError::MissingConfigError { field } if field == "backend_url" => {
                "No backend address configured for contact lookups".to_string()
            }
            DirectoryError::MissingConfigError { field } => {
                format!("Required setting '{}' is missing", field)
            }
            DirectoryError::InvalidConfigValueError { field, reason, .. } => {
                format!("Setting '{}' is invalid: {}", field, reason)
            }
            DirectoryError::ReferenceDataError { message } => {
                format!("Could not load committee reference data: {}", message)
            }
            DirectoryError::IncompleteSelection => self.to_string(),
            DirectoryError::BackendError { .. } | DirectoryError::TransportError { .. } => {
                self.banner_message()
            }
            other => other.to_string(),
        }
    }

    pub fn recovery_suggestion(&self) -> &'static str {
        match self.category() {
            ErrorCategory::Configuration => {
                "Pass --backend-url or set DIRECTORY_BACKEND_URL to an http(s) address"
            }
            ErrorCategory::ReferenceData => {
                "Check that the committee and constants JSON files exist and are well-formed"
            }
            ErrorCategory::Input => "Select a term, a function and an MC or LC, then search again",
            ErrorCategory::Backend => "Check the selected term and function, then retry",
            ErrorCategory::Network => {
                "Check the network connection and the backend address, then retry"
            }
            ErrorCategory::Output => "Check that the output can be written and retry",
        }
    }
}

pub type Result<T> = std::result::Result<T, DirectoryError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_banner_message_for_backend_error() {
        let err = DirectoryError::BackendError {
            status: 404,
            message: "not found".to_string(),
        };
        assert_eq!(err.banner_message(), "Error: not found");
        assert_eq!(err.severity(), ErrorSeverity::Medium);
    }

    #[test]
    fn test_incomplete_selection_is_low_severity() {
        let err = DirectoryError::IncompleteSelection;
        assert_eq!(
            err.banner_message(),
            "Please complete all fields before submitting."
        );
        assert_eq!(err.category(), ErrorCategory::Input);
        assert_eq!(err.severity(), ErrorSeverity::Low);
    }

    #[test]
    fn test_missing_backend_is_critical() {
        let err = DirectoryError::MissingConfigError {
            field: "backend_url".to_string(),
        };
        assert_eq!(err.severity(), ErrorSeverity::Critical);
        assert!(err.user_friendly_message().contains("backend address"));
    }
}
