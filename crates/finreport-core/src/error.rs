//! Error types for finreport-core
//!
//! This module provides error handling for the tree, ledger and report
//! layout functionality, including error codes, detailed messages, and
//! suggestions.

use finreport_config::ConfigError;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Balance sheet sections do not have the expected shape
    InvalidBalanceSheet,
    /// A record references a parent that is not in the input
    OrphanRecord,
    /// Parent references loop back on themselves
    CyclicHierarchy,
    /// Two records share one id
    DuplicateRecord,
    /// Invalid data format
    InvalidFormat,
    /// Configuration error
    ConfigError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::InvalidBalanceSheet => write!(f, "INVALID_BALANCE_SHEET"),
            ErrorCode::OrphanRecord => write!(f, "ORPHAN_RECORD"),
            ErrorCode::CyclicHierarchy => write!(f, "CYCLIC_HIERARCHY"),
            ErrorCode::DuplicateRecord => write!(f, "DUPLICATE_RECORD"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
        }
    }
}

/// Detailed error information
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
    /// Suggestions for resolution
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub suggestions: Vec<String>,
}

impl ErrorDetails {
    /// Create a new error detail
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    /// Add detail information
    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

    /// Add a suggestion
    pub fn with_suggestion(mut self, suggestion: String) -> Self {
        self.suggestions.push(suggestion);
        self
    }
}

impl std::fmt::Display for ErrorDetails {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)?;
        if let Some(ref details) = self.details {
            write!(f, "\nDetails: {}", details)?;
        }
        if !self.suggestions.is_empty() {
            write!(f, "\nSuggestions:")?;
            for suggestion in &self.suggestions {
                write!(f, "\n  - {}", suggestion)?;
            }
        }
        Ok(())
    }
}

/// Error severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ErrorSeverity {
    /// Debug information
    Debug,
    /// Informational
    Info,
    /// Warning - operation may be affected
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - the input violates the backend contract
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Debug => write!(f, "debug"),
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for finreport-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Invalid balance sheet: {message}")]
    InvalidBalanceSheet { message: String },

    #[error("Record {id} references missing parent {parent_id}")]
    OrphanRecord { id: String, parent_id: String },

    #[error("Cyclic parent references among: {}", .ids.join(", "))]
    CyclicHierarchy { ids: Vec<String> },

    #[error("Duplicate record id: {id}")]
    DuplicateRecord { id: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
}

impl CoreError {
    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::InvalidBalanceSheet { .. } => ErrorCode::InvalidBalanceSheet,
            CoreError::OrphanRecord { .. } => ErrorCode::OrphanRecord,
            CoreError::CyclicHierarchy { .. } => ErrorCode::CyclicHierarchy,
            CoreError::DuplicateRecord { .. } => ErrorCode::DuplicateRecord,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::Config(_) => ErrorCode::ConfigError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::InvalidBalanceSheet { .. } => ErrorSeverity::Critical,
            CoreError::OrphanRecord { .. } => ErrorSeverity::Error,
            CoreError::CyclicHierarchy { .. } => ErrorSeverity::Error,
            CoreError::DuplicateRecord { .. } => ErrorSeverity::Warning,
            CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::Config(_) => ErrorSeverity::Critical,
        }
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::InvalidBalanceSheet { .. } => {
                details = details.with_suggestion(
                    "A balance sheet needs two top sections (assets, liabilities+equity).".to_string(),
                );
                details = details.with_suggestion(
                    "The second section needs two subsections (liabilities, equity).".to_string(),
                );
            }
            CoreError::OrphanRecord { id, parent_id } => {
                details = details.with_detail(serde_json::json!({ "id": id, "parent_id": parent_id }));
                details = details.with_suggestion(
                    "Fetch the complete record set, or use the collect orphan policy.".to_string(),
                );
            }
            CoreError::CyclicHierarchy { ids } => {
                details = details.with_detail(serde_json::json!({ "ids": ids }));
            }
            CoreError::InvalidFormat { message } => {
                details = details.with_detail(serde_json::json!({ "parse_message": message }));
            }
            CoreError::Config(inner) => {
                for suggestion in inner.to_details().suggestions {
                    details = details.with_suggestion(suggestion);
                }
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<serde_json::Error> for CoreError {
    fn from(error: serde_json::Error) -> Self {
        CoreError::InvalidFormat {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    /// Create a new error context
    pub fn new(operation: String) -> Self {
        Self {
            operation,
            data: serde_json::json!({}),
        }
    }

    /// Add context data
    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger {
    /// Log an error
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    /// Log a warning
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "finreport::error",
            "ERROR [{}] ({}) {} - Operation: {} - Data: {}",
            error.code(),
            error.severity(),
            error.to_details(),
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "finreport::error",
            "WARNING: {} - Operation: {} - Data: {}",
            message,
            context.operation,
            context.data
        );
    }
}

// ==================== Tests ====================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::InvalidBalanceSheet.to_string(), "INVALID_BALANCE_SHEET");
        assert_eq!(ErrorCode::OrphanRecord.to_string(), "ORPHAN_RECORD");
        assert_eq!(ErrorCode::InvalidFormat.to_string(), "INVALID_FORMAT");
    }

    #[test]
    fn test_error_severity_display() {
        assert_eq!(ErrorSeverity::Debug.to_string(), "debug");
        assert_eq!(ErrorSeverity::Warning.to_string(), "warning");
        assert_eq!(ErrorSeverity::Critical.to_string(), "critical");
    }

    #[test]
    fn test_balance_sheet_error_is_critical() {
        let error = CoreError::InvalidBalanceSheet {
            message: "got 1 section".to_string(),
        };
        assert_eq!(error.code(), ErrorCode::InvalidBalanceSheet);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert_eq!(error.to_details().suggestions.len(), 2);
    }

    #[test]
    fn test_orphan_details() {
        let error = CoreError::OrphanRecord {
            id: "a".to_string(),
            parent_id: "ghost".to_string(),
        };
        let details = error.to_details();
        assert_eq!(details.code, ErrorCode::OrphanRecord);
        assert!(details.message.contains("ghost"));
        assert_eq!(details.details.unwrap()["parent_id"], "ghost");
    }

    #[test]
    fn test_cyclic_message_lists_ids() {
        let error = CoreError::CyclicHierarchy {
            ids: vec!["a".to_string(), "b".to_string()],
        };
        assert_eq!(error.to_string(), "Cyclic parent references among: a, b");
    }

    #[test]
    fn test_config_error_conversion() {
        let error: CoreError = ConfigError::IoError.into();
        assert_eq!(error.code(), ErrorCode::ConfigError);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_config_failure_propagates_with_suggestions() {
        fn load(yaml: &str) -> CoreResult<finreport_config::Config> {
            Ok(finreport_config::Config::from_yaml(yaml)?)
        }

        let error = load("layout:\n  indent_scale: 0\n").unwrap_err();
        assert_eq!(error.code(), ErrorCode::ConfigError);
        assert_eq!(error.severity(), ErrorSeverity::Critical);
        assert_eq!(error.to_details().suggestions.len(), 2);
        assert!(load("").is_ok());
    }

    #[test]
    fn test_json_error_conversion() {
        let parse: Result<serde_json::Value, _> = serde_json::from_str("{");
        let error: CoreError = parse.unwrap_err().into();
        assert_eq!(error.code(), ErrorCode::InvalidFormat);
        assert!(error.to_details().details.is_some());
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("layout".to_string())
            .with_data("report", serde_json::json!("r-1"));

        assert_eq!(context.operation, "layout");
        assert_eq!(context.data["report"], "r-1");
    }
}
