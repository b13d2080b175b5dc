//! Error types for arthik-core
//!
//! Every engine failure carries an error code, a severity and, through
//! [`CoreError::to_details`], suggestions suitable for API responses.

use arthik_store::StoreError;
use arthik_utils::ValidationError;
use serde::{Deserialize, Serialize};
use std::io;
use thiserror::Error;

/// Error codes for programmatic error handling
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Account not found
    AccountNotFound,
    /// Transaction not found
    TransactionNotFound,
    /// Recurrence template not found
    RecurrenceNotFound,
    /// Duplicate entry
    DuplicateEntry,
    /// Validation error
    ValidationError,
    /// IO error
    IoError,
    /// Corrupt data file
    InvalidFormat,
    /// Incremental and replayed balances disagree
    InconsistentState,
    /// Configuration error
    ConfigError,
    /// Internal error
    InternalError,
}

impl std::fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorCode::AccountNotFound => write!(f, "ACCOUNT_NOT_FOUND"),
            ErrorCode::TransactionNotFound => write!(f, "TRANSACTION_NOT_FOUND"),
            ErrorCode::RecurrenceNotFound => write!(f, "RECURRENCE_NOT_FOUND"),
            ErrorCode::DuplicateEntry => write!(f, "DUPLICATE_ENTRY"),
            ErrorCode::ValidationError => write!(f, "VALIDATION_ERROR"),
            ErrorCode::IoError => write!(f, "IO_ERROR"),
            ErrorCode::InvalidFormat => write!(f, "INVALID_FORMAT"),
            ErrorCode::InconsistentState => write!(f, "INCONSISTENT_STATE"),
            ErrorCode::ConfigError => write!(f, "CONFIG_ERROR"),
            ErrorCode::InternalError => write!(f, "INTERNAL_ERROR"),
        }
    }
}

/// Detailed error information for API responses
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
    pub fn new(code: ErrorCode, message: String) -> Self {
        Self {
            code,
            message,
            details: None,
            suggestions: vec![],
        }
    }

    pub fn with_detail(mut self, detail: serde_json::Value) -> Self {
        self.details = Some(detail);
        self
    }

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
    /// Informational
    Info,
    /// Warning - the request was rejected, state is intact
    Warning,
    /// Error - operation failed
    Error,
    /// Critical - stored state needs attention
    Critical,
}

impl std::fmt::Display for ErrorSeverity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ErrorSeverity::Info => write!(f, "info"),
            ErrorSeverity::Warning => write!(f, "warning"),
            ErrorSeverity::Error => write!(f, "error"),
            ErrorSeverity::Critical => write!(f, "critical"),
        }
    }
}

/// Main error type for arthik-core
#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Account not found: {name}")]
    AccountNotFound { name: String },

    #[error("Transaction not found: {id}")]
    TransactionNotFound { id: String },

    #[error("Recurrence not found: {id}")]
    RecurrenceNotFound { id: String },

    #[error("{kind} already exists: {key}")]
    AlreadyExists { kind: String, key: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("IO error: {message}")]
    IoError { message: String },

    #[error("Invalid format: {message}")]
    InvalidFormat { message: String },

    #[error("Inconsistent state: {message}")]
    InconsistentState { message: String },

    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    #[error("Internal error: {message}")]
    InternalError { message: String },
}

impl CoreError {
    pub fn validation(message: impl Into<String>) -> Self {
        CoreError::ValidationError {
            message: message.into(),
        }
    }

    pub fn account_not_found(name: impl Into<String>) -> Self {
        CoreError::AccountNotFound { name: name.into() }
    }

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            CoreError::AccountNotFound { .. } => ErrorCode::AccountNotFound,
            CoreError::TransactionNotFound { .. } => ErrorCode::TransactionNotFound,
            CoreError::RecurrenceNotFound { .. } => ErrorCode::RecurrenceNotFound,
            CoreError::AlreadyExists { .. } => ErrorCode::DuplicateEntry,
            CoreError::ValidationError { .. } => ErrorCode::ValidationError,
            CoreError::IoError { .. } => ErrorCode::IoError,
            CoreError::InvalidFormat { .. } => ErrorCode::InvalidFormat,
            CoreError::InconsistentState { .. } => ErrorCode::InconsistentState,
            CoreError::ConfigError { .. } => ErrorCode::ConfigError,
            CoreError::InternalError { .. } => ErrorCode::InternalError,
        }
    }

    /// Get the severity level
    pub fn severity(&self) -> ErrorSeverity {
        match self {
            CoreError::AccountNotFound { .. }
            | CoreError::TransactionNotFound { .. }
            | CoreError::RecurrenceNotFound { .. } => ErrorSeverity::Info,
            CoreError::AlreadyExists { .. } | CoreError::ValidationError { .. } => ErrorSeverity::Warning,
            CoreError::IoError { .. } | CoreError::InvalidFormat { .. } => ErrorSeverity::Error,
            CoreError::InconsistentState { .. }
            | CoreError::ConfigError { .. }
            | CoreError::InternalError { .. } => ErrorSeverity::Critical,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::AccountNotFound { .. }
                | CoreError::TransactionNotFound { .. }
                | CoreError::RecurrenceNotFound { .. }
        )
    }

    /// Convert to detailed error info
    pub fn to_details(&self) -> ErrorDetails {
        let mut details = ErrorDetails::new(self.code(), self.to_string());

        match self {
            CoreError::AccountNotFound { name } => {
                details = details.with_suggestion(format!(
                    "Create the account '{}' before recording transactions against it.",
                    name
                ));
                details = details
                    .with_suggestion("Use the /api/accounts endpoint to list all accounts.".to_string());
            }
            CoreError::TransactionNotFound { .. } => {
                details = details.with_suggestion("Check if the transaction ID is correct.".to_string());
                details = details.with_suggestion(
                    "Use the /api/transactions endpoint to list all transactions.".to_string(),
                );
            }
            CoreError::RecurrenceNotFound { .. } => {
                details = details.with_suggestion(
                    "Use the /api/recurrences endpoint to list all templates.".to_string(),
                );
            }
            CoreError::AlreadyExists { kind, key } => {
                details = details.with_detail(serde_json::json!({ "kind": kind, "key": key }));
                details = details.with_suggestion("Choose a different name or time.".to_string());
            }
            CoreError::ValidationError { message } => {
                details = details.with_detail(serde_json::json!({ "validation_message": message }));
                details = details.with_suggestion(
                    "Review the validation message for specific requirements.".to_string(),
                );
            }
            CoreError::InvalidFormat { .. } => {
                details = details.with_suggestion(
                    "Inspect the data file named in the message; its header must match the expected columns."
                        .to_string(),
                );
            }
            CoreError::InconsistentState { .. } => {
                details = details.with_suggestion(
                    "Run POST /api/reports/recalculate to rebuild balances from the ledger.".to_string(),
                );
            }
            _ => {}
        }

        details
    }
}

/// Result type with CoreError
pub type CoreResult<T> = Result<T, CoreError>;

impl From<io::Error> for CoreError {
    fn from(error: io::Error) -> Self {
        CoreError::IoError {
            message: error.to_string(),
        }
    }
}

impl From<StoreError> for CoreError {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::NotFound { kind: "Account", key } => CoreError::AccountNotFound { name: key },
            StoreError::NotFound { kind, key } => CoreError::InternalError {
                message: format!("{} not found: {}", kind, key),
            },
            StoreError::AlreadyExists { kind, key } => CoreError::AlreadyExists {
                kind: kind.to_string(),
                key,
            },
            e @ StoreError::InvalidRow { .. } => CoreError::InvalidFormat { message: e.to_string() },
            e @ StoreError::CsvError(_) => CoreError::InvalidFormat { message: e.to_string() },
            e => CoreError::IoError { message: e.to_string() },
        }
    }
}

impl From<ValidationError> for CoreError {
    fn from(error: ValidationError) -> Self {
        CoreError::ValidationError {
            message: error.to_string(),
        }
    }
}

/// Error context for reporting
#[derive(Debug, Clone, Default)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Operation being performed
    pub operation: String,
    /// Additional context data
    pub data: serde_json::Value,
}

impl ErrorContext {
    pub fn new(operation: impl Into<String>) -> Self {
        Self {
            request_id: None,
            operation: operation.into(),
            data: serde_json::json!({}),
        }
    }

    pub fn with_request_id(mut self, request_id: String) -> Self {
        self.request_id = Some(request_id);
        self
    }

    pub fn with_data(mut self, key: &str, value: serde_json::Value) -> Self {
        self.data[key] = value;
        self
    }
}

/// Error logger trait
pub trait ErrorLogger: Send + Sync {
    fn log_error(&self, error: &CoreError, context: &ErrorContext);
    fn log_warning(&self, message: &str, context: &ErrorContext);
}

/// Default error logger using log crate
#[derive(Debug, Default)]
pub struct DefaultErrorLogger;

impl ErrorLogger for DefaultErrorLogger {
    fn log_error(&self, error: &CoreError, context: &ErrorContext) {
        log::error!(
            target: "arthik::error",
            "ERROR [{}] {} - Operation: {} - Data: {}",
            error.code(),
            error.to_details(),
            context.operation,
            context.data
        );
    }

    fn log_warning(&self, message: &str, context: &ErrorContext) {
        log::warn!(
            target: "arthik::error",
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
        assert_eq!(ErrorCode::AccountNotFound.to_string(), "ACCOUNT_NOT_FOUND");
        assert_eq!(ErrorCode::InconsistentState.to_string(), "INCONSISTENT_STATE");
        assert_eq!(ErrorCode::DuplicateEntry.to_string(), "DUPLICATE_ENTRY");
    }

    #[test]
    fn test_core_error_severity() {
        assert_eq!(CoreError::account_not_found("Cash").severity(), ErrorSeverity::Info);
        assert_eq!(CoreError::validation("bad").severity(), ErrorSeverity::Warning);
        let error = CoreError::InconsistentState { message: "drift".to_string() };
        assert_eq!(error.severity(), ErrorSeverity::Critical);
    }

    #[test]
    fn test_store_errors_map_to_core_errors() {
        let error: CoreError = StoreError::not_found("Account", "Cash").into();
        assert_eq!(error.code(), ErrorCode::AccountNotFound);
        assert!(error.is_not_found());

        let error: CoreError = StoreError::already_exists("Account", "Cash").into();
        assert_eq!(error.code(), ErrorCode::DuplicateEntry);

        let error: CoreError = StoreError::InvalidRow {
            file: "accounts.csv".to_string(),
            line: 2,
            message: "bad".to_string(),
        }
        .into();
        assert_eq!(error.code(), ErrorCode::InvalidFormat);

        let error: CoreError = StoreError::from(io::Error::new(io::ErrorKind::Other, "disk full")).into();
        assert_eq!(error.code(), ErrorCode::IoError);
    }

    #[test]
    fn test_validation_error_conversion() {
        let error: CoreError = ValidationError::Required { field: "from" }.into();
        assert_eq!(error.code(), ErrorCode::ValidationError);
        assert!(error.to_string().contains("from is required"));
    }

    #[test]
    fn test_error_details_account_not_found() {
        let details = CoreError::account_not_found("Cash").to_details();
        assert_eq!(details.code, ErrorCode::AccountNotFound);
        assert_eq!(details.suggestions.len(), 2);
        assert!(details.message.contains("Cash"));
    }

    #[test]
    fn test_error_context() {
        let context = ErrorContext::new("create_transaction")
            .with_request_id("req-123".to_string())
            .with_data("amount", serde_json::json!("50.00"));
        assert_eq!(context.operation, "create_transaction");
        assert_eq!(context.data["amount"], "50.00");
    }
}
