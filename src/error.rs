//! Unified error handling for the Converge CLI
//!
//! This module provides a structured error system with:
//! - Unique error codes for debugging and support tickets
//! - Constructor methods for the common cases
//! - Automatic conversions from library error types

use std::fmt;
use thiserror::Error;

/// Unified Result type for all Converge operations
pub type Result<T> = std::result::Result<T, ConvergeError>;

/// Error codes for Converge operations
///
/// Each error has a unique code in the format `CXXX` where:
/// - C1XX: Authentication and session errors
/// - C2XX: Network and API errors
/// - C3XX: File and I/O errors
/// - C4XX: Configuration errors
/// - C5XX: Validation and input errors
/// - C6XX: Resume ingestion errors
/// - C7XX: Platform resource errors
/// - C8XX: UI errors
/// - C9XX: Internal errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Authentication (C1XX)
    /// C101: Authentication failed
    AuthenticationFailed,
    /// C102: Authorization denied
    AuthorizationDenied,
    /// C103: Token expired
    TokenExpired,
    /// C104: Session not found
    SessionNotFound,

    // Network (C2XX)
    /// C201: HTTP request failed
    HttpError,
    /// C202: Connection timeout
    ConnectionTimeout,
    /// C203: Connection refused
    ConnectionRefused,
    /// C204: API returned error response
    ApiError,
    /// C205: Invalid API response format
    InvalidResponse,

    // File/IO (C3XX)
    /// C301: File not found
    FileNotFound,
    /// C302: File read error
    FileReadError,
    /// C303: File write error
    FileWriteError,

    // Configuration (C4XX)
    /// C401: Configuration error
    ConfigError,
    /// C402: Invalid endpoint URL
    InvalidEndpoint,

    // Validation (C5XX)
    /// C501: Invalid input
    InvalidInput,
    /// C502: Validation failed
    ValidationFailed,
    /// C503: Unresolvable identifier
    UnresolvableIdentifier,
    /// C504: Stale reference in a pending request
    StaleReference,

    // Resume ingestion (C6XX)
    /// C601: Not a PDF document
    NotAPdf,
    /// C602: Text extraction failed
    ExtractionFailed,
    /// C603: Resume upload failed
    ResumeUploadFailed,

    // Resource (C7XX)
    /// C701: Resource not found
    ResourceNotFound,
    /// C702: Project not found
    ProjectNotFound,
    /// C703: Profile not found
    ProfileNotFound,

    // UI (C8XX)
    /// C801: Dialog error
    DialogError,
    /// C802: User cancelled
    UserCancelled,

    // Internal (C9XX)
    /// C901: Internal error
    InternalError,
    /// C902: Serialization error
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code
    pub fn code(&self) -> u16 {
        match self {
            // Authentication (C1XX)
            ErrorCode::AuthenticationFailed => 101,
            ErrorCode::AuthorizationDenied => 102,
            ErrorCode::TokenExpired => 103,
            ErrorCode::SessionNotFound => 104,

            // Network (C2XX)
            ErrorCode::HttpError => 201,
            ErrorCode::ConnectionTimeout => 202,
            ErrorCode::ConnectionRefused => 203,
            ErrorCode::ApiError => 204,
            ErrorCode::InvalidResponse => 205,

            // File/IO (C3XX)
            ErrorCode::FileNotFound => 301,
            ErrorCode::FileReadError => 302,
            ErrorCode::FileWriteError => 303,

            // Configuration (C4XX)
            ErrorCode::ConfigError => 401,
            ErrorCode::InvalidEndpoint => 402,

            // Validation (C5XX)
            ErrorCode::InvalidInput => 501,
            ErrorCode::ValidationFailed => 502,
            ErrorCode::UnresolvableIdentifier => 503,
            ErrorCode::StaleReference => 504,

            // Resume ingestion (C6XX)
            ErrorCode::NotAPdf => 601,
            ErrorCode::ExtractionFailed => 602,
            ErrorCode::ResumeUploadFailed => 603,

            // Resource (C7XX)
            ErrorCode::ResourceNotFound => 701,
            ErrorCode::ProjectNotFound => 702,
            ErrorCode::ProfileNotFound => 703,

            // UI (C8XX)
            ErrorCode::DialogError => 801,
            ErrorCode::UserCancelled => 802,

            // Internal (C9XX)
            ErrorCode::InternalError => 901,
            ErrorCode::SerializationError => 902,
        }
    }

    /// Get the string code (e.g., "C101")
    pub fn as_str(&self) -> String {
        format!("C{}", self.code())
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "C{}", self.code())
    }
}

/// Main error type for all Converge operations
#[derive(Error, Debug)]
pub enum ConvergeError {
    /// Authentication failed
    #[error("[{code}] Authentication failed: {message}")]
    Authentication {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Authorization denied
    #[error("[{code}] Authorization denied: {message}")]
    Authorization { code: ErrorCode, message: String },

    /// HTTP/Network error
    #[error("[{code}] Network error: {message}")]
    Network {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// API error with status code
    #[error("[{code}] API error ({status}): {message}")]
    Api {
        code: ErrorCode,
        status: u16,
        message: String,
    },

    /// File or IO error
    #[error("[{code}] {context}: {message}")]
    Io {
        code: ErrorCode,
        context: String,
        message: String,
        #[source]
        source: Option<std::io::Error>,
    },

    /// Configuration error
    #[error("[{code}] Configuration error: {message}")]
    Config {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<config::ConfigError>,
    },

    /// Validation error
    #[error("[{code}] Validation error: {message}")]
    Validation {
        code: ErrorCode,
        message: String,
        field: Option<String>,
    },

    /// Invalid input error
    #[error("[{code}] Invalid input: {message}")]
    InvalidInput { code: ErrorCode, message: String },

    /// Resume ingestion error
    #[error("[{code}] Resume error: {message}")]
    Resume { code: ErrorCode, message: String },

    /// Resource not found
    #[error("[{code}] Not found: {resource}")]
    NotFound { code: ErrorCode, resource: String },

    /// UI/Dialog error
    #[error("[{code}] UI error: {message}")]
    Ui { code: ErrorCode, message: String },

    /// Internal/Unexpected error
    #[error("[{code}] Internal error: {message}")]
    Internal { code: ErrorCode, message: String },

    /// JSON serialization error
    #[error("[{code}] Serialization error: {message}")]
    Serialization {
        code: ErrorCode,
        message: String,
        #[source]
        source: Option<serde_json::Error>,
    },
}

impl ConvergeError {
    // --- Authentication ---

    /// Create authentication error
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::AuthenticationFailed,
            message: message.into(),
            source: None,
        }
    }

    /// Create token expired error
    pub fn token_expired(message: impl Into<String>) -> Self {
        Self::Authentication {
            code: ErrorCode::TokenExpired,
            message: message.into(),
            source: None,
        }
    }

    /// Create authorization error
    pub fn authorization(message: impl Into<String>) -> Self {
        Self::Authorization {
            code: ErrorCode::AuthorizationDenied,
            message: message.into(),
        }
    }

    /// Create session-not-found error
    pub fn session_not_found() -> Self {
        Self::Authentication {
            code: ErrorCode::SessionNotFound,
            message: "Not logged in. Run `converge login` first.".to_string(),
            source: None,
        }
    }

    // --- Network ---

    /// Create network error from reqwest error
    pub fn network_from_reqwest(err: reqwest::Error) -> Self {
        let code = if err.is_timeout() {
            ErrorCode::ConnectionTimeout
        } else if err.is_connect() {
            ErrorCode::ConnectionRefused
        } else {
            ErrorCode::HttpError
        };

        Self::Network {
            code,
            message: err.to_string(),
            source: Some(err),
        }
    }

    /// Create API error
    pub fn api(status: u16, message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::ApiError,
            status,
            message: message.into(),
        }
    }

    /// Create invalid response error
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::Api {
            code: ErrorCode::InvalidResponse,
            status: 0,
            message: message.into(),
        }
    }

    // --- File/IO ---

    /// Create IO error from std::io::Error
    pub fn io_from_error(context: impl Into<String>, err: std::io::Error) -> Self {
        let code = match err.kind() {
            std::io::ErrorKind::NotFound => ErrorCode::FileNotFound,
            std::io::ErrorKind::PermissionDenied => ErrorCode::FileWriteError,
            _ => ErrorCode::FileReadError,
        };

        Self::Io {
            code,
            context: context.into(),
            message: err.to_string(),
            source: Some(err),
        }
    }

    // --- Configuration ---

    /// Create configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: message.into(),
            source: None,
        }
    }

    /// Create invalid endpoint error
    pub fn invalid_endpoint(message: impl Into<String>) -> Self {
        Self::Config {
            code: ErrorCode::InvalidEndpoint,
            message: message.into(),
            source: None,
        }
    }

    // --- Validation ---

    /// Create unresolvable-identifier error
    ///
    /// Raised when neither the rater nor ratee identity can be resolved
    /// through the fallback chain; the submission never reaches the network.
    pub fn unresolvable_identifier(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::UnresolvableIdentifier,
            message: message.into(),
            field: None,
        }
    }

    /// Create stale-reference error
    ///
    /// A pending request references a project or teammate that no longer
    /// resolves. Rejected locally before any prompt or network call.
    pub fn stale_reference(message: impl Into<String>) -> Self {
        Self::Validation {
            code: ErrorCode::StaleReference,
            message: message.into(),
            field: None,
        }
    }

    /// Create invalid input error
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            code: ErrorCode::InvalidInput,
            message: message.into(),
        }
    }

    // --- Resume ingestion ---

    /// Create not-a-PDF error
    pub fn not_a_pdf(message: impl Into<String>) -> Self {
        Self::Resume {
            code: ErrorCode::NotAPdf,
            message: message.into(),
        }
    }

    /// Create extraction error
    pub fn extraction(message: impl Into<String>) -> Self {
        Self::Resume {
            code: ErrorCode::ExtractionFailed,
            message: message.into(),
        }
    }

    /// Create resume upload error
    pub fn resume_upload(message: impl Into<String>) -> Self {
        Self::Resume {
            code: ErrorCode::ResumeUploadFailed,
            message: message.into(),
        }
    }

    // --- Resource ---

    /// Create not found error
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::ResourceNotFound,
            resource: resource.into(),
        }
    }

    /// Create project not found error
    pub fn project_not_found(project: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::ProjectNotFound,
            resource: project.into(),
        }
    }

    /// Create profile not found error
    pub fn profile_not_found(profile: impl Into<String>) -> Self {
        Self::NotFound {
            code: ErrorCode::ProfileNotFound,
            resource: profile.into(),
        }
    }

    // --- UI ---

    /// Create user cancelled error
    pub fn user_cancelled() -> Self {
        Self::Ui {
            code: ErrorCode::UserCancelled,
            message: "Operation cancelled by user".to_string(),
        }
    }

    // --- Internal ---

    /// Create internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            code: ErrorCode::InternalError,
            message: message.into(),
        }
    }

    /// Create serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: message.into(),
            source: None,
        }
    }

    // --- Utility Methods ---

    /// Get the error code
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Authentication { code, .. } => *code,
            Self::Authorization { code, .. } => *code,
            Self::Network { code, .. } => *code,
            Self::Api { code, .. } => *code,
            Self::Io { code, .. } => *code,
            Self::Config { code, .. } => *code,
            Self::Validation { code, .. } => *code,
            Self::InvalidInput { code, .. } => *code,
            Self::Resume { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Ui { code, .. } => *code,
            Self::Internal { code, .. } => *code,
            Self::Serialization { code, .. } => *code,
        }
    }

    /// Check if this failure happened before any network call
    pub fn is_local_rejection(&self) -> bool {
        matches!(
            self,
            Self::Validation { .. }
                | Self::InvalidInput { .. }
                | Self::Resume {
                    code: ErrorCode::NotAPdf,
                    ..
                }
        )
    }
}

impl From<std::io::Error> for ConvergeError {
    fn from(err: std::io::Error) -> Self {
        Self::io_from_error("IO operation", err)
    }
}

impl From<reqwest::Error> for ConvergeError {
    fn from(err: reqwest::Error) -> Self {
        Self::network_from_reqwest(err)
    }
}

impl From<serde_json::Error> for ConvergeError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            code: ErrorCode::SerializationError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<config::ConfigError> for ConvergeError {
    fn from(err: config::ConfigError) -> Self {
        Self::Config {
            code: ErrorCode::ConfigError,
            message: err.to_string(),
            source: Some(err),
        }
    }
}

impl From<dialoguer::Error> for ConvergeError {
    fn from(err: dialoguer::Error) -> Self {
        Self::Ui {
            code: ErrorCode::DialogError,
            message: format!("Dialog error: {}", err),
        }
    }
}

impl From<lopdf::Error> for ConvergeError {
    fn from(err: lopdf::Error) -> Self {
        Self::Resume {
            code: ErrorCode::ExtractionFailed,
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for ConvergeError {
    fn from(err: validator::ValidationErrors) -> Self {
        Self::Validation {
            code: ErrorCode::ValidationFailed,
            message: err.to_string(),
            field: None,
        }
    }
}
