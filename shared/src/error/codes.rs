//! Unified error codes for Crewdesk
//!
//! Error codes are shared between the server and API consumers and are
//! organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 4xxx: Job / workflow errors
//! - 5xxx: Roster import errors
//! - 8xxx: Team / user errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,
    /// Value out of range
    ValueOutOfRange = 8,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (username/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account has been terminated (soft-deleted)
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Supervisor or Admin role required
    StaffRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 4xxx: Job / Workflow ====================
    /// Job not found
    JobNotFound = 4001,
    /// Status transition not allowed for this actor
    InvalidTransition = 4002,
    /// Job is assigned to a different user
    NotAssignee = 4003,
    /// Assignee does not exist or has been removed
    JobNotAssignable = 4004,

    // ==================== 5xxx: Roster Import ====================
    /// Import processing failed
    ImportFailed = 5001,
    /// No file provided in request
    NoFileProvided = 5002,
    /// Empty file provided
    EmptyFile = 5003,
    /// File too large
    FileTooLarge = 5004,
    /// Invalid file extension
    InvalidFileExtension = 5005,
    /// Required column missing from the file
    MissingColumn = 5006,

    // ==================== 8xxx: Team ====================
    /// User not found
    UserNotFound = 8001,
    /// Username already exists
    UsernameTaken = 8002,
    /// Cannot delete own account
    CannotDeleteSelf = 8003,
    /// Rating outside 1..=5
    RatingOutOfRange = 8004,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",
            ErrorCode::ValueOutOfRange => "Value is out of range",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid username or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account terminated. Please contact administrator.",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Supervisor or administrator role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Job / Workflow
            ErrorCode::JobNotFound => "Job not found",
            ErrorCode::InvalidTransition => "Status transition not allowed",
            ErrorCode::NotAssignee => "Job is assigned to a different user",
            ErrorCode::JobNotAssignable => "Assignee does not exist or has been removed",

            // Roster Import
            ErrorCode::ImportFailed => "Import processing failed",
            ErrorCode::NoFileProvided => "No file provided",
            ErrorCode::EmptyFile => "Empty file provided",
            ErrorCode::FileTooLarge => "File too large",
            ErrorCode::InvalidFileExtension => "Invalid file extension",
            ErrorCode::MissingColumn => "Required column is missing",

            // Team
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::UsernameTaken => "Username already exists",
            ErrorCode::CannotDeleteSelf => "Cannot delete own account",
            ErrorCode::RatingOutOfRange => "Rating must be between 1 and 5",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),
            8 => Ok(ErrorCode::ValueOutOfRange),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::StaffRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Job / Workflow
            4001 => Ok(ErrorCode::JobNotFound),
            4002 => Ok(ErrorCode::InvalidTransition),
            4003 => Ok(ErrorCode::NotAssignee),
            4004 => Ok(ErrorCode::JobNotAssignable),

            // Roster Import
            5001 => Ok(ErrorCode::ImportFailed),
            5002 => Ok(ErrorCode::NoFileProvided),
            5003 => Ok(ErrorCode::EmptyFile),
            5004 => Ok(ErrorCode::FileTooLarge),
            5005 => Ok(ErrorCode::InvalidFileExtension),
            5006 => Ok(ErrorCode::MissingColumn),

            // Team
            8001 => Ok(ErrorCode::UserNotFound),
            8002 => Ok(ErrorCode::UsernameTaken),
            8003 => Ok(ErrorCode::CannotDeleteSelf),
            8004 => Ok(ErrorCode::RatingOutOfRange),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
