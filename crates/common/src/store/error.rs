use std::fmt;

use serde::{Deserialize, Serialize};

/// Error codes the note store attaches to rejected requests
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    #[default]
    Unknown,
    BadDataFormat,
    PermissionDenied,
    InternalError,
    DataRequired,
    LimitReached,
    QuotaReached,
    InvalidAuth,
    AuthExpired,
    DataConflict,
    EnmlValidation,
    ShardUnavailable,
    LenTooShort,
    LenTooLong,
    TooFew,
    TooMany,
    UnsupportedOperation,
    TakenDown,
    RateLimitReached,
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::Unknown => "UNKNOWN",
            ErrorCode::BadDataFormat => "BAD_DATA_FORMAT",
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::InternalError => "INTERNAL_ERROR",
            ErrorCode::DataRequired => "DATA_REQUIRED",
            ErrorCode::LimitReached => "LIMIT_REACHED",
            ErrorCode::QuotaReached => "QUOTA_REACHED",
            ErrorCode::InvalidAuth => "INVALID_AUTH",
            ErrorCode::AuthExpired => "AUTH_EXPIRED",
            ErrorCode::DataConflict => "DATA_CONFLICT",
            ErrorCode::EnmlValidation => "ENML_VALIDATION",
            ErrorCode::ShardUnavailable => "SHARD_UNAVAILABLE",
            ErrorCode::LenTooShort => "LEN_TOO_SHORT",
            ErrorCode::LenTooLong => "LEN_TOO_LONG",
            ErrorCode::TooFew => "TOO_FEW",
            ErrorCode::TooMany => "TOO_MANY",
            ErrorCode::UnsupportedOperation => "UNSUPPORTED_OPERATION",
            ErrorCode::TakenDown => "TAKEN_DOWN",
            ErrorCode::RateLimitReached => "RATE_LIMIT_REACHED",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The four ways a remote call can fail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A referenced entity does not exist
    NotFound,
    /// The store rejected the request as malformed or unauthorized
    User,
    /// The store failed on its side
    System,
    /// The call never produced a store-level answer
    Transport,
}

impl ErrorKind {
    /// Whether repeating the same call could succeed. Only the
    ///  classification lives here, retrying is up to the caller.
    pub fn is_retryable(&self) -> bool {
        matches!(self, ErrorKind::System | ErrorKind::Transport)
    }
}

/// An error returned by a [`NoteStore`](super::NoteStore) call.
///
/// `T` is the store's own low-level error (connection loss, bad response
///  framing, poisoned locks) and is passed through untouched.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError<T> {
    /// The entity named by `identifier` (e.g. `Notebook.guid`) does not exist
    #[error("{identifier} not found{}", fmt_key(.key))]
    NotFound {
        identifier: String,
        key: Option<String>,
    },
    /// The request was rejected because of its input or the caller's permissions
    #[error("request rejected by store: {code}{}", fmt_parameter(.parameter))]
    User {
        code: ErrorCode,
        parameter: Option<String>,
    },
    /// The store could not complete the request
    #[error("store system error: {code}{}", fmt_message(.message))]
    System {
        code: ErrorCode,
        message: Option<String>,
        /// Seconds to wait before retrying, set with `RATE_LIMIT_REACHED`
        rate_limit_duration: Option<u32>,
    },
    #[error("transport error: {0}")]
    Transport(#[from] T),
}

impl<T> StoreError<T> {
    pub fn not_found(identifier: impl Into<String>, key: Option<String>) -> Self {
        StoreError::NotFound {
            identifier: identifier.into(),
            key,
        }
    }

    pub fn user(code: ErrorCode, parameter: impl Into<String>) -> Self {
        StoreError::User {
            code,
            parameter: Some(parameter.into()),
        }
    }

    pub fn system(code: ErrorCode, message: impl Into<String>) -> Self {
        StoreError::System {
            code,
            message: Some(message.into()),
            rate_limit_duration: None,
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            StoreError::NotFound { .. } => ErrorKind::NotFound,
            StoreError::User { .. } => ErrorKind::User,
            StoreError::System { .. } => ErrorKind::System,
            StoreError::Transport(_) => ErrorKind::Transport,
        }
    }
}

fn fmt_key(key: &Option<String>) -> String {
    key.as_ref().map(|k| format!(" ({})", k)).unwrap_or_default()
}

fn fmt_parameter(parameter: &Option<String>) -> String {
    parameter
        .as_ref()
        .map(|p| format!(" on {}", p))
        .unwrap_or_default()
}

fn fmt_message(message: &Option<String>) -> String {
    message
        .as_ref()
        .map(|m| format!(": {}", m))
        .unwrap_or_default()
}
