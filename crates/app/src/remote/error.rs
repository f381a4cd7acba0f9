use common::store::{ErrorCode, StoreError};
use reqwest::StatusCode;
use serde::Deserialize;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("HTTP request failed: {0}")]
    Reqwest(#[from] reqwest::Error),
    #[error("note store URL cannot take a method path: {0}")]
    InvalidEndpoint(String),
    #[error("HTTP status {0}: {1}")]
    HttpStatus(StatusCode, String),
}

/// The error document a note store sends with a failed call
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[serde(default)]
    pub error_code: ErrorCode,
    pub identifier: Option<String>,
    pub key: Option<String>,
    pub parameter: Option<String>,
    pub message: Option<String>,
    pub rate_limit_duration: Option<u32>,
}

/// Turn a non-success response into a store error.
///
/// 404 maps to `NotFound`, 400/401/403 to `User` and 500/503 to
///  `System`. An empty body is allowed for those; a body that is not
///  an error document, or any other status, is a transport failure.
pub fn classify(method: &str, status: StatusCode, body: String) -> StoreError<ApiError> {
    let error_body = if body.trim().is_empty() {
        ErrorBody::default()
    } else {
        match serde_json::from_str::<ErrorBody>(&body) {
            Ok(error_body) => error_body,
            Err(_) => return ApiError::HttpStatus(status, body).into(),
        }
    };

    let code_or = |fallback: ErrorCode| match error_body.error_code {
        ErrorCode::Unknown => fallback,
        code => code,
    };

    match status {
        StatusCode::NOT_FOUND => StoreError::NotFound {
            identifier: error_body
                .identifier
                .unwrap_or_else(|| method.to_string()),
            key: error_body.key,
        },
        StatusCode::BAD_REQUEST => StoreError::User {
            code: code_or(ErrorCode::BadDataFormat),
            parameter: error_body.parameter,
        },
        StatusCode::UNAUTHORIZED => StoreError::User {
            code: code_or(ErrorCode::InvalidAuth),
            parameter: error_body.parameter,
        },
        StatusCode::FORBIDDEN => StoreError::User {
            code: code_or(ErrorCode::PermissionDenied),
            parameter: error_body.parameter,
        },
        StatusCode::INTERNAL_SERVER_ERROR => StoreError::System {
            code: code_or(ErrorCode::InternalError),
            message: error_body.message,
            rate_limit_duration: error_body.rate_limit_duration,
        },
        StatusCode::SERVICE_UNAVAILABLE => StoreError::System {
            code: code_or(ErrorCode::ShardUnavailable),
            message: error_body.message,
            rate_limit_duration: error_body.rate_limit_duration,
        },
        _ => ApiError::HttpStatus(status, body).into(),
    }
}
