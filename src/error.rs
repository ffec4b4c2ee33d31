//! Unified application error model and mapping helpers.
//! This module provides a common error enum used across the gateway, the
//! session store and the page controllers, along with HTTP status mapping.

use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AppError {
    /// Authentication failure: bad credentials, missing/expired token, 401.
    Auth { code: String, message: String },
    /// Authenticated but not permitted (the server said 403).
    Forbidden { code: String, message: String },
    /// Non-auth API error; `message` carries the server payload untouched.
    Api { code: String, message: String, status: u16 },
    /// Transport-level failure before any response arrived.
    Network { code: String, message: String },
    /// A response arrived but did not match the expected shape.
    Parse { code: String, message: String },
    /// Local persistence (token file) failure.
    Storage { code: String, message: String },
    Internal { code: String, message: String },
}

impl AppError {
    pub fn code_str(&self) -> &str {
        match self {
            AppError::Auth { code, .. }
            | AppError::Forbidden { code, .. }
            | AppError::Api { code, .. }
            | AppError::Network { code, .. }
            | AppError::Parse { code, .. }
            | AppError::Storage { code, .. }
            | AppError::Internal { code, .. } => code.as_str(),
        }
    }

    pub fn message(&self) -> &str {
        match self {
            AppError::Auth { message, .. }
            | AppError::Forbidden { message, .. }
            | AppError::Api { message, .. }
            | AppError::Network { message, .. }
            | AppError::Parse { message, .. }
            | AppError::Storage { message, .. }
            | AppError::Internal { message, .. } => message.as_str(),
        }
    }

    pub fn auth<S: Into<String>>(code: S, msg: S) -> Self { AppError::Auth { code: code.into(), message: msg.into() } }
    pub fn forbidden<S: Into<String>>(code: S, msg: S) -> Self { AppError::Forbidden { code: code.into(), message: msg.into() } }
    pub fn network<S: Into<String>>(code: S, msg: S) -> Self { AppError::Network { code: code.into(), message: msg.into() } }
    pub fn parse<S: Into<String>>(code: S, msg: S) -> Self { AppError::Parse { code: code.into(), message: msg.into() } }
    pub fn storage<S: Into<String>>(code: S, msg: S) -> Self { AppError::Storage { code: code.into(), message: msg.into() } }
    pub fn internal<S: Into<String>>(code: S, msg: S) -> Self { AppError::Internal { code: code.into(), message: msg.into() } }

    /// Build an error from a non-success HTTP response, keeping the server's
    /// payload verbatim so the login page (or any page) can present it as-is.
    pub fn from_response(status: u16, body: String) -> Self {
        match status {
            401 => AppError::Auth { code: "unauthorized".into(), message: body },
            403 => AppError::Forbidden { code: "forbidden".into(), message: body },
            _ => AppError::Api { code: "api_error".into(), message: body, status },
        }
    }

    /// The HTTP status this error corresponds to (server-assigned for Api).
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Auth { .. } => 401,
            AppError::Forbidden { .. } => 403,
            AppError::Api { status, .. } => *status,
            AppError::Network { .. } => 503,
            AppError::Parse { .. } => 422,
            AppError::Storage { .. } => 503,
            AppError::Internal { .. } => 500,
        }
    }

    pub fn is_auth(&self) -> bool { matches!(self, AppError::Auth { .. }) }
}

impl Display for AppError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code_str(), self.message())
    }
}

impl std::error::Error for AppError {}

pub type AppResult<T> = Result<T, AppError>;

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal { code: "internal".into(), message: err.to_string() }
    }
}

impl From<reqwest::Error> for AppError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            AppError::Parse { code: "bad_payload".into(), message: err.to_string() }
        } else {
            AppError::Network { code: "network".into(), message: err.to_string() }
        }
    }
}
