//!
//! # Custom Error Handling
//!
//! This module defines the custom error type `AppError` used throughout the application.
//! Every failure a request can run into (bad input, missing or rejected credentials,
//! ownership violations, storage outages) is one of its variants.
//!
//! `AppError` implements `actix_web::error::ResponseError` so handlers and middleware can
//! return it directly; the client always receives a `{ "error": "..." }` JSON body.
//! Server-side failures are logged in full but reported to the client with a generic
//! message. `From` implementations for `sqlx::Error`, `validator::ValidationErrors`,
//! `bcrypt::BcryptError` and the token errors allow conversion with the `?` operator.

use actix_web::{error::BlockingError, http::StatusCode, HttpResponse, ResponseError};
use serde_json::json;
use std::fmt;
use validator::ValidationErrors;

use crate::auth::token::TokenError;

const GENERIC_SERVER_ERROR: &str = "Internal server error";

/// Represents all possible errors that can occur within the application.
#[derive(Debug)]
pub enum AppError {
    /// Malformed or missing input, rejected before any business logic runs (HTTP 400).
    ValidationError(String),
    /// No usable credentials were presented, or they no longer resolve to a user (HTTP 401).
    Unauthenticated(String),
    /// Login with an unknown email or a wrong password (HTTP 401).
    InvalidCredentials,
    /// A bearer token was presented but failed verification (HTTP 403).
    InvalidToken(TokenError),
    /// The caller is authenticated but does not own the resource (HTTP 403).
    Forbidden(String),
    /// The requested resource does not exist (HTTP 404).
    NotFound(String),
    /// A username or email is already registered (HTTP 400).
    Conflict(String),
    /// The underlying persistence layer failed or is unreachable (HTTP 500).
    StoreUnavailable(String),
    /// Any other unexpected server-side failure (HTTP 500).
    InternalServerError(String),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            AppError::ValidationError(msg) => write!(f, "Validation Error: {}", msg),
            AppError::Unauthenticated(msg) => write!(f, "Unauthenticated: {}", msg),
            AppError::InvalidCredentials => write!(f, "Unauthenticated: invalid credentials"),
            AppError::InvalidToken(kind) => write!(f, "Invalid Token: {}", kind),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::NotFound(msg) => write!(f, "Not Found: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::StoreUnavailable(msg) => write!(f, "Store Unavailable: {}", msg),
            AppError::InternalServerError(msg) => write!(f, "Internal Server Error: {}", msg),
        }
    }
}

impl AppError {
    /// The message sent to the client. Server-side details never leave the process.
    pub fn client_message(&self) -> String {
        match self {
            AppError::ValidationError(msg)
            | AppError::Unauthenticated(msg)
            | AppError::Forbidden(msg)
            | AppError::NotFound(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::InvalidCredentials => "Invalid email or password".to_string(),
            AppError::InvalidToken(kind) => kind.to_string(),
            AppError::StoreUnavailable(_) | AppError::InternalServerError(_) => {
                GENERIC_SERVER_ERROR.to_string()
            }
        }
    }
}

/// Converts `AppError` variants into `HttpResponse` objects.
impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) | AppError::Conflict(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthenticated(_) | AppError::InvalidCredentials => {
                StatusCode::UNAUTHORIZED
            }
            AppError::InvalidToken(_) | AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::StoreUnavailable(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_response(&self) -> HttpResponse {
        if self.status_code().is_server_error() {
            log::error!("{}", self);
        }
        HttpResponse::build(self.status_code()).json(json!({
            "error": self.client_message()
        }))
    }
}

/// Converts `sqlx::Error` into `AppError`.
///
/// `RowNotFound` becomes `AppError::NotFound`; everything else is treated as the
/// store being unavailable.
impl From<sqlx::Error> for AppError {
    fn from(error: sqlx::Error) -> AppError {
        match error {
            sqlx::Error::RowNotFound => AppError::NotFound("Record not found".into()),
            _ => AppError::StoreUnavailable(error.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for AppError {
    fn from(error: sqlx::migrate::MigrateError) -> AppError {
        AppError::StoreUnavailable(format!("migration failed: {}", error))
    }
}

/// Converts `validator::ValidationErrors` into `AppError::ValidationError`.
///
/// Only the first failure is reported: fields are taken in name order (struct-level
/// checks first), and within a field the first rule that failed wins.
impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> AppError {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by_key(|(field, _)| *field);

        let message = fields.into_iter().find_map(|(field, errs)| {
            errs.first().map(|err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("{} is invalid", field),
            })
        });

        AppError::ValidationError(message.unwrap_or_else(|| "Invalid input".into()))
    }
}

impl From<TokenError> for AppError {
    fn from(error: TokenError) -> AppError {
        AppError::InvalidToken(error)
    }
}

/// Converts `bcrypt::BcryptError` into `AppError::InternalServerError`.
impl From<bcrypt::BcryptError> for AppError {
    fn from(error: bcrypt::BcryptError) -> AppError {
        AppError::InternalServerError(error.to_string())
    }
}

impl From<BlockingError> for AppError {
    fn from(error: BlockingError) -> AppError {
        AppError::InternalServerError(format!("blocking task failed: {}", error))
    }
}
