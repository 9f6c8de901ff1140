pub mod credentials;
pub mod extractors;
pub mod guard;
pub mod middleware;
pub mod password;
pub mod token;

use std::borrow::Cow;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::models::PublicUser;

// Re-export necessary items
pub use credentials::Credentials;
pub use extractors::AuthenticatedUser;
pub use middleware::AuthMiddleware;
pub use token::{Claims, TokenError, TokenService};

lazy_static! {
    // Regex for username validation: ASCII letters and digits only
    static ref USERNAME_REGEX: regex::Regex = regex::Regex::new(r"^[a-zA-Z0-9]+$").unwrap();
}

/// Represents the payload for a user login request.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct LoginRequest {
    /// User's email address.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// User's password. Only presence is checked here; the hash comparison decides.
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

/// Represents the payload for a new user registration request.
#[derive(Debug, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct RegisterRequest {
    /// Desired username: 3 to 30 alphanumeric characters.
    #[validate(custom = "validate_username")]
    pub username: String,
    /// Email address for the new account.
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    /// At least 6 characters with a lowercase letter, an uppercase letter and a digit.
    #[validate(
        length(min = 6, message = "Password must be at least 6 characters long"),
        custom = "validate_password_strength"
    )]
    pub password: String,
}

fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut error = ValidationError::new(code);
    error.message = Some(Cow::Borrowed(message));
    error
}

/// Character set first, then the lower and upper length bounds.
fn validate_username(username: &str) -> Result<(), ValidationError> {
    if !USERNAME_REGEX.is_match(username) {
        return Err(invalid(
            "username_alphanum",
            "Username must only contain alphanumeric characters",
        ));
    }
    match username.len() {
        0..=2 => Err(invalid(
            "username_min",
            "Username must be at least 3 characters long",
        )),
        3..=30 => Ok(()),
        _ => Err(invalid(
            "username_max",
            "Username must not exceed 30 characters",
        )),
    }
}

fn validate_password_strength(password: &str) -> Result<(), ValidationError> {
    let has_lower = password.chars().any(|c| c.is_ascii_lowercase());
    let has_upper = password.chars().any(|c| c.is_ascii_uppercase());
    let has_digit = password.chars().any(|c| c.is_ascii_digit());

    if has_lower && has_upper && has_digit {
        return Ok(());
    }
    Err(invalid(
        "password_strength",
        "Password must contain at least one lowercase letter, one uppercase letter, and one number",
    ))
}

/// Response structure after successful authentication (login or registration).
#[derive(Debug, Serialize, Deserialize)]
pub struct AuthResponse {
    pub message: String,
    /// The authenticated user, without credentials.
    pub user: PublicUser,
    /// The JWT (JSON Web Token) for session authentication.
    pub token: String,
}
