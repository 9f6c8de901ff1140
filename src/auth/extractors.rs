use actix_web::dev::Payload;
use actix_web::{Error as ActixError, FromRequest, HttpMessage, HttpRequest};
use std::future::{ready, Ready};

use crate::error::AppError;
use crate::models::{PublicUser, User};

/// The verified identity of the caller.
///
/// `AuthMiddleware` inserts it into the request extensions exactly once, after
/// the token has been verified and the user reloaded from the store. Handlers
/// receive it through this extractor and never modify it.
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(User);

impl AuthenticatedUser {
    pub fn new(user: User) -> Self {
        Self(user)
    }

    pub fn id(&self) -> i32 {
        self.0.id
    }

    pub fn user(&self) -> &User {
        &self.0
    }

    pub fn public(&self) -> PublicUser {
        self.0.public()
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = ActixError; // AppError will be converted into ActixError via ResponseError
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req.extensions().get::<AuthenticatedUser>().cloned() {
            Some(user) => ready(Ok(user)),
            None => {
                // Only reachable when a route is mounted without AuthMiddleware.
                let err = AppError::Unauthenticated("Access token required".to_string());
                ready(Err(err.into()))
            }
        }
    }
}
