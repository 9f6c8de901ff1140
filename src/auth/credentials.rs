use std::sync::Arc;

use actix_web::web;

use super::password::{hash_password, verify_password};
use crate::error::AppError;
use crate::models::{NewUser, User};
use crate::store::{UserStore, EMAIL_TAKEN, USERNAME_TAKEN};

/// Registration, lookup and password checks on top of a [`UserStore`].
///
/// bcrypt runs on the blocking thread pool so a slow hash never stalls the
/// worker that is serving other requests.
#[derive(Clone)]
pub struct Credentials {
    users: Arc<dyn UserStore>,
    bcrypt_cost: u32,
}

impl Credentials {
    pub fn new(users: Arc<dyn UserStore>, bcrypt_cost: u32) -> Self {
        Self { users, bcrypt_cost }
    }

    /// Registers a new user.
    ///
    /// The email is checked before the username. A collision that slips past
    /// these checks is still caught by the store's uniqueness constraint.
    pub async fn create(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AppError> {
        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::Conflict(EMAIL_TAKEN.into()));
        }
        if self.users.find_by_username(username).await?.is_some() {
            return Err(AppError::Conflict(USERNAME_TAKEN.into()));
        }

        let password = password.to_owned();
        let cost = self.bcrypt_cost;
        let password_hash = web::block(move || hash_password(&password, cost)).await??;

        self.users
            .insert(NewUser {
                username: username.to_owned(),
                email: email.to_owned(),
                password_hash,
            })
            .await
    }

    pub async fn find_by_id(&self, id: i32) -> Result<Option<User>, AppError> {
        self.users.find_by_id(id).await
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_email(email).await
    }

    pub async fn find_by_username(&self, username: &str) -> Result<Option<User>, AppError> {
        self.users.find_by_username(username).await
    }

    /// One-way salted comparison of `plaintext` against the stored hash.
    pub async fn verify_password(&self, user: &User, plaintext: &str) -> Result<bool, AppError> {
        let plaintext = plaintext.to_owned();
        let hash = user.password_hash.clone();
        web::block(move || verify_password(&plaintext, &hash)).await?
    }
}
