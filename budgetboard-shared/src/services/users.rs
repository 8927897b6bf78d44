/// User service
///
/// Registration, lookup and credential checks. Passwords are hashed with
/// Argon2id before they reach the store.

use std::sync::Arc;
use tracing::{debug, error, info};

use crate::auth::password::{hash_password, validate_password_strength, verify_password};
use crate::db::store::Store;
use crate::error::{FieldErrors, ServiceError, ServiceResult, StoreError};
use crate::models::user::{CreateUser, NewUser, User, UserFilter};
use crate::validation::{self, required, typed, SHOULD_BE_TEXT};

#[derive(Clone)]
pub struct UserService {
    store: Arc<dyn Store>,
}

fn duplicate(name: &str) -> ServiceError {
    ServiceError::field("username", format!("\"{}\" user already exists.", name))
}

impl UserService {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Registers an account
    ///
    /// Username and password problems are reported together.
    pub async fn create(&self, dto: CreateUser) -> ServiceResult<User> {
        let mut errors = FieldErrors::new();
        let name = errors.check(
            "username",
            typed(dto.username, SHOULD_BE_TEXT).and_then(|name| validation::username(name.as_deref())),
        );
        let password = errors.check(
            "password",
            typed(dto.password, SHOULD_BE_TEXT)
                .and_then(|p| required(p.filter(|p| !p.is_empty())))
                .and_then(|p| {
                    validate_password_strength(&p)?;
                    Ok(p)
                }),
        );

        let (name, password) = match (name, password) {
            (Some(name), Some(password)) => (name, password),
            _ => return Err(ServiceError::BadRequest(errors)),
        };

        if self.store.find_user_by_username(&name).await?.is_some() {
            return Err(duplicate(&name));
        }

        let password_hash = hash_password(&password).map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ServiceError::Internal(e.to_string())
        })?;

        let user = self
            .store
            .insert_user(&NewUser {
                username: name.clone(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::UniqueViolation(_) => duplicate(&name),
                other => other.into(),
            })?;

        info!(user_id = user.id, "User registered");
        Ok(user)
    }

    /// Numeric identifiers are ids, anything else is a username
    pub async fn find(&self, identifier: &str) -> ServiceResult<User> {
        debug!(identifier, "Finding user");

        let user = match identifier.parse::<i64>() {
            Ok(id) => self.store.find_user(id).await?,
            Err(_) => self.store.find_user_by_username(identifier).await?,
        };
        user.ok_or_else(ServiceError::not_found)
    }

    pub async fn search(&self, filter: UserFilter) -> ServiceResult<Vec<User>> {
        Ok(self.store.search_users(&filter).await?)
    }

    /// `None` for an unknown username or a wrong password
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<Option<User>> {
        let Some(user) = self.store.find_user_by_username(username).await? else {
            debug!(username, "Login for unknown user");
            return Ok(None);
        };

        let valid = verify_password(password, &user.password_hash).map_err(|e| {
            error!(user_id = user.id, error = %e, "Stored password hash is unusable");
            ServiceError::Internal(e.to_string())
        })?;

        if valid {
            info!(user_id = user.id, "User authenticated");
            Ok(Some(user))
        } else {
            debug!(user_id = user.id, "Login with wrong password");
            Ok(None)
        }
    }
}
