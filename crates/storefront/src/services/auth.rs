//! Authentication service.
//!
//! Password registration, login and account maintenance. Hashing uses
//! argon2 with per-user salts; verification failures and unknown emails
//! produce the same error so the API does not leak which emails exist.

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use chrono::{Duration, Utc};
use rand::RngCore;
use serde::Deserialize;
use sqlx::PgPool;
use thiserror::Error;

use electro_core::{Email, UserId};

use crate::db::{RepositoryError, UserRepository};
use crate::models::{NewUser, ProfileUpdate, User};

/// Minimum password length.
const MIN_PASSWORD_LENGTH: usize = 8;

/// How long a password reset token stays valid.
const RESET_TOKEN_TTL_HOURS: i64 = 1;

/// Default country for new accounts that omit one.
const DEFAULT_COUNTRY: &str = "Ghana";

/// Errors that can occur during authentication operations.
///
/// Display strings are the user-facing error messages of the envelope.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Invalid email format.
    #[error("Invalid email format")]
    InvalidEmail(#[from] electro_core::EmailError),

    /// Password too short.
    #[error("Password must be at least {MIN_PASSWORD_LENGTH} characters long")]
    WeakPassword,

    /// A required field is missing or empty.
    #[error("Field '{0}' is required")]
    MissingField(&'static str),

    /// Email already registered.
    #[error("Email already registered")]
    UserAlreadyExists,

    /// Invalid credentials (wrong password or user not found).
    #[error("Invalid email or password")]
    InvalidCredentials,

    /// Wrong current password on a password change.
    #[error("Current password is incorrect")]
    CurrentPasswordIncorrect,

    /// No account for the given email.
    #[error("Email not found")]
    EmailNotFound,

    /// User disappeared mid-session.
    #[error("User not found")]
    UserNotFound,

    /// Profile update carried no fields.
    #[error("No fields to update")]
    NoFieldsToUpdate,

    /// Repository/database error.
    #[error("database error: {0}")]
    Repository(#[from] RepositoryError),

    /// Password hashing error.
    #[error("password hashing error")]
    PasswordHash,
}

/// A registration request body.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub postal_code: Option<String>,
}

/// Authentication service.
pub struct AuthService<'a> {
    users: UserRepository<'a>,
}

impl<'a> AuthService<'a> {
    /// Create a new authentication service.
    #[must_use]
    pub const fn new(pool: &'a PgPool) -> Self {
        Self {
            users: UserRepository::new(pool),
        }
    }

    /// Register a new user with email and password.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for absent required fields,
    /// `AuthError::InvalidEmail` / `AuthError::WeakPassword` for invalid
    /// ones, and `AuthError::UserAlreadyExists` for a duplicate email.
    pub async fn register(&self, req: &RegisterRequest) -> Result<User, AuthError> {
        if let Some(field) = missing_register_field(req) {
            return Err(AuthError::MissingField(field));
        }

        let email = Email::parse(req.email.as_deref().unwrap_or_default())?;
        let password = req.password.as_deref().unwrap_or_default();
        validate_password(password)?;

        let password_hash = hash_password(password)?;

        let new_user = NewUser {
            email,
            password_hash,
            first_name: req.first_name.clone().unwrap_or_default(),
            last_name: req.last_name.clone().unwrap_or_default(),
            phone: req.phone.clone(),
            address: req.address.clone(),
            city: req.city.clone(),
            state: req.state.clone(),
            country: req
                .country
                .clone()
                .unwrap_or_else(|| DEFAULT_COUNTRY.to_string()),
            postal_code: req.postal_code.clone(),
        };

        let user = self.users.create(&new_user).await.map_err(|e| match e {
            RepositoryError::Conflict(_) => AuthError::UserAlreadyExists,
            other => AuthError::Repository(other),
        })?;

        Ok(user)
    }

    /// Login with email and password.
    ///
    /// Only active accounts can authenticate. A successful login touches
    /// `updated_at` to record it.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::InvalidCredentials` if the email/password is
    /// wrong or the account is disabled.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, AuthError> {
        let email = Email::parse(email).map_err(|_| AuthError::InvalidCredentials)?;

        let (user, password_hash) = self
            .users
            .get_with_password_hash(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &password_hash)?;

        self.users.touch_last_login(user.id).await?;

        Ok(user)
    }

    /// Fetch the currently authenticated user.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserNotFound` if the account no longer exists or
    /// was disabled since login.
    pub async fn current_user(&self, user_id: UserId) -> Result<User, AuthError> {
        let user = self
            .users
            .get_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        Ok(user)
    }

    /// Apply a partial profile update.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::NoFieldsToUpdate` for an empty update and
    /// `AuthError::UserNotFound` if the account is gone.
    pub async fn update_profile(
        &self,
        user_id: UserId,
        update: &ProfileUpdate,
    ) -> Result<User, AuthError> {
        if update.is_empty() {
            return Err(AuthError::NoFieldsToUpdate);
        }

        let user = self
            .users
            .update_profile(user_id, update)
            .await
            .map_err(|e| match e {
                RepositoryError::NotFound => AuthError::UserNotFound,
                other => AuthError::Repository(other),
            })?;

        Ok(user)
    }

    /// Change the user's password after verifying the current one.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::MissingField` for absent fields,
    /// `AuthError::WeakPassword` for a short new password, and
    /// `AuthError::CurrentPasswordIncorrect` when verification fails.
    pub async fn change_password(
        &self,
        user_id: UserId,
        current_password: &str,
        new_password: &str,
    ) -> Result<(), AuthError> {
        if current_password.is_empty() {
            return Err(AuthError::MissingField("current_password"));
        }
        if new_password.is_empty() {
            return Err(AuthError::MissingField("new_password"));
        }
        validate_password(new_password)?;

        let stored_hash = self.users.password_hash(user_id).await.map_err(|e| match e {
            RepositoryError::NotFound => AuthError::UserNotFound,
            other => AuthError::Repository(other),
        })?;

        verify_password(current_password, &stored_hash)
            .map_err(|_| AuthError::CurrentPasswordIncorrect)?;

        let new_hash = hash_password(new_password)?;
        self.users.update_password(user_id, &new_hash).await?;

        Ok(())
    }

    /// Start a password reset: generate a token and store it with a
    /// one-hour expiry.
    ///
    /// The token is delivered out-of-band (email); it is deliberately NOT
    /// returned to the caller, so a reset request leaks nothing beyond
    /// whether the email exists.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::EmailNotFound` for unknown or disabled accounts.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AuthError> {
        if email.is_empty() {
            return Err(AuthError::MissingField("email"));
        }
        let email = Email::parse(email)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::EmailNotFound)?;

        let token = generate_reset_token();
        let expires_at = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.users
            .create_password_reset(user.id, &token, expires_at)
            .await?;

        tracing::info!(user_id = %user.id, "password reset token issued");

        Ok(())
    }
}

/// Which required registration field, if any, is missing.
fn missing_register_field(req: &RegisterRequest) -> Option<&'static str> {
    if req.email.as_deref().is_none_or(str::is_empty) {
        return Some("email");
    }
    if req.password.as_deref().is_none_or(str::is_empty) {
        return Some("password");
    }
    if req.first_name.as_deref().is_none_or(str::is_empty) {
        return Some("first_name");
    }
    if req.last_name.as_deref().is_none_or(str::is_empty) {
        return Some("last_name");
    }
    None
}

/// Validate password strength.
fn validate_password(password: &str) -> Result<(), AuthError> {
    if password.len() < MIN_PASSWORD_LENGTH {
        return Err(AuthError::WeakPassword);
    }
    Ok(())
}

/// Hash a password with argon2 and a fresh salt.
fn hash_password(password: &str) -> Result<String, AuthError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| AuthError::PasswordHash)
}

/// Verify a password against a stored PHC hash.
fn verify_password(password: &str, hash: &str) -> Result<(), AuthError> {
    let parsed_hash = PasswordHash::new(hash).map_err(|_| AuthError::InvalidCredentials)?;
    Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .map_err(|_| AuthError::InvalidCredentials)
}

/// A 64-character hex reset token from 32 random bytes.
fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    bytes.iter().map(|b| format!("{b:02x}")).collect()
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery").unwrap();
        assert!(verify_password("correct horse battery", &hash).is_ok());
        assert!(matches!(
            verify_password("wrong password", &hash),
            Err(AuthError::InvalidCredentials)
        ));
    }

    #[test]
    fn test_hashes_are_salted() {
        let a = hash_password("same password").unwrap();
        let b = hash_password("same password").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_password_length_enforced() {
        assert!(matches!(
            validate_password("short"),
            Err(AuthError::WeakPassword)
        ));
        assert!(validate_password("12345678").is_ok());
    }

    #[test]
    fn test_missing_register_fields_in_order() {
        let empty = RegisterRequest::default();
        assert_eq!(missing_register_field(&empty), Some("email"));

        let req = RegisterRequest {
            email: Some("user@example.com".to_string()),
            ..RegisterRequest::default()
        };
        assert_eq!(missing_register_field(&req), Some("password"));

        let req = RegisterRequest {
            email: Some("user@example.com".to_string()),
            password: Some("hunter2hunter2".to_string()),
            first_name: Some("Ama".to_string()),
            last_name: Some("Mensah".to_string()),
            ..RegisterRequest::default()
        };
        assert_eq!(missing_register_field(&req), None);
    }

    #[test]
    fn test_reset_token_is_64_hex_chars() {
        let token = generate_reset_token();
        assert_eq!(token.len(), 64);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_error_messages_match_contract() {
        assert_eq!(
            AuthError::WeakPassword.to_string(),
            "Password must be at least 8 characters long"
        );
        assert_eq!(
            AuthError::InvalidCredentials.to_string(),
            "Invalid email or password"
        );
        assert_eq!(
            AuthError::UserAlreadyExists.to_string(),
            "Email already registered"
        );
    }
}
