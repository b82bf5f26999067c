//! Account service layer
//!
//! Orchestrates registration, login, and password reset over the password
//! policy, credential hasher, token issuer, and account repository. bcrypt
//! hash/verify are CPU-bound and deliberately slow, so they run on the
//! blocking worker pool instead of the async executor.

use authd_core::config::AuthConfig;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use utoipa::ToSchema;

use super::models::{Account, AccountProfile};
use super::password::{hash_password, validate_password, verify_password};
use super::repository::{AccountRepository, RepositoryError};
use super::token::issue_token;
use crate::audit::{audit_log, AuditEvent};
use crate::error::AppError;

const WEAK_PASSWORD_MSG: &str = "Password is required and must have at least 8 characters, \
     uppercase and lowercase letters, and numbers.";
const INVALID_EMAIL_MSG: &str = "Invalid email address.";
const EMAIL_TAKEN_MSG: &str = "Email address is already in use.";
// One merged message for malformed email, unknown email, and wrong password,
// so a response never reveals whether an email is registered.
const INVALID_CREDENTIALS_MSG: &str = "Invalid email address or password.";
const MISSING_FIELDS_MSG: &str = "All fields are required.";
const RESET_WEAK_PASSWORD_MSG: &str = "New password and confirm password must have at least \
     8 characters, uppercase and lowercase letters, and numbers.";
const MISMATCH_MSG: &str = "New password and confirm password must match.";
const SAME_AS_CURRENT_MSG: &str =
    "Your new password cannot be the same as your current password.";
const WRONG_CURRENT_PASSWORD_MSG: &str = "That is not your current password.";

/// Account registration request
///
/// Extra fields beyond the named ones are collected into the account's
/// profile document.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub profile: serde_json::Map<String, serde_json::Value>,
}

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Login response: minimal profile plus the session token
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LoginResponse {
    pub user: AccountProfile,
    pub token: String,
}

/// Password reset request (caller must already be authenticated)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub current_password: String,
    pub new_password: String,
    pub confirm_password: String,
}

/// Account service
#[derive(Clone)]
pub struct AccountService {
    repository: AccountRepository,
    auth_config: AuthConfig,
}

impl AccountService {
    /// Create a new account service
    pub fn new(pool: PgPool, auth_config: AuthConfig) -> Self {
        Self {
            repository: AccountRepository::new(pool),
            auth_config,
        }
    }

    /// Register a new account
    ///
    /// Validates the password policy and email shape before touching the
    /// datastore, checks uniqueness, hashes the password, and persists the
    /// account with the digest in place of the plaintext.
    pub async fn register(&self, request: RegisterRequest) -> Result<Account, AppError> {
        if !validate_password(&request.password) {
            audit_log(&AuditEvent::RegistrationFailure {
                email: request.email.clone(),
                reason: "password policy".to_string(),
            });
            return Err(AppError::Validation(WEAK_PASSWORD_MSG.to_string()));
        }

        if !email_is_valid(&request.email) {
            audit_log(&AuditEvent::RegistrationFailure {
                email: request.email.clone(),
                reason: "invalid email".to_string(),
            });
            return Err(AppError::Validation(INVALID_EMAIL_MSG.to_string()));
        }

        // Advisory pre-check; the unique constraint on the insert below is
        // what actually arbitrates concurrent signups.
        match self.repository.find_by_email(&request.email).await {
            Ok(_) => {
                audit_log(&AuditEvent::RegistrationFailure {
                    email: request.email.clone(),
                    reason: "email taken".to_string(),
                });
                return Err(AppError::Conflict(EMAIL_TAKEN_MSG.to_string()));
            }
            Err(RepositoryError::AccountNotFound) => {}
            Err(e) => return Err(AppError::Database(e.to_string())),
        }

        let digest = self.hash_blocking(request.password.clone()).await?;
        let profile = serde_json::Value::Object(request.profile);

        let account = match self
            .repository
            .create(&request.name, &request.email, &digest, profile)
            .await
        {
            Ok(account) => account,
            Err(RepositoryError::EmailTaken) => {
                return Err(AppError::Conflict(EMAIL_TAKEN_MSG.to_string()))
            }
            Err(e) => return Err(AppError::Database(e.to_string())),
        };

        audit_log(&AuditEvent::RegistrationSuccess {
            account_id: account.id,
            email: account.email.clone(),
        });

        Ok(account)
    }

    /// Login with email and password
    ///
    /// Malformed email, empty password, and unknown email all fail 400 with
    /// the merged credentials message; a wrong password for an existing
    /// account fails 401 with the same message.
    pub async fn login(&self, request: LoginRequest) -> Result<LoginResponse, AppError> {
        if !email_is_valid(&request.email) || request.password.is_empty() {
            return Err(AppError::Validation(INVALID_CREDENTIALS_MSG.to_string()));
        }

        let account = match self.repository.find_by_email(&request.email).await {
            Ok(account) => account,
            Err(RepositoryError::AccountNotFound) => {
                audit_log(&AuditEvent::LoginFailure {
                    email: request.email.clone(),
                    reason: "unknown email".to_string(),
                });
                return Err(AppError::Validation(INVALID_CREDENTIALS_MSG.to_string()));
            }
            Err(e) => return Err(AppError::Database(e.to_string())),
        };

        let matched = self
            .verify_blocking(request.password.clone(), account.password_hash.clone())
            .await?;

        if !matched {
            audit_log(&AuditEvent::LoginFailure {
                email: account.email.clone(),
                reason: "password mismatch".to_string(),
            });
            return Err(AppError::Unauthorized(INVALID_CREDENTIALS_MSG.to_string()));
        }

        let token = issue_token(&self.auth_config, &account)
            .map_err(|e| AppError::Internal(format!("failed to issue token: {e}")))?;

        audit_log(&AuditEvent::LoginSuccess {
            account_id: account.id,
            email: account.email.clone(),
        });

        Ok(LoginResponse {
            user: account.profile_view(),
            token,
        })
    }

    /// Replace the authenticated account's password
    ///
    /// `account` is the live record resolved by the authorization chain.
    /// The same-as-current check compares the typed strings, not the stored
    /// digest, and runs before the current password is verified.
    pub async fn reset_password(
        &self,
        account: &Account,
        request: ResetPasswordRequest,
    ) -> Result<Account, AppError> {
        let reject = |reason: &str, message: &str| {
            audit_log(&AuditEvent::PasswordChangeFailure {
                email: account.email.clone(),
                reason: reason.to_string(),
            });
            AppError::Validation(message.to_string())
        };

        if request.current_password.is_empty()
            || request.new_password.is_empty()
            || request.confirm_password.is_empty()
        {
            return Err(reject("missing fields", MISSING_FIELDS_MSG));
        }

        if !validate_password(&request.new_password)
            || !validate_password(&request.confirm_password)
        {
            return Err(reject("password policy", RESET_WEAK_PASSWORD_MSG));
        }

        if request.new_password != request.confirm_password {
            return Err(reject("confirmation mismatch", MISMATCH_MSG));
        }

        if request.current_password == request.new_password
            || request.current_password == request.confirm_password
        {
            return Err(reject("new password equals current", SAME_AS_CURRENT_MSG));
        }

        let matched = self
            .verify_blocking(
                request.current_password.clone(),
                account.password_hash.clone(),
            )
            .await?;

        if !matched {
            audit_log(&AuditEvent::PasswordChangeFailure {
                email: account.email.clone(),
                reason: "current password mismatch".to_string(),
            });
            return Err(AppError::Unauthorized(
                WRONG_CURRENT_PASSWORD_MSG.to_string(),
            ));
        }

        let digest = self.hash_blocking(request.new_password.clone()).await?;

        let updated = match self.repository.update_password(account.id, &digest).await {
            Ok(updated) => updated,
            Err(RepositoryError::AccountNotFound) => {
                return Err(AppError::NotFound("Account not found.".to_string()))
            }
            Err(e) => return Err(AppError::Database(e.to_string())),
        };

        audit_log(&AuditEvent::PasswordChange {
            account_id: updated.id,
            email: updated.email.clone(),
        });

        Ok(updated)
    }

    /// Hash on the blocking pool; bcrypt at cost 10 takes tens of
    /// milliseconds and must not stall the async workers.
    async fn hash_blocking(&self, password: String) -> Result<String, AppError> {
        let cost = self.auth_config.bcrypt_cost;
        tokio::task::spawn_blocking(move || hash_password(&password, cost))
            .await
            .map_err(|e| AppError::Internal(format!("hashing task failed: {e}")))?
            .map_err(|e| AppError::Internal(format!("failed to hash password: {e}")))
    }

    /// Verify on the blocking pool; same cost profile as hashing.
    async fn verify_blocking(&self, password: String, digest: String) -> Result<bool, AppError> {
        tokio::task::spawn_blocking(move || verify_password(&password, &digest))
            .await
            .map_err(|e| AppError::Internal(format!("verification task failed: {e}")))
    }
}

/// Simple email shape check: local@domain.tld, no whitespace
pub fn email_is_valid(email: &str) -> bool {
    if email.chars().any(|c| c.is_whitespace()) {
        return false;
    }

    let mut parts = email.split('@');
    let (Some(local), Some(domain), None) = (parts.next(), parts.next(), parts.next()) else {
        return false;
    };

    if local.is_empty() {
        return false;
    }

    match domain.rsplit_once('.') {
        Some((host, tld)) => !host.is_empty() && !tld.is_empty(),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_email_shape_check() {
        assert!(email_is_valid("a@b.com"));
        assert!(email_is_valid("jane.doe@mail.example.org"));

        assert!(!email_is_valid(""));
        assert!(!email_is_valid("jane"));
        assert!(!email_is_valid("jane@"));
        assert!(!email_is_valid("@x.com"));
        assert!(!email_is_valid("jane@x"));
        assert!(!email_is_valid("jane@.com"));
        assert!(!email_is_valid("jane@x."));
        assert!(!email_is_valid("jane doe@x.com"));
        assert!(!email_is_valid("jane@x@y.com"));
    }

    #[test]
    fn test_request_profile_capture() {
        // Unknown signup fields land in the profile map.
        let body = r#"{
            "name": "Jane",
            "email": "jane@x.com",
            "password": "Abcdefg1",
            "campus": "north",
            "year": 3
        }"#;

        let request: RegisterRequest = serde_json::from_str(body).unwrap();
        assert_eq!(request.name, "Jane");
        assert_eq!(request.profile["campus"], "north");
        assert_eq!(request.profile["year"], 3);
    }

    #[test]
    fn test_login_response_never_contains_digest() {
        let account = Account::for_testing(
            uuid::Uuid::new_v4(),
            "Jane",
            "jane@x.com",
            "$2b$10$digest",
            serde_json::json!({}),
        );

        let response = LoginResponse {
            user: account.profile_view(),
            token: "header.payload.signature".to_string(),
        };

        let json = serde_json::to_string(&response).unwrap();
        assert!(!json.contains("digest"));
        assert!(json.contains("jane@x.com"));
    }
}
