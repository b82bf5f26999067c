//! Authentication and credential-verification subsystem
//!
//! Components, leaf-first:
//! - Password policy and bcrypt hashing ([`password`])
//! - Session token issuance and verification ([`token`])
//! - The two-gate authorization middleware chain ([`middleware`])
//! - Account persistence ([`repository`]) and orchestration ([`service`])

pub mod middleware;
pub mod models;
pub mod password;
pub mod repository;
pub mod service;
pub mod token;

pub use middleware::{attach_current_account, require_token, AuthError};
pub use models::{Account, AccountProfile};
pub use password::{hash_password, validate_password, verify_password};
pub use repository::{AccountRepository, RepositoryError};
pub use service::{
    AccountService, LoginRequest, LoginResponse, RegisterRequest, ResetPasswordRequest,
};
pub use token::{issue_token, verify_token, Claims, TokenError};
