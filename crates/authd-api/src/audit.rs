//! Security audit logging for credential events
//!
//! Events are logged at INFO level with the "audit" target so they can be
//! filtered and routed to security monitoring separately from application
//! logs. The serialized event is JSON-compatible for log aggregators.

use serde::Serialize;
use tracing::info;
use uuid::Uuid;

/// Credential-related audit events
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "event_type", rename_all = "snake_case")]
pub enum AuditEvent {
    /// Successful account registration
    RegistrationSuccess { account_id: Uuid, email: String },

    /// Rejected registration attempt
    RegistrationFailure { email: String, reason: String },

    /// Successful login
    LoginSuccess { account_id: Uuid, email: String },

    /// Failed login attempt
    LoginFailure { email: String, reason: String },

    /// Password replaced via reset
    PasswordChange { account_id: Uuid, email: String },

    /// Rejected password reset attempt by an authenticated caller
    PasswordChangeFailure { email: String, reason: String },

    /// Invalid, expired, or forged token presented
    InvalidToken { reason: String },
}

/// Log a security audit event with structured fields
pub fn audit_log(event: &AuditEvent) {
    let event_json = serde_json::to_string(event)
        .unwrap_or_else(|e| format!("{{\"error\":\"Failed to serialize audit event: {e}\"}}"));

    match event {
        AuditEvent::RegistrationSuccess { account_id, email } => {
            info!(target: "audit", event = %event_json, account_id = %account_id, email = %email, "Registration successful");
        }
        AuditEvent::RegistrationFailure { email, reason } => {
            info!(target: "audit", event = %event_json, email = %email, reason = %reason, "Registration rejected");
        }
        AuditEvent::LoginSuccess { account_id, email } => {
            info!(target: "audit", event = %event_json, account_id = %account_id, email = %email, "Login successful");
        }
        AuditEvent::LoginFailure { email, reason } => {
            info!(target: "audit", event = %event_json, email = %email, reason = %reason, "Login failed");
        }
        AuditEvent::PasswordChange { account_id, email } => {
            info!(target: "audit", event = %event_json, account_id = %account_id, email = %email, "Password changed");
        }
        AuditEvent::PasswordChangeFailure { email, reason } => {
            info!(target: "audit", event = %event_json, email = %email, reason = %reason, "Password change rejected");
        }
        AuditEvent::InvalidToken { reason } => {
            info!(target: "audit", event = %event_json, reason = %reason, "Invalid token presented");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_serialization_tags() {
        let event = AuditEvent::LoginFailure {
            email: "jane@x.com".to_string(),
            reason: "password mismatch".to_string(),
        };

        let json = serde_json::to_string(&event).unwrap();
        assert!(json.contains("\"event_type\":\"login_failure\""));
        assert!(json.contains("jane@x.com"));
    }
}
