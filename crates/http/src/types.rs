//! Wire types used by the Echo API client

use chrono::NaiveDate;
use echo_core::types::{CredentialPair, InitiativeStatus, Tenant, User};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::client::error::ClientError;

/// Login request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    /// Tenant domain; resolved from the email address when built via
    /// [`LoginRequest::from_credentials`].
    #[serde(skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,
}

impl LoginRequest {
    /// Build a login request, deriving the tenant domain from the part of
    /// the email after `@`.
    pub fn from_credentials(email: impl Into<String>, password: impl Into<String>) -> Self {
        let email = email.into();
        let domain = email.split('@').nth(1).map(str::to_string);
        Self {
            email,
            password: password.into(),
            domain,
        }
    }
}

/// Tenant registration request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterTenantRequest {
    pub domain_name: String,
    pub email: String,
    pub password: String,
}

impl RegisterTenantRequest {
    /// The registering email must belong to the organization domain.
    pub fn validate(&self) -> Result<(), ClientError> {
        let email_domain = self.email.split('@').nth(1).unwrap_or_default();
        if email_domain != self.domain_name {
            return Err(ClientError::Validation(
                "Email domain must match the organization domain".to_string(),
            ));
        }
        Ok(())
    }
}

/// Successful credential exchange (login or tenant registration)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub refresh_token: String,
    pub user: User,
    /// Present on registration; login responses may omit it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant: Option<Tenant>,
}

impl AuthResponse {
    pub fn credential_pair(&self) -> CredentialPair {
        CredentialPair {
            access_token: self.access_token.clone(),
            refresh_token: self.refresh_token.clone(),
        }
    }
}

/// Credential renewal request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshRequest {
    pub refresh_token: String,
}

/// Credential renewal response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefreshResponse {
    pub access_token: String,
    /// Rotated refresh token, when the backend issues one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

/// Goal creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateGoalRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `YYYY-MM-DD`; sent as `null` when the form leaves it empty.
    pub target_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Goal update payload. The edit form always submits the full field set;
/// `target_date: None` clears the stored date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateGoalRequest {
    pub title: String,
    pub description: String,
    pub target_date: Option<NaiveDate>,
    pub status: String,
}

/// Initiative creation payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInitiativeRequest {
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InitiativeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<Uuid>,
}

/// Initiative update payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateInitiativeRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InitiativeStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<Uuid>,
}

/// Query filters accepted by the initiative list endpoint
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InitiativeFilter {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub goal_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<InitiativeStatus>,
}

/// Goal list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GoalsResponse {
    pub goals: Vec<echo_core::types::Goal>,
}

/// Initiative list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InitiativesResponse {
    pub initiatives: Vec<echo_core::types::Initiative>,
}

/// Acknowledgement body returned by delete endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: String,
}

/// Structured error body: the backend uses `{"error": ...}` for most
/// failures and `{"message": ...}` for a few of the resource routes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl ErrorResponse {
    /// The human-readable text, preferring `error` over `message`.
    pub fn text(&self) -> Option<&str> {
        self.error.as_deref().or(self.message.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn login_request_derives_domain_from_email() {
        let request = LoginRequest::from_credentials("amy@acme.io", "hunter2");
        assert_eq!(request.domain.as_deref(), Some("acme.io"));

        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(
            body,
            json!({"email": "amy@acme.io", "password": "hunter2", "domain": "acme.io"})
        );
    }

    #[test]
    fn login_request_without_at_sign_omits_domain() {
        let request = LoginRequest::from_credentials("not-an-email", "pw");
        assert!(request.domain.is_none());
        let body = serde_json::to_value(&request).unwrap();
        assert!(body.get("domain").is_none());
    }

    #[test]
    fn register_tenant_rejects_foreign_email_domain() {
        let request = RegisterTenantRequest {
            domain_name: "acme.io".to_string(),
            email: "amy@other.io".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(matches!(
            request.validate(),
            Err(ClientError::Validation(_))
        ));

        let request = RegisterTenantRequest {
            domain_name: "acme.io".to_string(),
            email: "amy@acme.io".to_string(),
            password: "hunter2".to_string(),
        };
        assert!(request.validate().is_ok());
    }

    #[test]
    fn error_response_prefers_error_over_message() {
        let body: ErrorResponse =
            serde_json::from_value(json!({"error": "nope", "message": "also nope"})).unwrap();
        assert_eq!(body.text(), Some("nope"));

        let body: ErrorResponse = serde_json::from_value(json!({"message": "just this"})).unwrap();
        assert_eq!(body.text(), Some("just this"));

        let body: ErrorResponse = serde_json::from_value(json!({})).unwrap();
        assert_eq!(body.text(), None);
    }

    #[test]
    fn update_goal_request_sends_explicit_null_target_date() {
        let request = UpdateGoalRequest {
            title: "Ship onboarding".to_string(),
            description: String::new(),
            target_date: None,
            status: "In Progress".to_string(),
        };
        let body = serde_json::to_value(&request).unwrap();
        assert_eq!(body["target_date"], serde_json::Value::Null);
    }
}
