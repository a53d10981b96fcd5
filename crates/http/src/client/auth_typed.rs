//! Typed authentication endpoints

use echo_core::types::CredentialPair;
use reqwest::Method;
use tracing::{debug, warn};

use super::{
    error::ClientError,
    typed::{AuthenticatedEchoClient, PublicEchoClient, decode},
};
use crate::types::{
    AuthResponse, LoginRequest, RefreshRequest, RefreshResponse, RegisterTenantRequest,
};

/// Authentication endpoints for the public client
impl PublicEchoClient {
    /// Exchange email/password for a credential pair
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ClientError> {
        let req = self.request(Method::POST, "/auth/login").json(&request);
        self.execute(req).await
    }

    /// Register a tenant and its first user
    ///
    /// Validates client-side that the email belongs to the organization
    /// domain before any request is issued.
    pub async fn register_tenant(
        &self,
        request: RegisterTenantRequest,
    ) -> Result<AuthResponse, ClientError> {
        request.validate()?;
        let req = self
            .request(Method::POST, "/auth/register-tenant")
            .json(&request);
        self.execute(req).await
    }
}

/// Authentication operations for the session-backed client
impl AuthenticatedEchoClient {
    /// Log in and persist the returned session state, replacing any stored
    /// credentials
    pub async fn login(&self, request: LoginRequest) -> Result<AuthResponse, ClientError> {
        let response = self.to_public().login(request).await?;
        self.session()
            .store_login(
                &response.credential_pair(),
                &response.user,
                response.tenant.as_ref(),
            )
            .await?;
        Ok(response)
    }

    /// Register a tenant and persist the returned session state
    pub async fn register_tenant(
        &self,
        request: RegisterTenantRequest,
    ) -> Result<AuthResponse, ClientError> {
        let response = self.to_public().register_tenant(request).await?;
        self.session()
            .store_login(
                &response.credential_pair(),
                &response.user,
                response.tenant.as_ref(),
            )
            .await?;
        Ok(response)
    }

    /// Drop all stored session state
    pub async fn logout(&self) -> Result<(), ClientError> {
        self.session().clear().await?;
        Ok(())
    }

    /// Obtain a fresh access credential using the stored refresh credential.
    ///
    /// The renewed access token is persisted before this returns, so a
    /// caller re-reading the store immediately afterwards sees it. On either
    /// failure mode the session is terminated (store cleared, handler
    /// notified) before the error propagates.
    pub async fn renew(&self) -> Result<CredentialPair, ClientError> {
        let Some(refresh_token) = self.session().refresh_token().await? else {
            self.terminate_session().await;
            return Err(ClientError::NoRefreshCredential);
        };

        debug!("renewing access credential");
        let renewed = match self.refresh_exchange(&refresh_token).await {
            Ok(renewed) => renewed,
            Err(err) => {
                warn!(error = %err, "credential renewal failed");
                self.terminate_session().await;
                return Err(ClientError::RenewalFailed(err.to_string()));
            }
        };

        self.session().set_access_token(&renewed.access_token).await?;
        let refresh_token = match renewed.refresh_token {
            Some(rotated) => {
                self.session().set_refresh_token(&rotated).await?;
                rotated
            }
            None => refresh_token,
        };

        Ok(CredentialPair {
            access_token: renewed.access_token,
            refresh_token,
        })
    }

    async fn refresh_exchange(&self, refresh_token: &str) -> Result<RefreshResponse, ClientError> {
        let request = self
            .request(Method::POST, "/auth/refresh")
            .json(&RefreshRequest {
                refresh_token: refresh_token.to_string(),
            });
        let response = request.send().await?;
        decode(response).await
    }
}
