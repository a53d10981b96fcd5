//! Persisted session state: storage abstraction and typed access.
//!
//! The backend hands out a credential pair plus `user`/`tenant` identity
//! objects; all of it lives in a flat string key-value store so it can be
//! backed by browser storage, a keychain, or plain memory. Values for the
//! identity keys are JSON-serialized.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::sync::RwLock;

use crate::error::CoreResult;
use crate::types::{CredentialPair, Tenant, User};

/// Fixed keys of the persisted session layout.
pub mod keys {
    pub const ACCESS_TOKEN: &str = "access_token";
    pub const REFRESH_TOKEN: &str = "refresh_token";
    pub const USER: &str = "user";
    pub const TENANT: &str = "tenant";
    pub const ACTIVE_TAB: &str = "activeTab";
}

/// Tab selected when nothing has been persisted yet.
pub const DEFAULT_ACTIVE_TAB: &str = "initiatives-tab";

/// Key-value storage for session state.
///
/// Reads and writes are not coordinated across callers; concurrent writers
/// are last-writer-wins.
#[async_trait]
pub trait SessionStore: Send + Sync {
    async fn get(&self, key: &str) -> CoreResult<Option<String>>;
    async fn set(&self, key: &str, value: &str) -> CoreResult<()>;
    async fn remove(&self, key: &str) -> CoreResult<()>;
    async fn clear(&self) -> CoreResult<()>;
}

/// In-memory session store.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    entries: RwLock<HashMap<String, String>>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionStore for MemorySessionStore {
    async fn get(&self, key: &str) -> CoreResult<Option<String>> {
        Ok(self.entries.read().await.get(key).cloned())
    }

    async fn set(&self, key: &str, value: &str) -> CoreResult<()> {
        self.entries
            .write()
            .await
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, key: &str) -> CoreResult<()> {
        self.entries.write().await.remove(key);
        Ok(())
    }

    async fn clear(&self) -> CoreResult<()> {
        self.entries.write().await.clear();
        Ok(())
    }
}

/// Invoked after the session has been cleared because credentials could not
/// be renewed. Implementations typically return the user to the
/// unauthenticated entry point.
#[async_trait]
pub trait SessionTerminationHandler: Send + Sync {
    async fn session_terminated(&self);
}

/// Handler that does nothing beyond the store clear.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopTerminationHandler;

#[async_trait]
impl SessionTerminationHandler for NoopTerminationHandler {
    async fn session_terminated(&self) {}
}

/// Typed view over a [`SessionStore`] using the fixed key layout.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn SessionStore>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>) -> Self {
        Self { store }
    }

    /// The underlying store.
    pub fn store(&self) -> &Arc<dyn SessionStore> {
        &self.store
    }

    pub async fn access_token(&self) -> CoreResult<Option<String>> {
        self.store.get(keys::ACCESS_TOKEN).await
    }

    pub async fn refresh_token(&self) -> CoreResult<Option<String>> {
        self.store.get(keys::REFRESH_TOKEN).await
    }

    /// The active credential pair, or `None` unless both halves are stored.
    pub async fn credentials(&self) -> CoreResult<Option<CredentialPair>> {
        let access_token = self.access_token().await?;
        let refresh_token = self.refresh_token().await?;
        Ok(match (access_token, refresh_token) {
            (Some(access_token), Some(refresh_token)) => Some(CredentialPair {
                access_token,
                refresh_token,
            }),
            _ => None,
        })
    }

    /// Replace only the access half of the credential pair. The write has
    /// completed by the time this returns, so subsequent reads observe the
    /// new token.
    pub async fn set_access_token(&self, token: &str) -> CoreResult<()> {
        self.store.set(keys::ACCESS_TOKEN, token).await
    }

    pub async fn set_refresh_token(&self, token: &str) -> CoreResult<()> {
        self.store.set(keys::REFRESH_TOKEN, token).await
    }

    pub async fn set_credentials(&self, credentials: &CredentialPair) -> CoreResult<()> {
        self.set_access_token(&credentials.access_token).await?;
        self.set_refresh_token(&credentials.refresh_token).await
    }

    pub async fn user(&self) -> CoreResult<Option<User>> {
        self.get_json(keys::USER).await
    }

    pub async fn set_user(&self, user: &User) -> CoreResult<()> {
        self.set_json(keys::USER, user).await
    }

    pub async fn tenant(&self) -> CoreResult<Option<Tenant>> {
        self.get_json(keys::TENANT).await
    }

    pub async fn set_tenant(&self, tenant: &Tenant) -> CoreResult<()> {
        self.set_json(keys::TENANT, tenant).await
    }

    /// Persist everything a successful credential exchange returns.
    ///
    /// A response without a tenant leaves any stored tenant in place, the
    /// same way a plain login does not disturb the tenant selected at
    /// registration time.
    pub async fn store_login(
        &self,
        credentials: &CredentialPair,
        user: &User,
        tenant: Option<&Tenant>,
    ) -> CoreResult<()> {
        self.set_credentials(credentials).await?;
        self.set_user(user).await?;
        if let Some(tenant) = tenant {
            self.set_tenant(tenant).await?;
        }
        Ok(())
    }

    /// The persisted dashboard tab, falling back to [`DEFAULT_ACTIVE_TAB`].
    pub async fn active_tab(&self) -> CoreResult<String> {
        Ok(self
            .store
            .get(keys::ACTIVE_TAB)
            .await?
            .unwrap_or_else(|| DEFAULT_ACTIVE_TAB.to_string()))
    }

    pub async fn set_active_tab(&self, tab: &str) -> CoreResult<()> {
        self.store.set(keys::ACTIVE_TAB, tab).await
    }

    /// Drop every stored key.
    pub async fn clear(&self) -> CoreResult<()> {
        self.store.clear().await
    }

    async fn get_json<T: DeserializeOwned>(&self, key: &str) -> CoreResult<Option<T>> {
        match self.store.get(key).await? {
            Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
            None => Ok(None),
        }
    }

    async fn set_json<T: Serialize>(&self, key: &str, value: &T) -> CoreResult<()> {
        let raw = serde_json::to_string(value)?;
        self.store.set(key, &raw).await
    }
}
