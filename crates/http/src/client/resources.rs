//! Typed resource endpoints for the dashboard data

use echo_core::types::{Goal, Initiative};
use reqwest::Method;
use uuid::Uuid;

use super::{error::ClientError, typed::AuthenticatedEchoClient};
use crate::types::{
    CreateGoalRequest, CreateInitiativeRequest, GoalsResponse, InitiativeFilter,
    InitiativesResponse, MessageResponse, UpdateGoalRequest, UpdateInitiativeRequest,
};

/// Resource kinds addressable through the generic `/api/{kind}/{id}` routes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceKind {
    Goal,
    Initiative,
}

impl ResourceKind {
    /// Collection segment of the resource path
    pub fn collection(&self) -> &'static str {
        match self {
            Self::Goal => "goals",
            Self::Initiative => "initiatives",
        }
    }
}

impl AuthenticatedEchoClient {
    /// List the tenant's goals
    pub async fn list_goals(&self) -> Result<Vec<Goal>, ClientError> {
        let request = self.request(Method::GET, "/api/goals");
        let response: GoalsResponse = self.execute(request).await?;
        Ok(response.goals)
    }

    /// Create a goal
    pub async fn create_goal(&self, request: CreateGoalRequest) -> Result<Goal, ClientError> {
        let req = self.request(Method::POST, "/api/goals").json(&request);
        self.execute(req).await
    }

    /// Update a goal
    pub async fn update_goal(
        &self,
        id: Uuid,
        request: UpdateGoalRequest,
    ) -> Result<Goal, ClientError> {
        let req = self
            .request(Method::PUT, &format!("/api/goals/{id}"))
            .json(&request);
        self.execute(req).await
    }

    /// Delete a goal
    pub async fn delete_goal(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.delete_resource(ResourceKind::Goal, id).await
    }

    /// List initiatives, optionally filtered by goal and status
    pub async fn list_initiatives(
        &self,
        filter: &InitiativeFilter,
    ) -> Result<Vec<Initiative>, ClientError> {
        let request = self.request(Method::GET, "/api/initiatives").query(filter);
        let response: InitiativesResponse = self.execute(request).await?;
        Ok(response.initiatives)
    }

    /// Fetch a single initiative
    pub async fn get_initiative(&self, id: Uuid) -> Result<Initiative, ClientError> {
        let request = self.request(Method::GET, &format!("/api/initiatives/{id}"));
        self.execute(request).await
    }

    /// Create an initiative
    pub async fn create_initiative(
        &self,
        request: CreateInitiativeRequest,
    ) -> Result<Initiative, ClientError> {
        let req = self
            .request(Method::POST, "/api/initiatives")
            .json(&request);
        self.execute(req).await
    }

    /// Update an initiative
    pub async fn update_initiative(
        &self,
        id: Uuid,
        request: UpdateInitiativeRequest,
    ) -> Result<Initiative, ClientError> {
        let req = self
            .request(Method::PUT, &format!("/api/initiatives/{id}"))
            .json(&request);
        self.execute(req).await
    }

    /// Delete an initiative
    pub async fn delete_initiative(&self, id: Uuid) -> Result<MessageResponse, ClientError> {
        self.delete_resource(ResourceKind::Initiative, id).await
    }

    /// Delete any addressable resource, the way the dashboard action
    /// buttons do
    pub async fn delete_resource(
        &self,
        kind: ResourceKind,
        id: Uuid,
    ) -> Result<MessageResponse, ClientError> {
        let request = self.request(
            Method::DELETE,
            &format!("/api/{}/{}", kind.collection(), id),
        );
        self.execute(request).await
    }
}
