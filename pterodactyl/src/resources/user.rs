//! Panel user resource

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, UpdateResourceRequest, UpdateResourceResponse,
};
use crate::api::{User, UserRequest};
use crate::diagnostics::Diagnostic;
use crate::provider_data::PterodactylProviderData;
use crate::state;

/// State of `pterodactyl_user`.
///
/// `password` is never returned by the panel; whatever was last planned is
/// carried forward.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserModel {
    pub id: Option<i32>,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub external_id: Option<String>,
    pub language: Option<String>,
    pub root_admin: Option<bool>,
    pub password: Option<String>,
    pub uuid: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl UserModel {
    fn to_request(&self) -> UserRequest {
        UserRequest {
            email: self.email.clone(),
            username: self.username.clone(),
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            external_id: self.external_id.clone().unwrap_or_default(),
            password: self.password.clone(),
            root_admin: self.root_admin,
            language: self.language.clone(),
        }
    }

    fn from_api(user: User, password: Option<String>) -> Self {
        Self {
            id: Some(user.id),
            username: user.username,
            email: user.email,
            first_name: user.first_name,
            last_name: user.last_name,
            external_id: user.external_id.filter(|e| !e.is_empty()),
            language: Some(user.language),
            root_admin: Some(user.root_admin),
            password,
            uuid: Some(user.uuid),
            created_at: Some(state::timestamp(&user.created_at)),
            updated_at: Some(state::timestamp(&user.updated_at)),
        }
    }
}

pub struct UserResource {
    provider_data: PterodactylProviderData,
}

impl UserResource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn create_user(&self, planned: &Value) -> Result<Value, Diagnostic> {
        let plan: UserModel = state::decode(planned, "user plan")?;

        let user = self
            .provider_data
            .client
            .users()
            .create(&plan.to_request())
            .await
            .map_err(|e| Diagnostic::error("Error creating user", e.to_string()))?;

        tracing::info!(id = user.id, username = %user.username, "Created user");
        state::encode(&UserModel::from_api(user, plan.password))
    }

    async fn read_user(&self, current: &Value) -> Result<Option<Value>, Diagnostic> {
        let current: UserModel = state::decode(current, "user state")?;
        let id = state::require_id(current.id, "user")?;

        match self.provider_data.client.users().get(id).await {
            Ok(user) => state::encode(&UserModel::from_api(user, current.password)).map(Some),
            Err(e) if e.is_not_found() => {
                tracing::warn!(id, "User no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(Diagnostic::error("Error reading user", e.to_string())),
        }
    }

    async fn update_user(&self, prior: &Value, planned: &Value) -> Result<Value, Diagnostic> {
        let prior: UserModel = state::decode(prior, "user state")?;
        let plan: UserModel = state::decode(planned, "user plan")?;
        let id = state::require_id(prior.id, "user")?;

        let user = self
            .provider_data
            .client
            .users()
            .update(id, &plan.to_request())
            .await
            .map_err(|e| Diagnostic::error("Error updating user", e.to_string()))?;

        tracing::info!(id, "Updated user");
        state::encode(&UserModel::from_api(user, plan.password))
    }

    async fn delete_user(&self, prior: &Value) -> Result<(), Diagnostic> {
        let prior: UserModel = state::decode(prior, "user state")?;
        let id = state::require_id(prior.id, "user")?;

        match self.provider_data.client.users().delete(id).await {
            Ok(()) => {
                tracing::info!(id, "Deleted user");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Diagnostic::error("Error deleting user", e.to_string())),
        }
    }

    async fn import_user(&self, id: &str) -> Result<Value, Diagnostic> {
        let id = state::parse_import_id(id)?;

        let user = self
            .provider_data
            .client
            .users()
            .get(id)
            .await
            .map_err(|e| Diagnostic::error("Error importing user", e.to_string()))?;

        state::encode(&UserModel::from_api(user, None))
    }
}

#[async_trait]
impl Resource for UserResource {
    fn type_name(&self) -> &str {
        "pterodactyl_user"
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_user(&request.planned_state).await;
        CreateResourceResponse::from_result(request.planned_state, result)
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_user(&request.current_state).await;
        ReadResourceResponse::from_result(request.current_state, result)
    }

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_user(&request.prior_state, &request.planned_state)
            .await;
        UpdateResourceResponse::from_result(request.prior_state, result)
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        DeleteResourceResponse::from_result(self.delete_user(&request.prior_state).await)
    }

    async fn import_state(
        &self,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        ImportResourceStateResponse::from_result(self.import_user(&request.id).await)
    }
}
