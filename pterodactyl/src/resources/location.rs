//! Location resource

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, UpdateResourceRequest, UpdateResourceResponse,
};
use crate::api::{Location, LocationRequest};
use crate::diagnostics::Diagnostic;
use crate::provider_data::PterodactylProviderData;
use crate::state;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationModel {
    pub id: Option<i32>,
    pub short: String,
    pub long: String,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl LocationModel {
    fn to_request(&self) -> LocationRequest {
        LocationRequest {
            short: self.short.clone(),
            long: self.long.clone(),
        }
    }
}

impl From<Location> for LocationModel {
    fn from(location: Location) -> Self {
        Self {
            id: Some(location.id),
            short: location.short,
            long: location.long,
            created_at: Some(state::timestamp(&location.created_at)),
            updated_at: Some(state::timestamp(&location.updated_at)),
        }
    }
}

pub struct LocationResource {
    provider_data: PterodactylProviderData,
}

impl LocationResource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn create_location(&self, planned: &Value) -> Result<Value, Diagnostic> {
        let plan: LocationModel = state::decode(planned, "location plan")?;

        let location = self
            .provider_data
            .client
            .locations()
            .create(&plan.to_request())
            .await
            .map_err(|e| Diagnostic::error("Error creating location", e.to_string()))?;

        tracing::info!(id = location.id, short = %location.short, "Created location");
        state::encode(&LocationModel::from(location))
    }

    async fn read_location(&self, current: &Value) -> Result<Option<Value>, Diagnostic> {
        let current: LocationModel = state::decode(current, "location state")?;
        let id = state::require_id(current.id, "location")?;

        match self.provider_data.client.locations().get(id).await {
            Ok(location) => state::encode(&LocationModel::from(location)).map(Some),
            Err(e) if e.is_not_found() => {
                tracing::warn!(id, "Location no longer exists, removing from state");
                Ok(None)
            }
            Err(e) => Err(Diagnostic::error("Error reading location", e.to_string())),
        }
    }

    async fn update_location(&self, prior: &Value, planned: &Value) -> Result<Value, Diagnostic> {
        let prior: LocationModel = state::decode(prior, "location state")?;
        let plan: LocationModel = state::decode(planned, "location plan")?;
        let id = state::require_id(prior.id, "location")?;

        let location = self
            .provider_data
            .client
            .locations()
            .update(id, &plan.to_request())
            .await
            .map_err(|e| Diagnostic::error("Error updating location", e.to_string()))?;

        tracing::info!(id, "Updated location");
        state::encode(&LocationModel::from(location))
    }

    async fn delete_location(&self, prior: &Value) -> Result<(), Diagnostic> {
        let prior: LocationModel = state::decode(prior, "location state")?;
        let id = state::require_id(prior.id, "location")?;

        match self.provider_data.client.locations().delete(id).await {
            Ok(()) => {
                tracing::info!(id, "Deleted location");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Diagnostic::error("Error deleting location", e.to_string())),
        }
    }

    async fn import_location(&self, id: &str) -> Result<Value, Diagnostic> {
        let id = state::parse_import_id(id)?;

        let location = self
            .provider_data
            .client
            .locations()
            .get(id)
            .await
            .map_err(|e| Diagnostic::error("Error importing location", e.to_string()))?;

        state::encode(&LocationModel::from(location))
    }
}

#[async_trait]
impl Resource for LocationResource {
    fn type_name(&self) -> &str {
        "pterodactyl_location"
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        let result = self.create_location(&request.planned_state).await;
        CreateResourceResponse::from_result(request.planned_state, result)
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_location(&request.current_state).await;
        ReadResourceResponse::from_result(request.current_state, result)
    }

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse {
        let result = self
            .update_location(&request.prior_state, &request.planned_state)
            .await;
        UpdateResourceResponse::from_result(request.prior_state, result)
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        DeleteResourceResponse::from_result(self.delete_location(&request.prior_state).await)
    }

    async fn import_state(
        &self,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        ImportResourceStateResponse::from_result(self.import_location(&request.id).await)
    }
}
