//! Node resource, including the node's port allocations
//!
//! Allocations are a nested list in state. The panel only creates and
//! deletes them one at a time, so every change goes through
//! [`crate::reconcile::reconcile`] and the stored list is the one the
//! panel reports afterwards, whenever that list can be read.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{
    CreateResourceRequest, CreateResourceResponse, DeleteResourceRequest, DeleteResourceResponse,
    ImportResourceStateRequest, ImportResourceStateResponse, ReadResourceRequest,
    ReadResourceResponse, Resource, UpdateResourceRequest, UpdateResourceResponse,
};
use crate::api::{Allocation, AllocationRequest, ApiError, Client, Node, NodeRequest};
use crate::diagnostics::Diagnostic;
use crate::provider_data::PterodactylProviderData;
use crate::reconcile::{self, Child, ChildStore, ReconcileError};
use crate::state;

/// One entry of a node's `allocations` list.
///
/// Entries without an `id` are created on apply. Persisted entries are
/// matched by `id` only, so editing the alias of an existing allocation
/// needs the entry to be replaced.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllocationModel {
    pub id: Option<i32>,
    pub ip: String,
    pub port: u16,
    pub alias: Option<String>,
    pub notes: Option<String>,
    #[serde(default)]
    pub assigned: bool,
}

impl Child for AllocationModel {
    fn persisted_id(&self) -> Option<i32> {
        self.id
    }
}

impl From<Allocation> for AllocationModel {
    fn from(allocation: Allocation) -> Self {
        Self {
            id: Some(allocation.id),
            ip: allocation.ip,
            port: allocation.port,
            alias: allocation.alias,
            notes: allocation.notes,
            assigned: allocation.assigned,
        }
    }
}

/// Allocation endpoints seen as the children of a node.
pub struct NodeAllocations<'a> {
    client: &'a Client,
}

impl<'a> NodeAllocations<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ChildStore for NodeAllocations<'_> {
    type Child = AllocationModel;

    async fn list_children(&self, parent_id: i32) -> Result<Vec<AllocationModel>, ApiError> {
        let allocations = self.client.allocations(parent_id).list().await?;
        Ok(allocations.into_iter().map(AllocationModel::from).collect())
    }

    async fn create_child(&self, parent_id: i32, child: &AllocationModel) -> Result<(), ApiError> {
        let request = AllocationRequest {
            ip: child.ip.clone(),
            ports: vec![child.port.to_string()],
            alias: child.alias.clone(),
        };
        self.client.allocations(parent_id).create(&request).await
    }

    async fn delete_child(&self, parent_id: i32, child_id: i32) -> Result<(), ApiError> {
        self.client.allocations(parent_id).delete(child_id).await
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeModel {
    pub id: Option<i32>,
    pub uuid: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub public: bool,
    pub behind_proxy: bool,
    pub maintenance_mode: bool,
    pub location_id: i32,
    pub fqdn: String,
    pub scheme: String,
    pub memory: i32,
    pub memory_overallocate: i32,
    pub disk: i32,
    pub disk_overallocate: i32,
    pub upload_size: i32,
    pub daemon_sftp: i32,
    pub daemon_listen: i32,
    #[serde(default)]
    pub allocations: Vec<AllocationModel>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl NodeModel {
    fn to_request(&self) -> NodeRequest {
        NodeRequest {
            name: self.name.clone(),
            description: self.description.clone().unwrap_or_default(),
            location_id: self.location_id,
            public: self.public,
            fqdn: self.fqdn.clone(),
            scheme: self.scheme.clone(),
            behind_proxy: self.behind_proxy,
            maintenance_mode: self.maintenance_mode,
            memory: self.memory,
            memory_overallocate: self.memory_overallocate,
            disk: self.disk,
            disk_overallocate: self.disk_overallocate,
            upload_size: self.upload_size,
            daemon_listen: self.daemon_listen,
            daemon_sftp: self.daemon_sftp,
        }
    }

    fn from_api(node: Node, allocations: Vec<AllocationModel>) -> Self {
        Self {
            id: Some(node.id),
            uuid: Some(node.uuid),
            name: node.name,
            description: node.description.filter(|d| !d.is_empty()),
            public: node.public,
            behind_proxy: node.behind_proxy,
            maintenance_mode: node.maintenance_mode,
            location_id: node.location_id,
            fqdn: node.fqdn,
            scheme: node.scheme,
            memory: node.memory,
            memory_overallocate: node.memory_overallocate,
            disk: node.disk,
            disk_overallocate: node.disk_overallocate,
            upload_size: node.upload_size,
            daemon_sftp: node.daemon_sftp,
            daemon_listen: node.daemon_listen,
            allocations,
            created_at: Some(state::timestamp(&node.created_at)),
            updated_at: Some(state::timestamp(&node.updated_at)),
        }
    }
}

/// Outcome of a mutation that may fail after the node itself was written.
///
/// The state always reflects the node as the panel now has it; a failed
/// allocation change is reported next to it.
struct Applied {
    state: Value,
    diagnostics: Vec<Diagnostic>,
}

pub struct NodeResource {
    provider_data: PterodactylProviderData,
}

impl NodeResource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    fn client(&self) -> &Client {
        &self.provider_data.client
    }

    async fn create_node(&self, planned: &Value) -> Result<Applied, Diagnostic> {
        let plan: NodeModel = state::decode(planned, "node plan")?;

        let node = self
            .client()
            .nodes()
            .create(&plan.to_request())
            .await
            .map_err(|e| Diagnostic::error("Error creating node", e.to_string()))?;
        tracing::info!(id = node.id, name = %node.name, "Created node");

        self.apply_allocations(node, &plan.allocations, &[], &[])
            .await
    }

    async fn read_node(&self, current: &Value) -> Result<Option<Value>, Diagnostic> {
        let current: NodeModel = state::decode(current, "node state")?;
        let id = state::require_id(current.id, "node")?;

        let node = match self.client().nodes().get(id).await {
            Ok(node) => node,
            Err(e) if e.is_not_found() => {
                tracing::warn!(id, "Node no longer exists, removing from state");
                return Ok(None);
            }
            Err(e) => return Err(Diagnostic::error("Error reading node", e.to_string())),
        };

        let allocations = self.list_allocations(id).await?;
        state::encode(&NodeModel::from_api(node, allocations)).map(Some)
    }

    async fn update_node(&self, prior: &Value, planned: &Value) -> Result<Applied, Diagnostic> {
        let prior: NodeModel = state::decode(prior, "node state")?;
        let plan: NodeModel = state::decode(planned, "node plan")?;
        let id = state::require_id(prior.id, "node")?;

        let node = self
            .client()
            .nodes()
            .update(id, &plan.to_request())
            .await
            .map_err(|e| Diagnostic::error("Error updating node", e.to_string()))?;
        tracing::info!(id, "Updated node");

        let current = self.list_allocations(id).await?;
        self.apply_allocations(node, &plan.allocations, &current, &prior.allocations)
            .await
    }

    async fn delete_node(&self, prior: &Value) -> Result<(), Diagnostic> {
        let prior: NodeModel = state::decode(prior, "node state")?;
        let id = state::require_id(prior.id, "node")?;

        match self.client().nodes().delete(id).await {
            Ok(()) => {
                tracing::info!(id, "Deleted node");
                Ok(())
            }
            Err(e) if e.is_not_found() => Ok(()),
            Err(e) => Err(Diagnostic::error("Error deleting node", e.to_string())),
        }
    }

    async fn import_node(&self, id: &str) -> Result<Value, Diagnostic> {
        let id = state::parse_import_id(id)?;

        let node = self
            .client()
            .nodes()
            .get(id)
            .await
            .map_err(|e| Diagnostic::error("Error importing node", e.to_string()))?;
        let allocations = self.list_allocations(id).await?;

        state::encode(&NodeModel::from_api(node, allocations))
    }

    async fn list_allocations(&self, node_id: i32) -> Result<Vec<AllocationModel>, Diagnostic> {
        NodeAllocations::new(self.client())
            .list_children(node_id)
            .await
            .map_err(|e| Diagnostic::error("Error reading node allocations", e.to_string()))
    }

    /// Converge the node's allocations and build its new state.
    ///
    /// `recorded` is what state held before this apply. It is only used
    /// when the panel's list cannot be read back after a failure.
    async fn apply_allocations(
        &self,
        node: Node,
        desired: &[AllocationModel],
        current: &[AllocationModel],
        recorded: &[AllocationModel],
    ) -> Result<Applied, Diagnostic> {
        let store = NodeAllocations::new(self.client());

        let (allocations, diagnostics) =
            match reconcile::reconcile(&store, node.id, desired, current).await {
                Ok(allocations) => (allocations, vec![]),
                Err(e) => {
                    tracing::warn!(node_id = node.id, "Allocation changes only partly applied");
                    let refresh_failed = matches!(e, ReconcileError::Refresh { .. });
                    let mut diagnostics =
                        vec![Diagnostic::error("Error applying node allocations", e.to_string())
                            .with_attribute("allocations")];

                    // The reconciler's own read-back already failed; don't ask again.
                    let allocations = if refresh_failed {
                        recorded.to_vec()
                    } else {
                        match store.list_children(node.id).await {
                            Ok(allocations) => allocations,
                            Err(e) => {
                                diagnostics.push(
                                    Diagnostic::error(
                                        "Error reading node allocations",
                                        e.to_string(),
                                    )
                                    .with_attribute("allocations"),
                                );
                                recorded.to_vec()
                            }
                        }
                    };
                    (allocations, diagnostics)
                }
            };

        Ok(Applied {
            state: state::encode(&NodeModel::from_api(node, allocations))?,
            diagnostics,
        })
    }
}

#[async_trait]
impl Resource for NodeResource {
    fn type_name(&self) -> &str {
        "pterodactyl_node"
    }

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse {
        match self.create_node(&request.planned_state).await {
            Ok(applied) => CreateResourceResponse {
                new_state: applied.state,
                diagnostics: applied.diagnostics,
            },
            Err(diag) => CreateResourceResponse::from_result(request.planned_state, Err(diag)),
        }
    }

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse {
        let result = self.read_node(&request.current_state).await;
        ReadResourceResponse::from_result(request.current_state, result)
    }

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse {
        match self
            .update_node(&request.prior_state, &request.planned_state)
            .await
        {
            Ok(applied) => UpdateResourceResponse {
                new_state: applied.state,
                diagnostics: applied.diagnostics,
            },
            Err(diag) => UpdateResourceResponse::from_result(request.prior_state, Err(diag)),
        }
    }

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse {
        DeleteResourceResponse::from_result(self.delete_node(&request.prior_state).await)
    }

    async fn import_state(
        &self,
        request: ImportResourceStateRequest,
    ) -> ImportResourceStateResponse {
        ImportResourceStateResponse::from_result(self.import_node(&request.id).await)
    }
}
