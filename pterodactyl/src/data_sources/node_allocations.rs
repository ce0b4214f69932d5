//! Allocations of one node

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::diagnostics::Diagnostic;
use crate::provider_data::PterodactylProviderData;
use crate::resources::AllocationModel;
use crate::state;

#[derive(Debug, Deserialize)]
struct NodeAllocationsConfig {
    node_id: Option<i32>,
}

#[derive(Debug, Serialize)]
struct NodeAllocationsDataModel {
    node_id: i32,
    allocations: Vec<AllocationModel>,
}

pub struct NodeAllocationsDataSource {
    provider_data: PterodactylProviderData,
}

impl NodeAllocationsDataSource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn read_allocations(&self, config: &Value) -> Result<Value, Diagnostic> {
        let config: NodeAllocationsConfig =
            state::decode(config, "node_allocations configuration")?;
        let node_id = config.node_id.ok_or_else(|| {
            Diagnostic::error("Missing Attribute", "'node_id' must be specified")
                .with_attribute("node_id")
        })?;

        let allocations = self
            .provider_data
            .client
            .allocations(node_id)
            .list()
            .await
            .map_err(|e| {
                Diagnostic::error("Unable to Read Pterodactyl Node Allocations", e.to_string())
            })?;

        state::encode(&NodeAllocationsDataModel {
            node_id,
            allocations: allocations.into_iter().map(AllocationModel::from).collect(),
        })
    }
}

#[async_trait]
impl DataSource for NodeAllocationsDataSource {
    fn type_name(&self) -> &str {
        "pterodactyl_node_allocations"
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        ReadDataSourceResponse::from_result(self.read_allocations(&request.config).await)
    }
}
