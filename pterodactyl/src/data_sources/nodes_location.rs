//! Nodes assigned to one location

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::NodeDataModel;
use super::{DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::diagnostics::Diagnostic;
use crate::provider_data::PterodactylProviderData;
use crate::state;

#[derive(Debug, Deserialize)]
struct NodesLocationConfig {
    location_id: Option<i32>,
}

#[derive(Debug, Serialize)]
struct NodesLocationDataModel {
    location_id: i32,
    nodes: Vec<NodeDataModel>,
}

pub struct NodesLocationDataSource {
    provider_data: PterodactylProviderData,
}

impl NodesLocationDataSource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn read_nodes(&self, config: &Value) -> Result<Value, Diagnostic> {
        let config: NodesLocationConfig = state::decode(config, "nodes_location configuration")?;
        let location_id = config.location_id.ok_or_else(|| {
            Diagnostic::error("Missing Attribute", "'location_id' must be specified")
                .with_attribute("location_id")
        })?;

        let nodes = self
            .provider_data
            .client
            .nodes()
            .list_in_location(location_id)
            .await
            .map_err(|e| Diagnostic::error("Unable to Read Pterodactyl Nodes", e.to_string()))?;

        tracing::debug!(location_id, count = nodes.len(), "Nodes in location");
        state::encode(&NodesLocationDataModel {
            location_id,
            nodes: nodes.into_iter().map(NodeDataModel::from).collect(),
        })
    }
}

#[async_trait]
impl DataSource for NodesLocationDataSource {
    fn type_name(&self) -> &str {
        "pterodactyl_nodes_location"
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        ReadDataSourceResponse::from_result(self.read_nodes(&request.config).await)
    }
}
