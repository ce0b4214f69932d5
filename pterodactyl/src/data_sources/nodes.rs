//! Every node known to the panel

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::node::NodeDataModel;
use super::{DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::diagnostics::Diagnostic;
use crate::provider_data::PterodactylProviderData;
use crate::state;

#[derive(Debug, Serialize)]
struct NodesDataModel {
    nodes: Vec<NodeDataModel>,
}

pub struct NodesDataSource {
    provider_data: PterodactylProviderData,
}

impl NodesDataSource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn read_nodes(&self) -> Result<Value, Diagnostic> {
        let nodes = self
            .provider_data
            .client
            .nodes()
            .list()
            .await
            .map_err(|e| Diagnostic::error("Unable to Read Pterodactyl Nodes", e.to_string()))?;

        state::encode(&NodesDataModel {
            nodes: nodes.into_iter().map(NodeDataModel::from).collect(),
        })
    }
}

#[async_trait]
impl DataSource for NodesDataSource {
    fn type_name(&self) -> &str {
        "pterodactyl_nodes"
    }

    async fn read(&self, _request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        ReadDataSourceResponse::from_result(self.read_nodes().await)
    }
}
