//! Single node lookup by id, uuid or name

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lookup_diagnostic, DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::api::Node;
use crate::diagnostics::Diagnostic;
use crate::lookup::{self, LookupRequest};
use crate::provider_data::PterodactylProviderData;
use crate::state;

/// Node attributes shared by the node data sources.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeDataModel {
    pub id: Option<i32>,
    pub uuid: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub public: Option<bool>,
    pub behind_proxy: Option<bool>,
    pub maintenance_mode: Option<bool>,
    pub location_id: Option<i32>,
    pub fqdn: Option<String>,
    pub scheme: Option<String>,
    pub memory: Option<i32>,
    pub memory_overallocate: Option<i32>,
    pub disk: Option<i32>,
    pub disk_overallocate: Option<i32>,
    pub upload_size: Option<i32>,
    pub daemon_sftp: Option<i32>,
    pub daemon_listen: Option<i32>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Node> for NodeDataModel {
    fn from(node: Node) -> Self {
        Self {
            id: Some(node.id),
            uuid: Some(node.uuid),
            name: Some(node.name),
            description: node.description,
            public: Some(node.public),
            behind_proxy: Some(node.behind_proxy),
            maintenance_mode: Some(node.maintenance_mode),
            location_id: Some(node.location_id),
            fqdn: Some(node.fqdn),
            scheme: Some(node.scheme),
            memory: Some(node.memory),
            memory_overallocate: Some(node.memory_overallocate),
            disk: Some(node.disk),
            disk_overallocate: Some(node.disk_overallocate),
            upload_size: Some(node.upload_size),
            daemon_sftp: Some(node.daemon_sftp),
            daemon_listen: Some(node.daemon_listen),
            created_at: Some(state::timestamp(&node.created_at)),
            updated_at: Some(state::timestamp(&node.updated_at)),
        }
    }
}

pub struct NodeDataSource {
    provider_data: PterodactylProviderData,
}

impl NodeDataSource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn read_node(&self, config: &Value) -> Result<Value, Diagnostic> {
        let config: NodeDataModel = state::decode(config, "node lookup")?;

        let request = LookupRequest::<Node>::new(config.id)
            .key("uuid", config.uuid, |n, v| v.matches_str(&n.uuid))
            .key("name", config.name, |n, v| v.matches_str(&n.name));

        let node = lookup::resolve(&self.provider_data.client.nodes(), &request)
            .await
            .map_err(|e| lookup_diagnostic("node", e))?;

        state::encode(&NodeDataModel::from(node))
    }
}

#[async_trait]
impl DataSource for NodeDataSource {
    fn type_name(&self) -> &str {
        "pterodactyl_node"
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        ReadDataSourceResponse::from_result(self.read_node(&request.config).await)
    }
}
