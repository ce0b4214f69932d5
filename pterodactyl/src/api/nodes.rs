//! Node API implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, Client};
use crate::lookup::RecordSource;

const NODES_PATH: &str = "/api/application/nodes";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Node {
    pub id: i32,
    pub uuid: String,
    pub public: bool,
    pub name: String,
    pub description: Option<String>,
    pub location_id: i32,
    pub fqdn: String,
    pub scheme: String,
    pub behind_proxy: bool,
    pub maintenance_mode: bool,
    pub memory: i32,
    pub memory_overallocate: i32,
    pub disk: i32,
    pub disk_overallocate: i32,
    pub upload_size: i32,
    pub daemon_listen: i32,
    pub daemon_sftp: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating and updating nodes
#[derive(Debug, Clone, Default, Serialize)]
pub struct NodeRequest {
    pub name: String,
    /// Always sent; an empty string clears it.
    pub description: String,
    pub location_id: i32,
    pub public: bool,
    pub fqdn: String,
    pub scheme: String,
    pub behind_proxy: bool,
    pub maintenance_mode: bool,
    pub memory: i32,
    pub memory_overallocate: i32,
    pub disk: i32,
    pub disk_overallocate: i32,
    pub upload_size: i32,
    pub daemon_listen: i32,
    pub daemon_sftp: i32,
}

pub struct NodesApi<'a> {
    client: &'a Client,
}

impl<'a> NodesApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/application/nodes (every page)
    pub async fn list(&self) -> Result<Vec<Node>, ApiError> {
        self.client.list_all(NODES_PATH).await
    }

    /// Nodes assigned to one location, in listing order
    pub async fn list_in_location(&self, location_id: i32) -> Result<Vec<Node>, ApiError> {
        let nodes = self.list().await?;
        Ok(nodes
            .into_iter()
            .filter(|n| n.location_id == location_id)
            .collect())
    }

    /// GET /api/application/nodes/{id}
    pub async fn get(&self, id: i32) -> Result<Node, ApiError> {
        self.client.get(&format!("{}/{}", NODES_PATH, id)).await
    }

    /// POST /api/application/nodes
    pub async fn create(&self, request: &NodeRequest) -> Result<Node, ApiError> {
        self.client.post(NODES_PATH, request).await
    }

    /// PATCH /api/application/nodes/{id}
    pub async fn update(&self, id: i32, request: &NodeRequest) -> Result<Node, ApiError> {
        self.client
            .patch(&format!("{}/{}", NODES_PATH, id), request)
            .await
    }

    /// DELETE /api/application/nodes/{id}
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", NODES_PATH, id)).await
    }
}

#[async_trait]
impl RecordSource for NodesApi<'_> {
    type Record = Node;

    async fn fetch_by_id(&self, id: i32) -> Result<Node, ApiError> {
        self.get(id).await
    }

    async fn fetch_all(&self) -> Result<Vec<Node>, ApiError> {
        self.list().await
    }
}
