//! Node allocation API implementation

use serde::{Deserialize, Serialize};

use super::{ApiError, Client};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Allocation {
    pub id: i32,
    pub ip: String,
    pub alias: Option<String>,
    pub port: u16,
    pub notes: Option<String>,
    pub assigned: bool,
}

/// Request body for adding allocations to a node.
///
/// The panel accepts single ports and ranges (`"25565-25570"`) as strings.
#[derive(Debug, Clone, Serialize)]
pub struct AllocationRequest {
    pub ip: String,
    pub ports: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alias: Option<String>,
}

/// Allocations of a single node
pub struct AllocationsApi<'a> {
    client: &'a Client,
    node_id: i32,
}

impl<'a> AllocationsApi<'a> {
    pub fn new(client: &'a Client, node_id: i32) -> Self {
        Self { client, node_id }
    }

    fn path(&self) -> String {
        format!("/api/application/nodes/{}/allocations", self.node_id)
    }

    /// GET /api/application/nodes/{node}/allocations (every page)
    pub async fn list(&self) -> Result<Vec<Allocation>, ApiError> {
        self.client.list_all(&self.path()).await
    }

    /// POST /api/application/nodes/{node}/allocations
    pub async fn create(&self, request: &AllocationRequest) -> Result<(), ApiError> {
        self.client.post_empty(&self.path(), request).await
    }

    /// DELETE /api/application/nodes/{node}/allocations/{allocation}
    pub async fn delete(&self, allocation_id: i32) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", self.path(), allocation_id))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{allocation_attrs, create_test_client, list_body, mock_list};
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_list_allocations() {
        let mut server = Server::new_async().await;
        let _m = mock_list(
            &mut server,
            "/api/application/nodes/4/allocations",
            list_body(
                "allocation",
                &[&allocation_attrs(10, 25565), &allocation_attrs(11, 25566)],
            ),
        )
        .await;

        let client = create_test_client(&server.url());
        let allocations = client.allocations(4).list().await.unwrap();

        assert_eq!(allocations.len(), 2);
        assert_eq!(allocations[0].port, 25565);
        assert_eq!(allocations[1].id, 11);
        assert!(!allocations[1].assigned);
    }

    #[tokio::test]
    async fn test_create_allocation_sends_ports_as_strings() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", "/api/application/nodes/4/allocations")
            .match_body(Matcher::JsonString(
                r#"{"ip":"10.0.0.5","ports":["25565"],"alias":"game"}"#.to_string(),
            ))
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let request = AllocationRequest {
            ip: "10.0.0.5".to_string(),
            ports: vec!["25565".to_string()],
            alias: Some("game".to_string()),
        };

        client.allocations(4).create(&request).await.unwrap();
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_delete_allocation() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("DELETE", "/api/application/nodes/4/allocations/10")
            .with_status(204)
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        client.allocations(4).delete(10).await.unwrap();
        m.assert_async().await;
    }
}
