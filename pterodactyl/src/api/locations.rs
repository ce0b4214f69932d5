//! Location API implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, Client};
use crate::lookup::RecordSource;

const LOCATIONS_PATH: &str = "/api/application/locations";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Location {
    pub id: i32,
    pub short: String,
    pub long: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LocationRequest {
    pub short: String,
    pub long: String,
}

pub struct LocationsApi<'a> {
    client: &'a Client,
}

impl<'a> LocationsApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    pub async fn list(&self) -> Result<Vec<Location>, ApiError> {
        self.client.list_all(LOCATIONS_PATH).await
    }

    pub async fn get(&self, id: i32) -> Result<Location, ApiError> {
        self.client.get(&format!("{}/{}", LOCATIONS_PATH, id)).await
    }

    pub async fn create(&self, request: &LocationRequest) -> Result<Location, ApiError> {
        self.client.post(LOCATIONS_PATH, request).await
    }

    pub async fn update(&self, id: i32, request: &LocationRequest) -> Result<Location, ApiError> {
        self.client
            .patch(&format!("{}/{}", LOCATIONS_PATH, id), request)
            .await
    }

    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        self.client
            .delete(&format!("{}/{}", LOCATIONS_PATH, id))
            .await
    }
}

#[async_trait]
impl RecordSource for LocationsApi<'_> {
    type Record = Location;

    async fn fetch_by_id(&self, id: i32) -> Result<Location, ApiError> {
        self.get(id).await
    }

    async fn fetch_all(&self) -> Result<Vec<Location>, ApiError> {
        self.list().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::test_helpers::{create_test_client, location_attrs, object_body};
    use mockito::{Matcher, Server};

    #[tokio::test]
    async fn test_create_location() {
        let mut server = Server::new_async().await;
        let m = server
            .mock("POST", LOCATIONS_PATH)
            .match_body(Matcher::JsonString(
                r#"{"short":"fra","long":"Frankfurt"}"#.to_string(),
            ))
            .with_status(201)
            .with_body(object_body("location", &location_attrs(2, "fra", "Frankfurt")))
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let request = LocationRequest {
            short: "fra".to_string(),
            long: "Frankfurt".to_string(),
        };

        let location = client.locations().create(&request).await.unwrap();
        assert_eq!(location.id, 2);
        assert_eq!(location.long, "Frankfurt");
        m.assert_async().await;
    }

    #[tokio::test]
    async fn test_get_missing_location() {
        let mut server = Server::new_async().await;
        let _m = server
            .mock("GET", "/api/application/locations/99")
            .with_status(404)
            .with_body(
                r#"{"errors":[{"code":"NotFoundHttpException","status":"404","detail":"The requested resource could not be found on the server."}]}"#,
            )
            .create_async()
            .await;

        let client = create_test_client(&server.url());
        let err = client.locations().get(99).await.unwrap_err();
        assert!(err.is_not_found());
    }
}
