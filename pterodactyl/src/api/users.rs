//! User API implementation

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{ApiError, Client};
use crate::lookup::RecordSource;

const USERS_PATH: &str = "/api/application/users";

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i32,
    pub external_id: Option<String>,
    pub uuid: String,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub root_admin: bool,
    #[serde(rename = "2fa", default)]
    pub two_factor: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for creating and updating users
#[derive(Debug, Clone, Default, Serialize)]
pub struct UserRequest {
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Always sent; an empty string clears it.
    pub external_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub password: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub root_admin: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

pub struct UsersApi<'a> {
    client: &'a Client,
}

impl<'a> UsersApi<'a> {
    pub fn new(client: &'a Client) -> Self {
        Self { client }
    }

    /// GET /api/application/users (every page)
    pub async fn list(&self) -> Result<Vec<User>, ApiError> {
        self.client.list_all(USERS_PATH).await
    }

    /// GET /api/application/users/{id}
    pub async fn get(&self, id: i32) -> Result<User, ApiError> {
        self.client.get(&format!("{}/{}", USERS_PATH, id)).await
    }

    /// POST /api/application/users
    pub async fn create(&self, request: &UserRequest) -> Result<User, ApiError> {
        self.client.post(USERS_PATH, request).await
    }

    /// PATCH /api/application/users/{id}
    pub async fn update(&self, id: i32, request: &UserRequest) -> Result<User, ApiError> {
        self.client
            .patch(&format!("{}/{}", USERS_PATH, id), request)
            .await
    }

    /// DELETE /api/application/users/{id}
    pub async fn delete(&self, id: i32) -> Result<(), ApiError> {
        self.client.delete(&format!("{}/{}", USERS_PATH, id)).await
    }
}

#[async_trait]
impl RecordSource for UsersApi<'_> {
    type Record = User;

    async fn fetch_by_id(&self, id: i32) -> Result<User, ApiError> {
        self.get(id).await
    }

    async fn fetch_all(&self) -> Result<Vec<User>, ApiError> {
        self.list().await
    }
}
