//! Every panel user

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;

use super::user::UserDataModel;
use super::{DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::diagnostics::Diagnostic;
use crate::provider_data::PterodactylProviderData;
use crate::state;

#[derive(Debug, Serialize)]
struct UsersDataModel {
    users: Vec<UserDataModel>,
}

pub struct UsersDataSource {
    provider_data: PterodactylProviderData,
}

impl UsersDataSource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn read_users(&self) -> Result<Value, Diagnostic> {
        let users = self
            .provider_data
            .client
            .users()
            .list()
            .await
            .map_err(|e| Diagnostic::error("Unable to Read Pterodactyl Users", e.to_string()))?;

        state::encode(&UsersDataModel {
            users: users.into_iter().map(UserDataModel::from).collect(),
        })
    }
}

#[async_trait]
impl DataSource for UsersDataSource {
    fn type_name(&self) -> &str {
        "pterodactyl_users"
    }

    async fn read(&self, _request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        ReadDataSourceResponse::from_result(self.read_users().await)
    }
}
