//! Single user lookup by id, username, email or external id

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lookup_diagnostic, DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::api::User;
use crate::diagnostics::Diagnostic;
use crate::lookup::{self, LookupRequest};
use crate::provider_data::PterodactylProviderData;
use crate::state;

/// Attributes of a panel user as exposed by the user data sources.
///
/// Every field is optional so the same shape serves as the lookup
/// configuration and as the resulting state.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserDataModel {
    pub id: Option<i32>,
    pub external_id: Option<String>,
    pub uuid: Option<String>,
    pub username: Option<String>,
    pub email: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub language: Option<String>,
    pub root_admin: Option<bool>,
    pub is_2fa: Option<bool>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<User> for UserDataModel {
    fn from(user: User) -> Self {
        Self {
            id: Some(user.id),
            external_id: user.external_id,
            uuid: Some(user.uuid),
            username: Some(user.username),
            email: Some(user.email),
            first_name: Some(user.first_name),
            last_name: Some(user.last_name),
            language: Some(user.language),
            root_admin: Some(user.root_admin),
            is_2fa: Some(user.two_factor),
            created_at: Some(state::timestamp(&user.created_at)),
            updated_at: Some(state::timestamp(&user.updated_at)),
        }
    }
}

pub struct UserDataSource {
    provider_data: PterodactylProviderData,
}

impl UserDataSource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn read_user(&self, config: &Value) -> Result<Value, Diagnostic> {
        let config: UserDataModel = state::decode(config, "user lookup")?;

        let request = LookupRequest::<User>::new(config.id)
            .key("username", config.username, |u, v| v.matches_str(&u.username))
            .key("email", config.email, |u, v| v.matches_str(&u.email))
            .key("external_id", config.external_id, |u, v| {
                v.matches_opt_str(u.external_id.as_deref())
            });

        let user = lookup::resolve(&self.provider_data.client.users(), &request)
            .await
            .map_err(|e| lookup_diagnostic("user", e))?;

        state::encode(&UserDataModel::from(user))
    }
}

#[async_trait]
impl DataSource for UserDataSource {
    fn type_name(&self) -> &str {
        "pterodactyl_user"
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        ReadDataSourceResponse::from_result(self.read_user(&request.config).await)
    }
}
