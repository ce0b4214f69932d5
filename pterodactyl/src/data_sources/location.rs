//! Single location lookup by id, short code or long description

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{lookup_diagnostic, DataSource, ReadDataSourceRequest, ReadDataSourceResponse};
use crate::api::Location;
use crate::diagnostics::Diagnostic;
use crate::lookup::{self, LookupRequest};
use crate::provider_data::PterodactylProviderData;
use crate::state;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocationDataModel {
    pub id: Option<i32>,
    pub short: Option<String>,
    pub long: Option<String>,
    pub created_at: Option<String>,
    pub updated_at: Option<String>,
}

impl From<Location> for LocationDataModel {
    fn from(location: Location) -> Self {
        Self {
            id: Some(location.id),
            short: Some(location.short),
            long: Some(location.long),
            created_at: Some(state::timestamp(&location.created_at)),
            updated_at: Some(state::timestamp(&location.updated_at)),
        }
    }
}

pub struct LocationDataSource {
    provider_data: PterodactylProviderData,
}

impl LocationDataSource {
    pub fn new(provider_data: PterodactylProviderData) -> Self {
        Self { provider_data }
    }

    async fn read_location(&self, config: &Value) -> Result<Value, Diagnostic> {
        let config: LocationDataModel = state::decode(config, "location lookup")?;

        let request = LookupRequest::<Location>::new(config.id)
            .key("short", config.short, |l, v| v.matches_str(&l.short))
            .key("long", config.long, |l, v| v.matches_str(&l.long));

        let location = lookup::resolve(&self.provider_data.client.locations(), &request)
            .await
            .map_err(|e| lookup_diagnostic("location", e))?;

        state::encode(&LocationDataModel::from(location))
    }
}

#[async_trait]
impl DataSource for LocationDataSource {
    fn type_name(&self) -> &str {
        "pterodactyl_location"
    }

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse {
        ReadDataSourceResponse::from_result(self.read_location(&request.config).await)
    }
}
