//! Terraform provider core for the Pterodactyl game server panel.
//!
//! The crate talks to the panel's Application API and exposes lifecycle
//! handlers for users, locations and nodes (with their allocations) plus
//! the read-only data sources. A plugin host drives the handlers with JSON
//! state values; everything below that boundary is plain async Rust.

pub mod api;
pub mod config;
pub mod data_sources;
pub mod diagnostics;
pub mod logging;
pub mod lookup;
pub mod provider_data;
pub mod reconcile;
pub mod resources;
pub mod state;

pub use diagnostics::{Diagnostic, DiagnosticSeverity};
pub use provider_data::PterodactylProviderData;

use serde_json::Value;
use thiserror::Error;

use crate::api::{ApiError, Client};
use crate::config::ProviderConfig;
use crate::data_sources::DataSource;
use crate::resources::Resource;

pub const RESOURCE_TYPES: &[&str] = &[
    "pterodactyl_location",
    "pterodactyl_node",
    "pterodactyl_user",
];

pub const DATA_SOURCE_TYPES: &[&str] = &[
    "pterodactyl_location",
    "pterodactyl_node",
    "pterodactyl_node_allocations",
    "pterodactyl_nodes",
    "pterodactyl_nodes_location",
    "pterodactyl_user",
    "pterodactyl_users",
];

#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("Provider not configured")]
    NotConfigured,

    #[error("Unknown resource: {0}")]
    UnknownResource(String),

    #[error("Unknown data source: {0}")]
    UnknownDataSource(String),

    #[error("Failed to create API client: {0}")]
    Configuration(#[from] ApiError),
}

#[derive(Default)]
pub struct PterodactylProvider {
    provider_data: Option<PterodactylProviderData>,
}

impl PterodactylProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_configured(&self) -> bool {
        self.provider_data.is_some()
    }

    /// Build the panel client from the provider block.
    ///
    /// Returns every diagnostic found; the provider stays unconfigured when
    /// any of them is an error.
    pub fn configure(&mut self, config: &Value) -> Vec<Diagnostic> {
        let config = match ProviderConfig::from_config(config) {
            Ok(config) => config,
            Err(diagnostics) => return diagnostics,
        };

        let mut diagnostics = config.warnings();
        match Client::new(config.host.as_str(), &config.api_key).map_err(ProviderError::from) {
            Ok(client) => {
                tracing::info!(host = %config.host, "Configured Pterodactyl provider");
                self.provider_data = Some(PterodactylProviderData::new(client));
            }
            Err(e) => diagnostics.push(Diagnostic::error(
                "Unable to Create Pterodactyl API Client",
                e.to_string(),
            )),
        }

        diagnostics
    }

    fn provider_data(&self) -> Result<PterodactylProviderData, ProviderError> {
        self.provider_data
            .clone()
            .ok_or(ProviderError::NotConfigured)
    }

    pub fn resource(&self, name: &str) -> Result<Box<dyn Resource>, ProviderError> {
        let data = self.provider_data()?;

        match name {
            "pterodactyl_user" => Ok(Box::new(resources::UserResource::new(data))),
            "pterodactyl_location" => Ok(Box::new(resources::LocationResource::new(data))),
            "pterodactyl_node" => Ok(Box::new(resources::NodeResource::new(data))),
            _ => Err(ProviderError::UnknownResource(name.to_string())),
        }
    }

    pub fn data_source(&self, name: &str) -> Result<Box<dyn DataSource>, ProviderError> {
        let data = self.provider_data()?;

        match name {
            "pterodactyl_user" => Ok(Box::new(data_sources::UserDataSource::new(data))),
            "pterodactyl_users" => Ok(Box::new(data_sources::UsersDataSource::new(data))),
            "pterodactyl_node" => Ok(Box::new(data_sources::NodeDataSource::new(data))),
            "pterodactyl_nodes" => Ok(Box::new(data_sources::NodesDataSource::new(data))),
            "pterodactyl_nodes_location" => {
                Ok(Box::new(data_sources::NodesLocationDataSource::new(data)))
            }
            "pterodactyl_node_allocations" => {
                Ok(Box::new(data_sources::NodeAllocationsDataSource::new(data)))
            }
            "pterodactyl_location" => Ok(Box::new(data_sources::LocationDataSource::new(data))),
            _ => Err(ProviderError::UnknownDataSource(name.to_string())),
        }
    }
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use crate::config::{API_KEY_ENV, HOST_ENV};
    use serde_json::json;
    use serial_test::serial;
    use tokio_test::assert_ok;

    fn configured() -> PterodactylProvider {
        let mut provider = PterodactylProvider::new();
        let diagnostics = provider.configure(&json!({
            "host": "https://panel.example.com",
            "api_key": "ptla_test"
        }));
        assert!(diagnostics.is_empty());
        provider
    }

    #[test]
    #[serial]
    fn provider_configures_successfully_with_env_vars() {
        std::env::set_var(HOST_ENV, "https://panel.example.com");
        std::env::set_var(API_KEY_ENV, "ptla_env");

        let mut provider = PterodactylProvider::new();
        let diagnostics = provider.configure(&json!({}));

        assert!(!crate::diagnostics::has_errors(&diagnostics));
        assert!(provider.is_configured());

        std::env::remove_var(HOST_ENV);
        std::env::remove_var(API_KEY_ENV);
    }

    #[test]
    #[serial]
    fn provider_configure_requires_host() {
        std::env::remove_var(HOST_ENV);
        std::env::set_var(API_KEY_ENV, "ptla_env");

        let mut provider = PterodactylProvider::new();
        let diagnostics = provider.configure(&Value::Null);

        assert!(crate::diagnostics::has_errors(&diagnostics));
        assert_eq!(diagnostics[0].attribute.as_deref(), Some("host"));
        assert!(!provider.is_configured());

        std::env::remove_var(API_KEY_ENV);
    }

    #[test]
    #[serial]
    fn provider_configure_with_http_host_warns_but_succeeds() {
        std::env::remove_var(HOST_ENV);
        std::env::remove_var(API_KEY_ENV);

        let mut provider = PterodactylProvider::new();
        let diagnostics = provider.configure(&json!({
            "host": "http://localhost",
            "api_key": "ptla_test"
        }));

        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].severity, DiagnosticSeverity::Warning);
        assert!(provider.is_configured());
    }

    #[test]
    fn provider_creates_every_registered_type() {
        let provider = configured();

        for name in RESOURCE_TYPES {
            let resource = assert_ok!(provider.resource(name));
            assert_eq!(resource.type_name(), *name);
        }
        for name in DATA_SOURCE_TYPES {
            let data_source = assert_ok!(provider.data_source(name));
            assert_eq!(data_source.type_name(), *name);
        }
    }

    #[test]
    fn provider_rejects_unknown_types() {
        let provider = configured();

        assert!(matches!(
            provider.resource("pterodactyl_server"),
            Err(ProviderError::UnknownResource(name)) if name == "pterodactyl_server"
        ));
        assert!(matches!(
            provider.data_source("pterodactyl_servers"),
            Err(ProviderError::UnknownDataSource(_))
        ));
    }

    #[test]
    fn provider_fails_to_create_resources_before_configuration() {
        let provider = PterodactylProvider::new();

        let err = provider.resource("pterodactyl_user").err().unwrap();
        assert!(matches!(err, ProviderError::NotConfigured));
        assert_eq!(err.to_string(), "Provider not configured");
        assert!(matches!(
            provider.data_source("pterodactyl_user"),
            Err(ProviderError::NotConfigured)
        ));
    }
}
