//! Provider configuration: explicit values with environment fallback

use serde::Deserialize;
use serde_json::Value;
use url::Url;

use crate::diagnostics::Diagnostic;
use crate::state;

pub const HOST_ENV: &str = "PTERODACTYL_HOST";
pub const API_KEY_ENV: &str = "PTERODACTYL_API_KEY";

/// Provider block as written in configuration
#[derive(Debug, Default, Deserialize)]
struct ProviderBlock {
    host: Option<String>,
    api_key: Option<String>,
}

#[derive(Clone)]
pub struct ProviderConfig {
    pub host: Url,
    pub api_key: String,
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("host", &self.host.as_str())
            .field("api_key", &"***")
            .finish()
    }
}

impl ProviderConfig {
    /// Resolve the configuration, preferring explicit values over
    /// `PTERODACTYL_HOST` / `PTERODACTYL_API_KEY`.
    pub fn from_config(config: &Value) -> Result<Self, Vec<Diagnostic>> {
        let block: ProviderBlock = if config.is_null() {
            ProviderBlock::default()
        } else {
            state::decode(config, "provider configuration").map_err(|d| vec![d])?
        };

        let host = block.host.or_else(|| std::env::var(HOST_ENV).ok());
        let api_key = block.api_key.or_else(|| std::env::var(API_KEY_ENV).ok());

        let mut diagnostics = vec![];

        let host = match host.filter(|h| !h.trim().is_empty()) {
            Some(host) => match parse_host(&host) {
                Ok(url) => Some(url),
                Err(diag) => {
                    diagnostics.push(diag);
                    None
                }
            },
            None => {
                diagnostics.push(missing("host", "Panel Host", HOST_ENV));
                None
            }
        };

        let api_key = api_key.filter(|k| !k.trim().is_empty());
        if api_key.is_none() {
            diagnostics.push(missing("api_key", "Panel API Key", API_KEY_ENV));
        }

        match (host, api_key) {
            (Some(host), Some(api_key)) if diagnostics.is_empty() => Ok(Self { host, api_key }),
            _ => Err(diagnostics),
        }
    }

    /// Warnings about a configuration that works but is risky.
    pub fn warnings(&self) -> Vec<Diagnostic> {
        if self.host.scheme() == "http" {
            vec![Diagnostic::warning(
                "Insecure Pterodactyl Panel Host",
                "The API key is sent over plain HTTP. Use an https:// host outside of local testing.",
            )
            .with_attribute("host")]
        } else {
            vec![]
        }
    }
}

fn parse_host(host: &str) -> Result<Url, Diagnostic> {
    let invalid = |reason: String| {
        Diagnostic::error(
            "Invalid Pterodactyl Panel Host",
            format!("The host {:?} is not a usable panel URL: {}", host, reason),
        )
        .with_attribute("host")
    };

    let url = Url::parse(host).map_err(|e| invalid(e.to_string()))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        other => Err(invalid(format!("unsupported scheme {:?}", other))),
    }
}

fn missing(attribute: &str, what: &str, env: &str) -> Diagnostic {
    Diagnostic::error(
        format!("Missing Pterodactyl {}", what),
        format!(
            "The provider cannot create the Pterodactyl Panel client as there is a missing or empty value for the {}. \
             Set the {} value in the configuration or use the {} environment variable. \
             If either is already set, ensure the value is not empty.",
            what.to_lowercase(),
            attribute,
            env
        ),
    )
    .with_attribute(attribute)
}

#[cfg(test)]
#[allow(clippy::disallowed_methods)]
mod tests {
    use super::*;
    use serde_json::json;
    use serial_test::serial;

    fn clear_env() {
        std::env::remove_var(HOST_ENV);
        std::env::remove_var(API_KEY_ENV);
    }

    #[test]
    #[serial]
    fn explicit_values_win_over_environment() {
        std::env::set_var(HOST_ENV, "https://env.example.com");
        std::env::set_var(API_KEY_ENV, "ptla_env");

        let config = ProviderConfig::from_config(&json!({
            "host": "https://panel.example.com",
            "api_key": "ptla_explicit"
        }))
        .unwrap();

        assert_eq!(config.host.as_str(), "https://panel.example.com/");
        assert_eq!(config.api_key, "ptla_explicit");
        clear_env();
    }

    #[test]
    #[serial]
    fn environment_fills_missing_values() {
        std::env::set_var(HOST_ENV, "https://env.example.com");
        std::env::set_var(API_KEY_ENV, "ptla_env");

        let config = ProviderConfig::from_config(&Value::Null).unwrap();

        assert_eq!(config.host.host_str(), Some("env.example.com"));
        assert_eq!(config.api_key, "ptla_env");
        clear_env();
    }

    #[test]
    #[serial]
    fn missing_values_report_each_attribute() {
        clear_env();

        let diags = ProviderConfig::from_config(&json!({"host": "", "api_key": null})).unwrap_err();

        assert_eq!(diags.len(), 2);
        assert_eq!(diags[0].summary, "Missing Pterodactyl Panel Host");
        assert_eq!(diags[0].attribute.as_deref(), Some("host"));
        assert!(diags[0].detail.contains(HOST_ENV));
        assert_eq!(diags[1].attribute.as_deref(), Some("api_key"));
        assert!(diags[1].detail.contains(API_KEY_ENV));
    }

    #[test]
    #[serial]
    fn host_must_be_an_http_url() {
        clear_env();

        let diags = ProviderConfig::from_config(&json!({
            "host": "ftp://panel.example.com",
            "api_key": "ptla_key"
        }))
        .unwrap_err();
        assert_eq!(diags[0].summary, "Invalid Pterodactyl Panel Host");

        let diags = ProviderConfig::from_config(&json!({
            "host": "panel.example.com",
            "api_key": "ptla_key"
        }))
        .unwrap_err();
        assert_eq!(diags[0].attribute.as_deref(), Some("host"));
    }

    #[test]
    #[serial]
    fn plain_http_hosts_warn() {
        clear_env();

        let config = ProviderConfig::from_config(&json!({
            "host": "http://localhost:8080",
            "api_key": "ptla_key"
        }))
        .unwrap();

        let warnings = config.warnings();
        assert_eq!(warnings.len(), 1);
        assert!(!warnings[0].is_error());
    }

    #[test]
    fn debug_output_masks_the_api_key() {
        let config = ProviderConfig {
            host: Url::parse("https://panel.example.com").unwrap(),
            api_key: "ptla_secret".to_string(),
        };

        assert!(!format!("{:?}", config).contains("ptla_secret"));
    }
}
