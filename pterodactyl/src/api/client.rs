use reqwest::header::{ACCEPT, AUTHORIZATION};
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;

use super::common::{
    ApiErrorDetails, ApiErrorResponse, ApiList, ApiObject, ApiQueryParams, PaginationParams,
};
use super::error::ApiError;

/// Pterodactyl Application API client
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    auth_header: String,
    config: ClientConfig,
}

#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub request_timeout: Duration,
    pub connection_timeout: Duration,
    pub idle_timeout: Duration,
    pub max_idle_connections: usize,
    /// Page size requested from listing endpoints
    pub page_size: u32,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            request_timeout: Duration::from_secs(30),
            connection_timeout: Duration::from_secs(10),
            idle_timeout: Duration::from_secs(90),
            max_idle_connections: 10,
            page_size: 100,
        }
    }
}

impl ClientConfig {
    fn build_http_client(&self) -> Result<reqwest::Client, reqwest::Error> {
        reqwest::Client::builder()
            .timeout(self.request_timeout)
            .connect_timeout(self.connection_timeout)
            .pool_idle_timeout(self.idle_timeout)
            .pool_max_idle_per_host(self.max_idle_connections)
            .build()
    }
}

impl Client {
    /// Create a new API client with default configuration
    pub fn new(host: &str, api_key: &str) -> Result<Self, ApiError> {
        Self::with_config(host, api_key, ClientConfig::default())
    }

    /// Create a new API client with custom timeouts and page size
    pub fn with_config(host: &str, api_key: &str, config: ClientConfig) -> Result<Self, ApiError> {
        let http_client = config.build_http_client()?;

        Ok(Self {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: host.trim_end_matches('/').to_string(),
                auth_header: format!("Bearer {}", api_key),
                config,
            }),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.inner.base_url
    }

    /// User API operations
    pub fn users(&self) -> crate::api::users::UsersApi<'_> {
        crate::api::users::UsersApi::new(self)
    }

    /// Node API operations
    pub fn nodes(&self) -> crate::api::nodes::NodesApi<'_> {
        crate::api::nodes::NodesApi::new(self)
    }

    /// Location API operations
    pub fn locations(&self) -> crate::api::locations::LocationsApi<'_> {
        crate::api::locations::LocationsApi::new(self)
    }

    /// Allocation API operations for one node
    pub fn allocations(&self, node_id: i32) -> crate::api::allocations::AllocationsApi<'_> {
        crate::api::allocations::AllocationsApi::new(self, node_id)
    }

    /// GET a single object and unwrap its attributes
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        let response = self.send(Method::GET, path, None::<&()>).await?;
        let object: ApiObject<T> = Self::parse_body(response).await?;
        Ok(object.attributes)
    }

    /// GET one page of a listing
    pub async fn get_with_params<T: DeserializeOwned>(
        &self,
        path: &str,
        params: &ApiQueryParams,
    ) -> Result<ApiList<T>, ApiError> {
        let full_path = format!("{}{}", path, params.to_query_string());
        let response = self.send(Method::GET, &full_path, None::<&()>).await?;
        Self::parse_body(response).await
    }

    /// GET every page of a listing, preserving the panel's order
    pub async fn list_all<T: DeserializeOwned>(&self, path: &str) -> Result<Vec<T>, ApiError> {
        let mut page = PaginationParams::new(self.inner.config.page_size);
        let mut items = Vec::new();

        loop {
            let list: ApiList<T> = self.get_with_params(path, &page.to_query_params()).await?;
            let more = list.has_page_after(page.page);
            items.extend(list.into_items());

            if !more {
                break;
            }
            page = page.next();
        }

        tracing::debug!("Listed {} objects from {}", items.len(), path);
        Ok(items)
    }

    /// POST a body and unwrap the created object
    pub async fn post<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::POST, path, Some(body)).await?;
        let object: ApiObject<T> = Self::parse_body(response).await?;
        Ok(object.attributes)
    }

    /// POST a body to an endpoint that answers without content
    pub async fn post_empty<B: Serialize>(&self, path: &str, body: &B) -> Result<(), ApiError> {
        self.send(Method::POST, path, Some(body)).await.map(|_| ())
    }

    /// PATCH a body and unwrap the updated object
    pub async fn patch<T: DeserializeOwned, B: Serialize>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, ApiError> {
        let response = self.send(Method::PATCH, path, Some(body)).await?;
        let object: ApiObject<T> = Self::parse_body(response).await?;
        Ok(object.attributes)
    }

    /// DELETE an object; the panel answers 204
    pub async fn delete(&self, path: &str) -> Result<(), ApiError> {
        self.send(Method::DELETE, path, None::<&()>).await.map(|_| ())
    }

    /// Issue exactly one request and map non-success statuses to errors
    async fn send<B: Serialize>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<Response, ApiError> {
        let url = format!("{}{}", self.inner.base_url, path);
        tracing::debug!("{} request to: {}", method, url);

        let mut request: RequestBuilder = self
            .inner
            .http_client
            .request(method, &url)
            .header(AUTHORIZATION, &self.inner.auth_header)
            .header(ACCEPT, "application/json");

        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        tracing::debug!("Response status: {}", status);

        if status.is_success() {
            return Ok(response);
        }

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ApiError::Auth(status.as_u16()));
        }

        Err(Self::error_from_response(response).await)
    }

    async fn parse_body<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
        let text = response.text().await?;

        serde_json::from_str::<T>(&text).map_err(|e| {
            tracing::error!("Failed to deserialize response: {}, body: {}", e, text);
            ApiError::Parse(e.to_string())
        })
    }

    async fn error_from_response(response: Response) -> ApiError {
        let status = response.status().as_u16();
        let text = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());

        match serde_json::from_str::<ApiErrorResponse>(&text) {
            Ok(err_resp) if !err_resp.errors.is_empty() => {
                let details = ApiErrorDetails {
                    errors: err_resp.errors,
                };
                ApiError::Api {
                    status,
                    message: details.summary(),
                    details: Some(Box::new(details)),
                }
            }
            _ => ApiError::Api {
                status,
                message: text,
                details: None,
            },
        }
    }
}
