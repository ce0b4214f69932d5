//! Common types and utilities for the Pterodactyl Application API

use serde::Deserialize;

/// Single object envelope: `{"object": "user", "attributes": {...}}`
#[derive(Debug, Deserialize)]
pub struct ApiObject<T> {
    pub object: String,
    pub attributes: T,
}

/// List envelope returned by every listing endpoint
#[derive(Debug, Deserialize)]
pub struct ApiList<T> {
    pub data: Vec<ApiObject<T>>,
    #[serde(default)]
    pub meta: Option<ListMeta>,
}

#[derive(Debug, Deserialize)]
pub struct ListMeta {
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Pagination {
    pub total: u32,
    pub count: u32,
    pub per_page: u32,
    pub current_page: u32,
    pub total_pages: u32,
}

impl<T> ApiList<T> {
    /// Whether another page follows `requested`.
    ///
    /// An empty page, or one that does not report being the page asked
    /// for, ends the walk even if `total_pages` says otherwise.
    pub fn has_page_after(&self, requested: u32) -> bool {
        if self.data.is_empty() {
            return false;
        }
        match &self.meta {
            Some(meta) => {
                meta.pagination.current_page >= requested
                    && meta.pagination.current_page < meta.pagination.total_pages
            }
            None => false,
        }
    }

    pub fn into_items(self) -> Vec<T> {
        self.data.into_iter().map(|o| o.attributes).collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct ApiErrorResponse {
    pub errors: Vec<ApiErrorEntry>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorEntry {
    pub code: String,
    pub status: String,
    pub detail: String,
}

#[derive(Debug, thiserror::Error)]
#[error("API error details: {errors:?}")]
pub struct ApiErrorDetails {
    pub errors: Vec<ApiErrorEntry>,
}

impl ApiErrorDetails {
    /// Panel supplied details joined in the order they were reported.
    pub fn summary(&self) -> String {
        self.errors
            .iter()
            .map(|e| e.detail.as_str())
            .collect::<Vec<_>>()
            .join("; ")
    }
}

#[derive(Debug, Clone, Default)]
pub struct ApiQueryParams {
    params: Vec<(String, String)>,
}

impl ApiQueryParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add<K: Into<String>, V: ToString>(mut self, key: K, value: V) -> Self {
        self.params.push((key.into(), value.to_string()));
        self
    }

    pub fn to_query_string(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!(
                "?{}",
                self.params
                    .iter()
                    .map(|(k, v)| format!("{}={}", k, urlencoding::encode(v)))
                    .collect::<Vec<_>>()
                    .join("&")
            )
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl PaginationParams {
    pub fn new(per_page: u32) -> Self {
        Self { page: 1, per_page }
    }

    pub fn next(self) -> Self {
        Self {
            page: self.page + 1,
            ..self
        }
    }

    pub fn to_query_params(&self) -> ApiQueryParams {
        ApiQueryParams::new()
            .add("page", self.page)
            .add("per_page", self.per_page)
    }
}
