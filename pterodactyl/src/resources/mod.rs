//! Resource implementations
//!
//! Handlers take and return state as JSON objects keyed by attribute name.
//! Failures never abort the call; they are reported as diagnostics next to
//! the state the host should keep.

use async_trait::async_trait;
use serde_json::Value;

use crate::diagnostics::Diagnostic;

pub mod location;
pub mod node;
pub mod user;

pub use location::LocationResource;
pub use node::{AllocationModel, NodeResource};
pub use user::UserResource;

#[derive(Debug, Clone)]
pub struct CreateResourceRequest {
    pub planned_state: Value,
}

#[derive(Debug, Clone)]
pub struct CreateResourceResponse {
    pub new_state: Value,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct ReadResourceRequest {
    pub current_state: Value,
}

#[derive(Debug, Clone)]
pub struct ReadResourceResponse {
    /// `None` when the object no longer exists in the panel.
    pub new_state: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct UpdateResourceRequest {
    pub prior_state: Value,
    pub planned_state: Value,
}

#[derive(Debug, Clone)]
pub struct UpdateResourceResponse {
    pub new_state: Value,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct DeleteResourceRequest {
    pub prior_state: Value,
}

#[derive(Debug, Clone)]
pub struct DeleteResourceResponse {
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Clone)]
pub struct ImportResourceStateRequest {
    pub id: String,
}

#[derive(Debug, Clone)]
pub struct ImportResourceStateResponse {
    pub state: Option<Value>,
    pub diagnostics: Vec<Diagnostic>,
}

#[async_trait]
pub trait Resource: Send + Sync {
    fn type_name(&self) -> &str;

    async fn create(&self, request: CreateResourceRequest) -> CreateResourceResponse;

    async fn read(&self, request: ReadResourceRequest) -> ReadResourceResponse;

    async fn update(&self, request: UpdateResourceRequest) -> UpdateResourceResponse;

    async fn delete(&self, request: DeleteResourceRequest) -> DeleteResourceResponse;

    async fn import_state(&self, request: ImportResourceStateRequest)
        -> ImportResourceStateResponse;
}

impl CreateResourceResponse {
    fn from_result(planned_state: Value, result: Result<Value, Diagnostic>) -> Self {
        match result {
            Ok(new_state) => Self {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => Self {
                new_state: planned_state,
                diagnostics: vec![diag],
            },
        }
    }
}

impl ReadResourceResponse {
    fn from_result(current_state: Value, result: Result<Option<Value>, Diagnostic>) -> Self {
        match result {
            Ok(new_state) => Self {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => Self {
                new_state: Some(current_state),
                diagnostics: vec![diag],
            },
        }
    }
}

impl UpdateResourceResponse {
    fn from_result(prior_state: Value, result: Result<Value, Diagnostic>) -> Self {
        match result {
            Ok(new_state) => Self {
                new_state,
                diagnostics: vec![],
            },
            Err(diag) => Self {
                new_state: prior_state,
                diagnostics: vec![diag],
            },
        }
    }
}

impl DeleteResourceResponse {
    fn from_result(result: Result<(), Diagnostic>) -> Self {
        Self {
            diagnostics: result.err().into_iter().collect(),
        }
    }
}

impl ImportResourceStateResponse {
    fn from_result(result: Result<Value, Diagnostic>) -> Self {
        match result {
            Ok(state) => Self {
                state: Some(state),
                diagnostics: vec![],
            },
            Err(diag) => Self {
                state: None,
                diagnostics: vec![diag],
            },
        }
    }
}
