//! Data source implementations

use async_trait::async_trait;
use serde_json::Value;

use crate::diagnostics::Diagnostic;
use crate::lookup::LookupError;

pub mod location;
pub mod node;
pub mod node_allocations;
pub mod nodes;
pub mod nodes_location;
pub mod user;
pub mod users;

pub use location::LocationDataSource;
pub use node::NodeDataSource;
pub use node_allocations::NodeAllocationsDataSource;
pub use nodes::NodesDataSource;
pub use nodes_location::NodesLocationDataSource;
pub use user::UserDataSource;
pub use users::UsersDataSource;

#[derive(Debug, Clone)]
pub struct ReadDataSourceRequest {
    pub config: Value,
}

#[derive(Debug, Clone)]
pub struct ReadDataSourceResponse {
    pub state: Value,
    pub diagnostics: Vec<Diagnostic>,
}

impl ReadDataSourceResponse {
    fn from_result(result: Result<Value, Diagnostic>) -> Self {
        match result {
            Ok(state) => Self {
                state,
                diagnostics: vec![],
            },
            Err(diag) => Self {
                state: Value::Null,
                diagnostics: vec![diag],
            },
        }
    }
}

#[async_trait]
pub trait DataSource: Send + Sync {
    fn type_name(&self) -> &str;

    async fn read(&self, request: ReadDataSourceRequest) -> ReadDataSourceResponse;
}

/// Map a failed single-record lookup to the diagnostic shown to the user.
fn lookup_diagnostic(entity: &str, err: LookupError) -> Diagnostic {
    match err {
        LookupError::MissingAttribute { .. } => {
            Diagnostic::error("Missing Attribute", err.to_string())
        }
        LookupError::NotFound { field, value } => Diagnostic::error(
            format!("Unable to Read Pterodactyl {}", capitalize(entity)),
            format!("no {} matched {} = {}", entity, field, value),
        )
        .with_attribute(field),
        LookupError::Backend(e) => Diagnostic::error(
            format!("Unable to Read Pterodactyl {}", capitalize(entity)),
            e.to_string(),
        ),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
