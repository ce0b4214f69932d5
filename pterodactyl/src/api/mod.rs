//! Pterodactyl Application API client

pub mod allocations;
pub mod client;
pub mod common;
pub mod error;
pub mod locations;
pub mod nodes;
pub mod users;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use allocations::{Allocation, AllocationRequest, AllocationsApi};
pub use client::{Client, ClientConfig};
pub use common::{ApiErrorDetails, ApiErrorEntry, ApiQueryParams};
pub use error::ApiError;
pub use locations::{Location, LocationRequest, LocationsApi};
pub use nodes::{Node, NodeRequest, NodesApi};
pub use users::{User, UserRequest, UsersApi};
