//! Convergence of a parent's child list (node allocations) to a desired list.
//!
//! The panel exposes only single-item create and delete for child objects,
//! so reconciliation is a diff of persisted identifiers: persisted children
//! missing from the desired list are deleted, desired entries without an
//! identifier are created, and the result is always re-read from the panel.
//!
//! Children are never updated in place. Changing a non-identifying attribute
//! of an already persisted child has no effect here; it takes a delete
//! followed by a create.

use async_trait::async_trait;
use std::collections::HashSet;
use thiserror::Error;

use crate::api::ApiError;

/// An entity owned by exactly one parent record.
pub trait Child {
    /// Identifier assigned by the panel; `None` until the child is created.
    fn persisted_id(&self) -> Option<i32>;
}

/// Single-item operations on a parent's children.
#[async_trait]
pub trait ChildStore: Send + Sync {
    type Child: Child + Send + Sync;

    async fn list_children(&self, parent_id: i32) -> Result<Vec<Self::Child>, ApiError>;

    async fn create_child(&self, parent_id: i32, child: &Self::Child) -> Result<(), ApiError>;

    async fn delete_child(&self, parent_id: i32, child_id: i32) -> Result<(), ApiError>;
}

/// Reconciliation stops at the first failed create or delete; nothing that
/// already succeeded is rolled back and the caller has to run it again.
#[derive(Debug, Error)]
pub enum ReconcileError {
    #[error("Could not delete child {child_id} of {parent_id}: {source}")]
    Delete {
        parent_id: i32,
        child_id: i32,
        #[source]
        source: ApiError,
    },

    #[error("Could not create child of {parent_id}: {source}")]
    Create {
        parent_id: i32,
        #[source]
        source: ApiError,
    },

    #[error("Could not refresh children of {parent_id}: {source}")]
    Refresh {
        parent_id: i32,
        #[source]
        source: ApiError,
    },
}

/// Operations needed to converge `current` to `desired`.
#[derive(Debug)]
pub struct ReconcilePlan<'a, C> {
    /// Persisted children absent from `desired`, in `current` order.
    pub deletions: Vec<i32>,
    /// Desired children without an identifier, in `desired` order.
    pub creations: Vec<&'a C>,
}

impl<C> ReconcilePlan<'_, C> {
    pub fn is_empty(&self) -> bool {
        self.deletions.is_empty() && self.creations.is_empty()
    }
}

pub fn plan<'a, C: Child>(desired: &'a [C], current: &[C]) -> ReconcilePlan<'a, C> {
    let keep: HashSet<i32> = desired.iter().filter_map(Child::persisted_id).collect();

    let deletions = current
        .iter()
        .filter_map(Child::persisted_id)
        .filter(|id| !keep.contains(id))
        .collect();

    let creations = desired
        .iter()
        .filter(|child| child.persisted_id().is_none())
        .collect();

    ReconcilePlan {
        deletions,
        creations,
    }
}

/// Apply deletions, then creations, then return the freshly listed children.
///
/// `current` must be the persisted list as read immediately beforehand.
pub async fn reconcile<S>(
    store: &S,
    parent_id: i32,
    desired: &[S::Child],
    current: &[S::Child],
) -> Result<Vec<S::Child>, ReconcileError>
where
    S: ChildStore + ?Sized,
{
    let plan = plan(desired, current);
    tracing::debug!(
        parent_id,
        deletions = plan.deletions.len(),
        creations = plan.creations.len(),
        "Reconciling children"
    );

    for child_id in &plan.deletions {
        store
            .delete_child(parent_id, *child_id)
            .await
            .map_err(|source| ReconcileError::Delete {
                parent_id,
                child_id: *child_id,
                source,
            })?;
        tracing::info!(parent_id, child_id, "Deleted child");
    }

    for child in &plan.creations {
        store
            .create_child(parent_id, child)
            .await
            .map_err(|source| ReconcileError::Create { parent_id, source })?;
        tracing::info!(parent_id, "Created child");
    }

    store
        .list_children(parent_id)
        .await
        .map_err(|source| ReconcileError::Refresh { parent_id, source })
}
