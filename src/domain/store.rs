//! Storage contract.
//!
//! The creation protocol only ever talks to storage through these traits.
//! Implementations live in the infrastructure layer, following the same
//! dependency inversion as the rest of the domain.

use async_trait::async_trait;

use super::graph::{EntityKind, Row};
use crate::shared::error::{ForumError, StorageError};

/// A source of transactions.
///
/// Must be safe to share between tasks; conflicting writes are serialized
/// by the implementation, not by its callers.
#[async_trait]
pub trait Store: Send + Sync {
    type Transaction: StoreTransaction;

    /// Begin a new transaction.
    ///
    /// Fails with [`ForumError::NoConnection`] when the handle is no longer live.
    async fn begin(&self) -> Result<Self::Transaction, ForumError>;

    /// Create or alter the schema for the given kinds.
    ///
    /// Invoked once at startup, never by the creation protocol.
    async fn migrate(&self, kinds: &[EntityKind]) -> Result<(), ForumError>;
}

/// An open transaction. Dropping it without committing discards its writes.
#[async_trait]
pub trait StoreTransaction: Send {
    /// Insert one row, returning the generated key for generated-key kinds.
    async fn insert(&mut self, row: Row) -> Result<Option<i64>, StorageError>;

    /// Insert rows of a single kind, `batch_size` rows per statement.
    ///
    /// Generated keys are returned in input order; natural-key kinds yield
    /// an empty list.
    async fn insert_batch(
        &mut self,
        rows: Vec<Row>,
        batch_size: usize,
    ) -> Result<Vec<i64>, StorageError>;

    /// Commit the transaction.
    async fn commit(self) -> Result<(), StorageError>;

    /// Rollback the transaction.
    async fn rollback(self) -> Result<(), StorageError>;
}
