//! Error Types
//!
//! Centralized error handling for the creation protocol and its store.

use crate::domain::graph::EntityKind;

/// A violated creation rule. Raised before any storage access.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("empty UserName not allowed")]
    EmptyUserName,

    #[error("empty Password not allowed")]
    EmptyPassword,

    #[error("empty Name not allowed")]
    EmptyName,

    #[error("empty Title not allowed")]
    EmptyTitle,

    #[error("empty Content not allowed")]
    EmptyContent,

    #[error("empty UserID not allowed")]
    EmptyUserId,

    #[error("empty TopicID not allowed")]
    EmptyTopicId,

    #[error("empty DiscussionID not allowed")]
    EmptyDiscussionId,

    #[error("a Discussion must be created with exactly one Post")]
    DiscussionWithoutSinglePost,
}

/// Failure reported by the storage collaborator.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("unique constraint `{constraint}` violated: {source}")]
    UniqueViolation {
        constraint: String,
        #[source]
        source: sqlx::Error,
    },

    #[error("no table for entity kind `{0}`")]
    MissingTable(EntityKind),

    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Error returned by every creation operation.
#[derive(Debug, thiserror::Error)]
pub enum ForumError {
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    #[error("no database connection")]
    NoConnection,

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),
}

impl ForumError {
    /// The violated rule, if this is a validation failure.
    pub fn validation(&self) -> Option<ValidationError> {
        match self {
            Self::Validation(rule) => Some(*rule),
            _ => None,
        }
    }

    pub fn is_storage(&self) -> bool {
        matches!(self, Self::Storage(_))
    }
}

impl From<sqlx::Error> for ForumError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(StorageError::Database(e))
    }
}

impl From<sqlx::migrate::MigrateError> for ForumError {
    fn from(e: sqlx::migrate::MigrateError) -> Self {
        Self::Storage(StorageError::Database(sqlx::Error::Migrate(Box::new(e))))
    }
}
