//! Creation Service
//!
//! The transactional entity-creation protocol. Every operation:
//!
//! 1. validates the candidate, touching no storage on failure;
//! 2. opens one transaction;
//! 3. inserts the root row, excluding every relation field;
//! 4. stamps owned children with the new key and batch-inserts them;
//! 5. commits, or rolls back and returns the storage error unchanged.
//!
//! Referenced entities embedded in a candidate are never written; only their
//! foreign-key scalars are.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tracing::{debug, error, warn};

use crate::domain::validation::{
    validate_discussion, validate_email, validate_group, validate_post, validate_topic,
    validate_user,
};
use crate::domain::{
    Discussion, Email, Entity, EntityKind, Group, Post, Store, StoreTransaction, Topic, User,
};
use crate::shared::error::{ForumError, StorageError, ValidationError};

/// Rows per batched child insert.
pub const DEFAULT_BATCH_SIZE: usize = 10;

/// Creation service trait
#[async_trait]
pub trait CreationService: Send + Sync {
    /// Create a user together with its emails.
    async fn create_user(&self, user: &mut User) -> Result<(), ForumError>;

    /// Create a group. Member users are references and are not written.
    async fn create_group(&self, group: &mut Group) -> Result<(), ForumError>;

    /// Create a topic, optionally under a parent topic.
    async fn create_topic(&self, topic: &mut Topic) -> Result<(), ForumError>;

    /// Create a discussion together with its single opening post.
    async fn create_discussion(&self, discussion: &mut Discussion) -> Result<(), ForumError>;

    /// Create a post in an existing discussion.
    async fn create_post(&self, post: &mut Post) -> Result<(), ForumError>;

    /// Create an email for an existing user.
    async fn create_email(&self, email: &mut Email) -> Result<(), ForumError>;
}

/// CreationService implementation over any [`Store`].
pub struct CreationServiceImpl<S>
where
    S: Store,
{
    store: Arc<S>,
    batch_size: usize,
}

impl<S> CreationServiceImpl<S>
where
    S: Store,
{
    pub fn new(store: Arc<S>) -> Self {
        Self {
            store,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }

    /// Override the child batch size. Values below one are raised to one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn store(&self) -> &Arc<S> {
        &self.store
    }

    /// Create a root entity that owns nothing.
    async fn create_leaf<T: Entity>(&self, entity: &mut T) -> Result<(), ForumError> {
        let mut tx = self.store.begin().await?;
        let outcome = insert_root(&mut tx, entity, Utc::now()).await;
        settle(tx, outcome, T::KIND).await
    }
}

#[async_trait]
impl<S> CreationService for CreationServiceImpl<S>
where
    S: Store,
{
    async fn create_user(&self, user: &mut User) -> Result<(), ForumError> {
        debug!(user_name = %user.user_name, emails = user.emails.len(), "Creating user");
        validate_user(user).map_err(|rule| rejected(EntityKind::User, rule))?;

        let mut tx = self.store.begin().await?;
        let now = Utc::now();
        let outcome = async {
            insert_root(&mut tx, user, now).await?;
            for email in &mut user.emails {
                email.user_id = user.id;
            }
            insert_owned::<User, _, _>(&mut tx, "emails", &mut user.emails, self.batch_size, now)
                .await?;
            insert_owned::<User, _, _>(&mut tx, "groups", &mut user.groups, self.batch_size, now)
                .await
        }
        .await;
        settle(tx, outcome, EntityKind::User).await?;

        debug!(user_id = user.id, "User created");
        Ok(())
    }

    async fn create_group(&self, group: &mut Group) -> Result<(), ForumError> {
        validate_group(group).map_err(|rule| rejected(EntityKind::Group, rule))?;
        self.create_leaf(group).await?;

        debug!(group_id = group.id, author_id = group.author_id, "Group created");
        Ok(())
    }

    async fn create_topic(&self, topic: &mut Topic) -> Result<(), ForumError> {
        validate_topic(topic).map_err(|rule| rejected(EntityKind::Topic, rule))?;
        self.create_leaf(topic).await?;

        debug!(topic_id = topic.id, parent_id = ?topic.parent_id, "Topic created");
        Ok(())
    }

    async fn create_discussion(&self, discussion: &mut Discussion) -> Result<(), ForumError> {
        validate_discussion(discussion).map_err(|rule| rejected(EntityKind::Discussion, rule))?;

        let mut tx = self.store.begin().await?;
        let now = Utc::now();
        let outcome = async {
            insert_root(&mut tx, discussion, now).await?;
            for post in &mut discussion.posts {
                post.discussion_id = discussion.id;
                post.author_id = discussion.author_id;
            }
            insert_owned::<Discussion, _, _>(
                &mut tx,
                "posts",
                &mut discussion.posts,
                self.batch_size,
                now,
            )
            .await
        }
        .await;
        settle(tx, outcome, EntityKind::Discussion).await?;

        debug!(
            discussion_id = discussion.id,
            topic_id = discussion.topic_id,
            "Discussion created"
        );
        Ok(())
    }

    async fn create_post(&self, post: &mut Post) -> Result<(), ForumError> {
        validate_post(post).map_err(|rule| rejected(EntityKind::Post, rule))?;
        self.create_leaf(post).await?;

        debug!(post_id = post.id, discussion_id = post.discussion_id, "Post created");
        Ok(())
    }

    async fn create_email(&self, email: &mut Email) -> Result<(), ForumError> {
        validate_email(email).map_err(|rule| rejected(EntityKind::Email, rule))?;
        self.create_leaf(email).await?;

        debug!(user_id = email.user_id, "Email created");
        Ok(())
    }
}

fn rejected(kind: EntityKind, rule: ValidationError) -> ForumError {
    warn!(table = kind.table(), %rule, "Rejected before storage");
    ForumError::Validation(rule)
}

/// Insert the root row and record its generated key.
async fn insert_root<T, X>(tx: &mut X, entity: &mut T, now: DateTime<Utc>) -> Result<(), StorageError>
where
    T: Entity,
    X: StoreTransaction,
{
    entity.touch(now);
    let id = tx.insert(entity.row()).await.map_err(|e| {
        error!(table = T::KIND.table(), error = %e, "Insert failed");
        e
    })?;
    if let Some(id) = id {
        entity.assign_id(id);
    }
    Ok(())
}

/// Batch-insert the children `P` keeps under `field`, already re-parented.
///
/// Nothing is written unless `P` declares `field` as owning `T`.
async fn insert_owned<P, T, X>(
    tx: &mut X,
    field: &'static str,
    children: &mut [T],
    batch_size: usize,
    now: DateTime<Utc>,
) -> Result<(), StorageError>
where
    P: Entity,
    T: Entity,
    X: StoreTransaction,
{
    if children.is_empty() || !P::owns(field, T::KIND) {
        return Ok(());
    }

    for child in children.iter_mut() {
        child.touch(now);
    }
    let rows = children.iter().map(Entity::row).collect();
    let ids = tx.insert_batch(rows, batch_size).await.map_err(|e| {
        error!(table = T::KIND.table(), rows = children.len(), error = %e, "Batch insert failed");
        e
    })?;
    for (child, id) in children.iter_mut().zip(ids) {
        child.assign_id(id);
    }
    Ok(())
}

/// Commit on success; otherwise roll back and surface the original error.
async fn settle<X>(
    tx: X,
    outcome: Result<(), StorageError>,
    kind: EntityKind,
) -> Result<(), ForumError>
where
    X: StoreTransaction,
{
    match outcome {
        Ok(()) => tx.commit().await.map_err(|e| {
            error!(table = kind.table(), error = %e, "Commit failed");
            ForumError::Storage(e)
        }),
        Err(e) => {
            if let Err(rollback) = tx.rollback().await {
                warn!(table = kind.table(), error = %rollback, "Rollback failed");
            }
            Err(ForumError::Storage(e))
        }
    }
}
