//! Creation rules.
//!
//! One function per entity kind. Checks run in a fixed order and the first
//! violation is returned; nothing here touches storage.

use super::entities::{Discussion, Email, Group, Post, Topic, User};
use crate::shared::error::ValidationError;

/// Check a user and default its display name.
///
/// Order: user name, password. A blank display name is filled from the user
/// name only once both checks pass.
pub fn validate_user(user: &mut User) -> Result<(), ValidationError> {
    if user.user_name.is_empty() {
        return Err(ValidationError::EmptyUserName);
    }
    if user.password.is_empty() {
        return Err(ValidationError::EmptyPassword);
    }
    if user.default_display_name() {
        tracing::warn!(user_name = %user.user_name, "Display name empty, defaulting to user name");
    }
    Ok(())
}

pub fn validate_group(group: &Group) -> Result<(), ValidationError> {
    if group.name.is_empty() {
        return Err(ValidationError::EmptyName);
    }
    require_user(group.author_id)
}

pub fn validate_topic(topic: &Topic) -> Result<(), ValidationError> {
    if topic.title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    require_user(topic.author_id)
}

/// Order: title, author, topic, then exactly one opening post.
pub fn validate_discussion(discussion: &Discussion) -> Result<(), ValidationError> {
    if discussion.title.is_empty() {
        return Err(ValidationError::EmptyTitle);
    }
    require_user(discussion.author_id)?;
    if discussion.topic_id == 0 {
        return Err(ValidationError::EmptyTopicId);
    }
    if discussion.posts.len() != 1 {
        return Err(ValidationError::DiscussionWithoutSinglePost);
    }
    Ok(())
}

pub fn validate_post(post: &Post) -> Result<(), ValidationError> {
    if post.content.is_empty() {
        return Err(ValidationError::EmptyContent);
    }
    require_user(post.author_id)?;
    if post.discussion_id == 0 {
        return Err(ValidationError::EmptyDiscussionId);
    }
    Ok(())
}

pub fn validate_email(email: &Email) -> Result<(), ValidationError> {
    require_user(email.user_id)
}

fn require_user(id: i64) -> Result<(), ValidationError> {
    if id == 0 {
        return Err(ValidationError::EmptyUserId);
    }
    Ok(())
}
