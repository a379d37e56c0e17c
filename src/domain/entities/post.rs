//! Post entity.
//!
//! Maps to the `posts` table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Discussion, User};
use crate::domain::graph::{Entity, EntityKind, Relation, Value};

/// A single message inside a discussion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,

    /// Body text, VARCHAR(4096) NOT NULL
    pub content: String,

    /// Authoring user (required)
    pub author_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<User>>,

    /// Containing discussion (required)
    pub discussion_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub discussion: Option<Box<Discussion>>,
}

impl Post {
    pub fn new(content: impl Into<String>, author_id: i64, discussion_id: i64) -> Self {
        Self {
            content: content.into(),
            author_id,
            discussion_id,
            ..Self::default()
        }
    }
}

impl Default for Post {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            content: String::new(),
            author_id: 0,
            author: None,
            discussion_id: 0,
            discussion: None,
        }
    }
}

impl Entity for Post {
    const KIND: EntityKind = EntityKind::Post;
    const RELATIONS: &'static [Relation] = &[
        Relation::references("author", EntityKind::User),
        Relation::references("discussion", EntityKind::Discussion),
    ];

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
            ("deleted_at", Value::NullableTimestamp(self.deleted_at)),
            ("content", Value::Text(self.content.clone())),
            ("author_id", Value::BigInt(self.author_id)),
            ("discussion_id", Value::BigInt(self.discussion_id)),
        ]
    }

    fn assign_id(&mut self, id: i64) {
        self.id = id;
    }

    fn touch(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }
}
