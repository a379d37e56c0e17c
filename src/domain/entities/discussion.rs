//! Discussion entity.
//!
//! Maps to the `discussions` table. A discussion is started by exactly one
//! opening post, which is created in the same transaction.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Post, Topic, User};
use crate::domain::graph::{Entity, EntityKind, Relation, Value};

/// A thread of posts under a topic.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Discussion {
    pub id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,

    pub title: String,

    /// Authoring user (required)
    pub author_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<User>>,

    /// Topic the discussion is filed under (required)
    pub topic_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub topic: Option<Box<Topic>>,

    /// The opening post at creation time
    #[serde(default)]
    pub posts: Vec<Post>,
}

impl Discussion {
    /// Create an unsaved discussion opened by `content`.
    pub fn new(
        title: impl Into<String>,
        author_id: i64,
        topic_id: i64,
        content: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            author_id,
            topic_id,
            posts: vec![Post {
                content: content.into(),
                ..Post::default()
            }],
            ..Self::default()
        }
    }
}

impl Default for Discussion {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            title: String::new(),
            author_id: 0,
            author: None,
            topic_id: 0,
            topic: None,
            posts: Vec::new(),
        }
    }
}

impl Entity for Discussion {
    const KIND: EntityKind = EntityKind::Discussion;
    const RELATIONS: &'static [Relation] = &[
        Relation::references("author", EntityKind::User),
        Relation::references("topic", EntityKind::Topic),
        Relation::owns("posts", EntityKind::Post),
    ];

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
            ("deleted_at", Value::NullableTimestamp(self.deleted_at)),
            ("title", Value::Text(self.title.clone())),
            ("author_id", Value::BigInt(self.author_id)),
            ("topic_id", Value::BigInt(self.topic_id)),
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
