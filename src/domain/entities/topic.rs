//! Topic entity.
//!
//! Maps to the `topics` table. Topics form a tree through `parent_id`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::domain::graph::{Entity, EntityKind, Relation, Value};

/// A titled subject area that discussions are filed under.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Topic {
    pub id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,

    /// Globally unique title, VARCHAR(96)
    pub title: String,

    /// Parent topic, NULL for a root topic
    pub parent_id: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent: Option<Box<Topic>>,

    /// Authoring user (required)
    pub author_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<User>>,
}

impl Topic {
    pub fn new(title: impl Into<String>, author_id: i64) -> Self {
        Self {
            title: title.into(),
            author_id,
            ..Self::default()
        }
    }

    /// File this topic under an existing one.
    pub fn under(mut self, parent_id: i64) -> Self {
        self.parent_id = Some(parent_id);
        self
    }
}

impl Default for Topic {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            title: String::new(),
            parent_id: None,
            parent: None,
            author_id: 0,
            author: None,
        }
    }
}

impl Entity for Topic {
    const KIND: EntityKind = EntityKind::Topic;
    const RELATIONS: &'static [Relation] = &[
        Relation::references("parent", EntityKind::Topic),
        Relation::references("author", EntityKind::User),
    ];

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
            ("deleted_at", Value::NullableTimestamp(self.deleted_at)),
            ("title", Value::Text(self.title.clone())),
            ("parent_id", Value::NullableBigInt(self.parent_id)),
            ("author_id", Value::BigInt(self.author_id)),
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
