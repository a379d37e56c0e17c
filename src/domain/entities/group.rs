//! Group entity.
//!
//! Maps to the `groups` table; membership lives in `users_groups`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::domain::graph::{Entity, EntityKind, Relation, Value};

/// A named set of users, created by an author.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Group {
    pub id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,

    /// Group name, VARCHAR(64) NOT NULL
    pub name: String,

    /// Member users (many-to-many)
    #[serde(default)]
    pub users: Vec<User>,

    /// Authoring user (required)
    pub author_id: i64,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<Box<User>>,
}

impl Group {
    pub fn new(name: impl Into<String>, author_id: i64) -> Self {
        Self {
            name: name.into(),
            author_id,
            ..Self::default()
        }
    }
}

impl Default for Group {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            name: String::new(),
            users: Vec::new(),
            author_id: 0,
            author: None,
        }
    }
}

impl Entity for Group {
    const KIND: EntityKind = EntityKind::Group;
    const RELATIONS: &'static [Relation] = &[
        Relation::references("users", EntityKind::User),
        Relation::references("author", EntityKind::User),
    ];

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
            ("deleted_at", Value::NullableTimestamp(self.deleted_at)),
            ("name", Value::Text(self.name.clone())),
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
