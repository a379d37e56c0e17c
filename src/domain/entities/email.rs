//! Email entity.
//!
//! Maps to the `emails` table. The address itself is the primary key.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::User;
use crate::domain::graph::{Entity, EntityKind, Relation, Value};

/// An email address belonging to exactly one user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Email {
    /// The address, VARCHAR(128) PRIMARY KEY
    pub email: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,

    /// Owning user (required)
    pub user_id: i64,

    /// Embedded owner, for convenience only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<Box<User>>,
}

impl Email {
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            ..Self::default()
        }
    }

    /// An address for an already persisted user.
    pub fn for_user(email: impl Into<String>, user_id: i64) -> Self {
        Self {
            user_id,
            ..Self::new(email)
        }
    }
}

impl Default for Email {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            email: String::new(),
            created_at: now,
            updated_at: now,
            deleted_at: None,
            user_id: 0,
            user: None,
        }
    }
}

impl Entity for Email {
    const KIND: EntityKind = EntityKind::Email;
    const RELATIONS: &'static [Relation] = &[Relation::references("user", EntityKind::User)];

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("email", Value::Text(self.email.clone())),
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
            ("deleted_at", Value::NullableTimestamp(self.deleted_at)),
            ("user_id", Value::BigInt(self.user_id)),
        ]
    }

    fn assign_id(&mut self, _id: i64) {}

    fn touch(&mut self, now: DateTime<Utc>) {
        self.created_at = now;
        self.updated_at = now;
    }
}
