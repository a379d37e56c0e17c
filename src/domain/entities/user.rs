//! User entity.
//!
//! Maps to the `users` table in the database schema.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{Email, Group};
use crate::domain::graph::{Entity, EntityKind, Relation, Value};

/// Represents a forum account.
///
/// Maps to the `users` table:
/// - id: BIGSERIAL PRIMARY KEY
/// - created_at / updated_at: TIMESTAMPTZ NOT NULL
/// - deleted_at: TIMESTAMPTZ NULL (soft delete)
/// - user_name: VARCHAR(32) NOT NULL UNIQUE
/// - display_name: VARCHAR(32) NOT NULL
/// - password: VARCHAR(64) NOT NULL
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Generated primary key, zero until persisted
    pub id: i64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,

    /// Unique handle
    pub user_name: String,

    /// Defaults to `user_name` when left blank
    pub display_name: String,

    /// Password credential, stored as supplied
    #[serde(skip_serializing)]
    pub password: String,

    /// Addresses owned by this user, inserted with it
    #[serde(default)]
    pub emails: Vec<Email>,

    /// Groups this user belongs to (many-to-many, never inserted from here)
    #[serde(default)]
    pub groups: Vec<Group>,
}

impl User {
    /// Create an unsaved user with the given credentials.
    pub fn new(user_name: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            user_name: user_name.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Attach an address to be created along with this user.
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.emails.push(Email::new(email));
        self
    }

    /// Fill a blank display name with the user name.
    ///
    /// Returns `true` when the display name was defaulted.
    pub fn default_display_name(&mut self) -> bool {
        if self.display_name.is_empty() {
            self.display_name = self.user_name.clone();
            return true;
        }
        false
    }
}

impl Default for User {
    fn default() -> Self {
        let now = Utc::now();
        Self {
            id: 0,
            created_at: now,
            updated_at: now,
            deleted_at: None,
            user_name: String::new(),
            display_name: String::new(),
            password: String::new(),
            emails: Vec::new(),
            groups: Vec::new(),
        }
    }
}

impl Entity for User {
    const KIND: EntityKind = EntityKind::User;
    const RELATIONS: &'static [Relation] = &[
        Relation::owns("emails", EntityKind::Email),
        Relation::references("groups", EntityKind::Group),
    ];

    fn columns(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
            ("deleted_at", Value::NullableTimestamp(self.deleted_at)),
            ("user_name", Value::Text(self.user_name.clone())),
            ("display_name", Value::Text(self.display_name.clone())),
            ("password", Value::Text(self.password.clone())),
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
