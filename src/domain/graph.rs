//! Entity graph model.
//!
//! Every entity kind declares its relation fields up front, each tagged as
//! either an ownership (cascaded insert) or a reference (foreign key only).
//! Rows handed to the store carry scalar columns exclusively, so an embedded
//! reference object can never turn into an insert of its own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The six persisted entity kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    User,
    Email,
    Group,
    Topic,
    Discussion,
    Post,
}

impl EntityKind {
    /// All kinds, in migration order.
    pub const ALL: [EntityKind; 6] = [
        Self::User,
        Self::Email,
        Self::Group,
        Self::Topic,
        Self::Discussion,
        Self::Post,
    ];

    /// Backing table name.
    pub fn table(&self) -> &'static str {
        match self {
            Self::User => "users",
            Self::Email => "emails",
            Self::Group => "groups",
            Self::Topic => "topics",
            Self::Discussion => "discussions",
            Self::Post => "posts",
        }
    }

    /// How the primary key of this kind is produced.
    pub fn key(&self) -> KeyKind {
        match self {
            // The address itself is the key.
            Self::Email => KeyKind::Natural,
            _ => KeyKind::Generated,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.table())
    }
}

/// Primary key strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyKind {
    /// `id BIGSERIAL`, returned by the store after insert.
    Generated,
    /// Supplied by the caller as part of the row.
    Natural,
}

/// Relationship role of an entity field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelationKind {
    /// The children are inserted by the owner's creation transaction.
    Owns,
    /// Points at a row that must already exist; only the scalar key is written.
    References,
}

/// A relation field declared on an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Relation {
    pub field: &'static str,
    pub target: EntityKind,
    pub kind: RelationKind,
}

impl Relation {
    pub const fn owns(field: &'static str, target: EntityKind) -> Self {
        Self {
            field,
            target,
            kind: RelationKind::Owns,
        }
    }

    pub const fn references(field: &'static str, target: EntityKind) -> Self {
        Self {
            field,
            target,
            kind: RelationKind::References,
        }
    }
}

/// A scalar column value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    BigInt(i64),
    NullableBigInt(Option<i64>),
    Text(String),
    Timestamp(DateTime<Utc>),
    NullableTimestamp(Option<DateTime<Utc>>),
}

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(
            self,
            Self::NullableBigInt(None) | Self::NullableTimestamp(None)
        )
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::BigInt(v) => Some(*v),
            Self::NullableBigInt(v) => *v,
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(v) => Some(v),
            _ => None,
        }
    }
}

/// One row ready for insertion.
///
/// `excluded` names the relation fields left out of the statement. It is
/// informational: the columns never contain relation data in the first place.
#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub kind: EntityKind,
    pub columns: Vec<(&'static str, Value)>,
    pub excluded: Vec<&'static str>,
}

impl Row {
    pub fn table(&self) -> &'static str {
        self.kind.table()
    }

    pub fn has_generated_key(&self) -> bool {
        self.kind.key() == KeyKind::Generated
    }

    pub fn column_names(&self) -> Vec<&'static str> {
        self.columns.iter().map(|(name, _)| *name).collect()
    }

    /// Look up a column value by name.
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns
            .iter()
            .find(|(name, _)| *name == column)
            .map(|(_, value)| value)
    }
}

/// A persistable entity.
pub trait Entity: Send {
    const KIND: EntityKind;

    /// Relation fields, tagged by role.
    const RELATIONS: &'static [Relation];

    /// Scalar columns in schema order.
    fn columns(&self) -> Vec<(&'static str, Value)>;

    /// Record the key generated by the store. Natural-key kinds ignore it.
    fn assign_id(&mut self, id: i64);

    /// Set creation and update timestamps.
    fn touch(&mut self, now: DateTime<Utc>);

    /// Build the insert row, excluding every relation field.
    fn row(&self) -> Row {
        Row {
            kind: Self::KIND,
            columns: self.columns(),
            excluded: Self::RELATIONS.iter().map(|r| r.field).collect(),
        }
    }

    /// Whether `field` is declared as owning children of kind `target`.
    ///
    /// Only owned children are inserted along with this entity; anything
    /// else on the entity is a reference and is never written.
    fn owns(field: &str, target: EntityKind) -> bool {
        Self::RELATIONS
            .iter()
            .any(|r| r.field == field && r.target == target && r.kind == RelationKind::Owns)
    }
}
