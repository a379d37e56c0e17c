//! # Domain Layer
//!
//! The domain layer contains the forum's entities, the rules a candidate must
//! satisfy before it may be stored, and the storage contract the creation
//! protocol is written against.
//!
//! ## Structure
//!
//! - **entities**: User, Email, Group, Topic, Discussion, Post
//! - **graph**: entity kinds, relation tags and insert rows
//! - **validation**: per-kind required-field rules
//! - **store**: transactional storage traits
//!
//! Nothing here depends on the infrastructure or presentation layers.

pub mod entities;
pub mod graph;
pub mod store;
pub mod validation;

// Re-export commonly used types
pub use entities::*;
pub use graph::{Entity, EntityKind, KeyKind, Relation, RelationKind, Row, Value};
pub use store::{Store, StoreTransaction};
