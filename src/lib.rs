//! # Forum Server Library
//!
//! A forum backend whose users, groups, topics, discussions, posts and emails
//! are stored in PostgreSQL. The core is a transactional creation protocol:
//! candidates are validated before any storage access, a root entity and the
//! children it owns are written in one transaction, referenced entities are
//! never re-inserted, and any storage failure rolls the whole unit back.
//!
//! ## Module Structure
//!
//! ```text
//! forum_server/
//! +-- config/         Configuration management
//! +-- domain/         Entities, relation tags, validation rules, store traits
//! +-- application/    Creation service
//! +-- infrastructure/ PostgreSQL store
//! +-- presentation/   HTTP liveness routes
//! +-- shared/         Error types
//! ```

// Configuration module
pub mod config;

// Domain layer - Core business logic
pub mod domain;

// Application layer - Business services
pub mod application;

// Infrastructure layer - External implementations
pub mod infrastructure;

// Presentation layer - HTTP handlers
pub mod presentation;

// Shared utilities
pub mod shared;

// Application startup
pub mod startup;

// Telemetry and observability
pub mod telemetry;
