//! Application Services
//!
//! Business logic services that coordinate domain operations.
//!
//! ## Available Services
//!
//! - **CreationService**: transactional creation of users, groups, topics,
//!   discussions, posts and emails

pub mod creation_service;

// Re-export creation service types
pub use creation_service::{CreationService, CreationServiceImpl, DEFAULT_BATCH_SIZE};
