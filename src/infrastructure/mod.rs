//! Infrastructure Layer
//!
//! Contains implementations for external services:
//! - PostgreSQL connection pool and transactional store

pub mod database;
