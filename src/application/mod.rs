//! Application Layer
//!
//! Contains the services that orchestrate domain rules and storage.

pub mod services;
