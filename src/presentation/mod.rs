//! Presentation Layer
//!
//! HTTP liveness surface. The forum API itself is served elsewhere and calls
//! into the creation service.

pub mod http;
