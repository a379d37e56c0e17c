//! # Domain Entities
//!
//! Core forum entities. Every entity maps directly to its database table and
//! carries `created_at`, `updated_at` and a nullable `deleted_at` for soft
//! deletion.
//!
//! ## Ownership
//!
//! - **User** owns its **Email**s; its **Group**s are references.
//! - **Discussion** owns its opening **Post**; its author and topic are references.
//! - **Group**, **Topic**, **Post** and **Email** own nothing.
//!
//! The roles are declared per field in each entity's `RELATIONS` table.

mod discussion;
mod email;
mod group;
mod post;
mod topic;
mod user;

pub use discussion::Discussion;
pub use email::Email;
pub use group::Group;
pub use post::Post;
pub use topic::Topic;
pub use user::User;
