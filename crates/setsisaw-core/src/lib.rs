//! setsisaw Core Library
//!
//! Shared types for setsisaw.
//!
//! # Modules
//!
//! - [`ids`] - Strongly typed identifiers (UserId)
//! - [`role`] - The ordered role hierarchy (Role)

pub mod ids;
pub mod role;

pub use ids::UserId;
pub use role::{ParseRoleError, Role};
