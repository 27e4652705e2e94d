//! HTTP handlers for role-service.

pub mod health;
pub mod role;

pub use health::*;
pub use role::*;
