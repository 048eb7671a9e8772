//! Data Transfer Objects for API requests and responses.
//!
//! All DTOs use Serde for JSON serialization/deserialization and validator
//! for input validation.

pub mod entry;
pub mod health;
pub mod login;
pub mod modify;
pub mod shorten;
