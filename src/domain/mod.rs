//! Domain layer: entities and repository contracts.
//!
//! Nothing here depends on HTTP or on a concrete database.

pub mod entities;
pub mod repositories;
