//! Domain entities.

pub mod url_entry;

pub use url_entry::{NewUrlEntry, UrlEntry};
