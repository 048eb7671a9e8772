//! Business logic services for the application layer.

pub mod edit_grant_service;
pub mod url_service;

pub use edit_grant_service::{EditGrant, EditGrantService};
pub use url_service::{DuplicatePolicy, EditCredential, EntryChanges, ShortenOutcome, UrlService};
