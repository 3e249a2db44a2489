//! Domain models backed by database rows.

pub mod snippet;
pub mod tag;
pub mod user;

pub use snippet::{Snippet, SnippetWithTags};
pub use tag::Tag;
pub use user::User;
