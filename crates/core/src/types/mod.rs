//! Core types for SnipVault.
//!
//! This module provides type-safe wrappers for common domain concepts.

pub mod email;
pub mod id;
pub mod tag_name;
pub mod username;

pub use email::{Email, EmailError};
pub use id::*;
pub use tag_name::{TagName, TagNameError};
pub use username::{Username, UsernameError};
