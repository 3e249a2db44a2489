//! Business-logic services over the repositories.

pub mod auth;
