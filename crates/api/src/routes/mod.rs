//! HTTP route handlers.
//!
//! # Route Table
//!
//! | Method | Path | Auth | Description |
//! |--------|------|------|-------------|
//! | POST | `/auth/signup` | - | Register a new account |
//! | POST | `/auth/login` | - | Exchange credentials for a bearer token |
//! | GET | `/users/me` | bearer | Current user |
//! | GET | `/snippets/` | bearer | List own snippets (filterable) |
//! | POST | `/snippets/` | bearer | Create a snippet |
//! | GET | `/snippets/{id}` | bearer | Fetch an owned snippet |
//! | PUT | `/snippets/{id}` | bearer | Partially update an owned snippet |
//! | PATCH | `/snippets/{id}/toggle-public` | bearer | Flip visibility |
//! | DELETE | `/snippets/{id}` | bearer | Delete an owned snippet |
//! | GET | `/public/snippets/` | - | List public snippets (filterable) |
//! | GET | `/public/snippets/{id}` | - | Fetch a public snippet |
//! | GET | `/tags/` | - | List all tags |
//! | POST | `/tags/` | bearer | Create a tag |

pub mod auth;
pub mod params;
pub mod public;
pub mod snippets;
pub mod tags;
pub mod users;

use axum::Router;

use crate::state::AppState;

/// Build the application router with all API routes.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(auth::router())
        .merge(users::router())
        .merge(snippets::router())
        .merge(public::router())
        .merge(tags::router())
}
