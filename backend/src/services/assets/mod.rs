//! # Asset Service Module
//!
//! Stored images referenced from saved sections. Uploads arrive inline with a
//! section save (see `sections`); this scope only serves the stored files.

mod get;
pub mod store;

use actix_web::web::{get, scope};
use actix_web::Scope;

/// The base path for stored images.
pub const API_PATH: &str = "/api/assets";

/// Registered routes:
///
/// * **`GET /{file}`**: `get::process`, the stored image named by its MD5
///   digest and extension.
pub fn configure_routes() -> Scope {
    scope(API_PATH).route("/{file}", get().to(get::process))
}
