//! # Section Service Module
//!
//! REST endpoints of the backend of record. Every route is scoped by the
//! section kind (`navbar`, `footer`, `carousel`, `testimonials`, `team`,
//! `newsletter`), which must match the `kind` of any JSON payload.
//!
//! ## Sub-modules:
//! - `create`: stores a new record, including its inline image uploads.
//! - `update`: overwrites an existing record.
//! - `get`: fetches one record by id.
//! - `find`: fetches the latest record saved under an identifier.
//! - `delete`: removes a record.
//! - `save`: checks and storage shared by `create` and `update`.

mod create;
mod delete;
mod find;
mod get;
mod save;
mod update;

use actix_web::web::{delete, get, post, put, scope};
use actix_web::Scope;
use common::model::section::SectionKind;

use crate::error::ServiceError;

/// The base path for all section endpoints.
const API_PATH: &str = "/api/sections";

/// Registered routes:
///
/// * **`POST /{kind}`**: `create::process`. Body `SaveSectionRequest`; answers
///   `201 Created` with `SaveSectionResponse` (record id and stored asset URLs).
/// * **`PUT /{kind}/{record_id}`**: `update::process`. Same body and answer;
///   `404` when the record does not exist.
/// * **`GET /{kind}/{record_id}`**: `get::process`, a `SectionRecord`.
/// * **`GET /{kind}?identifier=…`**: `find::process`, the latest `SectionRecord`
///   saved under that identifier.
/// * **`DELETE /{kind}/{record_id}`**: `delete::process`, `204` or `404`.
pub fn configure_routes() -> Scope {
    scope(API_PATH)
        .route("/{kind}", post().to(create::process))
        .route("/{kind}", get().to(find::process))
        .route("/{kind}/{record_id}", put().to(update::process))
        .route("/{kind}/{record_id}", get().to(get::process))
        .route("/{kind}/{record_id}", delete().to(delete::process))
}

fn parse_kind(raw: &str) -> Result<SectionKind, ServiceError> {
    raw.parse()
        .map_err(|_| ServiceError::NotFound(format!("section kind `{raw}`")))
}

#[cfg(test)]
mod tests;
