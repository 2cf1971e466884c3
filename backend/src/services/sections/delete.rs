use actix_web::{web, HttpResponse, Responder, ResponseError};

use super::parse_kind;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

/// `DELETE /api/sections/{kind}/{record_id}`
///
/// Stored images are kept: other records may point at the same file.
pub async fn process(config: web::Data<Config>, path: web::Path<(String, String)>) -> impl Responder {
    let (kind, record_id) = path.into_inner();
    match delete_section(&config, &kind, &record_id) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => e.error_response(),
    }
}

pub fn delete_section(config: &Config, kind: &str, record_id: &str) -> Result<(), ServiceError> {
    let kind = parse_kind(kind)?;
    let conn = db::open(&config.database)?;
    if !db::delete(&conn, kind, record_id)? {
        return Err(ServiceError::NotFound(format!("{kind} record {record_id}")));
    }
    log::info!("deleted {kind} record {record_id}");
    Ok(())
}
