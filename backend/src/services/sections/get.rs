use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::SectionRecord;

use super::parse_kind;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

/// `GET /api/sections/{kind}/{record_id}`
pub async fn process(config: web::Data<Config>, path: web::Path<(String, String)>) -> impl Responder {
    let (kind, record_id) = path.into_inner();
    match get_section(&config, &kind, &record_id) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => e.error_response(),
    }
}

pub fn get_section(config: &Config, kind: &str, record_id: &str) -> Result<SectionRecord, ServiceError> {
    let kind = parse_kind(kind)?;
    let conn = db::open(&config.database)?;
    db::get(&conn, kind, record_id)?
        .ok_or_else(|| ServiceError::NotFound(format!("{kind} record {record_id}")))
}
