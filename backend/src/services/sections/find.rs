use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::{IdentifierQuery, SectionRecord};

use super::parse_kind;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

/// `GET /api/sections/{kind}?identifier=…`
pub async fn process(
    config: web::Data<Config>,
    kind: web::Path<String>,
    query: web::Query<IdentifierQuery>,
) -> impl Responder {
    match find_section(&config, &kind, &query.identifier) {
        Ok(record) => HttpResponse::Ok().json(record),
        Err(e) => e.error_response(),
    }
}

pub fn find_section(config: &Config, kind: &str, identifier: &str) -> Result<SectionRecord, ServiceError> {
    let kind = parse_kind(kind)?;
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err(ServiceError::Validation("identifier is required".to_string()));
    }
    let conn = db::open(&config.database)?;
    db::find_by_identifier(&conn, kind, identifier)?
        .ok_or_else(|| ServiceError::NotFound(format!("{kind} `{identifier}`")))
}
