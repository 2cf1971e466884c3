use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::{SaveSectionRequest, SaveSectionResponse};

use super::parse_kind;
use super::save::accept;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

/// `PUT /api/sections/{kind}/{record_id}`
pub async fn process(
    config: web::Data<Config>,
    path: web::Path<(String, String)>,
    payload: web::Json<SaveSectionRequest>,
) -> impl Responder {
    let (kind, record_id) = path.into_inner();
    match update_section(&config, &kind, &record_id, payload.into_inner()) {
        Ok(response) => HttpResponse::Ok().json(response),
        Err(e) => e.error_response(),
    }
}

pub fn update_section(
    config: &Config,
    kind: &str,
    record_id: &str,
    request: SaveSectionRequest,
) -> Result<SaveSectionResponse, ServiceError> {
    let kind = parse_kind(kind)?;
    let conn = db::open(&config.database)?;
    if db::get(&conn, kind, record_id)?.is_none() {
        return Err(ServiceError::NotFound(format!("{kind} record {record_id}")));
    }

    let accepted = accept(config, kind.as_str(), request)?;
    let record = db::update(
        &conn,
        accepted.kind,
        record_id,
        &accepted.identifier,
        &accepted.fields,
    )?
    .ok_or_else(|| ServiceError::NotFound(format!("{} record {record_id}", accepted.kind)))?;
    log::info!("updated {} `{}` ({})", record.kind, record.identifier, record.record_id);
    Ok(SaveSectionResponse {
        record_id: record.record_id,
        asset_urls: accepted.asset_urls,
    })
}
