use actix_web::{web, HttpResponse, Responder, ResponseError};
use common::requests::{SaveSectionRequest, SaveSectionResponse};

use super::save::accept;
use crate::config::Config;
use crate::db;
use crate::error::ServiceError;

/// `POST /api/sections/{kind}`
pub async fn process(
    config: web::Data<Config>,
    kind: web::Path<String>,
    payload: web::Json<SaveSectionRequest>,
) -> impl Responder {
    match create_section(&config, &kind, payload.into_inner()) {
        Ok(response) => HttpResponse::Created().json(response),
        Err(e) => e.error_response(),
    }
}

pub fn create_section(
    config: &Config,
    kind: &str,
    request: SaveSectionRequest,
) -> Result<SaveSectionResponse, ServiceError> {
    let accepted = accept(config, kind, request)?;
    let conn = db::open(&config.database)?;
    let record = db::insert(&conn, accepted.kind, &accepted.identifier, &accepted.fields)?;
    log::info!(
        "created {} `{}` as {}",
        record.kind,
        record.identifier,
        record.record_id
    );
    Ok(SaveSectionResponse {
        record_id: record.record_id,
        asset_urls: accepted.asset_urls,
    })
}
