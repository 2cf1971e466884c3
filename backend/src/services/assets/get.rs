use actix_files::NamedFile;
use actix_web::{web, HttpRequest, Responder, ResponseError};

use super::store::is_asset_name;
use crate::config::Config;
use crate::error::ServiceError;

/// `GET /api/assets/{file}`: serves a stored image.
pub async fn process(
    req: HttpRequest,
    config: web::Data<Config>,
    file: web::Path<String>,
) -> impl Responder {
    let name = file.into_inner();
    if !is_asset_name(&name) {
        return ServiceError::NotFound(format!("asset {name}")).error_response();
    }
    match NamedFile::open_async(config.asset_dir.join(&name)).await {
        Ok(file) => file.into_response(&req),
        Err(_) => ServiceError::NotFound(format!("asset {name}")).error_response(),
    }
}
