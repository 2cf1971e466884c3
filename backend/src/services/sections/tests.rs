use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use common::model::section::SectionKind;
use common::requests::{AssetUpload, ErrorBody, SaveSectionRequest, SaveSectionResponse, SectionRecord};
use serde_json::json;

use crate::config::Config;
use crate::services;

fn request(kind: SectionKind, identifier: &str, fields: serde_json::Value) -> SaveSectionRequest {
    SaveSectionRequest {
        kind,
        identifier: identifier.to_string(),
        fields,
        assets: Vec::new(),
    }
}

macro_rules! app {
    ($config:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($config.clone()))
                .service(services::sections::configure_routes())
                .service(services::assets::configure_routes()),
        )
        .await
    };
}

#[actix_web::test]
async fn create_get_find_and_delete() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_tests(dir.path());
    let app = app!(config);

    let req = test::TestRequest::post()
        .uri("/api/sections/team")
        .set_json(request(SectionKind::Team, "site-1", json!({ "title": "Spring Sale" })))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: SaveSectionResponse = test::read_body_json(resp).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/sections/team/{}", created.record_id))
        .to_request();
    let record: SectionRecord = test::call_and_read_body_json(&app, req).await;
    assert_eq!(record.identifier, "site-1");
    assert_eq!(record.fields["title"], "Spring Sale");

    let req = test::TestRequest::get()
        .uri("/api/sections/team?identifier=site-1")
        .to_request();
    let found: SectionRecord = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found.record_id, created.record_id);

    let uri = format!("/api/sections/team/{}", created.record_id);
    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
    let resp = test::call_service(&app, test::TestRequest::delete().uri(&uri).to_request()).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_of_a_missing_record_is_not_found() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_tests(dir.path());
    let app = app!(config);

    let req = test::TestRequest::put()
        .uri("/api/sections/team/nope")
        .set_json(request(SectionKind::Team, "site-1", json!({})))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn update_of_a_missing_record_stores_no_uploads() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_tests(dir.path());
    let app = app!(config);

    let mut payload = request(
        SectionKind::Carousel,
        "home",
        json!({ "slides": [{ "id": "s1", "image": "" }] }),
    );
    payload.assets.push(AssetUpload {
        path: "slides[#s1].image".to_string(),
        content_type: "image/png".to_string(),
        data: "aGVsbG8=".to_string(),
    });
    let req = test::TestRequest::put()
        .uri("/api/sections/carousel/nope")
        .set_json(&payload)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let stored = std::fs::read_dir(&config.asset_dir).map(|entries| entries.count()).unwrap_or(0);
    assert_eq!(stored, 0);
}

#[actix_web::test]
async fn invalid_payloads_are_rejected_with_a_message() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_tests(dir.path());
    let app = app!(config);

    let req = test::TestRequest::post()
        .uri("/api/sections/footer")
        .set_json(request(SectionKind::Footer, "Main Footer", json!({})))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: ErrorBody = test::read_body_json(resp).await;
    assert!(body.message.contains("Footer slug"));

    let req = test::TestRequest::post()
        .uri("/api/sections/navbar")
        .set_json(request(SectionKind::Footer, "main-footer", json!({})))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let req = test::TestRequest::get().uri("/api/sections/sidebar/1").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn uploads_are_stored_and_served() {
    let dir = tempfile::tempdir().unwrap();
    let config = Config::for_tests(dir.path());
    let app = app!(config);

    let mut payload = request(
        SectionKind::Carousel,
        "home",
        json!({ "slides": [{ "id": "s1", "title": "Spring", "image": "" }] }),
    );
    payload.assets.push(AssetUpload {
        path: "slides[#s1].image".to_string(),
        content_type: "image/png".to_string(),
        data: "aGVsbG8=".to_string(),
    });
    let req = test::TestRequest::post()
        .uri("/api/sections/carousel")
        .set_json(&payload)
        .to_request();
    let created: SaveSectionResponse = test::call_and_read_body_json(&app, req).await;
    let url = created.asset_urls["slides[#s1].image"].clone();
    assert!(url.starts_with("/api/assets/"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/sections/carousel/{}", created.record_id))
        .to_request();
    let record: SectionRecord = test::call_and_read_body_json(&app, req).await;
    assert_eq!(record.fields["slides"][0]["image"], url.as_str());

    let body = test::call_and_read_body(&app, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(body.as_ref(), b"hello");

    let req = test::TestRequest::get().uri("/api/assets/sections.sqlite").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
