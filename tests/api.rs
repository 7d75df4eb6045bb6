//! HTTP-level checks that need no MySQL server: validation failures are
//! answered before a connection is requested, and the pool points at a
//! port nothing listens on.

use actix_web::http::StatusCode;
use actix_web::{test, web, App};
use healthdome::api::{self, AppState};
use healthdome::config::DatabaseConfig;
use healthdome::db::Database;
use serde_json::{json, Value};

fn unreachable_database() -> DatabaseConfig {
    DatabaseConfig {
        host: "127.0.0.1".to_string(),
        port: 1,
        user: "root".to_string(),
        password: "password".to_string(),
        name: "hospital_db".to_string(),
        max_connections: 1,
        acquire_timeout_secs: 1,
    }
}

macro_rules! app {
    () => {
        test::init_service(
            App::new()
                .app_data(web::Data::new(AppState {
                    db: Database::connect_lazy(&unreachable_database()),
                    hospital_name: "Test General".to_string(),
                }))
                .configure(api::configure),
        )
        .await
    };
}

async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
    let app = app!();
    let req = test::TestRequest::post().uri(uri).set_json(body).to_request();
    let resp = test::call_service(&app, req).await;
    let status = resp.status();
    (status, test::read_body_json(resp).await)
}

#[actix_rt::test]
async fn details_reports_the_hospital_name() {
    let app = app!();
    let req = test::TestRequest::get().uri("/details").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "hospital_name": "Test General" }));
}

#[actix_rt::test]
async fn set_bed_without_bed_id_is_rejected() {
    let (status, body) = post_json("/set_bed", json!({ "status": "Available" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("bedID"));
}

#[actix_rt::test]
async fn set_bed_with_zero_id_is_rejected() {
    let (status, _) = post_json("/set_bed", json!({ "bedID": 0, "Pid": 3 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn set_bed_without_any_field_is_rejected() {
    let (status, _) = post_json("/set_bed", json!({ "bedID": 2 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn set_medicine_with_nothing_to_change_is_rejected() {
    let (status, body) = post_json("/set_medicine", json!({ "MediID": 4 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({ "error": "No valid fields to update." }));
}

#[actix_rt::test]
async fn fractional_medicine_price_is_rejected() {
    let (status, body) = post_json("/set_medicine", json!({ "MediID": 2, "Price": 12.7 })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().starts_with("Invalid request body"));
}

#[actix_rt::test]
async fn add_patient_names_the_missing_field() {
    let (status, body) = post_json(
        "/add_patient",
        json!({ "Name": "Ravi Kumar", "Phone": "9876543210", "Age": 52 }),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().ends_with("Sex"));
}

#[actix_rt::test]
async fn unknown_filter_column_is_rejected() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/beds?filters=Colour%3DRed")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn malformed_json_is_rejected() {
    let app = app!();
    let req = test::TestRequest::post()
        .uri("/set_bed")
        .insert_header(("content-type", "application/json"))
        .set_payload("{\"bedID\": 3,")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn unreachable_database_is_a_server_error() {
    let (status, body) = post_json("/set_bed", json!({ "bedID": 3, "Pid": null })).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body,
        json!({ "error": "Unable to establish connection to the database." })
    );
}

#[actix_rt::test]
async fn reads_also_fail_cleanly_without_a_database() {
    let app = app!();
    let req = test::TestRequest::get()
        .uri("/beds?filters=bedID%3E0,bedID%3C4")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
}
