//! Route table

use actix_web::web;

use super::handlers;
use crate::Error;

/// Register every endpoint and the extractor error handlers on `cfg`.
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.app_data(
        web::JsonConfig::default()
            .error_handler(|err, _req| Error::InvalidBody(err.to_string()).into()),
    )
    .app_data(
        web::QueryConfig::default()
            .error_handler(|err, _req| Error::InvalidBody(err.to_string()).into()),
    )
    .route("/details", web::get().to(handlers::details))
    .route("/insert-random-data", web::get().to(handlers::insert_random_data))
    .route("/beds", web::get().to(handlers::get_beds))
    .route("/patients", web::get().to(handlers::get_patients))
    .route("/medicines", web::get().to(handlers::get_medicines))
    .route("/meditags", web::get().to(handlers::get_meditags))
    .route("/history", web::get().to(handlers::get_history))
    .route("/set_bed", web::post().to(handlers::set_bed))
    .route("/set_patient", web::post().to(handlers::set_patient))
    .route("/set_medicine", web::post().to(handlers::set_medicine))
    .route("/add_patient", web::post().to(handlers::add_patient));
}
