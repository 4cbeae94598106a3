use actix_files::Files;
use actix_web::{error, web, HttpResponse};
use lazy_static::lazy_static;
use log::{info, warn};
use shared::form::{self, FormSchema};
use shared::{ErrorKind, ErrorResponse, FeatureRecord, StatusResponse};
use std::path::PathBuf;

use crate::artifacts::cache::ArtifactCache;
use crate::error::PredictionError;
use crate::render::render;

lazy_static! {
    static ref FORM_SCHEMA: FormSchema = form::form_schema();
}

/// JSON API only. Split out so handler tests don't need a frontend build.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    let json_config = web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: format!("Invalid input: {}", err),
            kind: ErrorKind::InvalidInput,
        });
        error::InternalError::from_response(err, response).into()
    });

    cfg.app_data(json_config)
        .service(web::resource("/api/status").route(web::get().to(status)))
        .service(web::resource("/api/form").route(web::get().to(form_schema)))
        .service(web::resource("/api/predict").route(web::post().to(predict)));
}

pub fn configure_routes(cfg: &mut web::ServiceConfig, frontend_dir: PathBuf) {
    configure_api(cfg);
    cfg.service(Files::new("/", frontend_dir).index_file("index.html"));
}

async fn status(cache: web::Data<ArtifactCache>) -> HttpResponse {
    let response = match cache.get().await {
        Ok(pipeline) => StatusResponse {
            ready: true,
            profile: pipeline.profile(),
            error: None,
            error_kind: None,
            artifact_digest: Some(pipeline.digest().to_string()),
            classes: pipeline.classes().to_vec(),
        },
        Err(e) => {
            let err = PredictionError::from(e);
            StatusResponse {
                ready: false,
                profile: cache.profile(),
                error: Some(err.to_string()),
                error_kind: Some(err.kind()),
                artifact_digest: None,
                classes: Vec::new(),
            }
        }
    };
    HttpResponse::Ok().json(response)
}

async fn form_schema() -> HttpResponse {
    HttpResponse::Ok().json(&*FORM_SCHEMA)
}

async fn predict(
    cache: web::Data<ArtifactCache>,
    record: web::Json<FeatureRecord>,
) -> Result<HttpResponse, PredictionError> {
    let pipeline = cache.get().await?;
    let record = record.into_inner();

    let prediction = pipeline.predict(&record).map_err(|e| {
        warn!("Prediction rejected: {}", e);
        e
    })?;
    info!(
        "Predicted {} ({:.3}) with {:?} pipeline",
        prediction.label,
        prediction.confidence(),
        pipeline.profile()
    );

    Ok(HttpResponse::Ok().json(render(&prediction, pipeline.profile())))
}
