mod artifacts;
mod config;
mod error;
mod pipeline;
mod render;
mod routes;

use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use artifacts::cache::ArtifactCache;
use config::AppConfig;
use routes::configure_routes;
use std::env;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));
    dotenv::dotenv().ok();

    if let Ok(current_dir) = env::current_dir() {
        log::info!("Current working directory: {}", current_dir.display());
    } else {
        log::error!("Failed to get the current working directory.");
    }

    let config = AppConfig::load().map_err(|e| {
        log::error!("Failed to load configuration: {}", e);
        std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
    })?;

    // A bad artifact set keeps the server up so the dashboard can say why.
    let cache = web::Data::new(ArtifactCache::new(config.pipeline.clone()));
    if let Err(e) = cache.get().await {
        log::warn!("Serving without a model: {}", e);
    }

    let frontend_dir = config.frontend_dir.clone();
    let bind_address = config.bind_address();
    log::info!("Serving frontend from {}", frontend_dir.display());
    log::info!("Starting server on {}", bind_address);

    HttpServer::new(move || {
        App::new()
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allowed_methods(vec!["GET", "POST", "OPTIONS"])
                    .allowed_headers(vec![
                        actix_web::http::header::ACCEPT,
                        actix_web::http::header::CONTENT_TYPE,
                    ])
                    .max_age(3600),
            )
            .app_data(cache.clone())
            .configure(|cfg| configure_routes(cfg, frontend_dir.clone()))
    })
    .bind(&bind_address)?
    .run()
    .await
}
