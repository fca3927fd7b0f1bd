use actix_web::{web, App, HttpServer};
use log::{error, info};

mod config;
mod error;
mod game;
mod models;
mod routes;
mod websocket;

use crate::config::ServerConfig;
use crate::models::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Initialize logger
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = match ServerConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return Err(std::io::Error::new(std::io::ErrorKind::InvalidInput, e));
        }
    };

    info!("Starting four-player chess clock at http://{}", config.bind);
    info!(
        "Default time control: {} min + {} s",
        config.default_match.minutes, config.default_match.increment_seconds
    );

    let bind = config.bind.clone();
    let static_dir = config.static_dir.clone();
    let app_state = web::Data::new(AppState::new(config));

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .configure(|cfg| routes::configure_routes(cfg, &static_dir))
    })
    .bind(bind)?
    .run()
    .await
}
