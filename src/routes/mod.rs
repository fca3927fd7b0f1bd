use actix_files as fs;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::models::AppState;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct StatusResponse {
    pub version: String,
    pub sessions: usize,
    pub oldest_session: Option<String>,
}

/// HTTP handler for the index page
pub async fn index(req: HttpRequest, app_state: web::Data<AppState>) -> HttpResponse {
    let path = app_state.config.static_dir.join("index.html");
    match fs::NamedFile::open_async(&path).await {
        Ok(file) => file.into_response(&req),
        Err(e) => {
            warn!("Could not open {}: {}", path.display(), e);
            HttpResponse::Ok().body("Four-player chess clock")
        }
    }
}

pub async fn status(app_state: web::Data<AppState>) -> impl Responder {
    web::Json(StatusResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        sessions: app_state.session_count(),
        oldest_session: app_state.oldest_session().map(|t| t.to_rfc3339()),
    })
}

/// Configure the HTTP routes
pub fn configure_routes(cfg: &mut web::ServiceConfig, static_dir: &std::path::Path) {
    cfg.service(web::resource("/ws").route(web::get().to(crate::websocket::ws_index)))
        .service(web::resource("/status").route(web::get().to(status)))
        .service(web::resource("/").route(web::get().to(index)))
        .service(fs::Files::new("/static", static_dir));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use actix_web::{test, App};

    fn app_state() -> web::Data<AppState> {
        web::Data::new(AppState::new(ServerConfig {
            static_dir: "./does-not-exist".into(),
            ..ServerConfig::default()
        }))
    }

    #[actix_rt::test]
    async fn test_status_reports_sessions() {
        let state = app_state();
        state.register("session-1".to_string());
        let static_dir = state.config.static_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(|cfg| configure_routes(cfg, &static_dir)),
        )
        .await;

        let req = test::TestRequest::get().uri("/status").to_request();
        let body: StatusResponse = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body.sessions, 1);
        assert_eq!(body.version, env!("CARGO_PKG_VERSION"));
        assert!(body.oldest_session.is_some());
    }

    #[actix_rt::test]
    async fn test_index_falls_back_without_static_files() {
        let state = app_state();
        let static_dir = state.config.static_dir.clone();
        let app = test::init_service(
            App::new()
                .app_data(state.clone())
                .configure(|cfg| configure_routes(cfg, &static_dir)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        let body = test::read_body(resp).await;
        assert_eq!(body, "Four-player chess clock");
    }
}
