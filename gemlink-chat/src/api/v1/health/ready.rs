use crate::server::ChatServer;
use actix_web::http::StatusCode;
use actix_web::{web, Responder};
use gemlink_core::response::respond_any;
use gemlink_core::HealthCheck;
use std::sync::Arc;

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(health_ready_handle)));
}

// 就绪探针 / Readiness probe
pub async fn health_ready_handle(server: web::Data<Arc<ChatServer>>) -> impl Responder {
    let status = server.check_health().await;
    let code = if status.healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    respond_any(code, status)
}
