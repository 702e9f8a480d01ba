use actix_web::http::StatusCode;
use actix_web::{web, Responder};
use gemlink_core::response::respond_any;

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(health_live_handle)));
}

// 存活探针 / Liveness probe
pub async fn health_live_handle() -> impl Responder {
    respond_any(
        StatusCode::OK,
        serde_json::json!({"status": "alive", "timestamp": chrono::Utc::now()}),
    )
}
