use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(chat_clear_handle)));
}

// 仅对调用者清空历史 / Clear history for the caller only
pub async fn chat_clear_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let viewer = ParticipantKey::user(&user_id);
    match service::rooms::clear_history(&server, &path, &viewer) {
        Ok(cleared) => respond_any(
            StatusCode::OK,
            serde_json::json!({"chat_id": path.into_inner(), "cleared": cleared}),
        ),
        Err(e) => e.respond(),
    }
}
