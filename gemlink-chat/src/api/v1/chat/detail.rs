use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(chat_detail_handle)));
}

// 单个会话详情 / Single chat detail
pub async fn chat_detail_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let viewer = ParticipantKey::user(&user_id);
    match service::rooms::room_detail(&server, &path, &viewer).await {
        Ok(view) => respond_any(StatusCode::OK, view),
        Err(e) => e.respond(),
    }
}
