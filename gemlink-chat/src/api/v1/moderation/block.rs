use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct BlockRequest {
    pub blocked_id: String,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(moderation_block_handle)));
}

// 拉黑用户 / Block a user
pub async fn moderation_block_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<BlockRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    match service::moderation::block_user(&server, &user_id, &body.blocked_id) {
        Ok(record) => respond_any(StatusCode::CREATED, record),
        Err(e) => e.respond(),
    }
}
