use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct CreateDirectRequest {
    pub other_user_id: String,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(chat_create_direct_handle)));
}

// 创建或复用直聊 / Create or reuse a direct chat
pub async fn chat_create_direct_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<CreateDirectRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    match service::rooms::create_direct(&server, &user_id, &body.other_user_id) {
        Ok((room, created)) => {
            let code = if created {
                StatusCode::CREATED
            } else {
                StatusCode::OK
            };
            respond_any(code, room)
        }
        Err(e) => e.respond(),
    }
}
