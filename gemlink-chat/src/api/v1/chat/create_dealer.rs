use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct CreateDealerRequest {
    pub dealer_id: String,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(chat_create_dealer_handle)));
}

// 创建或复用经销商会话 / Create or reuse a dealer chat
pub async fn chat_create_dealer_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<CreateDealerRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    match service::rooms::create_dealer(&server, &user_id, &body.dealer_id).await {
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
