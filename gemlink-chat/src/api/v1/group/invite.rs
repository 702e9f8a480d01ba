use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize, Default)]
pub struct CreateInviteRequest {
    #[serde(default)]
    pub ttl_hours: Option<i64>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(group_invite_handle)));
}

// 发放群邀请码 / Issue a group invite code
pub async fn group_invite_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<CreateInviteRequest>>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let ttl_hours = body.and_then(|b| b.ttl_hours);
    match service::membership::create_invite(&server, &path, &user_id, ttl_hours) {
        Ok(invite) => respond_any(StatusCode::CREATED, invite),
        Err(e) => e.respond(),
    }
}
