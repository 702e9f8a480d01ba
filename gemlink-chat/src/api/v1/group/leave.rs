use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize, Default)]
pub struct LeaveRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(group_leave_handle)));
}

// 自行退群；唯一管理员需先移交 / Self-leave; a sole admin must hand over first
pub async fn group_leave_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<LeaveRequest>>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let reason = body.and_then(|b| b.into_inner().reason);
    let target = ParticipantKey::user(&user_id);
    match service::membership::remove_member(&server, &path, &target, &user_id, true, reason) {
        Ok(()) => respond_any(StatusCode::OK, serde_json::json!({"left": true})),
        Err(e) => e.respond(),
    }
}
