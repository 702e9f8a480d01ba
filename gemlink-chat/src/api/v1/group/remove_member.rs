use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct RemoveMemberRequest {
    pub target: ParticipantKey,
    #[serde(default)]
    pub reason: Option<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(group_remove_member_handle)));
}

// 管理员移除成员，移除前落审计 / Admin removes a member, audit lands first
pub async fn group_remove_member_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<RemoveMemberRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let body = body.into_inner();
    match service::membership::remove_member(
        &server,
        &path,
        &body.target,
        &user_id,
        false,
        body.reason,
    ) {
        Ok(()) => respond_any(
            StatusCode::OK,
            serde_json::json!({"removed": body.target.storage_key()}),
        ),
        Err(e) => e.respond(),
    }
}
