use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct AddMembersRequest {
    pub members: Vec<ParticipantKey>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(group_add_members_handle)));
}

// 批量加人，已在群内的静默跳过 / Bulk add, existing members silently skipped
pub async fn group_add_members_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<AddMembersRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    match service::membership::add_members(&server, &path, &user_id, body.into_inner().members) {
        Ok(added) => respond_any(StatusCode::OK, serde_json::json!({"added": added})),
        Err(e) => e.respond(),
    }
}
