use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use crate::store::RedeemOutcome;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct JoinRequest {
    pub code: String,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(group_join_handle)));
}

// 凭邀请码入群，单次兑换 / Join via invite code, single redemption
pub async fn group_join_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<JoinRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    match service::membership::redeem_invite(&server, &body.code, &user_id) {
        Ok(RedeemOutcome::Joined(room)) => respond_any(
            StatusCode::OK,
            serde_json::json!({"joined": true, "chat": room}),
        ),
        Ok(RedeemOutcome::AlreadyMember(room)) => respond_any(
            StatusCode::OK,
            serde_json::json!({"joined": false, "already_member": true, "chat": room}),
        ),
        Err(e) => e.respond(),
    }
}
