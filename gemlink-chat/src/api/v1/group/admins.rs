use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct GrantAdminsRequest {
    pub admin_ids: Vec<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(group_admins_handle)));
}

// 授予管理员，操作者被强制保留 / Grant admins, the actor is force-retained
pub async fn group_admins_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<GrantAdminsRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    match service::membership::grant_admins(&server, &path, &user_id, body.into_inner().admin_ids)
    {
        Ok(admins) => respond_any(StatusCode::OK, serde_json::json!({"group_admins": admins})),
        Err(e) => e.respond(),
    }
}
