use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(group_settings_handle)));
}

// 群设置补丁，仅覆盖提供的键 / Group settings patch, provided keys only
pub async fn group_settings_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<service::membership::SettingsPatch>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    match service::membership::update_settings(&server, &path, &user_id, body.into_inner()) {
        Ok(settings) => respond_any(StatusCode::OK, settings),
        Err(e) => e.respond(),
    }
}
