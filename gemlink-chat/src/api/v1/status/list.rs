use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(status_list_handle)));
}

// 查看者可见的动态，最新在前 / Statuses visible to the viewer, newest first
pub async fn status_list_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let statuses = service::status::list_visible(&server, &user_id);
    respond_any(StatusCode::OK, serde_json::json!({"statuses": statuses}))
}
