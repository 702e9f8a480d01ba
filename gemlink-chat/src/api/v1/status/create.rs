use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct CreateStatusRequest {
    pub content: String,
    #[serde(default)]
    pub media_url: Option<String>,
    #[serde(default)]
    pub ttl_hours: Option<i64>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(status_create_handle)));
}

// 发布动态，可见名单快照自联系人网络
// Post a status, visibility snapshotted from the contact network
pub async fn status_create_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<CreateStatusRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let body = body.into_inner();
    match service::status::post(&server, &user_id, body.content, body.media_url, body.ttl_hours)
        .await
    {
        Ok(status) => respond_any(StatusCode::CREATED, status),
        Err(e) => e.respond(),
    }
}
