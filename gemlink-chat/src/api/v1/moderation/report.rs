use crate::api::require_user;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct ReportRequest {
    pub reported_id: String,
    pub reason: String,
    #[serde(default)]
    pub details: Option<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(moderation_report_handle)));
}

// 举报用户 / Report a user
pub async fn moderation_report_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<ReportRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let body = body.into_inner();
    match service::moderation::report_user(
        &server,
        &user_id,
        &body.reported_id,
        body.reason,
        body.details,
    ) {
        Ok(record) => respond_any(StatusCode::CREATED, record),
        Err(e) => e.respond(),
    }
}
