use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct CreateGroupRequest {
    pub title: String,
    #[serde(default)]
    pub participants: Vec<ParticipantKey>,
    #[serde(default)]
    pub group_image: Option<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(chat_create_group_handle)));
}

// 建群 / Create a group chat
pub async fn chat_create_group_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<CreateGroupRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let body = body.into_inner();
    match service::rooms::create_group(
        &server,
        &user_id,
        body.title,
        body.participants,
        body.group_image,
    )
    .await
    {
        Ok(room) => respond_any(StatusCode::CREATED, room),
        Err(e) => e.respond(),
    }
}
