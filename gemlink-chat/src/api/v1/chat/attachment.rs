use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;
use uuid::Uuid;

#[derive(serde::Deserialize)]
pub struct AttachmentQuery {
    pub name: String,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(chat_attachment_handle)));
}

// 上传附件字节，返回可在消息里引用的URL
// Upload attachment bytes, returning a URL usable in a message
pub async fn chat_attachment_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<AttachmentQuery>,
    bytes: web::Bytes,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let viewer = ParticipantKey::user(&user_id);
    let room = match server.store.get_room(&path) {
        Ok(room) => room,
        Err(e) => return e.respond(),
    };
    if !room.is_participant(&viewer) {
        return crate::error::ChatError::Forbidden(
            "user is not a participant of this chat".to_string(),
        )
        .respond();
    }
    if bytes.is_empty() {
        return crate::error::ChatError::InvalidArgument("empty attachment body".to_string())
            .respond();
    }
    let attachment_id = Uuid::new_v4().to_string();
    let hint = format!("chat_attachments/{}/{}_{}", room.id, attachment_id, query.name);
    match server.blobs.store(&bytes, &hint).await {
        Ok(url) => respond_any(
            StatusCode::CREATED,
            serde_json::json!({
                "id": attachment_id,
                "name": query.name,
                "url": url,
                "size": bytes.len(),
            }),
        ),
        Err(e) => e.respond(),
    }
}
