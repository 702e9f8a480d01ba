use crate::api::require_user;
use crate::domain::{ChatFrame, ParticipantKey};
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct EditRequest {
    pub content: String,
    #[serde(default)]
    pub reason: Option<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(message_edit_handle)));
}

// 编辑消息，旧内容入历史 / Edit a message, previous content goes to history
pub async fn message_edit_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<EditRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let editor = ParticipantKey::user(&user_id);
    let body = body.into_inner();
    match service::messages::edit(&server, &path, &editor, body.content, body.reason) {
        Ok(updated) => {
            let frame = ChatFrame::new(
                "message_edited",
                serde_json::to_value(&updated).unwrap_or_default(),
            );
            if let Ok(text) = frame.to_text() {
                let exclude = ChatServer::connection_id_for(&user_id);
                server
                    .broadcast_to_room(&updated.chat_id, &text, Some(&exclude))
                    .await;
            }
            respond_any(StatusCode::OK, updated)
        }
        Err(e) => e.respond(),
    }
}
