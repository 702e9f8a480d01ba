use crate::api::require_user;
use crate::domain::{ChatFrame, MessageType, ParticipantKey};
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct ReplyRequest {
    pub content: String,
    #[serde(default)]
    pub message_type: Option<MessageType>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(message_reply_handle)));
}

// 回复消息，目标会话由原消息推导 / Reply to a message, chat derived from the original
pub async fn message_reply_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<ReplyRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let sender = ParticipantKey::user(&user_id);
    let original = match server.store.get_message(&path) {
        Ok(message) => message,
        Err(e) => return e.respond(),
    };
    let body = body.into_inner();
    match service::messages::reply(
        &server,
        &original.chat_id,
        &original.id,
        &sender,
        body.content,
        body.message_type.unwrap_or(MessageType::Text),
    ) {
        Ok(saved) => {
            let frame = ChatFrame::new(
                "new_message",
                serde_json::to_value(&saved).unwrap_or_default(),
            );
            if let Ok(text) = frame.to_text() {
                let exclude = ChatServer::connection_id_for(&user_id);
                server
                    .broadcast_to_room(&saved.chat_id, &text, Some(&exclude))
                    .await;
            }
            respond_any(StatusCode::CREATED, saved)
        }
        Err(e) => e.respond(),
    }
}
