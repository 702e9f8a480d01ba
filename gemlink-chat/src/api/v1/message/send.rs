use crate::api::require_user;
use crate::domain::{Attachment, ChatFrame, MessageType, ParticipantKey};
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct SendMessageRequest {
    pub chat_id: String,
    pub content: String,
    #[serde(default)]
    pub message_type: Option<MessageType>,
    #[serde(default)]
    pub gem_id: Option<String>,
    #[serde(default)]
    pub gem_details: Option<serde_json::Value>,
    #[serde(default)]
    pub attachment: Option<Attachment>,
    #[serde(default)]
    pub reply_to: Option<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(message_send_handle)));
}

// 发送消息并向房间内其他连接广播 new_message
// Send a message and broadcast new_message to the other connections
pub async fn message_send_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    body: web::Json<SendMessageRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let sender = ParticipantKey::user(&user_id);
    let body = body.into_inner();
    match service::messages::send(
        &server,
        &body.chat_id,
        &sender,
        service::messages::SendRequest {
            content: body.content,
            message_type: body.message_type.unwrap_or(MessageType::Text),
            gem_id: body.gem_id,
            gem_details: body.gem_details,
            attachment: body.attachment,
            reply_to: body.reply_to,
        },
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
