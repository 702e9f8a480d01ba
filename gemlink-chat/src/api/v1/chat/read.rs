use crate::api::require_user;
use crate::domain::{ChatFrame, ParticipantKey};
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize, Default)]
pub struct ReadRequest {
    pub message_id: Option<String>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(chat_read_handle)));
}

// 已读回执（单条或整会话），并向房间广播
// Read receipts (single message or whole chat), with a room broadcast
pub async fn chat_read_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<ReadRequest>>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let viewer = ParticipantKey::user(&user_id);
    let message_id = body.and_then(|b| b.into_inner().message_id);
    let room = match server.store.get_room(&path) {
        Ok(room) => room,
        Err(e) => return e.respond(),
    };
    match service::messages::mark_read(&server, &room.id, &viewer, message_id.as_deref()) {
        Ok(changed) => {
            if changed > 0 {
                let frame = ChatFrame::new(
                    "messages_read",
                    serde_json::json!({"chat_id": room.id, "user_id": user_id, "count": changed}),
                );
                if let Ok(text) = frame.to_text() {
                    let exclude = ChatServer::connection_id_for(&user_id);
                    server
                        .broadcast_to_room(&room.id, &text, Some(&exclude))
                        .await;
                }
            }
            respond_any(
                StatusCode::OK,
                serde_json::json!({"chat_id": room.id, "marked_read": changed}),
            )
        }
        Err(e) => e.respond(),
    }
}
