use crate::api::require_user;
use crate::domain::{ChatFrame, ParticipantKey};
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct ReactRequest {
    pub emoji: String,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(message_react_handle)));
}

// 表情开关：再点一次即撤销 / Reaction toggle: a second call removes it
pub async fn message_react_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: web::Json<ReactRequest>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let actor = ParticipantKey::user(&user_id);
    match service::messages::react(&server, &path, &actor, &body.emoji) {
        Ok(updated) => {
            let frame = ChatFrame::new(
                "message_reaction",
                serde_json::json!({
                    "chat_id": updated.chat_id,
                    "message_id": updated.id,
                    "reactions": updated.reactions,
                }),
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
