use crate::api::require_user;
use crate::domain::{ChatFrame, ParticipantKey};
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(chat_delivered_handle)));
}

// 送达回执，不动未读计数 / Delivery receipts, unread counters untouched
pub async fn chat_delivered_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
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
    match service::messages::mark_delivered(&server, &room.id, &viewer) {
        Ok(changed) => {
            if changed > 0 {
                let frame = ChatFrame::new(
                    "messages_delivered",
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
                serde_json::json!({"chat_id": room.id, "marked_delivered": changed}),
            )
        }
        Err(e) => e.respond(),
    }
}
