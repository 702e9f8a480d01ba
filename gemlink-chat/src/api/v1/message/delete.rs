use crate::api::require_user;
use crate::domain::{ChatFrame, ParticipantKey};
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize, Default)]
pub struct DeleteRequest {
    #[serde(default)]
    pub for_everyone: bool,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::post().to(message_delete_handle)));
}

// 删除：for_everyone 替换占位符并广播；for-self 仅对调用者隐藏
// Delete: for_everyone swaps in the placeholder and broadcasts;
// for-self only hides it from the caller
pub async fn message_delete_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    body: Option<web::Json<DeleteRequest>>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let actor = ParticipantKey::user(&user_id);
    let for_everyone = body.map(|b| b.for_everyone).unwrap_or(false);
    match service::messages::delete(&server, &path, &actor, for_everyone) {
        Ok(deleted) => {
            if for_everyone {
                let frame = ChatFrame::new(
                    "message_deleted",
                    serde_json::json!({"chat_id": deleted.chat_id, "message_id": deleted.id}),
                );
                if let Ok(text) = frame.to_text() {
                    let exclude = ChatServer::connection_id_for(&user_id);
                    server
                        .broadcast_to_room(&deleted.chat_id, &text, Some(&exclude))
                        .await;
                }
            }
            respond_any(StatusCode::OK, deleted)
        }
        Err(e) => e.respond(),
    }
}
