use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct HistoryQuery {
    pub before: Option<String>,
    pub limit: Option<usize>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(chat_history_handle)));
}

// 游标分页的消息历史，最新在前 / Cursor-paged message history, newest first
pub async fn chat_history_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    path: web::Path<String>,
    query: web::Query<HistoryQuery>,
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
            "viewer is not a participant of this chat".to_string(),
        )
        .respond();
    }
    let limit = query.limit.unwrap_or(50).clamp(1, 200);
    match server
        .store
        .messages_for_viewer(&room.id, &viewer, query.before.as_deref(), limit)
    {
        Ok(messages) => respond_any(
            StatusCode::OK,
            serde_json::json!({"messages": messages, "limit": limit}),
        ),
        Err(e) => e.respond(),
    }
}
