use crate::api::require_user;
use crate::domain::ParticipantKey;
use crate::server::ChatServer;
use crate::service;
use actix_web::http::StatusCode;
use actix_web::{web, HttpRequest, Responder};
use gemlink_core::response::respond_any;
use std::sync::Arc;

#[derive(serde::Deserialize)]
pub struct ListQuery {
    pub page: Option<usize>,
    pub limit: Option<usize>,
}

pub fn register(cfg: &mut actix_web::web::ServiceConfig, path: &str) {
    cfg.service(web::resource(path).route(web::get().to(chat_list_handle)));
}

// 分页会话列表，last_activity 降序 / Paginated chat list, last_activity descending
pub async fn chat_list_handle(
    server: web::Data<Arc<ChatServer>>,
    req: HttpRequest,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let user_id = match require_user(&server, &req).await {
        Ok(uid) => uid,
        Err(e) => return e.respond(),
    };
    let page = query.page.unwrap_or(1).max(1);
    let limit = query.limit.unwrap_or(20).clamp(1, 100);
    let viewer = ParticipantKey::user(&user_id);
    let views = service::rooms::list_rooms(&server, &viewer, page, limit).await;
    respond_any(
        StatusCode::OK,
        serde_json::json!({"chats": views, "page": page, "limit": limit}),
    )
}
