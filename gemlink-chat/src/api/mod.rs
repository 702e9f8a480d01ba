use actix_web::http::header;
use actix_web::HttpRequest;

use crate::error::ChatError;
use crate::server::ChatServer;

pub mod v1;

/// 从 Authorization: Bearer 解析调用者身份
/// Resolve the caller identity from Authorization: Bearer
pub async fn require_user(server: &ChatServer, req: &HttpRequest) -> Result<String, ChatError> {
    let token = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .ok_or_else(|| ChatError::Unauthorized("missing bearer token".to_string()))?;
    match server.auth.resolve(token).await? {
        Some(user_id) => Ok(user_id),
        None => Err(ChatError::Unauthorized("invalid token".to_string())),
    }
}
