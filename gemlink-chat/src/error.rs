use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use gemlink_core::response::respond_any;

/// 聊天服务错误分类 / Chat service error taxonomy
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChatError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("forbidden: {0}")]
    Forbidden(String),
    #[error("invalid state: {0}")]
    InvalidState(String),
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("unauthorized: {0}")]
    Unauthorized(String),
    #[error("unavailable: {0}")]
    Unavailable(String),
}

impl ChatError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Forbidden(_) => StatusCode::FORBIDDEN,
            ChatError::InvalidState(_) => StatusCode::CONFLICT,
            ChatError::InvalidArgument(_) => StatusCode::BAD_REQUEST,
            ChatError::Conflict(_) => StatusCode::CONFLICT,
            ChatError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            ChatError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ChatError::NotFound(_) => "NOT_FOUND",
            ChatError::Forbidden(_) => "FORBIDDEN",
            ChatError::InvalidState(_) => "INVALID_STATE",
            ChatError::InvalidArgument(_) => "INVALID_ARGUMENT",
            ChatError::Conflict(_) => "CONFLICT",
            ChatError::Unauthorized(_) => "UNAUTHORIZED",
            ChatError::Unavailable(_) => "UNAVAILABLE",
        }
    }

    /// 渲染为统一错误响应体 / Render as the unified error response body
    pub fn respond(&self) -> HttpResponse {
        respond_any(
            self.status_code(),
            serde_json::json!({
                "error": self.to_string(),
                "error_code": self.error_code(),
                "status": self.status_code().as_u16(),
            }),
        )
    }
}

impl From<std::io::Error> for ChatError {
    fn from(e: std::io::Error) -> Self {
        ChatError::Unavailable(e.to_string())
    }
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::Unavailable(e.to_string())
    }
}

impl From<serde_json::Error> for ChatError {
    fn from(e: serde_json::Error) -> Self {
        ChatError::InvalidArgument(e.to_string())
    }
}

impl From<anyhow::Error> for ChatError {
    fn from(e: anyhow::Error) -> Self {
        ChatError::Unavailable(e.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ChatError::NotFound("x".into()).status_code().as_u16(), 404);
        assert_eq!(ChatError::Forbidden("x".into()).status_code().as_u16(), 403);
        assert_eq!(
            ChatError::InvalidState("x".into()).status_code().as_u16(),
            409
        );
        assert_eq!(
            ChatError::InvalidArgument("x".into())
                .status_code()
                .as_u16(),
            400
        );
        assert_eq!(ChatError::Conflict("x".into()).status_code().as_u16(), 409);
        assert_eq!(
            ChatError::Unauthorized("x".into()).status_code().as_u16(),
            401
        );
        assert_eq!(
            ChatError::Unavailable("x".into()).status_code().as_u16(),
            503
        );
    }

    #[test]
    fn test_error_code_and_display() {
        let e = ChatError::Forbidden("not a participant".into());
        assert_eq!(e.error_code(), "FORBIDDEN");
        assert_eq!(e.to_string(), "forbidden: not a participant");
    }

    // 帧处理路径依赖这些转换走 `?` / The frame-handling path relies on
    // these conversions through `?`
    #[test]
    fn test_upstream_error_conversions() {
        fn serialize_bad() -> Result<String, ChatError> {
            let value = serde_json::from_str::<serde_json::Value>("not json")?;
            Ok(value.to_string())
        }
        assert!(matches!(
            serialize_bad(),
            Err(ChatError::InvalidArgument(_))
        ));

        fn anyhow_fails() -> Result<(), ChatError> {
            Err(anyhow::anyhow!("channel closed"))?;
            Ok(())
        }
        assert!(matches!(anyhow_fails(), Err(ChatError::Unavailable(_))));

        let io = std::io::Error::new(std::io::ErrorKind::BrokenPipe, "pipe");
        assert!(matches!(ChatError::from(io), ChatError::Unavailable(_)));
    }
}
