// gemlink-core 库主入口，按需导出模块
// gemlink-core library entry, modules exported on demand

pub mod comm;
#[cfg(feature = "config")]
pub use crate::comm::config::*;
pub use crate::comm::tracing::init_tracing;

#[cfg(feature = "web_actix")]
pub mod response;

// 重新导出 tracing 宏，方便服务端代码使用
// Re-export tracing macros for server code convenience
pub use tracing::{debug, error, info, trace, warn};

use async_trait::async_trait;

/// 健康状态结构体：用于表示组件当前健康状况
/// Health status struct: represents the current health of a component
#[derive(Debug, serde::Serialize)]
pub struct HealthStatus {
    /// 组件名称（如 chat_store、ws_listener）
    /// Component name (e.g., chat_store, ws_listener)
    pub component: String,
    /// 是否健康（true=健康，false=不健康）
    /// Whether healthy (true=healthy, false=unhealthy)
    pub healthy: bool,
    /// 附加消息（错误信息或提示）
    /// Additional message (error details or hint)
    pub message: Option<String>,
    /// 采样时间戳（UTC）
    /// Sample timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// 健康检查通用接口：由各服务或资源实现具体检查逻辑
/// Generic health check interface: implemented by services/resources
#[async_trait]
pub trait HealthCheck {
    /// 执行健康检查并返回健康状态
    /// Perform health check and return the status
    async fn check_health(&self) -> HealthStatus;
}
