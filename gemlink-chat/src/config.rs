use anyhow::Result;

#[derive(Clone)]
pub struct ServerConfig {
    pub host: String,
    pub ws_port: u16,
    pub http_port: u16,
}

#[derive(Clone)]
pub struct AuthConfigLite {
    pub enabled: bool,
    pub center_url: String,
    pub timeout_ms: u64,
}

#[derive(Clone)]
pub struct StatusConfigLite {
    pub ttl_hours: i64,
}

#[derive(Clone)]
pub struct InviteConfigLite {
    pub ttl_hours: i64,
    pub code_length: usize,
}

#[derive(Clone)]
pub struct UploadConfigLite {
    pub root: String,
}

#[derive(Clone)]
pub struct TasksConfigLite {
    pub sweep_interval_ms: u64,
}

pub struct AppConfig {
    pub server: ServerConfig,
    pub auth: AuthConfigLite,
    pub status: StatusConfigLite,
    pub invite: InviteConfigLite,
    pub upload: UploadConfigLite,
    pub tasks: TasksConfigLite,
}

/// 从全局配置管理器读取类型化配置 / Read typed config from the global manager
pub fn load() -> Result<AppConfig> {
    let cm = gemlink_core::get_global_config_manager()?;
    Ok(AppConfig {
        server: ServerConfig {
            host: cm.get_or("server.host", "127.0.0.1".to_string()),
            ws_port: cm.get_or("server.ws_port", 5300_i64) as u16,
            http_port: cm.get_or("server.http_port", 8081_i64) as u16,
        },
        auth: AuthConfigLite {
            enabled: cm.get_or("auth.enabled", false),
            center_url: cm.get_or("auth.center_url", "http://127.0.0.1:8090".to_string()),
            timeout_ms: cm.get_or("auth.timeout_ms", 1000_i64) as u64,
        },
        status: StatusConfigLite {
            ttl_hours: cm.get_or("status.ttl_hours", 24_i64),
        },
        invite: InviteConfigLite {
            ttl_hours: cm.get_or("invite.ttl_hours", 24_i64),
            code_length: cm.get_or("invite.code_length", 32_i64) as usize,
        },
        upload: UploadConfigLite {
            root: cm.get_or("upload.root", "uploads".to_string()),
        },
        tasks: TasksConfigLite {
            sweep_interval_ms: cm.get_or("tasks.sweep_interval_ms", 60000_i64) as u64,
        },
    })
}
