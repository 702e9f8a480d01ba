use actix_web::{web, App, HttpServer};
use anyhow::Result;
use clap::Parser;
use gemlink_core::init_tracing;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{error, info};

use gemlink_chat::clients::RemoteAuthService;
use gemlink_chat::{config, router, tasks, ChatServer};

#[derive(Parser, Debug)]
#[command(author, version, about = "gemlink-chat WebSocket & HTTP chat server", long_about = None)]
pub struct Args {
    /// 指定配置文件路径（TOML/JSON/YAML自动识别）
    /// Specify config file path (auto-detect TOML/JSON/YAML)
    #[arg(short = 'c', long = "config", default_value = "config/default.toml")]
    config: Option<String>,
}

/// 启动HTTP服务器 / Start HTTP server
async fn start_http_server(server: Arc<ChatServer>, host: String, port: u16) -> Result<()> {
    let addr = format!("{}:{}", host, port);
    HttpServer::new(move || {
        App::new()
            .wrap(
                actix_web::middleware::DefaultHeaders::new()
                    .add(("Access-Control-Allow-Origin", "*"))
                    .add(("Access-Control-Allow-Headers", "*"))
                    .add((
                        "Access-Control-Allow-Methods",
                        "GET, POST, PUT, DELETE, OPTIONS",
                    )),
            )
            .app_data(web::Data::new(server.clone()))
            .configure(router::configure)
    })
    .bind(addr.clone())?
    .run()
    .await?;
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    // 初始化日志 / Initialize logging
    init_tracing()?;

    let args = Args::parse();

    info!("🎯 Starting gemlink-chat Hybrid Server (WebSocket + HTTP)...");

    // 如果提供配置文件路径则使用之，否则加载本服务默认配置
    // Initialize global config with provided file or service default
    if let Some(cfg_path) = &args.config {
        gemlink_core::init_global_config(vec![gemlink_core::ConfigSource::File {
            path: cfg_path.clone(),
            required: false,
        }])?;
        info!("🔧 Loaded config file: {}", cfg_path);
    } else {
        gemlink_core::init_global_config(vec![])?;
    }

    let app_config = config::load()?;

    // 组装服务器状态 / Assemble server state
    let mut server = ChatServer::new()
        .with_status_config(app_config.status.clone())
        .with_invite_config(app_config.invite.clone())
        .with_blobs(Arc::new(gemlink_chat::clients::LocalBlobStore::new(
            app_config.upload.root.clone(),
        )));
    if app_config.auth.enabled {
        info!("🔐 Auth center enabled: {}", app_config.auth.center_url);
        let remote = RemoteAuthService::new(app_config.auth.clone())
            .map_err(|e| anyhow::anyhow!("auth client init failed: {}", e))?;
        server = server.with_auth(Arc::new(remote));
    } else {
        info!("🔓 Auth center disabled, using dev token resolution");
    }
    let server = Arc::new(server);

    info!("");
    info!("📖 WebSocket frame types:");
    info!("   - message: Send a chat message");
    info!("   - join_chat: Join a chat's realtime dispatch group");
    info!("   - mark_read: Mark chat messages as read");
    info!("   - ping: Heartbeat");
    info!("");
    info!("💡 WebSocket examples:");
    info!("   Connect: ws://host:port/?token=<token>");
    info!("   Message: {{\"type\":\"message\",\"data\":{{\"chat_id\":\"c1\",\"content\":\"Hello\"}}}}");
    info!("   Join: {{\"type\":\"join_chat\",\"data\":{{\"chat_id\":\"c1\"}}}}");
    info!("   Read: {{\"type\":\"mark_read\",\"data\":{{\"chat_id\":\"c1\"}}}}");

    // 过期清扫任务 / Expiry sweeper task
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tasks::sweeper::spawn_expiry_sweeper(
        server.clone(),
        app_config.tasks.sweep_interval_ms,
        shutdown_rx,
    );

    let host = app_config.server.host.clone();
    let ws_port = app_config.server.ws_port;
    let http_port = app_config.server.http_port;

    // 启动WebSocket服务器 / Start WebSocket server
    let ws_server = server.clone();
    let ws_host = host.clone();
    let ws_future = async move {
        info!("🚀 Starting WebSocket server on {}:{}", ws_host, ws_port);
        if let Err(e) = ws_server.run(ws_host, ws_port).await {
            error!("❌ WebSocket server error: {}", e);
        }
    };

    // 启动HTTP服务器 / Start HTTP server
    let http_server = server.clone();
    let http_host = host.clone();
    let http_future = async move {
        // 等待WebSocket服务器启动 / Wait for WebSocket server to start
        sleep(Duration::from_secs(1)).await;
        info!("🌐 Starting HTTP server on {}:{}", http_host, http_port);
        if let Err(e) = start_http_server(http_server, http_host, http_port).await {
            error!("❌ HTTP server error: {}", e);
        }
    };

    // 等待两个服务器运行 / Wait for both servers to run
    tokio::select! {
        _ = ws_future => {
            info!("WebSocket server stopped");
        }
        _ = http_future => {
            info!("HTTP server stopped");
        }
    }

    let _ = shutdown_tx.send(true);
    server.shutdown_connections();
    info!("✅ Server shutdown successfully");

    Ok(())
}
