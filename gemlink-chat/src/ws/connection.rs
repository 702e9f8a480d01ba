use anyhow::Result;
use futures_util::{SinkExt, StreamExt};
use std::net::SocketAddr;
use tokio::net::TcpStream;
use tokio::sync::mpsc;
use tokio_tungstenite::{
    accept_hdr_async,
    tungstenite::{
        handshake::server::{Request, Response},
        protocol::{frame::coding::CloseCode, CloseFrame},
        Message,
    },
};

use crate::domain::ChatFrame;
use crate::server::ChatServer;

/// 从升级URI的查询串里取token / Pull the token out of the upgrade URI query
fn token_from_query(query: Option<&str>) -> Option<String> {
    query?
        .split('&')
        .find_map(|pair| pair.strip_prefix("token="))
        .map(|t| t.to_string())
}

/// 处理新连接：握手时鉴权，失败以 Policy 码关闭
/// Handle a new connection: authenticate at the handshake, close with
/// a Policy code on failure
pub async fn handle_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    server: ChatServer,
) -> Result<()> {
    tracing::info!("📨 New connection from: {}", peer_addr);

    let mut query: Option<String> = None;
    let ws_stream = accept_hdr_async(stream, |req: &Request, resp: Response| {
        query = req.uri().query().map(|q| q.to_string());
        Ok(resp)
    })
    .await?;
    let (mut ws_sender, mut ws_receiver) = ws_stream.split();

    let token = token_from_query(query.as_deref());
    let user_id = match token {
        Some(token) => server.auth.resolve(&token).await.ok().flatten(),
        None => None,
    };
    let user_id = match user_id {
        Some(uid) => uid,
        None => {
            tracing::warn!("⚠️  Rejecting unauthenticated connection from {}", peer_addr);
            let _ = ws_sender
                .send(Message::Close(Some(CloseFrame {
                    code: CloseCode::Policy,
                    reason: std::borrow::Cow::Borrowed("authentication failed"),
                })))
                .await;
            let _ = ws_sender.close().await;
            return Ok(());
        }
    };

    let (tx, mut rx) = mpsc::unbounded_channel::<Message>();
    let connection_id = server.register_connection(&user_id, peer_addr, tx);

    let writer_id = connection_id.clone();
    let send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let is_close = matches!(&msg, Message::Close(_));
            if let Err(e) = ws_sender.send(msg).await {
                tracing::error!("Failed to send message to {}: {}", writer_id, e);
                break;
            }
            if is_close {
                let _ = ws_sender.close().await;
                break;
            }
        }
    });

    tracing::info!("✅ User {} connected from {} as {}", user_id, peer_addr, connection_id);
    let welcome = ChatFrame::new(
        "connected",
        serde_json::json!({"connection_id": connection_id, "user_id": user_id}),
    );
    server
        .send_to_connection(&connection_id, Message::Text(welcome.to_text()?))
        .await?;

    while let Some(msg) = ws_receiver.next().await {
        match msg {
            Ok(message) => {
                if let Err(e) =
                    crate::ws::handler::dispatch(&server, message, &connection_id, &user_id).await
                {
                    tracing::error!("Error handling message from {}: {}", connection_id, e);
                }
            }
            Err(e) => {
                tracing::error!("WebSocket error from {}: {}", connection_id, e);
                break;
            }
        }
    }

    server.disconnect(&connection_id);
    send_task.abort();
    tracing::info!("👋 User {} disconnected", user_id);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_from_query() {
        assert_eq!(token_from_query(Some("token=abc")), Some("abc".to_string()));
        assert_eq!(
            token_from_query(Some("v=1&token=xyz&n=2")),
            Some("xyz".to_string())
        );
        assert_eq!(token_from_query(Some("v=1")), None);
        assert_eq!(token_from_query(None), None);
    }
}
