use anyhow::Result;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, warn};

use crate::server::ChatServer;

/// 向指定连接发送消息 / Send a message to a specific connection
impl ChatServer {
    pub async fn send_to_connection(&self, connection_id: &str, message: Message) -> Result<()> {
        if let Some(connection) = self.connections.get(connection_id) {
            connection
                .sender
                .send(message)
                .map_err(|e| anyhow::anyhow!("Failed to send message: {}", e))?;
            debug!("📤 Sent message to connection {}", connection_id);
            Ok(())
        } else {
            warn!("⚠️  Connection {} not found for delivery", connection_id);
            Err(anyhow::anyhow!("Connection {} not found", connection_id))
        }
    }

    /// 房间内广播文本帧，可排除一个连接；死连接顺带清理
    /// Broadcast a text frame within a room, optionally excluding one
    /// connection; dead connections are swept along the way
    pub async fn broadcast_to_room(&self, room_id: &str, text: &str, exclude: Option<&str>) {
        let mut dead = Vec::new();
        for connection_id in self.connections_in_room(room_id) {
            if exclude == Some(connection_id.as_str()) {
                continue;
            }
            match self.connections.get(&connection_id) {
                Some(connection) => {
                    if connection
                        .sender
                        .send(Message::Text(text.to_string()))
                        .is_err()
                    {
                        dead.push(connection_id);
                    }
                }
                None => dead.push(connection_id),
            }
        }
        for connection_id in dead {
            self.disconnect(&connection_id);
        }
    }

    /// 发送关闭帧 / Send a close frame
    pub async fn send_close(&self, connection_id: &str, reason: &'static str) -> Result<()> {
        if let Some(connection) = self.connections.get(connection_id) {
            connection
                .sender
                .send(Message::Close(Some(
                    tokio_tungstenite::tungstenite::protocol::CloseFrame {
                        code: tokio_tungstenite::tungstenite::protocol::frame::coding::CloseCode::Normal,
                        reason: std::borrow::Cow::Borrowed(reason),
                    },
                )))
                .map_err(|e| anyhow::anyhow!("Failed to send close message: {}", e))?;
            debug!("🔒 Sent close frame to connection {}", connection_id);
            Ok(())
        } else {
            Err(anyhow::anyhow!(
                "Connection {} not found for close frame",
                connection_id
            ))
        }
    }
}
