use anyhow::Result;
use serde::Deserialize;
use tokio_tungstenite::tungstenite::Message;
use tracing::debug;

use crate::domain::{Attachment, ChatFrame, MessageType, ParticipantKey};
use crate::error::ChatError;
use crate::server::ChatServer;
use crate::service;

#[derive(Deserialize)]
struct InboundMessage {
    chat_id: String,
    content: String,
    #[serde(default)]
    message_type: Option<MessageType>,
    #[serde(default)]
    gem_id: Option<String>,
    #[serde(default)]
    gem_details: Option<serde_json::Value>,
    #[serde(default)]
    attachment: Option<Attachment>,
    #[serde(default)]
    reply_to: Option<String>,
}

#[derive(Deserialize)]
struct InboundJoin {
    chat_id: String,
}

#[derive(Deserialize)]
struct InboundRead {
    chat_id: String,
    #[serde(default)]
    message_id: Option<String>,
}

/// 分发进入帧。格式错误回错误帧而不断开。
/// Dispatch an incoming frame. Malformed input gets an error frame
/// back without dropping the connection.
pub async fn dispatch(
    server: &ChatServer,
    message: Message,
    connection_id: &str,
    user_id: &str,
) -> Result<()> {
    let text = match message {
        Message::Text(text) => text,
        Message::Ping(payload) => {
            server
                .send_to_connection(connection_id, Message::Pong(payload))
                .await?;
            return Ok(());
        }
        _ => return Ok(()),
    };
    debug!("📨 Received frame from {}: {}", connection_id, text);

    let frame = match serde_json::from_str::<ChatFrame>(&text) {
        Ok(frame) => frame,
        Err(_) => {
            return send_error(server, connection_id, "invalid json").await;
        }
    };

    let outcome = match frame.frame_type.as_str() {
        "message" => handle_send(server, frame.data, connection_id, user_id).await,
        "join_chat" => handle_join(server, frame.data, connection_id, user_id).await,
        "mark_read" => handle_read(server, frame.data, connection_id, user_id).await,
        "ping" => {
            let pong = ChatFrame::new(
                "pong",
                serde_json::json!({"timestamp": chrono::Utc::now().timestamp_millis()}),
            );
            server
                .send_to_connection(connection_id, Message::Text(pong.to_text()?))
                .await
                .map_err(|e| ChatError::Unavailable(e.to_string()))
        }
        other => Err(ChatError::InvalidArgument(format!(
            "unknown frame type: {}",
            other
        ))),
    };

    if let Err(err) = outcome {
        return send_error(server, connection_id, &err.to_string()).await;
    }
    Ok(())
}

async fn send_error(server: &ChatServer, connection_id: &str, message: &str) -> Result<()> {
    let frame = ChatFrame::error(message);
    server
        .send_to_connection(connection_id, Message::Text(frame.to_text()?))
        .await?;
    Ok(())
}

/// 发送并向房间内其他连接广播 new_message
/// Send, then broadcast new_message to the other connections in the room
async fn handle_send(
    server: &ChatServer,
    data: serde_json::Value,
    connection_id: &str,
    user_id: &str,
) -> Result<(), ChatError> {
    let req: InboundMessage = serde_json::from_value(data)
        .map_err(|e| ChatError::InvalidArgument(format!("bad message payload: {}", e)))?;
    let sender = ParticipantKey::user(user_id);
    let saved = service::messages::send(
        server,
        &req.chat_id,
        &sender,
        service::messages::SendRequest {
            content: req.content,
            message_type: req.message_type.unwrap_or(MessageType::Text),
            gem_id: req.gem_id,
            gem_details: req.gem_details,
            attachment: req.attachment,
            reply_to: req.reply_to,
        },
    )?;

    let room_id = saved.chat_id.clone();
    let frame = ChatFrame::new("new_message", serde_json::to_value(&saved)?);
    let text = frame.to_text()?;
    server
        .broadcast_to_room(&room_id, &text, Some(connection_id))
        .await;

    let ack = ChatFrame::new("message_sent", serde_json::to_value(&saved)?);
    server
        .send_to_connection(connection_id, Message::Text(ack.to_text()?))
        .await
        .map_err(|e| ChatError::Unavailable(e.to_string()))?;
    Ok(())
}

/// 加入房间的实时分发组，并把积压消息标记为已送达
/// Join the room's realtime dispatch group and mark the backlog delivered
async fn handle_join(
    server: &ChatServer,
    data: serde_json::Value,
    connection_id: &str,
    user_id: &str,
) -> Result<(), ChatError> {
    let req: InboundJoin = serde_json::from_value(data)
        .map_err(|e| ChatError::InvalidArgument(format!("bad join payload: {}", e)))?;
    let viewer = ParticipantKey::user(user_id);
    let room = server.store.get_room(&req.chat_id)?;
    if !room.is_participant(&viewer) {
        return Err(ChatError::Forbidden(
            "user is not a participant of this chat".to_string(),
        ));
    }
    server.join_room(&room.id, connection_id);
    let delivered = service::messages::mark_delivered(server, &room.id, &viewer)?;

    let joined = ChatFrame::new(
        "joined_chat",
        serde_json::json!({"chat_id": room.id, "delivered": delivered}),
    );
    server
        .send_to_connection(connection_id, Message::Text(joined.to_text()?))
        .await
        .map_err(|e| ChatError::Unavailable(e.to_string()))?;

    if delivered > 0 {
        let frame = ChatFrame::new(
            "messages_delivered",
            serde_json::json!({"chat_id": room.id, "user_id": user_id, "count": delivered}),
        );
        if let Ok(text) = frame.to_text() {
            server
                .broadcast_to_room(&room.id, &text, Some(connection_id))
                .await;
        }
    }
    Ok(())
}

/// 已读回执并广播 messages_read / Read receipts plus a messages_read broadcast
async fn handle_read(
    server: &ChatServer,
    data: serde_json::Value,
    connection_id: &str,
    user_id: &str,
) -> Result<(), ChatError> {
    let req: InboundRead = serde_json::from_value(data)
        .map_err(|e| ChatError::InvalidArgument(format!("bad read payload: {}", e)))?;
    let viewer = ParticipantKey::user(user_id);
    let room = server.store.get_room(&req.chat_id)?;
    let changed =
        service::messages::mark_read(server, &room.id, &viewer, req.message_id.as_deref())?;

    if changed > 0 {
        let frame = ChatFrame::new(
            "messages_read",
            serde_json::json!({"chat_id": room.id, "user_id": user_id, "count": changed}),
        );
        if let Ok(text) = frame.to_text() {
            server
                .broadcast_to_room(&room.id, &text, Some(connection_id))
                .await;
        }
    }
    Ok(())
}
