use crate::domain::{
    Attachment, ChatMessage, ChatType, EditRecord, MessageType, ParticipantKey, ReactionEntry,
    Receipt, ReplySnapshot, DELETED_PLACEHOLDER,
};
use crate::error::ChatError;
use crate::server::ChatServer;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

pub struct SendRequest {
    pub content: String,
    pub message_type: MessageType,
    pub gem_id: Option<String>,
    pub gem_details: Option<serde_json::Value>,
    pub attachment: Option<Attachment>,
    pub reply_to: Option<String>,
}

impl SendRequest {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            message_type: MessageType::Text,
            gem_id: None,
            gem_details: None,
            attachment: None,
            reply_to: None,
        }
    }
}

/// 发送消息：校验参与资格与房间策略，追加并为其他参与者累加未读
/// Send a message: validate participation and room policy, append,
/// and bump unread for every other participant
pub fn send(
    server: &ChatServer,
    room_ref: &str,
    sender: &ParticipantKey,
    req: SendRequest,
) -> Result<ChatMessage, ChatError> {
    let room = server.store.get_room(room_ref)?;
    if !room.is_active {
        return Err(ChatError::InvalidState("chat is not active".to_string()));
    }
    if !room.is_participant(sender) {
        return Err(ChatError::Forbidden(
            "sender is not a participant of this chat".to_string(),
        ));
    }
    if room.chat_type == ChatType::Group
        && room.settings.only_admins_message
        && !room.is_admin(&sender.id)
    {
        return Err(ChatError::Forbidden(
            "only admins may send messages in this chat".to_string(),
        ));
    }
    if req.message_type == MessageType::GemShare && !room.settings.allow_gem_sharing {
        return Err(ChatError::Forbidden(
            "gem sharing is disabled in this chat".to_string(),
        ));
    }

    // 回复引用在此刻快照原文 / The reply reference snapshots the original now
    let reply_to = match &req.reply_to {
        Some(original_id) => {
            let original = server.store.get_message(original_id)?;
            if original.chat_id != room.id {
                return Err(ChatError::InvalidArgument(
                    "replied message belongs to another chat".to_string(),
                ));
            }
            Some(ReplySnapshot {
                message_id: original.id.clone(),
                content: original.content.clone(),
                sender: original.sender.clone(),
            })
        }
        None => None,
    };

    let now = chrono::Utc::now();
    let message = ChatMessage {
        id: Uuid::new_v4().to_string(),
        chat_id: room.id.clone(),
        sender: sender.clone(),
        content: req.content,
        message_type: req.message_type,
        gem_id: req.gem_id,
        gem_details: req.gem_details,
        attachment: req.attachment,
        timestamp: now,
        seq: 0,
        read_by: vec![Receipt {
            id: sender.id.clone(),
            kind: sender.kind,
            timestamp: now,
        }],
        delivered_to: Vec::new(),
        is_deleted: false,
        deleted_for: HashSet::new(),
        deleted_by: None,
        deleted_at: None,
        reply_to,
        reactions: HashMap::new(),
        is_edited: false,
        edit_history: Vec::new(),
        last_edited_at: None,
    };

    let saved = server.store.append_message(&room.id, message)?;
    server.store.increment_unread(&room.id, sender)?;
    Ok(saved)
}

/// 回复即带快照引用的发送 / Reply is a send carrying a snapshot reference
pub fn reply(
    server: &ChatServer,
    room_ref: &str,
    original_message_id: &str,
    sender: &ParticipantKey,
    content: String,
    message_type: MessageType,
) -> Result<ChatMessage, ChatError> {
    send(
        server,
        room_ref,
        sender,
        SendRequest {
            content,
            message_type,
            gem_id: None,
            gem_details: None,
            attachment: None,
            reply_to: Some(original_message_id.to_string()),
        },
    )
}

/// 编辑：先把旧内容存入历史，再覆盖
/// Edit: the previous content goes into history before it is overwritten
pub fn edit(
    server: &ChatServer,
    message_id: &str,
    editor: &ParticipantKey,
    new_content: String,
    reason: Option<String>,
) -> Result<ChatMessage, ChatError> {
    server.store.update_message(message_id, |message| {
        if &message.sender != editor {
            return Err(ChatError::Forbidden(
                "only the original sender may edit a message".to_string(),
            ));
        }
        if message.is_deleted {
            return Err(ChatError::InvalidState(
                "cannot edit a deleted message".to_string(),
            ));
        }
        let now = chrono::Utc::now();
        message.edit_history.push(EditRecord {
            previous_content: message.content.clone(),
            edited_at: now,
            reason,
        });
        message.content = new_content;
        message.is_edited = true;
        message.last_edited_at = Some(now);
        Ok(message.clone())
    })
}

/// 删除：for_everyone 需发送者本人，内容替换为占位符并剥离附件；
/// for-self 仅把操作者加入 deleted_for。
/// Delete: for_everyone requires the sender, replaces content with the
/// placeholder and strips the attachment; for-self only adds the actor
/// to deleted_for.
pub fn delete(
    server: &ChatServer,
    message_id: &str,
    actor: &ParticipantKey,
    for_everyone: bool,
) -> Result<ChatMessage, ChatError> {
    if for_everyone {
        server.store.update_message(message_id, |message| {
            if &message.sender != actor {
                return Err(ChatError::Forbidden(
                    "only the sender may delete for everyone".to_string(),
                ));
            }
            if message.is_deleted {
                return Err(ChatError::InvalidState(
                    "message is already deleted".to_string(),
                ));
            }
            message.is_deleted = true;
            message.content = DELETED_PLACEHOLDER.to_string();
            message.message_type = MessageType::Deleted;
            message.attachment = None;
            message.gem_id = None;
            message.gem_details = None;
            message.deleted_by = Some(actor.clone());
            message.deleted_at = Some(chrono::Utc::now());
            Ok(message.clone())
        })
    } else {
        let existing = server.store.get_message(message_id)?;
        let room = server.store.get_room(&existing.chat_id)?;
        if !room.is_participant(actor) {
            return Err(ChatError::Forbidden(
                "actor is not a participant of this chat".to_string(),
            ));
        }
        server.store.update_message(message_id, |message| {
            message.deleted_for.insert(actor.clone());
            Ok(message.clone())
        })
    }
}

/// 送达回执：跳过自己发送的和已登记的，幂等
/// Delivery receipts: skip own messages and already-recorded ones, idempotent
pub fn mark_delivered(
    server: &ChatServer,
    room_ref: &str,
    viewer: &ParticipantKey,
) -> Result<usize, ChatError> {
    let room = server.store.get_room(room_ref)?;
    if !room.is_participant(viewer) {
        return Err(ChatError::Forbidden(
            "viewer is not a participant of this chat".to_string(),
        ));
    }
    let now = chrono::Utc::now();
    server.store.update_messages(&room.id, |message| {
        if &message.sender == viewer || message.is_delivered_to(viewer) {
            return false;
        }
        message.delivered_to.push(Receipt {
            id: viewer.id.clone(),
            kind: viewer.kind,
            timestamp: now,
        });
        true
    })
}

/// 已读回执，同时把查看者的未读计数清零
/// Read receipts, also resetting the viewer's unread counter
pub fn mark_read(
    server: &ChatServer,
    room_ref: &str,
    viewer: &ParticipantKey,
    single_message_id: Option<&str>,
) -> Result<usize, ChatError> {
    let room = server.store.get_room(room_ref)?;
    if !room.is_participant(viewer) {
        return Err(ChatError::Forbidden(
            "viewer is not a participant of this chat".to_string(),
        ));
    }
    let now = chrono::Utc::now();
    let changed = match single_message_id {
        Some(message_id) => server.store.update_message(message_id, |message| {
            if message.chat_id != room.id {
                return Err(ChatError::InvalidArgument(
                    "message belongs to another chat".to_string(),
                ));
            }
            if &message.sender == viewer || message.is_read_by(viewer) {
                return Ok(0);
            }
            message.read_by.push(Receipt {
                id: viewer.id.clone(),
                kind: viewer.kind,
                timestamp: now,
            });
            Ok(1)
        })?,
        None => server.store.update_messages(&room.id, |message| {
            if &message.sender == viewer || message.is_read_by(viewer) {
                return false;
            }
            message.read_by.push(Receipt {
                id: viewer.id.clone(),
                kind: viewer.kind,
                timestamp: now,
            });
            true
        })?,
    };
    server.store.reset_unread(&room.id, viewer)?;
    Ok(changed)
}

/// 反应开关：同一用户同一表情再次调用即撤销；空表情键被剪除
/// Reaction toggle: a second call by the same user removes the entry;
/// empty emoji keys are pruned
pub fn react(
    server: &ChatServer,
    message_id: &str,
    user: &ParticipantKey,
    emoji: &str,
) -> Result<ChatMessage, ChatError> {
    let existing = server.store.get_message(message_id)?;
    let room = server.store.get_room(&existing.chat_id)?;
    if !room.is_participant(user) {
        return Err(ChatError::Forbidden(
            "actor is not a participant of this chat".to_string(),
        ));
    }
    server.store.update_message(message_id, |message| {
        let entries = message.reactions.entry(emoji.to_string()).or_default();
        match entries.iter().position(|r| r.user_id == user.id) {
            Some(pos) => {
                entries.remove(pos);
            }
            None => entries.push(ReactionEntry {
                user_id: user.id.clone(),
                timestamp: chrono::Utc::now(),
            }),
        }
        if message
            .reactions
            .get(emoji)
            .map(|v| v.is_empty())
            .unwrap_or(false)
        {
            message.reactions.remove(emoji);
        }
        Ok(message.clone())
    })
}
