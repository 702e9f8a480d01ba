use super::participant::ParticipantKey;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// 硬删除后的内容占位符 / Content placeholder after a hard delete
pub const DELETED_PLACEHOLDER: &str = "This message was deleted";

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MessageType {
    Text,
    Image,
    File,
    GemShare,
    Status,
    Deleted,
}

/// 回执条目（送达/已读共用）/ Receipt entry, shared by delivered and read sets
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Receipt {
    pub id: String,
    pub kind: super::participant::ParticipantKind,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl Receipt {
    pub fn key(&self) -> ParticipantKey {
        ParticipantKey {
            kind: self.kind,
            id: self.id.clone(),
        }
    }
}

/// 回复引用：引用时刻的快照，不随原消息后续变化
/// Reply back-reference: a snapshot taken at reply time, never a live link
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReplySnapshot {
    pub message_id: String,
    pub content: String,
    pub sender: ParticipantKey,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReactionEntry {
    pub user_id: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct EditRecord {
    pub previous_content: String,
    pub edited_at: chrono::DateTime<chrono::Utc>,
    pub reason: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    pub url: String,
    pub size: u64,
}

/// 聊天消息文档 / Chat message document
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatMessage {
    pub id: String,
    pub chat_id: String,
    pub sender: ParticipantKey,
    pub content: String,
    pub message_type: MessageType,
    pub gem_id: Option<String>,
    pub gem_details: Option<serde_json::Value>,
    pub attachment: Option<Attachment>,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    /// 同毫秒追加的次序消歧 / Disambiguates same-millisecond appends
    pub seq: u64,
    #[serde(default)]
    pub read_by: Vec<Receipt>,
    #[serde(default)]
    pub delivered_to: Vec<Receipt>,
    pub is_deleted: bool,
    #[serde(default)]
    pub deleted_for: HashSet<ParticipantKey>,
    pub deleted_by: Option<ParticipantKey>,
    pub deleted_at: Option<chrono::DateTime<chrono::Utc>>,
    pub reply_to: Option<ReplySnapshot>,
    #[serde(default)]
    pub reactions: HashMap<String, Vec<ReactionEntry>>,
    pub is_edited: bool,
    #[serde(default)]
    pub edit_history: Vec<EditRecord>,
    pub last_edited_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl ChatMessage {
    pub fn is_read_by(&self, key: &ParticipantKey) -> bool {
        self.read_by.iter().any(|r| &r.key() == key)
    }

    pub fn is_delivered_to(&self, key: &ParticipantKey) -> bool {
        self.delivered_to.iter().any(|r| &r.key() == key)
    }

    /// 对指定查看者是否可见（for-self 软删除检查）
    /// Visibility for a viewer (for-self soft-delete check)
    pub fn visible_to(&self, viewer: &ParticipantKey) -> bool {
        !self.deleted_for.contains(viewer)
    }
}
