use super::participant::{Participant, ParticipantKey};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// 聊天类型 / Chat type
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChatType {
    Direct,
    Dealer,
    Group,
}

/// 群管理员条目（带显式权限集）/ Group admin entry with an explicit permission set
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupAdmin {
    pub user_id: String,
    pub permissions: Vec<String>,
    pub granted_at: chrono::DateTime<chrono::Utc>,
}

/// 群创建者获得的完整权限集 / Full permission set granted to the group creator
pub const FULL_ADMIN_PERMISSIONS: &[&str] = &[
    "add_members",
    "remove_members",
    "edit_settings",
    "manage_admins",
    "delete_messages",
];

/// 按参与者记录的清空历史标记 / Per-participant clear-history marker
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ClearHistoryMarker {
    pub cleared_at: chrono::DateTime<chrono::Utc>,
    pub cleared_until_message_id: Option<String>,
}

/// 房间设置 / Room settings
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RoomSettings {
    #[serde(default)]
    pub muted_by: Vec<ParticipantKey>,
    #[serde(default)]
    pub pinned_by: Vec<ParticipantKey>,
    pub allow_gem_sharing: bool,
    pub allow_status_sharing: bool,
    #[serde(default)]
    pub group_admins: Vec<GroupAdmin>,
    pub allow_member_adds: bool,
    pub allow_admin_invites: bool,
    pub allow_user_invites: bool,
    pub only_admins_message: bool,
    #[serde(default)]
    pub clear_history: HashMap<String, ClearHistoryMarker>,
}

impl Default for RoomSettings {
    fn default() -> Self {
        Self {
            muted_by: Vec::new(),
            pinned_by: Vec::new(),
            allow_gem_sharing: true,
            allow_status_sharing: true,
            group_admins: Vec::new(),
            allow_member_adds: false,
            allow_admin_invites: true,
            allow_user_invites: false,
            only_admins_message: false,
            clear_history: HashMap::new(),
        }
    }
}

/// 最新消息投影，seq 用于并发追加时的胜出判定
/// Last-message projection; seq decides the winner under concurrent appends
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct LastMessage {
    pub id: String,
    pub content: String,
    pub sender: ParticipantKey,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message_type: super::message::MessageType,
    pub seq: u64,
}

/// 聊天房间文档 / Chat room document
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatRoom {
    pub id: String,
    /// 次级别名，供双重表示的调用方使用 / Secondary alias for dual-representation callers
    pub chat_id: String,
    pub chat_type: ChatType,
    pub creator: ParticipantKey,
    pub participants: Vec<Participant>,
    pub title: Option<String>,
    pub group_image: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_activity: chrono::DateTime<chrono::Utc>,
    pub last_message: Option<LastMessage>,
    /// 以 storage_key 为键的未读计数 / Unread counts keyed by storage_key
    #[serde(default)]
    pub unread_counts: HashMap<String, u32>,
    pub settings: RoomSettings,
}

impl ChatRoom {
    pub fn participant(&self, key: &ParticipantKey) -> Option<&Participant> {
        self.participants.iter().find(|p| &p.key() == key)
    }

    pub fn is_participant(&self, key: &ParticipantKey) -> bool {
        self.participant(key).is_some()
    }

    pub fn is_admin(&self, user_id: &str) -> bool {
        self.settings
            .group_admins
            .iter()
            .any(|a| a.user_id == user_id)
    }

    pub fn admin_count(&self) -> usize {
        self.settings.group_admins.len()
    }
}
