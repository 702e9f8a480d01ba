use super::participant::ParticipantKey;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct StatusView {
    pub viewer: ParticipantKey,
    pub viewed_at: chrono::DateTime<chrono::Utc>,
}

/// 限时状态广播 / Time-boxed status broadcast
///
/// `visible_to` 在创建时快照联系人网络，之后不随联系人变化
/// `visible_to` snapshots the contact network at creation; later changes do not apply
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ChatStatus {
    pub id: String,
    pub creator: ParticipantKey,
    pub content: String,
    pub media_url: Option<String>,
    #[serde(default)]
    pub visible_to: Vec<ParticipantKey>,
    #[serde(default)]
    pub viewed_by: Vec<StatusView>,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
}

impl ChatStatus {
    pub fn is_expired(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        now >= self.expires_at
    }
}
