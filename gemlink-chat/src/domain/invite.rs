use serde::{Deserialize, Serialize};

/// 单次使用的群邀请码 / Single-use group invite code
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct GroupInvite {
    /// 不可猜测的随机码，同时是主键 / Unguessable random code, also the primary key
    pub code: String,
    pub chat_id: String,
    pub created_by: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub expires_at: chrono::DateTime<chrono::Utc>,
    pub is_active: bool,
    pub used_by: Option<String>,
    pub used_at: Option<chrono::DateTime<chrono::Utc>>,
}

impl GroupInvite {
    /// 可兑换条件：活跃、未过期、未被使用
    /// Redeemable: active, unexpired, unused
    pub fn is_redeemable(&self, now: chrono::DateTime<chrono::Utc>) -> bool {
        self.is_active && now < self.expires_at && self.used_by.is_none()
    }
}
