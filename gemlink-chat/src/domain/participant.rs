use serde::{Deserialize, Serialize};

/// 参与者命名空间 / Participant namespace
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum ParticipantKind {
    User,
    Dealer,
}

impl ParticipantKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ParticipantKind::User => "user",
            ParticipantKind::Dealer => "dealer",
        }
    }
}

/// 复合参与者标识：kind + id，全程结构化比较
/// Composite participant identity: kind + id, compared structurally throughout
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParticipantKey {
    pub kind: ParticipantKind,
    pub id: String,
}

impl ParticipantKey {
    pub fn user(id: impl Into<String>) -> Self {
        Self {
            kind: ParticipantKind::User,
            id: id.into(),
        }
    }

    pub fn dealer(id: impl Into<String>) -> Self {
        Self {
            kind: ParticipantKind::Dealer,
            id: id.into(),
        }
    }

    /// 唯一的 map key 渲染方式："{kind}_{id}"
    /// The single canonical map-key rendering: "{kind}_{id}"
    pub fn storage_key(&self) -> String {
        format!("{}_{}", self.kind.as_str(), self.id)
    }
}

/// 房间成员角色 / Room member role
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum MemberRole {
    Member,
    Admin,
}

/// 房间成员条目 / Room member entry
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Participant {
    pub id: String,
    pub kind: ParticipantKind,
    pub role: MemberRole,
    pub joined_at: chrono::DateTime<chrono::Utc>,
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl Participant {
    pub fn key(&self) -> ParticipantKey {
        ParticipantKey {
            kind: self.kind,
            id: self.id.clone(),
        }
    }
}
