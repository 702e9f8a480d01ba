use async_trait::async_trait;
use dashmap::DashMap;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct Profile {
    pub display_name: String,
    pub avatar_url: Option<String>,
}

impl Profile {
    /// 查无此人时的占位资料 / Placeholder profile when lookup misses
    pub fn placeholder() -> Self {
        Self {
            display_name: "Unknown User".to_string(),
            avatar_url: None,
        }
    }
}

/// 展示信息查询，缺失可容忍 / Display lookup, absence tolerated
#[async_trait]
pub trait ProfileLookup: Send + Sync {
    async fn profile(&self, user_id: &str) -> Option<Profile>;
}

pub struct StaticProfileLookup {
    entries: DashMap<String, Profile>,
}

impl StaticProfileLookup {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn seed(&self, user_id: &str, profile: Profile) {
        self.entries.insert(user_id.to_string(), profile);
    }
}

impl Default for StaticProfileLookup {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ProfileLookup for StaticProfileLookup {
    async fn profile(&self, user_id: &str) -> Option<Profile> {
        self.entries.get(user_id).map(|p| p.value().clone())
    }
}
