use crate::domain::ParticipantKey;
use crate::error::ChatError;
use async_trait::async_trait;
use dashmap::DashMap;

/// 联系人/经销商网络查询 / Contact and dealer network lookup
#[async_trait]
pub trait ContactNetwork: Send + Sync {
    async fn contacts_of(&self, user_id: &str) -> Result<Vec<ParticipantKey>, ChatError>;
}

/// 内存联系人网络，可预置，供开发与测试使用
/// In-memory contact network, seedable, for dev and tests
pub struct StaticContactNetwork {
    entries: DashMap<String, Vec<ParticipantKey>>,
}

impl StaticContactNetwork {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn seed(&self, user_id: &str, contacts: Vec<ParticipantKey>) {
        self.entries.insert(user_id.to_string(), contacts);
    }
}

impl Default for StaticContactNetwork {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ContactNetwork for StaticContactNetwork {
    async fn contacts_of(&self, user_id: &str) -> Result<Vec<ParticipantKey>, ChatError> {
        Ok(self
            .entries
            .get(user_id)
            .map(|c| c.value().clone())
            .unwrap_or_default())
    }
}

/// 联系人服务远端实现 / Remote implementation against the contacts service
pub struct RemoteContactNetwork {
    base_url: String,
    client: reqwest::Client,
}

impl RemoteContactNetwork {
    pub fn new(base_url: String, timeout_ms: u64) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_millis(timeout_ms))
            .build()?;
        Ok(Self { base_url, client })
    }
}

#[async_trait]
impl ContactNetwork for RemoteContactNetwork {
    async fn contacts_of(&self, user_id: &str) -> Result<Vec<ParticipantKey>, ChatError> {
        let resp = self
            .client
            .get(format!("{}/v1/contacts", self.base_url))
            .query(&[("user_id", user_id)])
            .send()
            .await?;
        if !resp.status().is_success() {
            return Err(ChatError::Unavailable(format!(
                "contacts service returned {}",
                resp.status()
            )));
        }
        let contacts: Vec<ParticipantKey> = resp.json().await?;
        Ok(contacts)
    }
}
