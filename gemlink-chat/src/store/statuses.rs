use super::ChatStore;
use crate::domain::ChatStatus;
use crate::error::ChatError;

impl ChatStore {
    pub fn insert_status(&self, status: ChatStatus) -> ChatStatus {
        self.statuses.insert(status.id.clone(), status.clone());
        status
    }

    pub fn get_status(&self, status_id: &str) -> Result<ChatStatus, ChatError> {
        self.statuses
            .get(status_id)
            .map(|s| s.value().clone())
            .ok_or_else(|| ChatError::NotFound(format!("status {} not found", status_id)))
    }

    pub fn update_status<T>(
        &self,
        status_id: &str,
        f: impl FnOnce(&mut ChatStatus) -> Result<T, ChatError>,
    ) -> Result<T, ChatError> {
        let mut entry = self
            .statuses
            .get_mut(status_id)
            .ok_or_else(|| ChatError::NotFound(format!("status {} not found", status_id)))?;
        f(entry.value_mut())
    }

    pub fn all_statuses(&self) -> Vec<ChatStatus> {
        self.statuses.iter().map(|s| s.value().clone()).collect()
    }

    /// 将已过期的状态置为不活跃，返回处理条数
    /// Flip expired statuses inactive, returns the number handled
    pub fn deactivate_expired_statuses(&self, now: chrono::DateTime<chrono::Utc>) -> usize {
        let mut swept = 0usize;
        for mut entry in self.statuses.iter_mut() {
            let status = entry.value_mut();
            if status.is_active && status.is_expired(now) {
                status.is_active = false;
                swept += 1;
            }
        }
        swept
    }
}
