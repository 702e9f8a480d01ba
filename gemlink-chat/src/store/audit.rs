use super::ChatStore;
use crate::error::ChatError;
use serde::{Deserialize, Serialize};

/// 成员移除/退出审计记录 / Member removal or leave audit record
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct RemovalRecord {
    pub chat_id: String,
    pub user_id: String,
    pub removed_by: String,
    pub is_leaving: bool,
    pub reason: Option<String>,
    pub removed_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct BlockRecord {
    pub blocker_id: String,
    pub blocked_id: String,
    pub blocked_at: chrono::DateTime<chrono::Utc>,
    pub unblocked_at: Option<chrono::DateTime<chrono::Utc>>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct ReportRecord {
    pub id: String,
    pub reporter_id: String,
    pub reported_id: String,
    pub reason: String,
    pub details: Option<String>,
    pub reported_at: chrono::DateTime<chrono::Utc>,
}

fn block_pair(blocker: &str, blocked: &str) -> String {
    format!("{}:{}", blocker, blocked)
}

impl ChatStore {
    pub fn record_removal(&self, record: RemovalRecord) {
        self.removals
            .entry(record.chat_id.clone())
            .or_default()
            .push(record);
    }

    pub fn removals_for_room(&self, room_id: &str) -> Vec<RemovalRecord> {
        self.removals
            .get(room_id)
            .map(|r| r.value().clone())
            .unwrap_or_default()
    }

    /// 重复屏蔽返回 Conflict / Blocking twice returns Conflict
    pub fn record_block(&self, blocker: &str, blocked: &str) -> Result<BlockRecord, ChatError> {
        let pair = block_pair(blocker, blocked);
        if !self.active_blocks.insert(pair) {
            return Err(ChatError::Conflict(format!(
                "user {} is already blocked",
                blocked
            )));
        }
        let record = BlockRecord {
            blocker_id: blocker.to_string(),
            blocked_id: blocked.to_string(),
            blocked_at: chrono::Utc::now(),
            unblocked_at: None,
        };
        self.blocks
            .entry(blocker.to_string())
            .or_default()
            .push(record.clone());
        Ok(record)
    }

    pub fn record_unblock(&self, blocker: &str, blocked: &str) -> Result<(), ChatError> {
        let pair = block_pair(blocker, blocked);
        if self.active_blocks.remove(&pair).is_none() {
            return Err(ChatError::InvalidArgument(format!(
                "user {} is not blocked",
                blocked
            )));
        }
        if let Some(mut records) = self.blocks.get_mut(blocker) {
            if let Some(open) = records
                .iter_mut()
                .rev()
                .find(|r| r.blocked_id == blocked && r.unblocked_at.is_none())
            {
                open.unblocked_at = Some(chrono::Utc::now());
            }
        }
        Ok(())
    }

    pub fn is_blocked(&self, blocker: &str, blocked: &str) -> bool {
        self.active_blocks.contains(&block_pair(blocker, blocked))
    }

    pub fn record_report(&self, record: ReportRecord) -> ReportRecord {
        self.reports.insert(record.id.clone(), record.clone());
        record
    }
}
