use crate::error::ChatError;
use crate::server::ChatServer;
use crate::store::{BlockRecord, ReportRecord};

use uuid::Uuid;

/// 拉黑：重复拉黑同一用户报冲突 / Block: blocking the same user twice conflicts
pub fn block_user(
    server: &ChatServer,
    blocker_id: &str,
    blocked_id: &str,
) -> Result<BlockRecord, ChatError> {
    if blocker_id == blocked_id {
        return Err(ChatError::InvalidArgument(
            "cannot block yourself".to_string(),
        ));
    }
    server.store.record_block(blocker_id, blocked_id)
}

/// 解除拉黑：未拉黑时报参数错误 / Unblock: not-blocked is an argument error
pub fn unblock_user(
    server: &ChatServer,
    blocker_id: &str,
    blocked_id: &str,
) -> Result<(), ChatError> {
    server.store.record_unblock(blocker_id, blocked_id)
}

pub fn is_blocked(server: &ChatServer, blocker_id: &str, blocked_id: &str) -> bool {
    server.store.is_blocked(blocker_id, blocked_id)
}

/// 举报用户，仅落审计记录 / Report a user, audit record only
pub fn report_user(
    server: &ChatServer,
    reporter_id: &str,
    reported_id: &str,
    reason: String,
    details: Option<String>,
) -> Result<ReportRecord, ChatError> {
    if reporter_id == reported_id {
        return Err(ChatError::InvalidArgument(
            "cannot report yourself".to_string(),
        ));
    }
    Ok(server.store.record_report(ReportRecord {
        id: Uuid::new_v4().to_string(),
        reporter_id: reporter_id.to_string(),
        reported_id: reported_id.to_string(),
        reason,
        details,
        reported_at: chrono::Utc::now(),
    }))
}
