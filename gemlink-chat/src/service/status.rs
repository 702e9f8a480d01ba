use crate::domain::{ChatStatus, ParticipantKey, StatusView};
use crate::error::ChatError;
use crate::server::ChatServer;
use uuid::Uuid;

/// 发布动态：可见名单在发布时刻对联系人网络做快照
/// Post a status: the visibility list snapshots the contact network
/// at posting time
pub async fn post(
    server: &ChatServer,
    creator_id: &str,
    content: String,
    media_url: Option<String>,
    ttl_hours: Option<i64>,
) -> Result<ChatStatus, ChatError> {
    let visible_to = server.contacts.contacts_of(creator_id).await?;
    let now = chrono::Utc::now();
    let ttl = ttl_hours.unwrap_or(server.status_config.ttl_hours);
    let status = ChatStatus {
        id: Uuid::new_v4().to_string(),
        creator: ParticipantKey::user(creator_id),
        content,
        media_url,
        visible_to,
        viewed_by: Vec::new(),
        created_at: now,
        expires_at: now + chrono::Duration::hours(ttl),
        is_active: true,
    };
    Ok(server.store.insert_status(status))
}

/// 查看者可见的动态：自己的，加上可见名单包含自己的，未过期且活跃
/// Statuses visible to a viewer: their own plus those whose visibility
/// list names them, unexpired and active
pub fn list_visible(server: &ChatServer, viewer_id: &str) -> Vec<ChatStatus> {
    let viewer = ParticipantKey::user(viewer_id);
    let now = chrono::Utc::now();
    let mut visible: Vec<ChatStatus> = server
        .store
        .all_statuses()
        .into_iter()
        .filter(|s| s.is_active && !s.is_expired(now))
        .filter(|s| s.creator == viewer || s.visible_to.contains(&viewer))
        .collect();
    visible.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    visible
}

/// 记录浏览：同一查看者重复调用不再追加
/// Record a view: repeated calls by the same viewer do not append again
pub fn record_view(
    server: &ChatServer,
    status_id: &str,
    viewer_id: &str,
) -> Result<ChatStatus, ChatError> {
    let viewer = ParticipantKey::user(viewer_id);
    server.store.update_status(status_id, |status| {
        let now = chrono::Utc::now();
        if !status.is_active || status.is_expired(now) {
            return Err(ChatError::NotFound("status not found".to_string()));
        }
        if status.creator != viewer && !status.visible_to.contains(&viewer) {
            return Err(ChatError::Forbidden(
                "status is not visible to this viewer".to_string(),
            ));
        }
        if !status.viewed_by.iter().any(|v| v.viewer == viewer) {
            status.viewed_by.push(StatusView {
                viewer,
                viewed_at: now,
            });
        }
        Ok(status.clone())
    })
}
