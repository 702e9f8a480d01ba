use crate::server::ChatServer;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::time::{interval, Duration};

/// 定期下线过期动态与过期邀请码
/// Periodically deactivates expired statuses and expired invite codes
pub fn spawn_expiry_sweeper(
    server: Arc<ChatServer>,
    interval_ms: u64,
    mut shutdown_rx: watch::Receiver<bool>,
) {
    tokio::spawn(async move {
        tracing::info!("⏰ Expiry sweeper running every {}ms", interval_ms);
        let mut sweep_interval = interval(Duration::from_millis(interval_ms.max(100)));
        loop {
            tokio::select! {
                _ = sweep_interval.tick() => {
                    let now = chrono::Utc::now();
                    let statuses = server.store.deactivate_expired_statuses(now);
                    let invites = server.store.deactivate_expired_invites(now);
                    if statuses > 0 || invites > 0 {
                        tracing::info!(
                            "🧹 Swept {} expired statuses, {} expired invites",
                            statuses,
                            invites
                        );
                    }
                }
                _ = shutdown_rx.changed() => {
                    if *shutdown_rx.borrow() { break; }
                }
            }
        }
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_sweeper_deactivates_expired() {
        let server = Arc::new(ChatServer::new());
        let now = chrono::Utc::now();
        let status = crate::domain::ChatStatus {
            id: "s1".to_string(),
            creator: crate::domain::ParticipantKey::user("1"),
            content: "old".to_string(),
            media_url: None,
            visible_to: Vec::new(),
            viewed_by: Vec::new(),
            created_at: now - chrono::Duration::hours(48),
            expires_at: now - chrono::Duration::hours(24),
            is_active: true,
        };
        server.store.insert_status(status);

        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        spawn_expiry_sweeper(server.clone(), 100, shutdown_rx);
        tokio::time::sleep(Duration::from_millis(300)).await;
        let _ = shutdown_tx.send(true);

        let swept = server.store.get_status("s1").unwrap();
        assert!(!swept.is_active);
    }
}
