use crate::clients::{
    AuthService, BlobStore, ContactNetwork, DevAuthService, LocalBlobStore, ProfileLookup,
    StaticContactNetwork, StaticProfileLookup,
};
use crate::config::{InviteConfigLite, StatusConfigLite};
use crate::store::ChatStore;
use async_trait::async_trait;
use dashmap::{DashMap, DashSet};
use gemlink_core::{HealthCheck, HealthStatus};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

/// 客户端连接信息 / Client connection information
#[derive(Clone)]
pub struct Connection {
    pub connection_id: String,
    pub user_id: String,
    pub addr: SocketAddr,
    pub sender: mpsc::UnboundedSender<Message>, // 消息发送器 / Message sender
}

/// 服务端全局状态 / Server global state
pub struct ChatServer {
    pub connections: Arc<DashMap<String, Connection>>, // 活跃连接 / Live connections
    pub rooms: Arc<DashMap<String, DashSet<String>>>,  // 房间到连接集合 / Room -> connection ids
    pub store: Arc<ChatStore>,                         // 聊天文档存储 / Chat document store
    pub auth: Arc<dyn AuthService>,                    // 身份解析 / Identity resolution
    pub contacts: Arc<dyn ContactNetwork>,             // 联系人网络 / Contact network
    pub profiles: Arc<dyn ProfileLookup>,              // 资料查询 / Profile lookup
    pub blobs: Arc<dyn BlobStore>,                     // 附件存储 / Blob storage
    pub status_config: StatusConfigLite,
    pub invite_config: InviteConfigLite,
}

impl ChatServer {
    /// 构建默认服务器实例 / Build default server instance
    pub fn new() -> Self {
        Self {
            connections: Arc::new(DashMap::new()),
            rooms: Arc::new(DashMap::new()),
            store: Arc::new(ChatStore::new()),
            auth: Arc::new(DevAuthService),
            contacts: Arc::new(StaticContactNetwork::new()),
            profiles: Arc::new(StaticProfileLookup::new()),
            blobs: Arc::new(LocalBlobStore::new("uploads")),
            status_config: StatusConfigLite { ttl_hours: 24 },
            invite_config: InviteConfigLite {
                ttl_hours: 24,
                code_length: 32,
            },
        }
    }

    /// 配置鉴权实现 / Configure auth implementation
    pub fn with_auth(mut self, auth: Arc<dyn AuthService>) -> Self {
        self.auth = auth;
        self
    }

    /// 配置联系人网络 / Configure contact network
    pub fn with_contacts(mut self, contacts: Arc<dyn ContactNetwork>) -> Self {
        self.contacts = contacts;
        self
    }

    /// 配置资料查询 / Configure profile lookup
    pub fn with_profiles(mut self, profiles: Arc<dyn ProfileLookup>) -> Self {
        self.profiles = profiles;
        self
    }

    /// 配置附件存储 / Configure blob storage
    pub fn with_blobs(mut self, blobs: Arc<dyn BlobStore>) -> Self {
        self.blobs = blobs;
        self
    }

    pub fn with_status_config(mut self, config: StatusConfigLite) -> Self {
        self.status_config = config;
        self
    }

    pub fn with_invite_config(mut self, config: InviteConfigLite) -> Self {
        self.invite_config = config;
        self
    }

    /// 逻辑连接ID由已鉴权用户ID导出 / Logical connection id derived from the authed user id
    pub fn connection_id_for(user_id: &str) -> String {
        format!("user_{}", user_id)
    }

    /// 注册连接；同一用户重连时替换旧句柄
    /// Register a connection; a reconnect replaces the previous handle
    pub fn register_connection(
        &self,
        user_id: &str,
        addr: SocketAddr,
        sender: mpsc::UnboundedSender<Message>,
    ) -> String {
        let connection_id = Self::connection_id_for(user_id);
        self.connections.insert(
            connection_id.clone(),
            Connection {
                connection_id: connection_id.clone(),
                user_id: user_id.to_string(),
                addr,
                sender,
            },
        );
        connection_id
    }

    /// 幂等加入房间 / Idempotent room join
    pub fn join_room(&self, room_id: &str, connection_id: &str) {
        self.rooms
            .entry(room_id.to_string())
            .or_default()
            .insert(connection_id.to_string());
    }

    /// 幂等离开房间 / Idempotent room leave
    pub fn leave_room(&self, room_id: &str, connection_id: &str) {
        if let Some(set) = self.rooms.get(room_id) {
            set.remove(connection_id);
        }
    }

    /// 一步从活跃表和所有房间移除 / Remove from the live map and every room in one step
    pub fn disconnect(&self, connection_id: &str) {
        self.connections.remove(connection_id);
        for entry in self.rooms.iter() {
            entry.value().remove(connection_id);
        }
    }

    pub fn connections_in_room(&self, room_id: &str) -> Vec<String> {
        self.rooms
            .get(room_id)
            .map(|set| set.iter().map(|c| c.key().clone()).collect())
            .unwrap_or_default()
    }

    /// 关停时关闭所有活跃连接 / Close every live connection on shutdown
    pub fn shutdown_connections(&self) {
        for entry in self.connections.iter() {
            let _ = entry.value().sender.send(Message::Close(None));
        }
        self.connections.clear();
        self.rooms.clear();
    }
}

impl Default for ChatServer {
    fn default() -> Self {
        Self::new()
    }
}

/// 便捷克隆 / Convenience clone
impl Clone for ChatServer {
    fn clone(&self) -> Self {
        Self {
            connections: self.connections.clone(),
            rooms: self.rooms.clone(),
            store: self.store.clone(),
            auth: self.auth.clone(),
            contacts: self.contacts.clone(),
            profiles: self.profiles.clone(),
            blobs: self.blobs.clone(),
            status_config: self.status_config.clone(),
            invite_config: self.invite_config.clone(),
        }
    }
}

#[async_trait]
impl HealthCheck for ChatServer {
    async fn check_health(&self) -> HealthStatus {
        HealthStatus {
            component: "gemlink-chat".to_string(),
            healthy: true,
            message: Some(format!(
                "{} connections, {} rooms",
                self.connections.len(),
                self.store.rooms.len()
            )),
            timestamp: chrono::Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_disconnect_sweeps_every_room() {
        let server = ChatServer::new();
        let (tx, _rx) = mpsc::unbounded_channel();
        let cid = server.register_connection("1", "127.0.0.1:0".parse().unwrap(), tx);
        server.join_room("r1", &cid);
        server.join_room("r2", &cid);
        server.join_room("r1", &cid); // idempotent
        assert_eq!(server.connections_in_room("r1").len(), 1);

        server.disconnect(&cid);
        assert!(server.connections.get(&cid).is_none());
        assert!(server.connections_in_room("r1").is_empty());
        assert!(server.connections_in_room("r2").is_empty());
    }

    #[tokio::test]
    async fn test_reconnect_replaces_handle() {
        let server = ChatServer::new();
        let (tx1, _rx1) = mpsc::unbounded_channel();
        let (tx2, rx2) = mpsc::unbounded_channel();
        let cid = server.register_connection("9", "127.0.0.1:0".parse().unwrap(), tx1);
        let cid2 = server.register_connection("9", "127.0.0.1:0".parse().unwrap(), tx2);
        assert_eq!(cid, cid2);
        assert_eq!(server.connections.len(), 1);
        drop(rx2);
    }
}
