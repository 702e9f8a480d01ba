use super::ChatStore;
use crate::domain::{ChatRoom, ChatType, ParticipantKey};
use crate::error::ChatError;

impl ChatStore {
    /// 登记新房间并注册别名 / Register a new room and its alias
    pub fn insert_room(&self, room: ChatRoom) -> ChatRoom {
        self.room_aliases
            .insert(room.chat_id.clone(), room.id.clone());
        self.messages.entry(room.id.clone()).or_default();
        self.rooms.insert(room.id.clone(), room.clone());
        room
    }

    /// 主键或 chat_id 别名均可定位 / Resolve by primary id or chat_id alias
    pub fn resolve_room_id(&self, room_ref: &str) -> Option<String> {
        if self.rooms.contains_key(room_ref) {
            return Some(room_ref.to_string());
        }
        self.room_aliases.get(room_ref).map(|r| r.value().clone())
    }

    pub fn get_room(&self, room_ref: &str) -> Result<ChatRoom, ChatError> {
        let id = self
            .resolve_room_id(room_ref)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", room_ref)))?;
        self.rooms
            .get(&id)
            .map(|r| r.value().clone())
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", room_ref)))
    }

    /// 在条目守卫下原子更新房间 / Atomically update a room under its entry guard
    pub fn update_room<T>(
        &self,
        room_ref: &str,
        f: impl FnOnce(&mut ChatRoom) -> Result<T, ChatError>,
    ) -> Result<T, ChatError> {
        let id = self
            .resolve_room_id(room_ref)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", room_ref)))?;
        let mut entry = self
            .rooms
            .get_mut(&id)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", room_ref)))?;
        f(entry.value_mut())
    }

    /// 参与者的活跃房间，按 last_activity 降序
    /// Active rooms for a participant, last_activity descending
    pub fn list_rooms_for_participant(&self, key: &ParticipantKey) -> Vec<ChatRoom> {
        let mut rooms: Vec<ChatRoom> = self
            .rooms
            .iter()
            .filter(|r| r.is_active && r.is_participant(key))
            .map(|r| r.value().clone())
            .collect();
        rooms.sort_by(|a, b| b.last_activity.cmp(&a.last_activity));
        rooms
    }

    /// 给除发送者外的每个参与者未读数加一
    /// Add one unread for every participant except the sender
    pub fn increment_unread(
        &self,
        room_ref: &str,
        exclude: &ParticipantKey,
    ) -> Result<(), ChatError> {
        self.update_room(room_ref, |room| {
            let keys: Vec<String> = room
                .participants
                .iter()
                .map(|p| p.key())
                .filter(|k| k != exclude)
                .map(|k| k.storage_key())
                .collect();
            for key in keys {
                *room.unread_counts.entry(key).or_insert(0) += 1;
            }
            Ok(())
        })
    }

    pub fn reset_unread(&self, room_ref: &str, key: &ParticipantKey) -> Result<(), ChatError> {
        self.update_room(room_ref, |room| {
            room.unread_counts.insert(key.storage_key(), 0);
            Ok(())
        })
    }

    /// 查找两名用户间的活跃直聊 / Find an active direct chat between two users
    pub fn find_direct_chat(&self, a: &ParticipantKey, b: &ParticipantKey) -> Option<ChatRoom> {
        self.rooms
            .iter()
            .find(|r| {
                r.is_active
                    && r.chat_type == ChatType::Direct
                    && r.is_participant(a)
                    && r.is_participant(b)
            })
            .map(|r| r.value().clone())
    }

    /// 查找用户与经销商间的活跃会话 / Find an active dealer chat
    pub fn find_dealer_chat(&self, user: &ParticipantKey, dealer: &ParticipantKey) -> Option<ChatRoom> {
        self.rooms
            .iter()
            .find(|r| {
                r.is_active
                    && r.chat_type == ChatType::Dealer
                    && r.is_participant(user)
                    && r.is_participant(dealer)
            })
            .map(|r| r.value().clone())
    }
}
