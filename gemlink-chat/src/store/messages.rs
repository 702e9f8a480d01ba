use super::ChatStore;
use crate::domain::{ChatMessage, LastMessage, ParticipantKey};
use crate::error::ChatError;

impl ChatStore {
    /// 追加消息：时间戳与序号在此边界由服务端赋值，随后刷新
    /// last_message 投影并推进 last_activity。
    /// Append a message: timestamp and seq are server-assigned at this
    /// boundary; the last_message projection and last_activity follow.
    pub fn append_message(
        &self,
        room_ref: &str,
        mut message: ChatMessage,
    ) -> Result<ChatMessage, ChatError> {
        let room_id = self
            .resolve_room_id(room_ref)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", room_ref)))?;

        message.timestamp = chrono::Utc::now();
        message.seq = self.next_seq();
        message.chat_id = room_id.clone();

        {
            let mut list = self.messages.entry(room_id.clone()).or_default();
            list.push(message.clone());
        }
        self.message_rooms
            .insert(message.id.clone(), room_id.clone());

        let projection = LastMessage {
            id: message.id.clone(),
            content: message.content.clone(),
            sender: message.sender.clone(),
            timestamp: message.timestamp,
            message_type: message.message_type,
            seq: message.seq,
        };
        self.update_room(&room_id, |room| {
            // 并发追加以最大 seq 胜出 / The largest seq wins under concurrent appends
            let newer = room
                .last_message
                .as_ref()
                .map(|lm| projection.seq > lm.seq)
                .unwrap_or(true);
            if newer {
                room.last_message = Some(projection.clone());
            }
            if projection.timestamp > room.last_activity {
                room.last_activity = projection.timestamp;
            }
            Ok(())
        })?;

        Ok(message)
    }

    pub fn get_message(&self, message_id: &str) -> Result<ChatMessage, ChatError> {
        let room_id = self
            .message_rooms
            .get(message_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| ChatError::NotFound(format!("message {} not found", message_id)))?;
        let list = self
            .messages
            .get(&room_id)
            .ok_or_else(|| ChatError::NotFound(format!("message {} not found", message_id)))?;
        list.iter()
            .find(|m| m.id == message_id)
            .cloned()
            .ok_or_else(|| ChatError::NotFound(format!("message {} not found", message_id)))
    }

    /// 在所属房间的条目守卫下原子更新单条消息
    /// Atomically update one message under its room's entry guard
    pub fn update_message<T>(
        &self,
        message_id: &str,
        f: impl FnOnce(&mut ChatMessage) -> Result<T, ChatError>,
    ) -> Result<T, ChatError> {
        let room_id = self
            .message_rooms
            .get(message_id)
            .map(|r| r.value().clone())
            .ok_or_else(|| ChatError::NotFound(format!("message {} not found", message_id)))?;
        let mut list = self
            .messages
            .get_mut(&room_id)
            .ok_or_else(|| ChatError::NotFound(format!("message {} not found", message_id)))?;
        let message = list
            .iter_mut()
            .find(|m| m.id == message_id)
            .ok_or_else(|| ChatError::NotFound(format!("message {} not found", message_id)))?;
        f(message)
    }

    /// 在一个守卫内遍历修改房间的全部消息，返回被修改条数
    /// Mutate every message of a room under one guard, returns modified count
    pub fn update_messages<F>(&self, room_ref: &str, mut f: F) -> Result<usize, ChatError>
    where
        F: FnMut(&mut ChatMessage) -> bool,
    {
        let room_id = self
            .resolve_room_id(room_ref)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", room_ref)))?;
        let mut list = self.messages.entry(room_id).or_default();
        let mut changed = 0usize;
        for message in list.iter_mut() {
            if f(message) {
                changed += 1;
            }
        }
        Ok(changed)
    }

    /// 查看者视角的消息列表：软删除过滤 + 游标分页，最新在前
    /// Messages as seen by a viewer: soft-delete filter + cursor paging, newest first
    pub fn messages_for_viewer(
        &self,
        room_ref: &str,
        viewer: &ParticipantKey,
        before: Option<&str>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, ChatError> {
        let room_id = self
            .resolve_room_id(room_ref)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", room_ref)))?;
        let list = self
            .messages
            .get(&room_id)
            .map(|l| l.value().clone())
            .unwrap_or_default();

        let mut visible: Vec<ChatMessage> =
            list.into_iter().filter(|m| m.visible_to(viewer)).collect();
        visible.sort_by(|a, b| b.seq.cmp(&a.seq));

        let start = match before {
            Some(cursor) => match visible.iter().position(|m| m.id == cursor) {
                Some(pos) => pos + 1,
                None => {
                    return Err(ChatError::NotFound(format!(
                        "cursor message {} not found",
                        cursor
                    )))
                }
            },
            None => 0,
        };
        Ok(visible.into_iter().skip(start).take(limit).collect())
    }

    pub fn message_count(&self, room_ref: &str) -> usize {
        self.resolve_room_id(room_ref)
            .and_then(|id| self.messages.get(&id).map(|l| l.len()))
            .unwrap_or(0)
    }
}
