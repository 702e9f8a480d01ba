use crate::clients::Profile;
use crate::domain::{
    ChatRoom, ChatType, ClearHistoryMarker, GroupAdmin, MemberRole, MessageType, Participant,
    ParticipantKey, ParticipantKind, RoomSettings, FULL_ADMIN_PERMISSIONS,
};
use crate::error::ChatError;
use crate::server::ChatServer;
use serde::Serialize;
use uuid::Uuid;

/// 面向查看者的最新消息投影 / Last-message projection for a viewer
#[derive(Serialize, Debug)]
pub struct LastMessageView {
    pub id: String,
    pub content: String,
    pub sender: ParticipantKey,
    pub timestamp: chrono::DateTime<chrono::Utc>,
    pub message_type: MessageType,
    pub is_from_me: bool,
    pub is_read: bool,
}

/// 面向查看者的房间投影：未读数与资料增强
/// Room projection for a viewer: unread count and profile enrichment
#[derive(Serialize, Debug)]
pub struct RoomView {
    pub id: String,
    pub chat_id: String,
    pub chat_type: ChatType,
    pub title: Option<String>,
    pub group_image: Option<String>,
    pub is_active: bool,
    pub created_at: chrono::DateTime<chrono::Utc>,
    pub last_activity: chrono::DateTime<chrono::Utc>,
    pub participants: Vec<Participant>,
    pub unread_count: u32,
    pub last_message: Option<LastMessageView>,
    pub other_user: Option<Profile>,
}

fn new_room(
    chat_type: ChatType,
    creator: ParticipantKey,
    participants: Vec<Participant>,
    title: Option<String>,
    group_image: Option<String>,
    settings: RoomSettings,
) -> ChatRoom {
    let id = Uuid::new_v4().to_string();
    let now = chrono::Utc::now();
    ChatRoom {
        chat_id: format!("chat_{}", &id[..8]),
        id,
        chat_type,
        creator,
        participants,
        title,
        group_image,
        is_active: true,
        created_at: now,
        last_activity: now,
        last_message: None,
        unread_counts: Default::default(),
        settings,
    }
}

fn member(key: &ParticipantKey, role: MemberRole, permissions: Vec<String>) -> Participant {
    Participant {
        id: key.id.clone(),
        kind: key.kind,
        role,
        joined_at: chrono::Utc::now(),
        permissions,
    }
}

/// 两名用户间的直聊；已存在活跃直聊时复用
/// Direct chat between two users; an existing active chat is reused
pub fn create_direct(
    server: &ChatServer,
    creator_id: &str,
    other_user_id: &str,
) -> Result<(ChatRoom, bool), ChatError> {
    if creator_id == other_user_id {
        return Err(ChatError::InvalidArgument(
            "cannot open a direct chat with yourself".to_string(),
        ));
    }
    let creator = ParticipantKey::user(creator_id);
    let other = ParticipantKey::user(other_user_id);
    if let Some(existing) = server.store.find_direct_chat(&creator, &other) {
        return Ok((existing, false));
    }
    let room = new_room(
        ChatType::Direct,
        creator.clone(),
        vec![
            member(&creator, MemberRole::Member, Vec::new()),
            member(&other, MemberRole::Member, Vec::new()),
        ],
        None,
        None,
        RoomSettings::default(),
    );
    Ok((server.store.insert_room(room), true))
}

/// 经销商会话；要求对方在调用者的联系人网络内
/// Dealer chat; the dealer must be in the caller's contact network
pub async fn create_dealer(
    server: &ChatServer,
    user_id: &str,
    dealer_id: &str,
) -> Result<(ChatRoom, bool), ChatError> {
    let user = ParticipantKey::user(user_id);
    let dealer = ParticipantKey::dealer(dealer_id);
    let contacts = server.contacts.contacts_of(user_id).await?;
    if !contacts.contains(&dealer) {
        return Err(ChatError::InvalidArgument(format!(
            "dealer {} is not in your contact network",
            dealer_id
        )));
    }
    if let Some(existing) = server.store.find_dealer_chat(&user, &dealer) {
        return Ok((existing, false));
    }
    let room = new_room(
        ChatType::Dealer,
        user.clone(),
        vec![
            member(&user, MemberRole::Member, Vec::new()),
            member(&dealer, MemberRole::Member, Vec::new()),
        ],
        None,
        None,
        RoomSettings::default(),
    );
    Ok((server.store.insert_room(room), true))
}

/// 建群：创建者成为携带完整权限集的管理员，成员须来自联系人网络
/// Group creation: the creator becomes an admin with the full permission
/// set; members must come from the contact network
pub async fn create_group(
    server: &ChatServer,
    creator_id: &str,
    title: String,
    participant_keys: Vec<ParticipantKey>,
    group_image: Option<String>,
) -> Result<ChatRoom, ChatError> {
    let creator = ParticipantKey::user(creator_id);
    let contacts = server.contacts.contacts_of(creator_id).await?;
    let offenders: Vec<String> = participant_keys
        .iter()
        .filter(|k| **k != creator && !contacts.contains(k))
        .map(|k| k.storage_key())
        .collect();
    if !offenders.is_empty() {
        return Err(ChatError::InvalidArgument(format!(
            "participants not in your contact network: {}",
            offenders.join(", ")
        )));
    }

    let full_permissions: Vec<String> = FULL_ADMIN_PERMISSIONS
        .iter()
        .map(|p| p.to_string())
        .collect();
    let mut participants = vec![member(&creator, MemberRole::Admin, full_permissions.clone())];
    for key in &participant_keys {
        if *key == creator {
            continue;
        }
        participants.push(member(key, MemberRole::Member, Vec::new()));
    }

    let mut settings = RoomSettings::default();
    settings.group_admins.push(GroupAdmin {
        user_id: creator_id.to_string(),
        permissions: full_permissions,
        granted_at: chrono::Utc::now(),
    });

    let room = new_room(
        ChatType::Group,
        creator,
        participants,
        Some(title),
        group_image,
        settings,
    );
    Ok(server.store.insert_room(room))
}

/// 查看者视角的房间投影 / The room as seen by one viewer
pub async fn room_view(server: &ChatServer, room: &ChatRoom, viewer: &ParticipantKey) -> RoomView {
    let unread_count = room
        .unread_counts
        .get(&viewer.storage_key())
        .copied()
        .unwrap_or(0);

    let last_message = room.last_message.as_ref().map(|lm| {
        let is_read = server
            .store
            .get_message(&lm.id)
            .map(|m| m.is_read_by(viewer))
            .unwrap_or(false);
        LastMessageView {
            id: lm.id.clone(),
            content: lm.content.clone(),
            sender: lm.sender.clone(),
            timestamp: lm.timestamp,
            message_type: lm.message_type,
            is_from_me: &lm.sender == viewer,
            is_read,
        }
    });

    // 双人会话补充对端资料，缺失回退占位 / Two-party chats carry the peer
    // profile, placeholder on a miss
    let other_user = match room.chat_type {
        ChatType::Group => None,
        _ => {
            let other = room
                .participants
                .iter()
                .find(|p| p.kind == ParticipantKind::User && &p.key() != viewer)
                .map(|p| p.id.clone());
            match other {
                Some(id) => Some(
                    server
                        .profiles
                        .profile(&id)
                        .await
                        .unwrap_or_else(Profile::placeholder),
                ),
                None => None,
            }
        }
    };

    RoomView {
        id: room.id.clone(),
        chat_id: room.chat_id.clone(),
        chat_type: room.chat_type,
        title: room.title.clone(),
        group_image: room.group_image.clone(),
        is_active: room.is_active,
        created_at: room.created_at,
        last_activity: room.last_activity,
        participants: room.participants.clone(),
        unread_count,
        last_message,
        other_user,
    }
}

/// 分页房间列表，last_activity 降序 / Paginated room list, last_activity descending
pub async fn list_rooms(
    server: &ChatServer,
    viewer: &ParticipantKey,
    page: usize,
    limit: usize,
) -> Vec<RoomView> {
    let rooms = server.store.list_rooms_for_participant(viewer);
    let start = page.saturating_sub(1) * limit;
    let mut views = Vec::new();
    for room in rooms.into_iter().skip(start).take(limit) {
        views.push(room_view(server, &room, viewer).await);
    }
    views
}

pub async fn room_detail(
    server: &ChatServer,
    room_ref: &str,
    viewer: &ParticipantKey,
) -> Result<RoomView, ChatError> {
    let room = server.store.get_room(room_ref)?;
    if !room.is_participant(viewer) {
        return Err(ChatError::Forbidden(
            "viewer is not a participant of this chat".to_string(),
        ));
    }
    Ok(room_view(server, &room, viewer).await)
}

/// 按用户清空历史：把调用者加入每条现存消息的 deleted_for，
/// 并在房间设置里落下清空标记。
/// Per-user history clear: adds the caller to deleted_for of every
/// current message and records a clear marker in room settings.
pub fn clear_history(
    server: &ChatServer,
    room_ref: &str,
    user: &ParticipantKey,
) -> Result<usize, ChatError> {
    let room = server.store.get_room(room_ref)?;
    if !room.is_participant(user) {
        return Err(ChatError::Forbidden(
            "user is not a participant of this chat".to_string(),
        ));
    }
    let cleared = server
        .store
        .update_messages(&room.id, |message| message.deleted_for.insert(user.clone()))?;
    let last_id = room.last_message.as_ref().map(|lm| lm.id.clone());
    server.store.update_room(&room.id, |room| {
        room.settings.clear_history.insert(
            user.storage_key(),
            ClearHistoryMarker {
                cleared_at: chrono::Utc::now(),
                cleared_until_message_id: last_id,
            },
        );
        Ok(())
    })?;
    Ok(cleared)
}
