use crate::domain::{
    ChatRoom, ChatType, GroupAdmin, GroupInvite, MemberRole, Participant, ParticipantKey,
    RoomSettings, FULL_ADMIN_PERMISSIONS,
};
use crate::error::ChatError;
use crate::server::ChatServer;
use crate::store::{RedeemOutcome, RemovalRecord};
use rand::{distributions::Alphanumeric, Rng};
use serde::Deserialize;

fn require_group(room: &ChatRoom) -> Result<(), ChatError> {
    if room.chat_type != ChatType::Group {
        return Err(ChatError::InvalidState(
            "operation is only valid for group chats".to_string(),
        ));
    }
    Ok(())
}

/// 授予管理员：并集合并，操作者被强制保留，新管理员必须是现有参与者
/// Grant admins: union merge, the actor is force-retained, every new admin
/// must be a current participant
pub fn grant_admins(
    server: &ChatServer,
    room_ref: &str,
    actor_id: &str,
    new_admin_ids: Vec<String>,
) -> Result<Vec<GroupAdmin>, ChatError> {
    server.store.update_room(room_ref, |room| {
        require_group(room)?;
        if !room.is_admin(actor_id) {
            return Err(ChatError::Forbidden(
                "only admins may grant admin rights".to_string(),
            ));
        }
        let offenders: Vec<String> = new_admin_ids
            .iter()
            .filter(|id| !room.is_participant(&ParticipantKey::user(id.as_str())))
            .cloned()
            .collect();
        if !offenders.is_empty() {
            return Err(ChatError::InvalidArgument(format!(
                "not participants of this chat: {}",
                offenders.join(", ")
            )));
        }

        // 操作者不可经由本调用把自己移出管理员集合
        // The actor cannot demote themselves through this call
        let mut grant_ids = new_admin_ids;
        if !grant_ids.iter().any(|id| id == actor_id) {
            grant_ids.push(actor_id.to_string());
        }

        let now = chrono::Utc::now();
        for id in grant_ids {
            if room.is_admin(&id) {
                continue;
            }
            room.settings.group_admins.push(GroupAdmin {
                user_id: id.clone(),
                permissions: FULL_ADMIN_PERMISSIONS.iter().map(|p| p.to_string()).collect(),
                granted_at: now,
            });
            if let Some(p) = room
                .participants
                .iter_mut()
                .find(|p| p.key() == ParticipantKey::user(id.as_str()))
            {
                p.role = MemberRole::Admin;
            }
        }
        Ok(room.settings.group_admins.clone())
    })
}

/// 加人资格：管理员恒可；普通成员需开启 allow_member_adds
/// Add eligibility: admins always may; members need allow_member_adds
pub fn can_add_members(room: &ChatRoom, actor_id: &str) -> bool {
    if room.is_admin(actor_id) {
        return true;
    }
    room.is_participant(&ParticipantKey::user(actor_id)) && room.settings.allow_member_adds
}

/// 批量加人：已在群内的静默跳过，返回确实新增的成员
/// Bulk add: ids already present are silently skipped; returns only
/// the genuinely new entries
pub fn add_members(
    server: &ChatServer,
    room_ref: &str,
    actor_id: &str,
    member_keys: Vec<ParticipantKey>,
) -> Result<Vec<Participant>, ChatError> {
    server.store.update_room(room_ref, |room| {
        require_group(room)?;
        if !can_add_members(room, actor_id) {
            return Err(ChatError::Forbidden(
                "actor may not add members to this chat".to_string(),
            ));
        }
        let now = chrono::Utc::now();
        let mut added = Vec::new();
        for key in member_keys {
            if room.is_participant(&key) {
                continue;
            }
            let participant = Participant {
                id: key.id.clone(),
                kind: key.kind,
                role: MemberRole::Member,
                joined_at: now,
                permissions: Vec::new(),
            };
            room.participants.push(participant.clone());
            added.push(participant);
        }
        Ok(added)
    })
}

/// 移除成员或自行退出。退出方为唯一管理员时被拒；移除前先落审计记录。
/// Remove a member or self-leave. A sole admin may not leave; the audit
/// record lands before the participant is pulled.
pub fn remove_member(
    server: &ChatServer,
    room_ref: &str,
    target: &ParticipantKey,
    actor_id: &str,
    is_leaving: bool,
    reason: Option<String>,
) -> Result<(), ChatError> {
    let store = &server.store;
    store.update_room(room_ref, |room| {
        require_group(room)?;
        if is_leaving {
            if target.id != actor_id {
                return Err(ChatError::InvalidArgument(
                    "leave target must be the caller".to_string(),
                ));
            }
            // 唯一管理员须先移交再退出 / The sole admin must hand over before leaving
            if room.is_admin(&target.id) && room.admin_count() == 1 {
                return Err(ChatError::InvalidState(
                    "sole admin cannot leave; promote another admin first".to_string(),
                ));
            }
        } else if !room.is_admin(actor_id) {
            return Err(ChatError::Forbidden(
                "only admins may remove members".to_string(),
            ));
        }
        if !room.is_participant(target) {
            return Err(ChatError::NotFound(format!(
                "{} is not a participant of this chat",
                target.storage_key()
            )));
        }

        store.record_removal(RemovalRecord {
            chat_id: room.id.clone(),
            user_id: target.id.clone(),
            removed_by: actor_id.to_string(),
            is_leaving,
            reason,
            removed_at: chrono::Utc::now(),
        });

        room.participants.retain(|p| &p.key() != target);
        room.settings
            .group_admins
            .retain(|a| a.user_id != target.id);
        // 参与者集在活跃期间不可为空 / The participant set may not be empty while active
        if room.participants.is_empty() {
            room.is_active = false;
        }
        Ok(())
    })
}

/// 发放邀请码 / Issue an invite code
pub fn create_invite(
    server: &ChatServer,
    room_ref: &str,
    creator_id: &str,
    ttl_hours: Option<i64>,
) -> Result<GroupInvite, ChatError> {
    let room = server.store.get_room(room_ref)?;
    require_group(&room)?;
    if !room.is_participant(&ParticipantKey::user(creator_id)) {
        return Err(ChatError::Forbidden(
            "creator is not a participant of this chat".to_string(),
        ));
    }
    let is_admin = room.is_admin(creator_id);
    let allowed = (is_admin && room.settings.allow_admin_invites)
        || (!is_admin && room.settings.allow_user_invites);
    if !allowed {
        return Err(ChatError::Forbidden(
            "invite creation is not permitted for this member".to_string(),
        ));
    }

    let code: String = rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(server.invite_config.code_length)
        .map(char::from)
        .collect();
    let now = chrono::Utc::now();
    let ttl = ttl_hours.unwrap_or(server.invite_config.ttl_hours);
    let invite = GroupInvite {
        code,
        chat_id: room.id.clone(),
        created_by: creator_id.to_string(),
        created_at: now,
        expires_at: now + chrono::Duration::hours(ttl),
        is_active: true,
        used_by: None,
        used_at: None,
    };
    Ok(server.store.insert_invite(invite))
}

/// 兑换邀请码（单次、原子）/ Redeem an invite code, single-use and atomic
pub fn redeem_invite(
    server: &ChatServer,
    code: &str,
    user_id: &str,
) -> Result<RedeemOutcome, ChatError> {
    server
        .store
        .redeem_invite(code, &ParticipantKey::user(user_id), chrono::Utc::now())
}

/// 设置补丁：仅覆盖提供的键 / Settings patch: only provided keys are applied
#[derive(Deserialize, Debug, Default)]
pub struct SettingsPatch {
    pub title: Option<String>,
    pub group_image: Option<String>,
    pub allow_gem_sharing: Option<bool>,
    pub allow_status_sharing: Option<bool>,
    pub allow_member_adds: Option<bool>,
    pub allow_admin_invites: Option<bool>,
    pub allow_user_invites: Option<bool>,
    pub only_admins_message: Option<bool>,
}

pub fn update_settings(
    server: &ChatServer,
    room_ref: &str,
    actor_id: &str,
    patch: SettingsPatch,
) -> Result<RoomSettings, ChatError> {
    server.store.update_room(room_ref, |room| {
        require_group(room)?;
        if !room.is_admin(actor_id) {
            return Err(ChatError::Forbidden(
                "only admins may update settings".to_string(),
            ));
        }
        if let Some(title) = patch.title {
            room.title = Some(title);
        }
        if let Some(image) = patch.group_image {
            room.group_image = Some(image);
        }
        if let Some(v) = patch.allow_gem_sharing {
            room.settings.allow_gem_sharing = v;
        }
        if let Some(v) = patch.allow_status_sharing {
            room.settings.allow_status_sharing = v;
        }
        if let Some(v) = patch.allow_member_adds {
            room.settings.allow_member_adds = v;
        }
        if let Some(v) = patch.allow_admin_invites {
            room.settings.allow_admin_invites = v;
        }
        if let Some(v) = patch.allow_user_invites {
            room.settings.allow_user_invites = v;
        }
        if let Some(v) = patch.only_admins_message {
            room.settings.only_admins_message = v;
        }
        Ok(room.settings.clone())
    })
}
