use super::ChatStore;
use crate::domain::{ChatRoom, GroupInvite, MemberRole, Participant, ParticipantKey};
use crate::error::ChatError;

/// 兑换结果 / Redemption outcome
#[derive(Debug)]
pub enum RedeemOutcome {
    Joined(ChatRoom),
    AlreadyMember(ChatRoom),
}

impl ChatStore {
    pub fn insert_invite(&self, invite: GroupInvite) -> GroupInvite {
        self.invites.insert(invite.code.clone(), invite.clone());
        invite
    }

    pub fn get_invite(&self, code: &str) -> Result<GroupInvite, ChatError> {
        self.invites
            .get(code)
            .map(|i| i.value().clone())
            .ok_or_else(|| ChatError::NotFound("invite not found".to_string()))
    }

    /// 原子兑换：入群与核销在同一临界区内完成，不存在
    /// "已入群但邀请仍可兑换" 的窗口。锁序固定为 房间 -> 邀请。
    /// Atomic redemption: join and mark-used happen inside one critical
    /// section, so there is no window where the user joined but the invite
    /// is still redeemable. Lock order is fixed: room, then invite.
    pub fn redeem_invite(
        &self,
        code: &str,
        user: &ParticipantKey,
        now: chrono::DateTime<chrono::Utc>,
    ) -> Result<RedeemOutcome, ChatError> {
        let chat_id = self
            .invites
            .get(code)
            .map(|i| i.chat_id.clone())
            .ok_or_else(|| ChatError::NotFound("invite not found".to_string()))?;
        let room_id = self
            .resolve_room_id(&chat_id)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", chat_id)))?;

        let mut room_entry = self
            .rooms
            .get_mut(&room_id)
            .ok_or_else(|| ChatError::NotFound(format!("chat {} not found", chat_id)))?;
        let mut invite_entry = self
            .invites
            .get_mut(code)
            .ok_or_else(|| ChatError::NotFound("invite not found".to_string()))?;

        let invite = invite_entry.value_mut();
        if invite.used_by.is_some() {
            return Err(ChatError::Conflict("invite already used".to_string()));
        }
        if now >= invite.expires_at || !invite.is_active {
            return Err(ChatError::NotFound("invite expired".to_string()));
        }

        let room = room_entry.value_mut();
        if room.is_participant(user) {
            return Ok(RedeemOutcome::AlreadyMember(room.clone()));
        }

        room.participants.push(Participant {
            id: user.id.clone(),
            kind: user.kind,
            role: MemberRole::Member,
            joined_at: now,
            permissions: Vec::new(),
        });
        invite.used_by = Some(user.id.clone());
        invite.used_at = Some(now);
        invite.is_active = false;

        Ok(RedeemOutcome::Joined(room.clone()))
    }

    /// 将已过期的邀请置为不活跃 / Flip expired invites inactive
    pub fn deactivate_expired_invites(&self, now: chrono::DateTime<chrono::Utc>) -> usize {
        let mut swept = 0usize;
        for mut entry in self.invites.iter_mut() {
            let invite = entry.value_mut();
            if invite.is_active && now >= invite.expires_at {
                invite.is_active = false;
                swept += 1;
            }
        }
        swept
    }
}
