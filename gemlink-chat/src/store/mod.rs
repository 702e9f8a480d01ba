use crate::domain::{ChatMessage, ChatRoom, ChatStatus, GroupInvite};
use dashmap::{DashMap, DashSet};
use std::sync::atomic::AtomicU64;

pub mod audit;
pub mod invites;
pub mod messages;
pub mod rooms;
pub mod statuses;

pub use audit::{BlockRecord, RemovalRecord, ReportRecord};
pub use invites::RedeemOutcome;

/// 进程内聊天文档存储 / In-process chat document store
///
/// 每个记录族一张 DashMap，所有变更在条目守卫下以单个闭包完成，
/// 构成文档级原子更新。
/// One DashMap per record family; every mutation runs as a single closure
/// under the entry guard, giving document-level atomic updates.
pub struct ChatStore {
    pub rooms: DashMap<String, ChatRoom>,
    /// chat_id 别名到主键 / chat_id alias to primary id
    pub room_aliases: DashMap<String, String>,
    /// 按房间有序存放的消息 / Messages ordered per room
    pub messages: DashMap<String, Vec<ChatMessage>>,
    /// 消息ID到所属房间 / Message id to owning room
    pub message_rooms: DashMap<String, String>,
    pub statuses: DashMap<String, ChatStatus>,
    pub invites: DashMap<String, GroupInvite>,
    pub removals: DashMap<String, Vec<RemovalRecord>>,
    pub blocks: DashMap<String, Vec<BlockRecord>>,
    /// 当前生效的屏蔽对 "{blocker}:{blocked}" / Active block pairs
    pub active_blocks: DashSet<String>,
    pub reports: DashMap<String, ReportRecord>,
    /// 追加边界的单调序号 / Monotonic sequence at the append boundary
    seq: AtomicU64,
}

impl ChatStore {
    pub fn new() -> Self {
        Self {
            rooms: DashMap::new(),
            room_aliases: DashMap::new(),
            messages: DashMap::new(),
            message_rooms: DashMap::new(),
            statuses: DashMap::new(),
            invites: DashMap::new(),
            removals: DashMap::new(),
            blocks: DashMap::new(),
            active_blocks: DashSet::new(),
            reports: DashMap::new(),
            seq: AtomicU64::new(1),
        }
    }

    pub(crate) fn next_seq(&self) -> u64 {
        self.seq.fetch_add(1, std::sync::atomic::Ordering::SeqCst)
    }
}

impl Default for ChatStore {
    fn default() -> Self {
        Self::new()
    }
}
