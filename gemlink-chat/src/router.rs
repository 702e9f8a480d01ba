use actix_web::web;

/// 路由配置包装 / Route configuration wrapper
pub fn configure(cfg: &mut web::ServiceConfig) {
    // 会话 / Chats
    crate::api::v1::chat::create_direct::register(cfg, "/v1/chat/direct");
    crate::api::v1::chat::create_dealer::register(cfg, "/v1/chat/dealer");
    crate::api::v1::chat::create_group::register(cfg, "/v1/chat/group");
    crate::api::v1::chat::list::register(cfg, "/v1/chat/list");
    crate::api::v1::chat::detail::register(cfg, "/v1/chat/{chat_id}");
    crate::api::v1::chat::history::register(cfg, "/v1/chat/{chat_id}/messages");
    crate::api::v1::chat::read::register(cfg, "/v1/chat/{chat_id}/read");
    crate::api::v1::chat::delivered::register(cfg, "/v1/chat/{chat_id}/delivered");
    crate::api::v1::chat::clear::register(cfg, "/v1/chat/{chat_id}/clear");
    crate::api::v1::chat::attachment::register(cfg, "/v1/chat/{chat_id}/attachment");

    // 消息 / Messages
    crate::api::v1::message::send::register(cfg, "/v1/message/send");
    crate::api::v1::message::edit::register(cfg, "/v1/message/{message_id}/edit");
    crate::api::v1::message::delete::register(cfg, "/v1/message/{message_id}/delete");
    crate::api::v1::message::reply::register(cfg, "/v1/message/{message_id}/reply");
    crate::api::v1::message::react::register(cfg, "/v1/message/{message_id}/react");

    // 群管理 / Group management
    crate::api::v1::group::admins::register(cfg, "/v1/group/{chat_id}/admins");
    crate::api::v1::group::settings::register(cfg, "/v1/group/{chat_id}/settings");
    crate::api::v1::group::invite::register(cfg, "/v1/group/{chat_id}/invite");
    crate::api::v1::group::join::register(cfg, "/v1/group/join");
    crate::api::v1::group::add_members::register(cfg, "/v1/group/{chat_id}/members");
    crate::api::v1::group::remove_member::register(cfg, "/v1/group/{chat_id}/remove");
    crate::api::v1::group::leave::register(cfg, "/v1/group/{chat_id}/leave");

    // 动态 / Statuses
    crate::api::v1::status::create::register(cfg, "/v1/status");
    crate::api::v1::status::list::register(cfg, "/v1/status/list");
    crate::api::v1::status::view::register(cfg, "/v1/status/{status_id}/view");

    // 风控 / Moderation
    crate::api::v1::moderation::block::register(cfg, "/v1/moderation/block");
    crate::api::v1::moderation::unblock::register(cfg, "/v1/moderation/unblock");
    crate::api::v1::moderation::report::register(cfg, "/v1/moderation/report");

    // 健康检查 / Health checks
    crate::api::v1::health::basic::register(cfg, "/v1/health");
    crate::api::v1::health::live::register(cfg, "/v1/health/live");
    crate::api::v1::health::ready::register(cfg, "/v1/health/ready");
}
