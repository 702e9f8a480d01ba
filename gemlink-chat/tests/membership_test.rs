//! 群成员与权限集成测试 / Group membership and permission integration tests

use gemlink_chat::clients::StaticContactNetwork;
use gemlink_chat::domain::{MemberRole, ParticipantKey};
use gemlink_chat::error::ChatError;
use gemlink_chat::service::{membership, messages, rooms};
use gemlink_chat::ChatServer;
use std::sync::Arc;

fn server_with_contacts() -> ChatServer {
    let contacts = StaticContactNetwork::new();
    contacts.seed(
        "olivia",
        vec![
            ParticipantKey::user("maya"),
            ParticipantKey::user("liam"),
            ParticipantKey::user("noah"),
            ParticipantKey::dealer("d9"),
        ],
    );
    ChatServer::new().with_contacts(Arc::new(contacts))
}

async fn group_of_three(server: &ChatServer) -> String {
    let room = rooms::create_group(
        server,
        "olivia",
        "gem traders".to_string(),
        vec![ParticipantKey::user("maya"), ParticipantKey::user("liam")],
        None,
    )
    .await
    .unwrap();
    room.id
}

#[tokio::test]
async fn test_group_creator_becomes_admin() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;
    let room = server.store.get_room(&room_id).unwrap();

    assert!(room.is_admin("olivia"));
    assert_eq!(room.admin_count(), 1);
    assert_eq!(room.participants.len(), 3);
    let creator = room
        .participants
        .iter()
        .find(|p| p.id == "olivia")
        .unwrap();
    assert_eq!(creator.role, MemberRole::Admin);
    assert!(!creator.permissions.is_empty());
}

#[tokio::test]
async fn test_group_members_must_be_contacts() {
    let server = server_with_contacts();
    let err = rooms::create_group(
        &server,
        "olivia",
        "strangers".to_string(),
        vec![ParticipantKey::user("mallory")],
        None,
    )
    .await
    .unwrap_err();
    match err {
        ChatError::InvalidArgument(msg) => assert!(msg.contains("user_mallory")),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_dealer_chat_requires_contact_and_reuses() {
    let server = server_with_contacts();
    let (room, created) = rooms::create_dealer(&server, "olivia", "d9").await.unwrap();
    assert!(created);
    let (again, created_again) = rooms::create_dealer(&server, "olivia", "d9").await.unwrap();
    assert!(!created_again);
    assert_eq!(room.id, again.id);

    assert!(matches!(
        rooms::create_dealer(&server, "olivia", "d404").await,
        Err(ChatError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_grant_admins_retains_actor_and_promotes() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;

    let admins =
        membership::grant_admins(&server, &room_id, "olivia", vec!["maya".to_string()]).unwrap();
    let ids: Vec<&str> = admins.iter().map(|a| a.user_id.as_str()).collect();
    assert!(ids.contains(&"olivia"));
    assert!(ids.contains(&"maya"));

    let room = server.store.get_room(&room_id).unwrap();
    let maya = room.participants.iter().find(|p| p.id == "maya").unwrap();
    assert_eq!(maya.role, MemberRole::Admin);
}

#[tokio::test]
async fn test_grant_admins_rejects_outsiders_and_non_admin_actor() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;

    assert!(matches!(
        membership::grant_admins(&server, &room_id, "olivia", vec!["mallory".to_string()]),
        Err(ChatError::InvalidArgument(_))
    ));
    assert!(matches!(
        membership::grant_admins(&server, &room_id, "maya", vec!["liam".to_string()]),
        Err(ChatError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_add_members_skips_existing() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;

    let added = membership::add_members(
        &server,
        &room_id,
        "olivia",
        vec![
            ParticipantKey::user("maya"), // already present
            ParticipantKey::user("noah"),
        ],
    )
    .unwrap();
    assert_eq!(added.len(), 1);
    assert_eq!(added[0].id, "noah");
    assert_eq!(server.store.get_room(&room_id).unwrap().participants.len(), 4);
}

#[tokio::test]
async fn test_member_adds_gated_by_setting() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;
    let new_member = vec![ParticipantKey::user("noah")];

    assert!(matches!(
        membership::add_members(&server, &room_id, "maya", new_member.clone()),
        Err(ChatError::Forbidden(_))
    ));

    membership::update_settings(
        &server,
        &room_id,
        "olivia",
        membership::SettingsPatch {
            allow_member_adds: Some(true),
            ..Default::default()
        },
    )
    .unwrap();

    assert_eq!(
        membership::add_members(&server, &room_id, "maya", new_member)
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_remove_member_requires_admin_and_audits() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;
    let target = ParticipantKey::user("liam");

    assert!(matches!(
        membership::remove_member(&server, &room_id, &target, "maya", false, None),
        Err(ChatError::Forbidden(_))
    ));

    membership::remove_member(
        &server,
        &room_id,
        &target,
        "olivia",
        false,
        Some("spam".to_string()),
    )
    .unwrap();

    let room = server.store.get_room(&room_id).unwrap();
    assert!(!room.is_participant(&target));
    let audit = server.store.removals_for_room(&room_id);
    assert_eq!(audit.len(), 1);
    assert_eq!(audit[0].user_id, "liam");
    assert_eq!(audit[0].removed_by, "olivia");
    assert!(!audit[0].is_leaving);
    assert_eq!(audit[0].reason.as_deref(), Some("spam"));
}

#[tokio::test]
async fn test_sole_admin_cannot_leave_until_handover() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;
    let olivia = ParticipantKey::user("olivia");

    assert!(matches!(
        membership::remove_member(&server, &room_id, &olivia, "olivia", true, None),
        Err(ChatError::InvalidState(_))
    ));

    membership::grant_admins(&server, &room_id, "olivia", vec!["maya".to_string()]).unwrap();
    membership::remove_member(&server, &room_id, &olivia, "olivia", true, None).unwrap();

    let room = server.store.get_room(&room_id).unwrap();
    assert!(!room.is_participant(&olivia));
    // 离开的管理员同时移出管理员集合 / The leaver also drops out of the admin set
    assert!(!room.is_admin("olivia"));
    assert!(room.is_admin("maya"));
}

#[tokio::test]
async fn test_leave_target_must_be_caller() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;
    let maya = ParticipantKey::user("maya");
    assert!(matches!(
        membership::remove_member(&server, &room_id, &maya, "olivia", true, None),
        Err(ChatError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_only_admins_message_enforced() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;

    membership::update_settings(
        &server,
        &room_id,
        "olivia",
        membership::SettingsPatch {
            only_admins_message: Some(true),
            ..Default::default()
        },
    )
    .unwrap();

    let maya = ParticipantKey::user("maya");
    assert!(matches!(
        messages::send(&server, &room_id, &maya, messages::SendRequest::text("hi")),
        Err(ChatError::Forbidden(_))
    ));

    let olivia = ParticipantKey::user("olivia");
    assert!(messages::send(
        &server,
        &room_id,
        &olivia,
        messages::SendRequest::text("announcement")
    )
    .is_ok());
}

#[tokio::test]
async fn test_settings_patch_is_partial() {
    let server = server_with_contacts();
    let room_id = group_of_three(&server).await;

    let before = server.store.get_room(&room_id).unwrap().settings;
    let after = membership::update_settings(
        &server,
        &room_id,
        "olivia",
        membership::SettingsPatch {
            allow_user_invites: Some(true),
            ..Default::default()
        },
    )
    .unwrap();

    assert!(after.allow_user_invites);
    assert_eq!(after.allow_gem_sharing, before.allow_gem_sharing);
    assert_eq!(after.allow_member_adds, before.allow_member_adds);
    assert_eq!(after.only_admins_message, before.only_admins_message);

    // 非管理员不可改设置 / Non-admins may not change settings
    assert!(matches!(
        membership::update_settings(
            &server,
            &room_id,
            "maya",
            membership::SettingsPatch::default()
        ),
        Err(ChatError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_group_operations_rejected_on_direct_chat() {
    let server = server_with_contacts();
    let (room, _) = rooms::create_direct(&server, "olivia", "maya").unwrap();
    assert!(matches!(
        membership::grant_admins(&server, &room.id, "olivia", vec!["maya".to_string()]),
        Err(ChatError::InvalidState(_))
    ));
    assert!(matches!(
        membership::add_members(
            &server,
            &room.id,
            "olivia",
            vec![ParticipantKey::user("liam")]
        ),
        Err(ChatError::InvalidState(_))
    ));
}
