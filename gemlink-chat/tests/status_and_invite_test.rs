//! 动态与邀请码集成测试 / Status and invite integration tests

use gemlink_chat::clients::StaticContactNetwork;
use gemlink_chat::domain::ParticipantKey;
use gemlink_chat::error::ChatError;
use gemlink_chat::service::{membership, rooms, status};
use gemlink_chat::store::RedeemOutcome;
use gemlink_chat::ChatServer;
use std::sync::Arc;

fn server_with_contacts() -> ChatServer {
    let contacts = StaticContactNetwork::new();
    contacts.seed("p1", vec![ParticipantKey::user("p2")]);
    contacts.seed(
        "olivia",
        vec![ParticipantKey::user("maya"), ParticipantKey::user("liam")],
    );
    ChatServer::new().with_contacts(Arc::new(contacts))
}

async fn group(server: &ChatServer) -> String {
    rooms::create_group(
        server,
        "olivia",
        "collectors".to_string(),
        vec![ParticipantKey::user("maya")],
        None,
    )
    .await
    .unwrap()
    .id
}

#[tokio::test]
async fn test_status_visibility_snapshots_contacts() {
    let server = server_with_contacts();
    let posted = status::post(&server, "p1", "new arrivals".to_string(), None, None)
        .await
        .unwrap();
    assert_eq!(posted.visible_to, vec![ParticipantKey::user("p2")]);

    // 发布后加入的联系人看不到旧动态 / A contact added later misses older posts
    assert_eq!(status::list_visible(&server, "p2").len(), 1);
    assert_eq!(status::list_visible(&server, "p3").len(), 0);
    // 创建者恒可见自己的动态 / The creator always sees their own
    assert_eq!(status::list_visible(&server, "p1").len(), 1);
}

#[tokio::test]
async fn test_status_view_idempotent_and_gated() {
    let server = server_with_contacts();
    let posted = status::post(&server, "p1", "hello".to_string(), None, None)
        .await
        .unwrap();

    status::record_view(&server, &posted.id, "p2").unwrap();
    let viewed = status::record_view(&server, &posted.id, "p2").unwrap();
    assert_eq!(viewed.viewed_by.len(), 1);
    assert_eq!(viewed.viewed_by[0].viewer, ParticipantKey::user("p2"));

    assert!(matches!(
        status::record_view(&server, &posted.id, "p3"),
        Err(ChatError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_expired_status_hidden_and_swept() {
    let server = server_with_contacts();
    let posted = status::post(&server, "p1", "gone soon".to_string(), None, Some(0))
        .await
        .unwrap();

    assert_eq!(status::list_visible(&server, "p2").len(), 0);
    assert!(matches!(
        status::record_view(&server, &posted.id, "p2"),
        Err(ChatError::NotFound(_))
    ));

    let swept = server
        .store
        .deactivate_expired_statuses(chrono::Utc::now());
    assert_eq!(swept, 1);
    assert!(!server.store.get_status(&posted.id).unwrap().is_active);
}

#[tokio::test]
async fn test_invite_permissions_follow_settings() {
    let server = server_with_contacts();
    let room_id = group(&server).await;

    // 管理员默认可发 / Admins may issue by default
    let invite = membership::create_invite(&server, &room_id, "olivia", None).unwrap();
    assert_eq!(invite.code.len(), server.invite_config.code_length);
    assert_eq!(invite.created_by, "olivia");

    // 普通成员默认不可发 / Members may not by default
    assert!(matches!(
        membership::create_invite(&server, &room_id, "maya", None),
        Err(ChatError::Forbidden(_))
    ));

    membership::update_settings(
        &server,
        &room_id,
        "olivia",
        membership::SettingsPatch {
            allow_user_invites: Some(true),
            ..Default::default()
        },
    )
    .unwrap();
    assert!(membership::create_invite(&server, &room_id, "maya", None).is_ok());

    // 外人不可发 / Outsiders may not
    assert!(matches!(
        membership::create_invite(&server, &room_id, "mallory", None),
        Err(ChatError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_invite_redeemed_exactly_once() {
    let server = server_with_contacts();
    let room_id = group(&server).await;
    let invite = membership::create_invite(&server, &room_id, "olivia", None).unwrap();

    match membership::redeem_invite(&server, &invite.code, "zoe").unwrap() {
        RedeemOutcome::Joined(room) => {
            assert!(room.is_participant(&ParticipantKey::user("zoe")));
        }
        other => panic!("expected join, got {:?}", other),
    }

    // 第二个兑换者撞上已用邀请 / A second redeemer hits the used invite
    assert!(matches!(
        membership::redeem_invite(&server, &invite.code, "finn"),
        Err(ChatError::Conflict(_))
    ));

    let stored = server.store.get_invite(&invite.code).unwrap();
    assert_eq!(stored.used_by.as_deref(), Some("zoe"));
    assert!(!stored.is_active);
}

#[tokio::test]
async fn test_existing_member_redeem_leaves_invite_live() {
    let server = server_with_contacts();
    let room_id = group(&server).await;
    let invite = membership::create_invite(&server, &room_id, "olivia", None).unwrap();

    match membership::redeem_invite(&server, &invite.code, "maya").unwrap() {
        RedeemOutcome::AlreadyMember(_) => {}
        other => panic!("expected already-member, got {:?}", other),
    }

    // 未消耗，仍可被新人兑换 / Not consumed, still redeemable by a newcomer
    let stored = server.store.get_invite(&invite.code).unwrap();
    assert!(stored.used_by.is_none());
    assert!(matches!(
        membership::redeem_invite(&server, &invite.code, "zoe").unwrap(),
        RedeemOutcome::Joined(_)
    ));
}

#[tokio::test]
async fn test_expired_invite_rejected_and_swept() {
    let server = server_with_contacts();
    let room_id = group(&server).await;
    let invite = membership::create_invite(&server, &room_id, "olivia", Some(0)).unwrap();

    assert!(matches!(
        membership::redeem_invite(&server, &invite.code, "zoe"),
        Err(ChatError::NotFound(_))
    ));
    assert_eq!(
        server.store.deactivate_expired_invites(chrono::Utc::now()),
        1
    );
}

#[tokio::test]
async fn test_unknown_invite_code() {
    let server = server_with_contacts();
    assert!(matches!(
        membership::redeem_invite(&server, "nope", "zoe"),
        Err(ChatError::NotFound(_))
    ));
}

#[tokio::test]
async fn test_concurrent_redemption_single_winner() {
    let server = Arc::new(server_with_contacts());
    let room_id = group(&server).await;
    let invite = membership::create_invite(&server, &room_id, "olivia", None).unwrap();

    let mut handles = Vec::new();
    for user in ["zoe", "finn", "ada", "kai"] {
        let server = server.clone();
        let code = invite.code.clone();
        handles.push(tokio::spawn(async move {
            membership::redeem_invite(&server, &code, user)
        }));
    }

    let mut joined = 0;
    let mut conflicts = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(RedeemOutcome::Joined(_)) => joined += 1,
            Err(ChatError::Conflict(_)) => conflicts += 1,
            other => panic!("unexpected outcome: {:?}", other),
        }
    }
    assert_eq!(joined, 1);
    assert_eq!(conflicts, 3);

    // 入群与核销不可分离观察 / Join and mark-used are not separately observable
    let room = server.store.get_room(&room_id).unwrap();
    let joined_members = ["zoe", "finn", "ada", "kai"]
        .iter()
        .filter(|u| room.is_participant(&ParticipantKey::user(**u)))
        .count();
    assert_eq!(joined_members, 1);
}
