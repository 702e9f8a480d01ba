//! 消息生命周期集成测试 / Message lifecycle integration tests

use gemlink_chat::domain::{Attachment, MessageType, ParticipantKey, DELETED_PLACEHOLDER};
use gemlink_chat::error::ChatError;
use gemlink_chat::service::{messages, rooms};
use gemlink_chat::ChatServer;
use std::sync::Arc;

fn direct_chat(server: &ChatServer) -> (String, ParticipantKey, ParticipantKey) {
    let (room, created) = rooms::create_direct(server, "alice", "bob").unwrap();
    assert!(created);
    (
        room.id,
        ParticipantKey::user("alice"),
        ParticipantKey::user("bob"),
    )
}

#[tokio::test]
async fn test_send_bumps_unread_and_last_message() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);

    messages::send(&server, &room_id, &alice, messages::SendRequest::text("hi")).unwrap();
    let second = messages::send(
        &server,
        &room_id,
        &alice,
        messages::SendRequest::text("you there?"),
    )
    .unwrap();

    // 发送者自动带已读回执，接收者尚无送达回执
    // The sender carries a read receipt, the recipient has no delivery receipt yet
    assert!(second.is_read_by(&alice));
    assert!(!second.is_delivered_to(&bob));

    let room = server.store.get_room(&room_id).unwrap();
    assert_eq!(room.unread_counts.get(&bob.storage_key()), Some(&2));
    assert_eq!(room.unread_counts.get(&alice.storage_key()), None);
    let last = room.last_message.unwrap();
    assert_eq!(last.content, "you there?");
    assert_eq!(last.seq, second.seq);
}

#[tokio::test]
async fn test_direct_chat_reused() {
    let server = ChatServer::new();
    let (first, created) = rooms::create_direct(&server, "alice", "bob").unwrap();
    assert!(created);
    let (second, created_again) = rooms::create_direct(&server, "bob", "alice").unwrap();
    assert!(!created_again);
    assert_eq!(first.id, second.id);
}

#[tokio::test]
async fn test_self_direct_chat_rejected() {
    let server = ChatServer::new();
    assert!(matches!(
        rooms::create_direct(&server, "alice", "alice"),
        Err(ChatError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_non_participant_cannot_send() {
    let server = ChatServer::new();
    let (room_id, _, _) = direct_chat(&server);
    let eve = ParticipantKey::user("eve");
    assert!(matches!(
        messages::send(&server, &room_id, &eve, messages::SendRequest::text("hi")),
        Err(ChatError::Forbidden(_))
    ));
}

#[tokio::test]
async fn test_inactive_chat_rejects_send() {
    let server = ChatServer::new();
    let (room_id, alice, _) = direct_chat(&server);
    server
        .store
        .update_room(&room_id, |room| {
            room.is_active = false;
            Ok(())
        })
        .unwrap();
    assert!(matches!(
        messages::send(&server, &room_id, &alice, messages::SendRequest::text("hi")),
        Err(ChatError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_mark_read_idempotent_and_resets_unread() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);
    messages::send(&server, &room_id, &alice, messages::SendRequest::text("1")).unwrap();
    messages::send(&server, &room_id, &alice, messages::SendRequest::text("2")).unwrap();

    let changed = messages::mark_read(&server, &room_id, &bob, None).unwrap();
    assert_eq!(changed, 2);
    let room = server.store.get_room(&room_id).unwrap();
    assert_eq!(room.unread_counts.get(&bob.storage_key()), Some(&0));

    // 第二次调用不再追加回执 / A second call appends no further receipts
    let changed_again = messages::mark_read(&server, &room_id, &bob, None).unwrap();
    assert_eq!(changed_again, 0);
    let history = server
        .store
        .messages_for_viewer(&room_id, &bob, None, 50)
        .unwrap();
    for m in history {
        assert_eq!(m.read_by.len(), 2); // sender + bob
    }
}

#[tokio::test]
async fn test_mark_delivered_skips_own_messages() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);
    messages::send(&server, &room_id, &alice, messages::SendRequest::text("1")).unwrap();

    assert_eq!(messages::mark_delivered(&server, &room_id, &alice).unwrap(), 0);
    assert_eq!(messages::mark_delivered(&server, &room_id, &bob).unwrap(), 1);
    // 送达不清零未读 / Delivery does not reset unread
    let room = server.store.get_room(&room_id).unwrap();
    assert_eq!(room.unread_counts.get(&bob.storage_key()), Some(&1));
}

#[tokio::test]
async fn test_edit_keeps_history_and_requires_sender() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);
    let sent = messages::send(
        &server,
        &room_id,
        &alice,
        messages::SendRequest::text("teh price"),
    )
    .unwrap();

    assert!(matches!(
        messages::edit(&server, &sent.id, &bob, "hijack".to_string(), None),
        Err(ChatError::Forbidden(_))
    ));

    let edited = messages::edit(
        &server,
        &sent.id,
        &alice,
        "the price".to_string(),
        Some("typo".to_string()),
    )
    .unwrap();
    assert!(edited.is_edited);
    assert_eq!(edited.content, "the price");
    assert_eq!(edited.edit_history.len(), 1);
    assert_eq!(edited.edit_history[0].previous_content, "teh price");
}

#[tokio::test]
async fn test_delete_for_everyone_strips_payload() {
    let server = ChatServer::new();
    let (room_id, alice, _) = direct_chat(&server);
    let sent = messages::send(
        &server,
        &room_id,
        &alice,
        messages::SendRequest {
            content: "see attached".to_string(),
            message_type: MessageType::File,
            gem_id: None,
            gem_details: None,
            attachment: Some(Attachment {
                id: "a1".to_string(),
                name: "report.pdf".to_string(),
                url: "/uploads/report.pdf".to_string(),
                size: 1024,
            }),
            reply_to: None,
        },
    )
    .unwrap();

    let deleted = messages::delete(&server, &sent.id, &alice, true).unwrap();
    assert!(deleted.is_deleted);
    assert_eq!(deleted.content, DELETED_PLACEHOLDER);
    assert_eq!(deleted.message_type, MessageType::Deleted);
    assert!(deleted.attachment.is_none());

    // 已删除消息不可再编辑或再删除 / No edits or second deletes afterwards
    assert!(matches!(
        messages::edit(&server, &sent.id, &alice, "back".to_string(), None),
        Err(ChatError::InvalidState(_))
    ));
    assert!(matches!(
        messages::delete(&server, &sent.id, &alice, true),
        Err(ChatError::InvalidState(_))
    ));
}

#[tokio::test]
async fn test_delete_for_self_hides_only_for_actor() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);
    let sent = messages::send(&server, &room_id, &alice, messages::SendRequest::text("ping"))
        .unwrap();

    messages::delete(&server, &sent.id, &bob, false).unwrap();

    let bob_view = server
        .store
        .messages_for_viewer(&room_id, &bob, None, 50)
        .unwrap();
    assert!(bob_view.is_empty());
    let alice_view = server
        .store
        .messages_for_viewer(&room_id, &alice, None, 50)
        .unwrap();
    assert_eq!(alice_view.len(), 1);
    assert_eq!(alice_view[0].content, "ping");
}

#[tokio::test]
async fn test_reply_snapshot_survives_edit() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);
    let original = messages::send(
        &server,
        &room_id,
        &alice,
        messages::SendRequest::text("original wording"),
    )
    .unwrap();

    let reply = messages::reply(
        &server,
        &room_id,
        &original.id,
        &bob,
        "agreed".to_string(),
        MessageType::Text,
    )
    .unwrap();

    messages::edit(&server, &original.id, &alice, "rewritten".to_string(), None).unwrap();

    let stored = server.store.get_message(&reply.id).unwrap();
    let snapshot = stored.reply_to.unwrap();
    assert_eq!(snapshot.message_id, original.id);
    assert_eq!(snapshot.content, "original wording");
    assert_eq!(snapshot.sender, alice);
}

#[tokio::test]
async fn test_reply_to_foreign_chat_rejected() {
    let server = ChatServer::new();
    let (room_a, alice, _) = direct_chat(&server);
    let (room_b, _) = rooms::create_direct(&server, "alice", "carol").unwrap();
    let foreign = messages::send(
        &server,
        &room_b.id,
        &alice,
        messages::SendRequest::text("elsewhere"),
    )
    .unwrap();

    assert!(matches!(
        messages::reply(
            &server,
            &room_a,
            &foreign.id,
            &alice,
            "cross".to_string(),
            MessageType::Text,
        ),
        Err(ChatError::InvalidArgument(_))
    ));
}

#[tokio::test]
async fn test_reaction_toggle_prunes_empty_key() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);
    let sent = messages::send(&server, &room_id, &alice, messages::SendRequest::text("yo"))
        .unwrap();

    let after_on = messages::react(&server, &sent.id, &bob, "👍").unwrap();
    assert_eq!(after_on.reactions.get("👍").map(|v| v.len()), Some(1));

    let after_off = messages::react(&server, &sent.id, &bob, "👍").unwrap();
    assert!(after_off.reactions.get("👍").is_none());
}

#[tokio::test]
async fn test_concurrent_sends_all_land_and_last_message_settles() {
    let server = Arc::new(ChatServer::new());
    let (room_id, alice, bob) = direct_chat(&server);

    let mut handles = Vec::new();
    for i in 0..20 {
        let server = server.clone();
        let room_id = room_id.clone();
        let alice = alice.clone();
        handles.push(tokio::spawn(async move {
            messages::send(
                &server,
                &room_id,
                &alice,
                messages::SendRequest::text(format!("msg {}", i)),
            )
            .unwrap()
        }));
    }
    let mut max_seq = 0;
    for handle in handles {
        let sent = handle.await.unwrap();
        max_seq = max_seq.max(sent.seq);
    }

    assert_eq!(server.store.message_count(&room_id), 20);
    let room = server.store.get_room(&room_id).unwrap();
    assert_eq!(room.last_message.unwrap().seq, max_seq);
    assert_eq!(room.unread_counts.get(&bob.storage_key()), Some(&20));
}

#[tokio::test]
async fn test_history_cursor_pagination() {
    let server = ChatServer::new();
    let (room_id, alice, bob) = direct_chat(&server);
    for i in 0..5 {
        messages::send(
            &server,
            &room_id,
            &alice,
            messages::SendRequest::text(format!("m{}", i)),
        )
        .unwrap();
    }

    let first_page = server
        .store
        .messages_for_viewer(&room_id, &bob, None, 2)
        .unwrap();
    assert_eq!(first_page.len(), 2);
    assert_eq!(first_page[0].content, "m4");

    let second_page = server
        .store
        .messages_for_viewer(&room_id, &bob, Some(&first_page[1].id), 2)
        .unwrap();
    assert_eq!(second_page[0].content, "m2");

    assert!(matches!(
        server
            .store
            .messages_for_viewer(&room_id, &bob, Some("no-such-cursor"), 2),
        Err(ChatError::NotFound(_))
    ));
}
