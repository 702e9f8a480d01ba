//! 连接注册与实时广播集成测试 / Connection registry and realtime broadcast tests

use gemlink_chat::domain::{ChatFrame, ParticipantKey};
use gemlink_chat::service::{messages, rooms};
use gemlink_chat::ChatServer;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;

fn addr() -> std::net::SocketAddr {
    "127.0.0.1:0".parse().unwrap()
}

#[tokio::test]
async fn test_broadcast_excludes_sender() {
    let server = ChatServer::new();
    let (alice_tx, mut alice_rx) = mpsc::unbounded_channel();
    let (bob_tx, mut bob_rx) = mpsc::unbounded_channel();
    let alice_conn = server.register_connection("alice", addr(), alice_tx);
    let bob_conn = server.register_connection("bob", addr(), bob_tx);
    server.join_room("r1", &alice_conn);
    server.join_room("r1", &bob_conn);

    server
        .broadcast_to_room("r1", "{\"type\":\"new_message\"}", Some(&alice_conn))
        .await;

    let received = bob_rx.try_recv().unwrap();
    assert!(matches!(received, Message::Text(_)));
    assert!(alice_rx.try_recv().is_err());
}

#[tokio::test]
async fn test_broadcast_prunes_dead_connections() {
    let server = ChatServer::new();
    let (alice_tx, _alice_rx) = mpsc::unbounded_channel();
    let (bob_tx, bob_rx) = mpsc::unbounded_channel();
    let alice_conn = server.register_connection("alice", addr(), alice_tx);
    let bob_conn = server.register_connection("bob", addr(), bob_tx);
    server.join_room("r1", &alice_conn);
    server.join_room("r1", &bob_conn);

    // 接收端掉线 / The receiving end has gone away
    drop(bob_rx);
    server.broadcast_to_room("r1", "{}", None).await;

    assert!(server.connections.get(&bob_conn).is_none());
    assert!(!server.connections_in_room("r1").contains(&bob_conn));
    assert!(server.connections.get(&alice_conn).is_some());
}

#[tokio::test]
async fn test_offline_backlog_delivered_on_join() {
    let server = ChatServer::new();
    let (room, _) = rooms::create_direct(&server, "alice", "bob").unwrap();
    let alice = ParticipantKey::user("alice");
    let bob = ParticipantKey::user("bob");

    // bob 离线期间的积压 / Backlog while bob is offline
    for i in 0..3 {
        messages::send(
            &server,
            &room.id,
            &alice,
            messages::SendRequest::text(format!("offline {}", i)),
        )
        .unwrap();
    }

    // 上线进入会话即补送达 / Coming online and joining back-fills delivery
    let (bob_tx, _bob_rx) = mpsc::unbounded_channel();
    let bob_conn = server.register_connection("bob", addr(), bob_tx);
    server.join_room(&room.id, &bob_conn);
    let delivered = messages::mark_delivered(&server, &room.id, &bob).unwrap();
    assert_eq!(delivered, 3);
    assert_eq!(messages::mark_delivered(&server, &room.id, &bob).unwrap(), 0);

    let history = server
        .store
        .messages_for_viewer(&room.id, &bob, None, 10)
        .unwrap();
    assert!(history.iter().all(|m| m.is_delivered_to(&bob)));
}

#[tokio::test]
async fn test_clear_history_is_per_user() {
    let server = ChatServer::new();
    let (room, _) = rooms::create_direct(&server, "alice", "bob").unwrap();
    let alice = ParticipantKey::user("alice");
    let bob = ParticipantKey::user("bob");

    messages::send(&server, &room.id, &alice, messages::SendRequest::text("a")).unwrap();
    messages::send(&server, &room.id, &bob, messages::SendRequest::text("b")).unwrap();

    let cleared = rooms::clear_history(&server, &room.id, &bob).unwrap();
    assert_eq!(cleared, 2);

    assert!(server
        .store
        .messages_for_viewer(&room.id, &bob, None, 10)
        .unwrap()
        .is_empty());
    assert_eq!(
        server
            .store
            .messages_for_viewer(&room.id, &alice, None, 10)
            .unwrap()
            .len(),
        2
    );

    // 清空后的新消息对双方可见 / Messages after the clear reach both sides
    messages::send(&server, &room.id, &alice, messages::SendRequest::text("c")).unwrap();
    assert_eq!(
        server
            .store
            .messages_for_viewer(&room.id, &bob, None, 10)
            .unwrap()
            .len(),
        1
    );
}

#[tokio::test]
async fn test_reconnect_replaces_and_shutdown_closes() {
    let server = ChatServer::new();
    let (tx1, mut rx1) = mpsc::unbounded_channel();
    let conn1 = server.register_connection("alice", addr(), tx1);
    server.join_room("r1", &conn1);

    // 重连拿到同一逻辑连接ID / A reconnect lands on the same logical id
    let (tx2, mut rx2) = mpsc::unbounded_channel();
    let conn2 = server.register_connection("alice", addr(), tx2);
    assert_eq!(conn1, conn2);
    assert_eq!(server.connections.len(), 1);

    server
        .send_to_connection(&conn2, Message::Text("hello".to_string()))
        .await
        .unwrap();
    assert!(rx1.try_recv().is_err());
    assert!(rx2.try_recv().is_ok());

    server.shutdown_connections();
    assert!(matches!(rx2.try_recv(), Ok(Message::Close(_))));
    assert!(server.connections.is_empty());
    assert!(server.connections_in_room("r1").is_empty());
}

#[tokio::test]
async fn test_frame_parse_and_error_shape() {
    let frame: ChatFrame =
        serde_json::from_str("{\"type\":\"join_chat\",\"data\":{\"chat_id\":\"c1\"}}").unwrap();
    assert_eq!(frame.frame_type, "join_chat");
    assert_eq!(frame.data["chat_id"], "c1");

    let err = ChatFrame::error("invalid json");
    let text = err.to_text().unwrap();
    let parsed: serde_json::Value = serde_json::from_str(&text).unwrap();
    assert_eq!(parsed["type"], "error");
    assert_eq!(parsed["data"]["message"], "invalid json");
}
