//! End-to-end tests: real WebSocket clients against a bound server.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use parlor::prelude::*;
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs =
    tokio_tungstenite::WebSocketStream<tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>>;

const WAIT: Duration = Duration::from_secs(5);

fn test_content() -> ContentPack {
    ContentPack {
        words: vec!["con mèo".into()],
        questions: vec![TriviaQuestion {
            question: "Thủ đô của Việt Nam?".into(),
            answers: vec!["Hà Nội".into(), "Huế".into()],
            correct: 0,
        }],
        locations: vec!["Bệnh viện".into()],
    }
}

/// Starts a server on a random port and returns its address and room handle.
async fn start_server(builder: ParlorServerBuilder) -> (String, RoomHandle) {
    let server = builder
        .bind("127.0.0.1:0")
        .content(test_content())
        .build()
        .await
        .expect("server should build");

    let addr = server.local_addr().expect("should have local addr").to_string();
    let room = server.room();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    (addr, room)
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

async fn send(ws: &mut ClientWs, event: &ClientEvent) {
    let text = serde_json::to_string(event).expect("encode");
    ws.send(Message::Text(text.into())).await.expect("send");
}

/// Reads frames until one decodes to an event matching `pred`.
async fn recv_until(ws: &mut ClientWs, pred: impl Fn(&ServerEvent) -> bool) -> ServerEvent {
    tokio::time::timeout(WAIT, async {
        loop {
            let msg = ws.next().await.expect("stream ended").expect("recv");
            if let Message::Text(text) = msg {
                let event: ServerEvent = serde_json::from_str(text.as_str()).expect("decode");
                if pred(&event) {
                    return event;
                }
            }
        }
    })
    .await
    .expect("timed out waiting for event")
}

/// Connects and joins, returning the socket and the assigned player id.
async fn join(addr: &str, name: &str) -> (ClientWs, PlayerId) {
    let mut ws = connect(addr).await;
    send(
        &mut ws,
        &ClientEvent::JoinGame {
            player_name: name.into(),
        },
    )
    .await;
    let ack = recv_until(&mut ws, |e| matches!(e, ServerEvent::PlayerJoined { .. })).await;
    let ServerEvent::PlayerJoined { player_id, .. } = ack else {
        unreachable!()
    };
    (ws, player_id)
}

/// Polls the room until `pred` holds.
async fn wait_for_info(room: &RoomHandle, pred: impl Fn(&RoomInfo) -> bool) -> RoomInfo {
    tokio::time::timeout(WAIT, async {
        loop {
            let info = room.get_info().await.expect("room should answer");
            if pred(&info) {
                return info;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
    })
    .await
    .expect("room never reached the expected state")
}

// =========================================================================
// Tests
// =========================================================================

#[tokio::test]
async fn test_first_joiner_is_host() {
    let (addr, room) = start_server(ParlorServer::builder()).await;

    let mut ws = connect(&addr).await;
    send(
        &mut ws,
        &ClientEvent::JoinGame {
            player_name: "Lan".into(),
        },
    )
    .await;

    let ack = recv_until(&mut ws, |e| matches!(e, ServerEvent::PlayerJoined { .. })).await;
    assert!(matches!(
        ack,
        ServerEvent::PlayerJoined { ref player_name, is_host: true, .. } if player_name == "Lan"
    ));

    let roster = recv_until(&mut ws, |e| matches!(e, ServerEvent::UpdatePlayers { .. })).await;
    let ServerEvent::UpdatePlayers { players } = roster else {
        unreachable!()
    };
    assert_eq!(players.len(), 1);
    assert!(players[0].is_host);

    let info = room.get_info().await.unwrap();
    assert_eq!(info.player_count, 1);
}

#[tokio::test]
async fn test_unjoined_connection_sees_roster_broadcasts() {
    let (addr, room) = start_server(ParlorServer::builder()).await;

    let mut watcher = connect(&addr).await;
    wait_for_info(&room, |info| info.connections == 1).await;
    let (_host, _) = join(&addr, "Minh").await;

    let roster = recv_until(&mut watcher, |e| matches!(e, ServerEvent::UpdatePlayers { .. })).await;
    assert!(matches!(roster, ServerEvent::UpdatePlayers { players } if players.len() == 1));
}

#[tokio::test]
async fn test_short_name_gets_an_error() {
    let (addr, _room) = start_server(ParlorServer::builder()).await;
    let mut ws = connect(&addr).await;

    send(
        &mut ws,
        &ClientEvent::JoinGame {
            player_name: " x ".into(),
        },
    )
    .await;

    let err = recv_until(&mut ws, |e| matches!(e, ServerEvent::Error { .. })).await;
    assert!(matches!(err, ServerEvent::Error { .. }));
}

#[tokio::test]
async fn test_malformed_frames_are_ignored() {
    let (addr, _room) = start_server(ParlorServer::builder()).await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Text("not json".into())).await.unwrap();
    ws.send(Message::Text(r#"{"type":"teleport","data":{}}"#.into()))
        .await
        .unwrap();
    send(
        &mut ws,
        &ClientEvent::JoinGame {
            player_name: "Hoa".into(),
        },
    )
    .await;

    let ack = recv_until(&mut ws, |e| matches!(e, ServerEvent::PlayerJoined { .. })).await;
    assert!(matches!(ack, ServerEvent::PlayerJoined { is_host: true, .. }));
}

#[tokio::test]
async fn test_host_starts_trivia_for_everyone() {
    let (addr, _room) = start_server(ParlorServer::builder()).await;
    let (mut host, _) = join(&addr, "An").await;
    let (mut second, _) = join(&addr, "Binh").await;
    let (mut third, _) = join(&addr, "Chi").await;

    send(
        &mut host,
        &ClientEvent::StartGame {
            game: "trivia".into(),
        },
    )
    .await;

    for ws in [&mut host, &mut second, &mut third] {
        let started = recv_until(ws, |e| matches!(e, ServerEvent::GameStarted { .. })).await;
        assert_eq!(
            started,
            ServerEvent::GameStarted {
                game: GameMode::Trivia
            }
        );
        let question = recv_until(ws, |e| matches!(e, ServerEvent::TriviaQuestion { .. })).await;
        assert!(matches!(question, ServerEvent::TriviaQuestion { round: 1, .. }));
    }
}

#[tokio::test]
async fn test_full_quiz_over_the_wire() {
    let builder = ParlorServer::builder().room_config(RoomConfig {
        quiz_rounds: 1,
        quiz_round: Duration::from_millis(500),
        seed: Some(3),
        ..RoomConfig::default()
    });
    let (addr, room) = start_server(builder).await;
    let (mut host, _) = join(&addr, "An").await;
    let (mut second, second_id) = join(&addr, "Binh").await;
    let (_third, _) = join(&addr, "Chi").await;

    send(
        &mut host,
        &ClientEvent::StartGame {
            game: "trivia".into(),
        },
    )
    .await;
    recv_until(&mut second, |e| matches!(e, ServerEvent::TriviaQuestion { .. })).await;
    send(&mut second, &ClientEvent::TriviaAnswer { answer: 0 }).await;

    let results = recv_until(&mut second, |e| matches!(e, ServerEvent::TriviaResults { .. })).await;
    assert_eq!(
        results,
        ServerEvent::TriviaResults {
            correct_answer: 0,
            player_answer: Some(0)
        }
    );
    let over = recv_until(&mut host, |e| matches!(e, ServerEvent::GameOver { .. })).await;
    assert!(matches!(
        over,
        ServerEvent::GameOver { winner: Some(id), score: 100, .. } if id == second_id
    ));

    let info = wait_for_info(&room, |info| info.mode.is_none()).await;
    assert_eq!(info.player_count, 3);
}

#[tokio::test]
async fn test_closing_socket_leaves_the_roster() {
    let (addr, room) = start_server(ParlorServer::builder()).await;
    let (_host, _) = join(&addr, "An").await;
    let (mut leaver, _) = join(&addr, "Binh").await;
    wait_for_info(&room, |info| info.player_count == 2).await;

    leaver.close(None).await.unwrap();

    let info = wait_for_info(&room, |info| info.player_count == 1).await;
    assert_eq!(info.connections, 1);
}

#[tokio::test]
async fn test_pings_keep_a_quiet_player_seated() {
    let builder = ParlorServer::builder().idle_timeout(Duration::from_millis(300));
    let (addr, room) = start_server(builder).await;
    let (mut ws, player_id) = join(&addr, "Lan").await;
    wait_for_info(&room, |info| info.player_count == 1).await;

    // Well past the timeout, with nothing but pings on the wire.
    for _ in 0..20 {
        ws.send(Message::Ping(b"alive".to_vec().into())).await.unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    let info = room.get_info().await.unwrap();
    assert_eq!(info.player_count, 1);
    assert_eq!(info.host, Some(player_id));
    assert_eq!(info.connections, 1);
}

#[tokio::test]
async fn test_silent_player_stays_without_idle_timeout() {
    let (addr, room) = start_server(ParlorServer::builder()).await;
    let (_ws, player_id) = join(&addr, "Minh").await;

    tokio::time::sleep(Duration::from_millis(500)).await;

    let info = room.get_info().await.unwrap();
    assert_eq!(info.player_count, 1);
    assert_eq!(info.host, Some(player_id));
}

#[tokio::test]
async fn test_idle_connection_is_closed() {
    let builder = ParlorServer::builder().idle_timeout(Duration::from_millis(200));
    let (addr, room) = start_server(builder).await;
    let mut ws = connect(&addr).await;
    wait_for_info(&room, |info| info.connections == 1).await;

    // Silence past the timeout: the server closes its end.
    let ended = tokio::time::timeout(WAIT, async {
        loop {
            match ws.next().await {
                Some(Ok(msg)) if msg.is_close() => break,
                Some(Ok(_)) => continue,
                Some(Err(_)) | None => break,
            }
        }
    })
    .await;
    assert!(ended.is_ok(), "server should close an idle connection");

    wait_for_info(&room, |info| info.connections == 0).await;
}
