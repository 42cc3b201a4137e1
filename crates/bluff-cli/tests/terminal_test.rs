//! Terminal driver tests against a loopback server.

use bluff_app::{AppEvent, Driver, Runtime};
use bluff_cli::{CliError, SystemEnv, TerminalDriver};
use bluff_client::{ClientConfig, DEFAULT_ROOM};
use bluff_proto::{ClientIntent, EventName, Frame, PlayerId, ServerEvent};
use tokio::{
    io::{AsyncReadExt, AsyncWriteExt},
    net::{TcpListener, TcpStream},
    sync::mpsc,
};

async fn write_event(stream: &mut TcpStream, event: ServerEvent) {
    let mut buf = Vec::new();
    event.into_frame().unwrap().encode(&mut buf).unwrap();
    stream.write_all(&buf).await.unwrap();
}

async fn read_frame(stream: &mut TcpStream) -> Frame {
    let mut prefix = [0u8; Frame::PREFIX_SIZE];
    stream.read_exact(&mut prefix).await.unwrap();
    let mut body = vec![0u8; Frame::body_len_from_prefix(prefix).unwrap()];
    stream.read_exact(&mut body).await.unwrap();
    Frame::decode_body(&body).unwrap()
}

fn driver() -> (TerminalDriver<Vec<u8>>, mpsc::Sender<String>) {
    let (tx, rx) = mpsc::channel(8);
    (TerminalDriver::new(rx, Vec::new(), DEFAULT_ROOM), tx)
}

#[tokio::test]
async fn lines_become_events() {
    let (mut driver, tx) = driver();
    tx.send("play 10".into()).await.unwrap();
    drop(tx);

    let event = driver.poll_event().await.unwrap();
    assert_eq!(event, Some(AppEvent::Line("play 10".into())));

    let event = driver.poll_event().await.unwrap();
    assert_eq!(event, Some(AppEvent::InputClosed));
}

#[tokio::test]
async fn idle_poll_returns_nothing() {
    let (mut driver, _tx) = driver();
    assert_eq!(driver.poll_event().await.unwrap(), None);
    assert!(driver.recv_frame().await.is_none());
}

#[tokio::test]
async fn send_without_connection_fails() {
    let (mut driver, _tx) = driver();
    let frame = ClientIntent::RequestNewGame(bluff_proto::events::RoomRef::new(DEFAULT_ROOM))
        .into_frame()
        .unwrap();

    assert!(matches!(driver.send_frame(frame).await, Err(CliError::NotConnected)));
}

#[tokio::test]
async fn frames_arrive_and_hangup_disconnects() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();

    tokio::spawn(async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        write_event(&mut stream, ServerEvent::Connected(PlayerId::from("p1"))).await;
        write_event(&mut stream, ServerEvent::TableCleared).await;
    });

    let (mut driver, _tx) = driver();
    driver.connect(&addr).await.unwrap();
    assert!(driver.is_connected());

    let mut names = Vec::new();
    while names.len() < 2 {
        let _ = driver.poll_event().await.unwrap();
        if let Some(frame) = driver.recv_frame().await {
            names.push(frame.name);
        }
    }
    assert_eq!(names, vec![EventName::Connected, EventName::TableCleared]);

    while driver.is_connected() {
        let _ = driver.poll_event().await.unwrap();
        let _ = driver.recv_frame().await;
    }
}

#[tokio::test]
async fn unchanged_screen_is_written_once() {
    let (mut driver, _tx) = driver();
    let app = bluff_app::App::new("127.0.0.1:3001".into());
    let view = bluff_core::GameView::new();

    driver.render(&app, &view).unwrap();
    let written = driver.output().len();
    driver.render(&app, &view).unwrap();

    assert!(written > 0);
    assert_eq!(driver.output().len(), written);
}

#[tokio::test]
async fn runtime_joins_then_quits() {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap().to_string();
    let (terminal, tx) = driver();

    let server = async move {
        let (mut stream, _) = listener.accept().await.unwrap();
        write_event(&mut stream, ServerEvent::Connected(PlayerId::from("p1"))).await;
        let join = read_frame(&mut stream).await;
        tx.send("quit".into()).await.unwrap();
        join
    };

    let config = ClientConfig::default().with_name("Alice");
    let runtime = Runtime::new(terminal, SystemEnv::new(), config, addr);
    let (result, join) = tokio::join!(runtime.run(), server);

    result.unwrap();
    assert!(matches!(
        ClientIntent::from_frame(&join).unwrap(),
        ClientIntent::JoinRoom(j) if j.player_name == "Alice" && j.room_id == DEFAULT_ROOM
    ));
}
