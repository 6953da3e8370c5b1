//! End-to-end tests for the WebSocket live feed

use futures::{SinkExt, StreamExt};
use polarization_monitor::{StatusPayload, api::websocket::ACK_PREFIX};
use pretty_assertions::assert_eq;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::{
    MaybeTlsStream, WebSocketStream, connect_async, tungstenite::Message,
};

use crate::helpers::*;

type Client = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// Next text frame, skipping control frames
async fn next_text(client: &mut Client) -> String {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Text(text))) => return text,
                Some(Ok(_)) => continue,
                other => panic!("connection ended unexpectedly: {other:?}"),
            }
        }
    })
    .await
    .expect("timed out waiting for a text frame")
}

#[tokio::test]
async fn test_three_clients_receive_same_tick() {
    let hub = spawn_test_hub(&[0.80]).await;

    let mut clients = vec![];
    for _ in 0..3 {
        let (client, _) = connect_async(hub.ws_url()).await.unwrap();
        clients.push(client);
    }
    wait_for_subscribers(&hub.state.subscribers, 3).await;

    let outcome = hub.monitor.tick_now().await.unwrap().unwrap();
    assert_eq!(outcome.delivered, 3);

    let mut received = vec![];
    for client in &mut clients {
        received.push(next_text(client).await);
    }
    assert!(received.iter().all(|text| text == &received[0]));

    let payload: StatusPayload = serde_json::from_str(&received[0]).unwrap();
    assert_eq!(payload.value, 0.80);
    assert!(payload.is_alert);
    assert_eq!(payload.alert_count, 1);

    hub.monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_client_messages_are_acknowledged() {
    let hub = spawn_test_hub(&[]).await;

    let (mut client, _) = connect_async(hub.ws_url()).await.unwrap();
    wait_for_subscribers(&hub.state.subscribers, 1).await;

    client
        .send(Message::Text("hello".to_string()))
        .await
        .unwrap();

    assert_eq!(next_text(&mut client).await, format!("{ACK_PREFIX}hello"));

    hub.monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_disconnect_deregisters_subscriber() {
    let hub = spawn_test_hub(&[]).await;

    let (mut leaving, _) = connect_async(hub.ws_url()).await.unwrap();
    let (mut staying, _) = connect_async(hub.ws_url()).await.unwrap();
    wait_for_subscribers(&hub.state.subscribers, 2).await;

    leaving.close(None).await.unwrap();
    wait_for_subscribers(&hub.state.subscribers, 1).await;

    let outcome = hub.monitor.tick_now().await.unwrap().unwrap();
    assert_eq!(outcome.delivered, 1);
    next_text(&mut staying).await;

    hub.monitor.shutdown().await.unwrap();
}

/// Wait until the server closes the connection, failing on any further payload
async fn expect_closed(client: &mut Client) {
    tokio::time::timeout(Duration::from_secs(5), async {
        loop {
            match client.next().await {
                Some(Ok(Message::Close(_))) | None | Some(Err(_)) => return,
                Some(Ok(Message::Text(text))) => panic!("unexpected text after drop: {text}"),
                Some(Ok(_)) => continue,
            }
        }
    })
    .await
    .expect("server did not close the connection")
}

#[tokio::test]
async fn test_dropped_subscriber_connection_is_closed() {
    let hub = spawn_test_hub(&[]).await;

    let (mut dropped, _) = connect_async(hub.ws_url()).await.unwrap();
    wait_for_subscribers(&hub.state.subscribers, 1).await;
    let dropped_id = hub.state.subscribers.ids().await[0];

    let (mut kept, _) = connect_async(hub.ws_url()).await.unwrap();
    wait_for_subscribers(&hub.state.subscribers, 2).await;

    assert!(hub.state.subscribers.disconnect(dropped_id).await);
    expect_closed(&mut dropped).await;

    let outcome = hub.monitor.tick_now().await.unwrap().unwrap();
    assert_eq!((outcome.delivered, outcome.dropped), (1, 0));
    next_text(&mut kept).await;

    hub.monitor.shutdown().await.unwrap();
}

#[tokio::test]
async fn test_no_clients_means_idle_monitor() {
    let hub = spawn_test_hub(&[0.9]).await;

    assert!(hub.monitor.tick_now().await.unwrap().is_none());
    assert_eq!(hub.state.history.alert_count().await, 0);

    hub.monitor.shutdown().await.unwrap();
}
