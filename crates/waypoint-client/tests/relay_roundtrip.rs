//! Sharer and tracker talking through a real relay.

use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::mpsc;
use waypoint_client::{
    FilterPolicy, RelayClient, RelayClientConfig, RelayEvent, ShareSession, TrackingView,
    ViewOptions, ViewState,
};
use waypoint_client::{Renderer, TargetStatus};
use waypoint_common::{now_millis, RawReading, ServerEvent, SessionId, SignalQuality};
use waypoint_relay::{serve, Relay};

#[derive(Default)]
struct Silent;

impl Renderer for Silent {
    fn set_position(&mut self, _: f64, _: f64) {}
    fn set_accuracy(&mut self, _: f64, _: SignalQuality) {}
    fn append_path_point(&mut self, _: f64, _: f64) {}
    fn recenter(&mut self, _: f64, _: f64, _: Option<u32>) {}
    fn show_status(&mut self, _: &TargetStatus) {}
    fn show_searching(&mut self) {}
    fn show_session_ended(&mut self) {}
}

async fn start_relay() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(serve(listener, Relay::new(64)));
    format!("ws://{addr}")
}

fn config(url: &str) -> RelayClientConfig {
    RelayClientConfig {
        url: url.to_string(),
        ..RelayClientConfig::default()
    }
}

async fn wait_connected(events: &mut mpsc::Receiver<RelayEvent>) {
    let event = tokio::time::timeout(Duration::from_secs(5), events.recv())
        .await
        .expect("no connection");
    assert_eq!(event, Some(RelayEvent::Connected));
}

async fn next_server_event(events: &mut mpsc::Receiver<RelayEvent>, within: Duration) -> Option<ServerEvent> {
    let deadline = tokio::time::Instant::now() + within;
    loop {
        match tokio::time::timeout_at(deadline, events.recv()).await {
            Ok(Some(RelayEvent::Server(event))) => return Some(event),
            Ok(Some(_)) => continue,
            Ok(None) | Err(_) => return None,
        }
    }
}

#[tokio::test]
async fn tracker_follows_sharer_until_stop() {
    let url = start_relay().await;
    let session_id = SessionId::parse("ABC123").unwrap();

    let (tracker, mut tracker_events) = RelayClient::connect(config(&url));
    wait_connected(&mut tracker_events).await;
    tracker.join(&session_id).await;

    let (sharer, mut sharer_events) = RelayClient::connect(config(&url));
    wait_connected(&mut sharer_events).await;
    let mut session = ShareSession::new(session_id.clone(), FilterPolicy::passthrough(), sharer.sender());
    session.start();

    let mut view = TrackingView::new(Silent, ViewOptions::default());

    // The tracker's join races the first samples; keep sending until one lands.
    let mut received = None;
    for i in 0..50 {
        session.on_reading(RawReading::new(52.52, 13.405 + i as f64 * 1e-4, 8.0), now_millis());
        if let Some(event) = next_server_event(&mut tracker_events, Duration::from_millis(100)).await {
            received = Some(event);
            break;
        }
    }
    let event = received.expect("tracker never received a sample");
    let sample = event.location().expect("not a location").unwrap();
    assert_eq!(sample.session_id, "ABC123");
    assert_eq!(sample.accuracy, 8.0);
    view.handle(&event, now_millis());
    assert_eq!(view.state(), ViewState::Tracking);

    assert!(session.stop());
    loop {
        let event = next_server_event(&mut tracker_events, Duration::from_secs(5))
            .await
            .expect("no stop notification");
        view.handle(&event, now_millis());
        if event == ServerEvent::DeviceStopped {
            break;
        }
    }
    assert_eq!(view.state(), ViewState::Ended);

    drop(session);
    sharer.shutdown().await;
    tracker.shutdown().await;
}
