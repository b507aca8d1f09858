//! Tracker-side state machine over forwarded samples.

use tracing::{info, warn};
use waypoint_common::{LocationSample, ServerEvent};

use super::renderer::{Renderer, TargetStatus};

#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    /// Zoom level used when the first fix arrives.
    pub acquire_zoom: u32,
    /// Radius drawn when a sample has no usable accuracy.
    pub fallback_radius: f64,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            acquire_zoom: 16,
            fallback_radius: 50.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewState {
    /// No sample received yet.
    Searching,
    Tracking,
    /// The sharer stopped. Later samples are still drawn.
    Ended,
}

pub struct TrackingView<R: Renderer> {
    renderer: R,
    options: ViewOptions,
    state: ViewState,
    acquired: bool,
    path: Vec<(f64, f64)>,
}

impl<R: Renderer> TrackingView<R> {
    pub fn new(mut renderer: R, options: ViewOptions) -> Self {
        renderer.show_searching();
        Self {
            renderer,
            options,
            state: ViewState::Searching,
            acquired: false,
            path: Vec::new(),
        }
    }

    pub fn state(&self) -> ViewState {
        self.state
    }

    pub fn path(&self) -> &[(f64, f64)] {
        &self.path
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn on_sample(&mut self, sample: &LocationSample, now_ms: i64) {
        let (lat, lon) = (sample.latitude, sample.longitude);
        let radius = if sample.accuracy > 0.0 {
            sample.accuracy
        } else {
            self.options.fallback_radius
        };

        self.renderer.set_position(lat, lon);
        self.renderer.set_accuracy(radius, sample.quality());
        self.path.push((lat, lon));
        self.renderer.append_path_point(lat, lon);

        if self.acquired {
            self.renderer.recenter(lat, lon, None);
        } else {
            self.acquired = true;
            info!(session = %sample.session_id, "Target acquired");
            self.renderer.recenter(lat, lon, Some(self.options.acquire_zoom));
        }
        if self.state == ViewState::Searching {
            self.state = ViewState::Tracking;
        }

        self.renderer.show_status(&TargetStatus {
            quality: sample.quality(),
            accuracy_m: sample.accuracy.round() as i64,
            seconds_ago: (now_ms.saturating_sub(sample.timestamp) / 1000).max(0),
        });
    }

    pub fn on_stopped(&mut self) {
        if self.state != ViewState::Ended {
            info!("Device stopped sharing");
            self.state = ViewState::Ended;
            self.renderer.show_session_ended();
        }
    }

    /// Apply one relay event. Malformed samples are logged and skipped.
    pub fn handle(&mut self, event: &ServerEvent, now_ms: i64) {
        match event {
            ServerEvent::ReceiveLocation(payload) => {
                match serde_json::from_value::<LocationSample>(payload.clone()) {
                    Ok(sample) => self.on_sample(&sample, now_ms),
                    Err(e) => warn!(error = %e, "Skipping malformed location"),
                }
            }
            ServerEvent::DeviceStopped => self.on_stopped(),
        }
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;
    use waypoint_common::SignalQuality;

    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        Position(f64, f64),
        Accuracy(f64, SignalQuality),
        Path(f64, f64),
        Recenter(Option<u32>),
        Status(TargetStatus),
        Searching,
        Ended,
    }

    #[derive(Default)]
    struct Recording(Vec<Call>);

    impl Renderer for Recording {
        fn set_position(&mut self, latitude: f64, longitude: f64) {
            self.0.push(Call::Position(latitude, longitude));
        }
        fn set_accuracy(&mut self, radius_m: f64, quality: SignalQuality) {
            self.0.push(Call::Accuracy(radius_m, quality));
        }
        fn append_path_point(&mut self, latitude: f64, longitude: f64) {
            self.0.push(Call::Path(latitude, longitude));
        }
        fn recenter(&mut self, _latitude: f64, _longitude: f64, zoom: Option<u32>) {
            self.0.push(Call::Recenter(zoom));
        }
        fn show_status(&mut self, status: &TargetStatus) {
            self.0.push(Call::Status(status.clone()));
        }
        fn show_searching(&mut self) {
            self.0.push(Call::Searching);
        }
        fn show_session_ended(&mut self) {
            self.0.push(Call::Ended);
        }
    }

    const T0: i64 = 1_700_000_000_000;

    fn sample(lat: f64, accuracy: f64) -> LocationSample {
        LocationSample {
            session_id: "ABC123".into(),
            latitude: lat,
            longitude: 13.405,
            accuracy,
            timestamp: T0,
            speed: None,
            heading: None,
        }
    }

    fn view() -> TrackingView<Recording> {
        TrackingView::new(Recording::default(), ViewOptions::default())
    }

    #[test]
    fn starts_searching() {
        let v = view();
        assert_eq!(v.state(), ViewState::Searching);
        assert_eq!(v.renderer().0, vec![Call::Searching]);
    }

    #[test]
    fn first_sample_acquires_at_zoom() {
        let mut v = view();
        v.on_sample(&sample(52.52, 8.0), T0 + 3_400);

        assert_eq!(v.state(), ViewState::Tracking);
        assert_eq!(v.path(), &[(52.52, 13.405)]);
        assert_eq!(
            v.renderer().0[1..],
            [
                Call::Position(52.52, 13.405),
                Call::Accuracy(8.0, SignalQuality::Pinpoint),
                Call::Path(52.52, 13.405),
                Call::Recenter(Some(16)),
                Call::Status(TargetStatus {
                    quality: SignalQuality::Pinpoint,
                    accuracy_m: 8,
                    seconds_ago: 3,
                }),
            ]
        );
    }

    #[test]
    fn later_samples_keep_zoom_and_extend_path() {
        let mut v = view();
        for i in 0..5 {
            v.on_sample(&sample(52.0 + i as f64 * 0.001, 20.0), T0);
        }
        assert_eq!(v.path().len(), 5);
        let recenters: Vec<_> = v
            .renderer()
            .0
            .iter()
            .filter_map(|c| match c {
                Call::Recenter(z) => Some(*z),
                _ => None,
            })
            .collect();
        assert_eq!(recenters, vec![Some(16), None, None, None, None]);
    }

    #[test]
    fn missing_accuracy_uses_fallback_radius() {
        let mut v = view();
        v.on_sample(&sample(1.0, 0.0), T0);
        assert!(v.renderer().0.contains(&Call::Accuracy(50.0, SignalQuality::Pinpoint)));
    }

    #[test]
    fn future_timestamp_reports_zero_seconds() {
        let mut v = view();
        v.on_sample(&sample(1.0, 5.0), T0 - 10_000);
        assert!(matches!(
            v.renderer().0.last(),
            Some(Call::Status(TargetStatus { seconds_ago: 0, .. }))
        ));
    }

    #[test]
    fn stop_ends_session_but_samples_still_render() {
        let mut v = view();
        v.on_sample(&sample(1.0, 5.0), T0);
        v.handle(&ServerEvent::DeviceStopped, T0);
        v.handle(&ServerEvent::DeviceStopped, T0);
        assert_eq!(v.state(), ViewState::Ended);
        let ended = v.renderer().0.iter().filter(|c| **c == Call::Ended).count();
        assert_eq!(ended, 1);

        v.on_sample(&sample(2.0, 5.0), T0);
        assert_eq!(v.state(), ViewState::Ended);
        assert_eq!(v.path().len(), 2);
    }

    #[test]
    fn handle_decodes_forwarded_payload() {
        let mut v = view();
        let event = ServerEvent::ReceiveLocation(json!({
            "room": "ABC123",
            "latitude": 48.85,
            "longitude": 2.35,
            "accuracy": 12.0,
            "timestamp": T0
        }));
        v.handle(&event, T0);
        assert_eq!(v.path(), &[(48.85, 2.35)]);
    }

    #[test]
    fn malformed_payload_is_skipped() {
        let mut v = view();
        v.handle(&ServerEvent::ReceiveLocation(json!({"latitude": "north"})), T0);
        assert_eq!(v.state(), ViewState::Searching);
        assert!(v.path().is_empty());
    }
}
