//! Rendering surface for the tracking view.

use std::io::Write;

use waypoint_common::SignalQuality;

/// Status panel contents for the tracked device.
#[derive(Debug, Clone, PartialEq)]
pub struct TargetStatus {
    pub quality: SignalQuality,
    pub accuracy_m: i64,
    /// Seconds since the sharer sent the sample, never negative.
    pub seconds_ago: i64,
}

/// A map (or anything map-like) that the tracking view drives.
pub trait Renderer {
    fn set_position(&mut self, latitude: f64, longitude: f64);
    fn set_accuracy(&mut self, radius_m: f64, quality: SignalQuality);
    fn append_path_point(&mut self, latitude: f64, longitude: f64);
    /// Centre on a point. `None` keeps the current zoom.
    fn recenter(&mut self, latitude: f64, longitude: f64, zoom: Option<u32>);
    fn show_status(&mut self, status: &TargetStatus);
    fn show_searching(&mut self);
    fn show_session_ended(&mut self);
}

/// Prints one line per update to a writer, typically stdout.
pub struct TerminalRenderer<W: Write> {
    out: W,
    position: Option<(f64, f64)>,
    zoom: Option<u32>,
    path_len: usize,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            position: None,
            zoom: None,
            path_len: 0,
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    fn line(&mut self, text: std::fmt::Arguments<'_>) {
        if let Err(e) = writeln!(self.out, "{text}") {
            tracing::warn!(error = %e, "Failed to write tracking output");
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    fn set_position(&mut self, latitude: f64, longitude: f64) {
        self.position = Some((latitude, longitude));
    }

    fn set_accuracy(&mut self, _radius_m: f64, _quality: SignalQuality) {}

    fn append_path_point(&mut self, _latitude: f64, _longitude: f64) {
        self.path_len += 1;
    }

    fn recenter(&mut self, latitude: f64, longitude: f64, zoom: Option<u32>) {
        if let Some(zoom) = zoom {
            self.zoom = Some(zoom);
            self.line(format_args!(
                "Target acquired at {latitude:.5}, {longitude:.5} (zoom {zoom})"
            ));
        }
    }

    fn show_status(&mut self, status: &TargetStatus) {
        let (lat, lon) = self.position.unwrap_or_default();
        let path_len = self.path_len;
        self.line(format_args!(
            "Position: {lat:.5}, {lon:.5} Signal: {} (±{}m) Updated {}s ago Path: {path_len} points",
            status.quality.label(),
            status.accuracy_m,
            status.seconds_ago,
        ));
    }

    fn show_searching(&mut self) {
        self.line(format_args!("Searching for device..."));
    }

    fn show_session_ended(&mut self) {
        self.line(format_args!("Session ended: the device stopped sharing"));
    }
}
