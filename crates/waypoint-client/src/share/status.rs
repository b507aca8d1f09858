//! Sharer-side status line derived from the latest reading.

use std::fmt;

use waypoint_common::{RawReading, SignalQuality};

/// What the sharer sees after each reading, whether or not it was sent.
#[derive(Debug, Clone, PartialEq)]
pub struct ShareStatus {
    pub quality: SignalQuality,
    /// Accuracy rounded to whole meters.
    pub accuracy_m: i64,
    pub latitude: f64,
    pub longitude: f64,
    pub speed_kmh: f64,
    /// Set when the reading is worse than the rejection threshold.
    pub low_signal: bool,
}

impl ShareStatus {
    pub fn from_reading(reading: &RawReading, low_signal: bool) -> Self {
        Self {
            quality: reading.quality(),
            accuracy_m: reading.accuracy.round() as i64,
            latitude: reading.latitude,
            longitude: reading.longitude,
            speed_kmh: reading.speed.map(|s| s * 3.6).unwrap_or(0.0),
            low_signal,
        }
    }
}

impl fmt::Display for ShareStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Broadcasting location... Signal: {} (±{}m) Lat: {:.5} Lon: {:.5} Speed: {:.1} km/h",
            self.quality.label(),
            self.accuracy_m,
            self.latitude,
            self.longitude,
            self.speed_kmh,
        )?;
        if self.low_signal {
            write!(f, " ⚠ Filtering poor signal")?;
        }
        Ok(())
    }
}
