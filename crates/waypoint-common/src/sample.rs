//! Position readings and the samples relayed between sharer and trackers.

use serde::{Deserialize, Serialize};

use crate::id::SessionId;

/// Current wall-clock time in epoch milliseconds.
pub fn now_millis() -> i64 {
    chrono::Utc::now().timestamp_millis()
}

/// A raw reading as delivered by the positioning source, before filtering.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RawReading {
    pub latitude: f64,
    pub longitude: f64,
    /// Radius of the 68% confidence circle, in meters.
    pub accuracy: f64,
    /// Ground speed in m/s.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    /// Degrees clockwise from true north.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl RawReading {
    pub fn new(latitude: f64, longitude: f64, accuracy: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy,
            speed: None,
            heading: None,
        }
    }

    pub fn quality(&self) -> SignalQuality {
        SignalQuality::classify(self.accuracy)
    }

    /// Stamp the reading with its session and send time.
    pub fn into_sample(self, session_id: &SessionId, timestamp: i64) -> LocationSample {
        LocationSample {
            session_id: session_id.as_str().to_string(),
            latitude: self.latitude,
            longitude: self.longitude,
            accuracy: self.accuracy,
            timestamp,
            speed: self.speed,
            heading: self.heading,
        }
    }
}

/// One timestamped position sample as it travels over the relay.
///
/// The session id goes on the wire as `room`. Receivers tolerate a missing
/// room, accuracy or timestamp since the relay forwards whatever it was given.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationSample {
    #[serde(rename = "room", default)]
    pub session_id: String,
    pub latitude: f64,
    pub longitude: f64,
    #[serde(default)]
    pub accuracy: f64,
    /// Epoch milliseconds at which the sharer sent the sample.
    #[serde(default)]
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl LocationSample {
    pub fn quality(&self) -> SignalQuality {
        SignalQuality::classify(self.accuracy)
    }

    /// Speed converted to km/h, zero when unknown.
    pub fn speed_kmh(&self) -> f64 {
        self.speed.map(|s| s * 3.6).unwrap_or(0.0)
    }
}

/// Display-only classification of reading accuracy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SignalQuality {
    Pinpoint,
    Good,
    Fair,
    Poor,
}

impl SignalQuality {
    pub fn classify(accuracy: f64) -> Self {
        if accuracy <= 10.0 {
            SignalQuality::Pinpoint
        } else if accuracy <= 30.0 {
            SignalQuality::Good
        } else if accuracy <= 100.0 {
            SignalQuality::Fair
        } else {
            SignalQuality::Poor
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            SignalQuality::Pinpoint => "Pinpoint",
            SignalQuality::Good => "Good",
            SignalQuality::Fair => "Fair",
            SignalQuality::Poor => "Poor",
        }
    }

    /// Indicator colour: green, blue, yellow, red.
    pub fn color(self) -> &'static str {
        match self {
            SignalQuality::Pinpoint => "#28a745",
            SignalQuality::Good => "#007bff",
            SignalQuality::Fair => "#ffc107",
            SignalQuality::Poor => "#dc3545",
        }
    }
}
