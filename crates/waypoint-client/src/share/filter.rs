//! Accuracy gate and send throttle for outgoing samples.

use std::time::Duration;

use waypoint_common::{LocationSample, PositionError, RawReading, SessionId};

/// Which readings are worth sending.
///
/// The three historical behaviours are all expressible: gate plus throttle
/// (the default), gate only, and neither.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPolicy {
    /// Readings with accuracy worse than this many meters are dropped.
    /// `None` disables the gate.
    pub rejection_threshold: Option<f64>,
    /// Minimum spacing between two transmitted samples.
    pub min_interval: Duration,
    /// Let one over-threshold reading through while nothing has been sent,
    /// so trackers get an initial fix.
    pub first_sample_bypass: bool,
}

impl FilterPolicy {
    pub const DEFAULT_REJECTION_THRESHOLD: f64 = 100.0;
    pub const DEFAULT_MIN_INTERVAL: Duration = Duration::from_millis(2000);

    pub fn gated(rejection_threshold: f64, min_interval: Duration) -> Self {
        Self {
            rejection_threshold: Some(rejection_threshold),
            min_interval,
            first_sample_bypass: true,
        }
    }

    pub fn gate_only(rejection_threshold: f64) -> Self {
        Self::gated(rejection_threshold, Duration::ZERO)
    }

    pub fn passthrough() -> Self {
        Self {
            rejection_threshold: None,
            min_interval: Duration::ZERO,
            first_sample_bypass: false,
        }
    }

    /// Whether `accuracy` fails the gate, ignoring the first-sample bypass.
    pub fn exceeds_threshold(&self, accuracy: f64) -> bool {
        match self.rejection_threshold {
            Some(threshold) => accuracy.is_nan() || accuracy > threshold,
            None => false,
        }
    }
}

impl Default for FilterPolicy {
    fn default() -> Self {
        Self::gated(Self::DEFAULT_REJECTION_THRESHOLD, Self::DEFAULT_MIN_INTERVAL)
    }
}

/// Outcome of offering one reading to the filter.
#[derive(Debug, Clone, PartialEq)]
pub enum Verdict {
    /// Send this sample now.
    Transmit(LocationSample),
    /// Accuracy worse than the rejection threshold.
    Rejected { accuracy: f64 },
    /// Too soon after the previous transmission.
    Throttled { wait: Duration },
    /// Passed the filter but the relay would not take it. The sample does
    /// not count as sent.
    Dropped,
    /// The filter no longer accepts readings.
    Inactive,
}

/// Lifecycle of the filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilterState {
    Active,
    /// The positioning source failed. Terminal.
    NoSource(PositionError),
    /// Sharing was stopped. Terminal.
    Stopped,
}

/// Per-session filter state: the policy plus the last transmission time.
#[derive(Debug, Clone)]
pub struct SampleFilter {
    session_id: SessionId,
    policy: FilterPolicy,
    last_sent: Option<i64>,
    state: FilterState,
}

impl SampleFilter {
    pub fn new(session_id: SessionId, policy: FilterPolicy) -> Self {
        Self {
            session_id,
            policy,
            last_sent: None,
            state: FilterState::Active,
        }
    }

    pub fn policy(&self) -> &FilterPolicy {
        &self.policy
    }

    pub fn state(&self) -> FilterState {
        self.state
    }

    /// Whether a sample has been transmitted in this session.
    pub fn has_sent(&self) -> bool {
        self.last_sent.is_some()
    }

    pub(crate) fn last_sent(&self) -> Option<i64> {
        self.last_sent
    }

    /// Undo a `Transmit` whose sample never left the device.
    pub(crate) fn rewind(&mut self, last_sent: Option<i64>) {
        self.last_sent = last_sent;
    }

    /// Gate, then throttle. A `Transmit` verdict counts as sent.
    pub fn offer(&mut self, reading: RawReading, now_ms: i64) -> Verdict {
        if self.state != FilterState::Active {
            return Verdict::Inactive;
        }

        if self.policy.exceeds_threshold(reading.accuracy)
            && (self.has_sent() || !self.policy.first_sample_bypass)
        {
            return Verdict::Rejected {
                accuracy: reading.accuracy,
            };
        }

        if let Some(last) = self.last_sent {
            let interval = self.policy.min_interval.as_millis() as i64;
            let elapsed = now_ms.saturating_sub(last);
            if elapsed < interval {
                let wait = interval.saturating_sub(elapsed.max(0)) as u64;
                return Verdict::Throttled {
                    wait: Duration::from_millis(wait),
                };
            }
        }

        self.last_sent = Some(now_ms);
        Verdict::Transmit(reading.into_sample(&self.session_id, now_ms))
    }

    /// The positioning source is gone. Later readings are ignored.
    pub fn fail(&mut self, error: PositionError) {
        if self.state == FilterState::Active {
            self.state = FilterState::NoSource(error);
        }
    }

    /// Stop accepting readings. Returns false if already stopped.
    pub fn stop(&mut self) -> bool {
        if self.state == FilterState::Stopped {
            return false;
        }
        self.state = FilterState::Stopped;
        true
    }
}
