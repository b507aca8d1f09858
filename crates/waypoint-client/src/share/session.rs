//! One sharing session: filter state, outgoing events, and the stop contract.

use futures_util::StreamExt;
use tokio_util::sync::CancellationToken;
use tracing::{info, warn};
use waypoint_common::{now_millis, ClientEvent, PositionError, RawReading, SessionId};

use super::filter::{FilterPolicy, SampleFilter, Verdict};
use super::source::ReadingStream;
use super::status::ShareStatus;

/// Where a session's events go. Sending must not block.
pub trait Outbound {
    /// Returns false when the event was not queued.
    fn emit(&self, event: ClientEvent) -> bool;
}

/// Keeps the device awake while sharing. Released exactly once.
pub trait WakeLock: Send {
    fn release(&mut self);
}

/// Reported to the caller for every item the source produces.
#[derive(Debug, Clone, PartialEq)]
pub enum ShareUpdate {
    Reading { status: ShareStatus, verdict: Verdict },
    SourceLost(PositionError),
}

/// A sharer's session, from join to `stop_sharing`.
///
/// Owns everything that must be released when sharing ends. [`stop`]
/// runs on drop, so every exit path cancels the subscription, tells
/// trackers, and releases the wake lock.
///
/// [`stop`]: ShareSession::stop
pub struct ShareSession<O: Outbound> {
    session_id: SessionId,
    filter: SampleFilter,
    outbound: O,
    cancel: CancellationToken,
    wake_lock: Option<Box<dyn WakeLock>>,
    stopped: bool,
}

impl<O: Outbound> ShareSession<O> {
    pub fn new(session_id: SessionId, policy: FilterPolicy, outbound: O) -> Self {
        Self {
            filter: SampleFilter::new(session_id.clone(), policy),
            session_id,
            outbound,
            cancel: CancellationToken::new(),
            wake_lock: None,
            stopped: false,
        }
    }

    pub fn with_wake_lock(mut self, lock: Box<dyn WakeLock>) -> Self {
        self.wake_lock = Some(lock);
        self
    }

    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    pub fn filter(&self) -> &SampleFilter {
        &self.filter
    }

    /// Token that ends [`run`](Self::run) when cancelled.
    pub fn cancel_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn is_stopped(&self) -> bool {
        self.stopped
    }

    /// Join the session room.
    pub fn start(&self) {
        info!(session = %self.session_id, "Sharing location");
        self.outbound.emit(ClientEvent::join(&self.session_id));
    }

    /// Offer one reading to the filter and send it if it passes.
    pub fn on_reading(&mut self, reading: RawReading, now_ms: i64) -> ShareUpdate {
        let low_signal = self.filter.policy().exceeds_threshold(reading.accuracy);
        let status = ShareStatus::from_reading(&reading, low_signal);
        let previous = self.filter.last_sent();
        let mut verdict = self.filter.offer(reading, now_ms);

        if let Verdict::Transmit(sample) = &verdict {
            let queued = match ClientEvent::update_location(sample) {
                Ok(event) => self.outbound.emit(event),
                Err(e) => {
                    warn!(error = %e, "Failed to encode sample");
                    false
                }
            };
            if !queued {
                self.filter.rewind(previous);
                verdict = Verdict::Dropped;
            }
        }

        ShareUpdate::Reading { status, verdict }
    }

    /// The source failed. The session stays joined but sends nothing more.
    pub fn on_error(&mut self, error: PositionError) -> ShareUpdate {
        warn!(session = %self.session_id, error = %error, "Position source lost");
        self.filter.fail(error);
        ShareUpdate::SourceLost(error)
    }

    /// Pump readings until the stream ends, the source fails, or the
    /// session is cancelled. A source failure is returned as the error.
    pub async fn run<F>(&mut self, mut readings: ReadingStream, mut on_update: F) -> Result<(), PositionError>
    where
        F: FnMut(&ShareUpdate),
    {
        let cancel = self.cancel.clone();
        loop {
            tokio::select! {
                _ = cancel.cancelled() => return Ok(()),
                item = readings.next() => match item {
                    Some(Ok(reading)) => {
                        let update = self.on_reading(reading, now_millis());
                        on_update(&update);
                    }
                    Some(Err(error)) => {
                        let update = self.on_error(error);
                        on_update(&update);
                        return Err(error);
                    }
                    None => return Ok(()),
                },
            }
        }
    }

    /// End the session. Returns false if it was already stopped.
    pub fn stop(&mut self) -> bool {
        if self.stopped {
            return false;
        }
        self.stopped = true;

        self.cancel.cancel();
        self.filter.stop();
        self.outbound.emit(ClientEvent::stop_sharing(&self.session_id));
        if let Some(mut lock) = self.wake_lock.take() {
            lock.release();
        }

        info!(session = %self.session_id, "Stopped sharing");
        true
    }
}

impl<O: Outbound> Drop for ShareSession<O> {
    fn drop(&mut self) {
        self.stop();
    }
}
