//! Positioning sources.
//!
//! A source turns a subscription request into a stream of readings or
//! errors. [`ReplaySource`] plays back recorded readings, one JSON object
//! per line, from a file or stdin.

use std::path::Path;
use std::pin::Pin;
use std::time::Duration;

use futures_util::{stream, Stream};
use serde::Deserialize;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader, Lines};
use tracing::{debug, warn};
use waypoint_common::{PositionError, RawReading};

/// Stream of readings handed out by [`PositionSource::watch`].
pub type ReadingStream = Pin<Box<dyn Stream<Item = Result<RawReading, PositionError>> + Send>>;

/// Subscription options, mirroring what platform location APIs accept.
#[derive(Debug, Clone, PartialEq)]
pub struct SourceOptions {
    pub high_accuracy: bool,
    /// Oldest cached reading the source may hand back. Zero means always fresh.
    pub maximum_age: Duration,
    /// How long to wait for each reading before reporting a timeout.
    pub timeout: Duration,
}

impl Default for SourceOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            maximum_age: Duration::ZERO,
            timeout: Duration::from_secs(30),
        }
    }
}

/// Anything that can produce a continuous stream of position readings.
pub trait PositionSource {
    /// Start watching. Dropping the stream cancels the subscription.
    fn watch(&mut self, options: &SourceOptions) -> Result<ReadingStream, PositionError>;
}

type LineReader = Lines<Box<dyn AsyncBufRead + Send + Unpin>>;

/// One line of a replay file.
#[derive(Debug, Deserialize)]
struct ReplayLine {
    #[serde(flatten)]
    reading: RawReading,
    /// Pause before this reading is delivered.
    #[serde(default)]
    delay_ms: Option<u64>,
}

/// Replays JSON-lines readings. Can be watched once.
pub struct ReplaySource {
    lines: Option<LineReader>,
}

impl ReplaySource {
    pub fn new<R>(reader: R) -> Self
    where
        R: AsyncBufRead + Send + Unpin + 'static,
    {
        let reader: Box<dyn AsyncBufRead + Send + Unpin> = Box::new(reader);
        Self {
            lines: Some(reader.lines()),
        }
    }

    /// Open a replay file, or stdin when `path` is `None`.
    pub async fn open(path: Option<&Path>) -> Result<Self, PositionError> {
        let Some(path) = path else {
            return Ok(Self::new(BufReader::new(tokio::io::stdin())));
        };
        match tokio::fs::File::open(path).await {
            Ok(file) => Ok(Self::new(BufReader::new(file))),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Cannot open position source");
                Err(match e.kind() {
                    std::io::ErrorKind::PermissionDenied => PositionError::PermissionDenied,
                    _ => PositionError::Unavailable,
                })
            }
        }
    }
}

impl PositionSource for ReplaySource {
    fn watch(&mut self, options: &SourceOptions) -> Result<ReadingStream, PositionError> {
        let lines = self.lines.take().ok_or(PositionError::Unavailable)?;
        debug!(
            high_accuracy = options.high_accuracy,
            timeout_ms = options.timeout.as_millis() as u64,
            "Replaying recorded readings"
        );
        let timeout = options.timeout;

        let readings = stream::unfold(Some(lines), move |lines| async move {
            let mut lines = lines?;
            loop {
                let line = match tokio::time::timeout(timeout, lines.next_line()).await {
                    Err(_) => return Some((Err(PositionError::Timeout), None)),
                    Ok(Err(e)) => {
                        warn!(error = %e, "Position source read failed");
                        return Some((Err(PositionError::Unavailable), None));
                    }
                    Ok(Ok(None)) => return None,
                    Ok(Ok(Some(line))) => line,
                };

                let line = line.trim();
                if line.is_empty() {
                    continue;
                }
                match serde_json::from_str::<ReplayLine>(line) {
                    Ok(entry) => {
                        if let Some(delay) = entry.delay_ms {
                            tokio::time::sleep(Duration::from_millis(delay)).await;
                        }
                        return Some((Ok(entry.reading), Some(lines)));
                    }
                    Err(e) => warn!(error = %e, "Skipping malformed reading"),
                }
            }
        });

        Ok(Box::pin(readings))
    }
}
