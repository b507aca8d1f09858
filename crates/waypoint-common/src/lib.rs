pub mod errors;
pub mod id;
pub mod protocol;
pub mod sample;

pub use errors::{ConfigError, PositionError, WaypointError};
pub use id::{Role, SessionId};
pub use protocol::{ClientEvent, ServerEvent};
pub use sample::{now_millis, LocationSample, RawReading, SignalQuality};

pub type Result<T> = std::result::Result<T, WaypointError>;
