//! Client side of Waypoint: the relay connection, the sharer session with
//! its sample filter, and the tracking view.

pub mod relay;
pub mod share;
pub mod track;

pub use relay::{RelayClient, RelayClientConfig, RelayEvent, RelaySender};
pub use share::{
    FilterPolicy, FilterState, InhibitorLock, Outbound, PositionSource, ReadingStream, ReplaySource, SampleFilter,
    ShareSession, ShareStatus, ShareUpdate, SourceOptions, Verdict, WakeLock,
};
pub use track::{Renderer, TargetStatus, TerminalRenderer, TrackingView, ViewOptions, ViewState};
