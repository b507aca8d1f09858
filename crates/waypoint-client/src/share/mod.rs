//! Sharer side: positioning source, sample filter, and the session that
//! ties them to the relay.

mod filter;
mod session;
mod source;
mod status;
mod wake;

pub use filter::{FilterPolicy, FilterState, SampleFilter, Verdict};
pub use session::{Outbound, ShareSession, ShareUpdate, WakeLock};
pub use source::{PositionSource, ReadingStream, ReplaySource, SourceOptions};
pub use status::ShareStatus;
pub use wake::InhibitorLock;
