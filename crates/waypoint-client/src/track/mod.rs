//! Tracker side: turns forwarded samples into map updates.

mod renderer;
mod view;

pub use renderer::{Renderer, TargetStatus, TerminalRenderer};
pub use view::{TrackingView, ViewOptions, ViewState};
