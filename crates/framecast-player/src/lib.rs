//! Resilient playback controller and receiver-side notification feed.
//!
//! The controller is a pure state machine: every input returns the commands
//! the playback surface should execute, so the replay-cap and retry-cap
//! logic is unit-testable without a UI harness. [`driver::PlayerDriver`]
//! binds the machine to an injected [`driver::MediaSurface`] and owns the
//! single cancellable retry timer.

pub mod controller;
pub mod driver;
pub mod feed;

pub use controller::{Command, Phase, PlaybackConfig, PlaybackController};
pub use driver::{MediaSurface, PlayerDriver, PlayerEvent, PlayerHandle};
pub use feed::{MediaNotification, NotificationFeed};
