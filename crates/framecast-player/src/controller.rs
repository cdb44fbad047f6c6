//! Playback state machine.
//!
//! Counters live here, not in UI state: `replay_count` increments only on a
//! natural end-of-media event, `retry_count` only when a retry actually
//! executes. Losing visibility never resets either counter; only an
//! explicit manual replay or a URL change does.

use std::time::Duration;

use framecast_core::PlaybackTunables;

/// Controller tunables. Defaults match the documented production values.
#[derive(Clone, Copy, Debug)]
pub struct PlaybackConfig {
    /// Automatic full playthroughs before playback force-pauses.
    pub max_replays: u32,
    /// Automatic error retries before the error becomes terminal.
    pub max_retries: u32,
    /// Delay before an automatic retry fires.
    pub retry_delay: Duration,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            max_replays: 5,
            max_retries: 10,
            retry_delay: Duration::from_secs(20),
        }
    }
}

impl From<PlaybackTunables> for PlaybackConfig {
    fn from(t: PlaybackTunables) -> Self {
        Self {
            max_replays: t.max_replays,
            max_retries: t.max_retries,
            retry_delay: t.retry_delay(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Phase {
    Loading,
    Ready,
    Playing,
    Paused,
}

/// Side effects the playback surface must execute after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Command {
    Play,
    Pause,
    /// Seek to the beginning and play.
    Restart,
    /// Re-request the current URL from scratch.
    Reload,
    ScheduleRetry(Duration),
    CancelRetry,
}

#[derive(Debug)]
pub struct PlaybackController {
    config: PlaybackConfig,
    phase: Phase,
    visible: bool,
    error: Option<String>,
    replay_count: u32,
    retry_count: u32,
    replay_limit_reached: bool,
    retry_pending: bool,
}

impl PlaybackController {
    pub fn new(config: PlaybackConfig, visible: bool) -> Self {
        Self {
            config,
            phase: Phase::Loading,
            visible,
            error: None,
            replay_count: 0,
            retry_count: 0,
            replay_limit_reached: false,
            retry_pending: false,
        }
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn is_loading(&self) -> bool {
        self.phase == Phase::Loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn replay_count(&self) -> u32 {
        self.replay_count
    }

    pub fn retry_count(&self) -> u32 {
        self.retry_count
    }

    pub fn has_reached_replay_limit(&self) -> bool {
        self.replay_limit_reached
    }

    pub fn retry_pending(&self) -> bool {
        self.retry_pending
    }

    /// The playback resource reported ready. Clears the error state and the
    /// retry budget, and starts playing if the item is on screen.
    pub fn on_ready(&mut self) -> Vec<Command> {
        let mut commands = self.cancel_pending_retry();
        self.error = None;
        self.retry_count = 0;
        self.phase = Phase::Ready;
        if self.visible && !self.replay_limit_reached {
            self.phase = Phase::Playing;
            commands.push(Command::Play);
        }
        commands
    }

    /// Visibility change. Off-screen items must pause: decode work and audio
    /// bleed from invisible items are never acceptable. Becoming visible
    /// again does not reset replay counters.
    pub fn set_visible(&mut self, visible: bool) -> Vec<Command> {
        if visible == self.visible {
            return Vec::new();
        }
        self.visible = visible;
        if !visible {
            if self.phase == Phase::Playing {
                self.phase = Phase::Paused;
                return vec![Command::Pause];
            }
            return Vec::new();
        }
        if !self.replay_limit_reached && matches!(self.phase, Phase::Ready | Phase::Paused) {
            self.phase = Phase::Playing;
            return vec![Command::Play];
        }
        Vec::new()
    }

    /// Natural end-of-media. Loops with a counter instead of looping
    /// forever; at the cap, playback force-pauses until a manual replay.
    pub fn on_complete(&mut self) -> Vec<Command> {
        self.replay_count += 1;
        if self.replay_count >= self.config.max_replays {
            self.replay_limit_reached = true;
            self.phase = Phase::Paused;
            return vec![Command::Pause];
        }
        self.phase = Phase::Playing;
        vec![Command::Restart]
    }

    /// Load or playback error. Schedules exactly one delayed automatic retry
    /// while budget remains; past the cap the error is terminal until a
    /// manual retry.
    pub fn on_error(&mut self, message: impl Into<String>) -> Vec<Command> {
        self.error = Some(message.into());
        self.phase = Phase::Paused;
        if self.retry_count < self.config.max_retries && !self.retry_pending {
            self.retry_pending = true;
            return vec![Command::ScheduleRetry(self.config.retry_delay)];
        }
        Vec::new()
    }

    /// The scheduled retry timer fired.
    pub fn on_retry_due(&mut self) -> Vec<Command> {
        if !self.retry_pending {
            return Vec::new();
        }
        self.retry_pending = false;
        self.retry_count += 1;
        self.phase = Phase::Loading;
        vec![Command::Reload]
    }

    /// Manual "Retry Now": cancels any pending scheduled retry and runs the
    /// retry routine immediately. Manual retries are not capped.
    pub fn on_manual_retry(&mut self) -> Vec<Command> {
        let mut commands = self.cancel_pending_retry();
        self.retry_count += 1;
        self.phase = Phase::Loading;
        commands.push(Command::Reload);
        commands
    }

    /// Manual "Replay": resets the replay budget and restarts playback.
    pub fn on_manual_replay(&mut self) -> Vec<Command> {
        self.replay_count = 0;
        self.replay_limit_reached = false;
        self.phase = Phase::Playing;
        vec![Command::Restart]
    }

    /// The media URL changed: everything resets and the new URL loads.
    pub fn on_url_change(&mut self) -> Vec<Command> {
        let mut commands = self.cancel_pending_retry();
        self.error = None;
        self.replay_count = 0;
        self.retry_count = 0;
        self.replay_limit_reached = false;
        self.phase = Phase::Loading;
        commands.push(Command::Reload);
        commands
    }

    /// The item is going away; any pending timer must not fire against a
    /// since-replaced resource.
    pub fn on_unmount(&mut self) -> Vec<Command> {
        self.cancel_pending_retry()
    }

    fn cancel_pending_retry(&mut self) -> Vec<Command> {
        if self.retry_pending {
            self.retry_pending = false;
            vec![Command::CancelRetry]
        } else {
            Vec::new()
        }
    }
}
