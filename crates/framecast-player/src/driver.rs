//! Event-loop binding for the playback controller.
//!
//! [`PlayerDriver`] owns a [`PlaybackController`] and an injected
//! [`MediaSurface`], translating controller commands into surface calls. It
//! also owns the single retry timer: `ScheduleRetry` spawns a sleeping task
//! that feeds `RetryDue` back into the event loop, and `CancelRetry` aborts
//! it so a stale timer can never fire against a replaced resource.

use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use crate::controller::{Command, PlaybackConfig, PlaybackController};

const EVENT_CHANNEL_CAPACITY: usize = 32;

/// The actual playback resource (decoder, video element, test double).
#[async_trait::async_trait]
pub trait MediaSurface: Send + 'static {
    async fn play(&mut self);
    async fn pause(&mut self);
    /// Seek to the beginning and play.
    async fn restart(&mut self);
    /// Tear down and re-request the current URL.
    async fn reload(&mut self);
}

/// Inputs to the driver loop, from the surface, the UI, or the retry timer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerEvent {
    Ready,
    Completed,
    Error(String),
    VisibilityChanged(bool),
    ManualReplay,
    ManualRetry,
    UrlChanged,
    RetryDue,
    Unmount,
}

/// Cloneable sender half for pushing events into a running driver.
#[derive(Clone)]
pub struct PlayerHandle {
    tx: mpsc::Sender<PlayerEvent>,
}

impl PlayerHandle {
    /// Delivers an event to the driver loop. Returns false once the driver
    /// has shut down.
    pub async fn send(&self, event: PlayerEvent) -> bool {
        self.tx.send(event).await.is_ok()
    }
}

pub struct PlayerDriver<S: MediaSurface> {
    controller: PlaybackController,
    surface: S,
    events_tx: mpsc::Sender<PlayerEvent>,
    events_rx: mpsc::Receiver<PlayerEvent>,
    retry_timer: Option<JoinHandle<()>>,
}

impl<S: MediaSurface> PlayerDriver<S> {
    pub fn new(config: PlaybackConfig, visible: bool, surface: S) -> (Self, PlayerHandle) {
        let (events_tx, events_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let handle = PlayerHandle {
            tx: events_tx.clone(),
        };
        let driver = Self {
            controller: PlaybackController::new(config, visible),
            surface,
            events_tx,
            events_rx,
            retry_timer: None,
        };
        (driver, handle)
    }

    pub fn controller(&self) -> &PlaybackController {
        &self.controller
    }

    /// Runs until an `Unmount` event arrives or every handle is dropped.
    pub async fn run(mut self) {
        while let Some(event) = self.events_rx.recv().await {
            if !self.handle_event(event).await {
                break;
            }
        }
        self.cancel_timer();
        tracing::debug!("Player driver stopped");
    }

    async fn handle_event(&mut self, event: PlayerEvent) -> bool {
        let unmounting = event == PlayerEvent::Unmount;
        let commands = match event {
            PlayerEvent::Ready => self.controller.on_ready(),
            PlayerEvent::Completed => self.controller.on_complete(),
            PlayerEvent::Error(message) => {
                tracing::warn!(error = %message, "Playback error reported");
                self.controller.on_error(message)
            }
            PlayerEvent::VisibilityChanged(visible) => self.controller.set_visible(visible),
            PlayerEvent::ManualReplay => self.controller.on_manual_replay(),
            PlayerEvent::ManualRetry => self.controller.on_manual_retry(),
            PlayerEvent::UrlChanged => self.controller.on_url_change(),
            PlayerEvent::RetryDue => self.controller.on_retry_due(),
            PlayerEvent::Unmount => self.controller.on_unmount(),
        };
        self.apply(commands).await;
        !unmounting
    }

    async fn apply(&mut self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Play => self.surface.play().await,
                Command::Pause => self.surface.pause().await,
                Command::Restart => self.surface.restart().await,
                Command::Reload => self.surface.reload().await,
                Command::ScheduleRetry(delay) => {
                    self.cancel_timer();
                    let tx = self.events_tx.clone();
                    tracing::info!(delay_secs = delay.as_secs(), "Scheduling playback retry");
                    self.retry_timer = Some(tokio::spawn(async move {
                        tokio::time::sleep(delay).await;
                        let _ = tx.send(PlayerEvent::RetryDue).await;
                    }));
                }
                Command::CancelRetry => self.cancel_timer(),
            }
        }
    }

    fn cancel_timer(&mut self) {
        if let Some(timer) = self.retry_timer.take() {
            timer.abort();
        }
    }
}
