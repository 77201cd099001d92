//! Transient notices.
//!
//! A [`NoticeBoard`] is either hidden or showing one message. Showing a
//! message replaces whatever was shown before and restarts the display
//! window; when the window elapses the board goes back to hidden.
//!
//! Inside a tokio runtime each `show` spawns a timer task that clears the
//! board and publishes the change to [`NoticeBoard::subscribe`] receivers.
//! The previous timer is aborted, and a timer only clears the board if no
//! newer message was shown since it started. Outside a runtime the window
//! is checked lazily whenever the state is read.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

/// Display window used when none is configured.
pub const DEFAULT_NOTICE_WINDOW: Duration = Duration::from_millis(3000);

/// Observable notice state.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum NoticeState {
    #[default]
    Hidden,
    Shown(String),
}

impl NoticeState {
    #[must_use]
    pub fn message(&self) -> Option<&str> {
        match self {
            Self::Hidden => None,
            Self::Shown(message) => Some(message),
        }
    }
}

#[derive(Debug, Default)]
struct Slot {
    current: Option<Shown>,
    /// Bumped on every `show` and `dismiss`; a timer holding an older
    /// generation must not touch the slot.
    generation: u64,
    timer: Option<JoinHandle<()>>,
}

#[derive(Debug)]
struct Shown {
    message: String,
    at: Instant,
}

#[derive(Debug)]
struct Shared {
    slot: Mutex<Slot>,
    state: watch::Sender<NoticeState>,
    window: Duration,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, Slot> {
        self.slot.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn hide(&self, slot: &mut Slot) {
        slot.current = None;
        slot.timer = None;
        self.state.send_replace(NoticeState::Hidden);
    }
}

/// A single-message notice area with auto-clear. Cheap to clone; clones
/// share the same state.
#[derive(Debug, Clone)]
pub struct NoticeBoard {
    shared: Arc<Shared>,
}

impl Default for NoticeBoard {
    fn default() -> Self {
        Self::new(DEFAULT_NOTICE_WINDOW)
    }
}

impl NoticeBoard {
    #[must_use]
    pub fn new(window: Duration) -> Self {
        let (state, _) = watch::channel(NoticeState::Hidden);
        Self {
            shared: Arc::new(Shared {
                slot: Mutex::new(Slot::default()),
                state,
                window,
            }),
        }
    }

    /// Show `message`, superseding any notice already shown.
    pub fn show(&self, message: impl Into<String>) {
        let message = message.into();
        let mut slot = self.shared.lock();

        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        slot.current = Some(Shown {
            message: message.clone(),
            at: Instant::now(),
        });
        debug!(%message, generation = slot.generation, "Notice shown");
        self.shared.state.send_replace(NoticeState::Shown(message));

        if let Ok(handle) = Handle::try_current() {
            let generation = slot.generation;
            let shared = Arc::clone(&self.shared);
            slot.timer = Some(handle.spawn(async move {
                tokio::time::sleep(shared.window).await;
                let mut slot = shared.lock();
                if slot.generation == generation {
                    debug!(generation, "Notice expired");
                    shared.hide(&mut slot);
                }
            }));
        }
    }

    /// Hide the notice immediately.
    pub fn dismiss(&self) {
        let mut slot = self.shared.lock();
        slot.generation += 1;
        if let Some(timer) = slot.timer.take() {
            timer.abort();
        }
        self.shared.hide(&mut slot);
    }

    /// Current state, expiring a notice whose window has elapsed.
    #[must_use]
    pub fn state(&self) -> NoticeState {
        let mut slot = self.shared.lock();
        let expired = slot
            .current
            .as_ref()
            .is_some_and(|shown| shown.at.elapsed() >= self.shared.window);
        if expired {
            slot.generation += 1;
            if let Some(timer) = slot.timer.take() {
                timer.abort();
            }
            self.shared.hide(&mut slot);
        }
        slot.current
            .as_ref()
            .map_or(NoticeState::Hidden, |shown| NoticeState::Shown(shown.message.clone()))
    }

    /// The message currently shown, if any.
    #[must_use]
    pub fn message(&self) -> Option<String> {
        self.state().message().map(str::to_string)
    }

    /// Watch state changes pushed by `show`, `dismiss` and expiry timers.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<NoticeState> {
        self.shared.state.subscribe()
    }
}
