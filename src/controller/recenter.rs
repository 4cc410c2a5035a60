//! # Recenter Gesture
//!
//! Holding the home button for a configured time (1 second by default)
//! requests a recenter.
//!
//! ## State Machine
//!
//! ```text
//!            home down              timer expires
//!   Idle ───────────────► TimerArmed ─────────────► PendingRecenter
//!    ▲                        │                           │
//!    │        home up         │                           │
//!    ├────────────────────────┘                           │
//!    │               next successful poll                 │
//!    └────────────────────────────────────────────────────┘
//! ```
//!
//! The timer runs as a tokio task and only ever sets the pending flag; the
//! poller only ever reads and clears it. A cancel racing an expiring timer
//! either lets the recenter through or drops it; both are valid outcomes.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tokio::time::{sleep_until, Instant};
use tracing::debug;

use crate::error::{BridgeError, Result};

/// Default home-button hold time before a recenter triggers.
pub const DEFAULT_RECENTER_HOLD: Duration = Duration::from_millis(1000);

/// Observable state of the recenter gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecenterState {
    Idle,
    TimerArmed,
    PendingRecenter,
}

/// Single-fire hold timer that latches a recenter request.
pub struct RecenterTimer {
    hold: Duration,
    pending: Arc<AtomicBool>,
    timer: Option<JoinHandle<()>>,
    runtime: Handle,
}

impl std::fmt::Debug for RecenterTimer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecenterTimer")
            .field("hold", &self.hold)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

impl RecenterTimer {
    /// Creates a timer on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns `Runtime` if called outside a tokio runtime.
    pub fn new(hold: Duration) -> Result<Self> {
        let runtime = Handle::try_current()
            .map_err(|e| BridgeError::Runtime(format!("Recenter timer needs a tokio runtime: {}", e)))?;
        Ok(Self::with_handle(hold, runtime))
    }

    /// Creates a timer that spawns onto the given runtime.
    #[must_use]
    pub fn with_handle(hold: Duration, runtime: Handle) -> Self {
        Self {
            hold,
            pending: Arc::new(AtomicBool::new(false)),
            timer: None,
            runtime,
        }
    }

    /// Configured hold duration.
    #[must_use]
    pub fn hold(&self) -> Duration {
        self.hold
    }

    /// (Re)starts the hold timer.
    pub fn arm(&mut self) {
        self.cancel();

        let deadline = Instant::now() + self.hold;
        let pending = Arc::clone(&self.pending);
        self.timer = Some(self.runtime.spawn(async move {
            sleep_until(deadline).await;
            pending.store(true, Ordering::Release);
            debug!("Home button held long enough, recenter requested");
        }));
    }

    /// Stops the hold timer. A request that already latched stays pending.
    pub fn cancel(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }

    /// Consumes a latched recenter request.
    pub fn take_pending(&self) -> bool {
        self.pending.swap(false, Ordering::AcqRel)
    }

    #[must_use]
    pub fn state(&self) -> RecenterState {
        if self.pending.load(Ordering::Acquire) {
            RecenterState::PendingRecenter
        } else if self.timer.as_ref().is_some_and(|timer| !timer.is_finished()) {
            RecenterState::TimerArmed
        } else {
            RecenterState::Idle
        }
    }
}

impl Drop for RecenterTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::time::sleep;

    const HOLD: Duration = Duration::from_millis(1000);

    #[test]
    fn test_new_outside_runtime_fails() {
        let result = RecenterTimer::new(HOLD);
        assert!(matches!(result, Err(BridgeError::Runtime(_))));
    }

    #[tokio::test(start_paused = true)]
    async fn test_starts_idle() {
        let timer = RecenterTimer::new(HOLD).unwrap();
        assert_eq!(timer.state(), RecenterState::Idle);
        assert_eq!(timer.hold(), HOLD);
        assert!(!timer.take_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_expiry_latches_request() {
        let mut timer = RecenterTimer::new(HOLD).unwrap();
        timer.arm();
        assert_eq!(timer.state(), RecenterState::TimerArmed);

        sleep(HOLD + Duration::from_millis(10)).await;
        assert_eq!(timer.state(), RecenterState::PendingRecenter);

        assert!(timer.take_pending());
        assert!(!timer.take_pending(), "request must be consumed once");
        assert_eq!(timer.state(), RecenterState::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_before_expiry() {
        let mut timer = RecenterTimer::new(HOLD).unwrap();
        timer.arm();

        sleep(Duration::from_millis(500)).await;
        timer.cancel();
        assert_eq!(timer.state(), RecenterState::Idle);

        sleep(HOLD * 2).await;
        assert!(!timer.take_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_rearm_restarts_hold() {
        let mut timer = RecenterTimer::new(HOLD).unwrap();
        timer.arm();
        sleep(Duration::from_millis(700)).await;

        timer.arm();
        sleep(Duration::from_millis(700)).await;
        assert_eq!(timer.state(), RecenterState::TimerArmed);
        assert!(!timer.take_pending());

        sleep(Duration::from_millis(400)).await;
        assert!(timer.take_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_after_expiry_keeps_request() {
        let mut timer = RecenterTimer::new(HOLD).unwrap();
        timer.arm();
        sleep(HOLD + Duration::from_millis(10)).await;

        timer.cancel();
        timer.cancel();
        assert!(timer.take_pending());
    }
}
