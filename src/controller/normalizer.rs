//! # Controller State Normalizer
//!
//! Turns raw driver snapshots into [`NormalizedControllerState`]:
//!
//! 1. Map the connection state
//! 2. Convert orientation into the left-handed application frame
//! 3. Flip acceleration Z and gyro X/Y
//! 4. Derive down/up edges for touch, click, app and home
//! 5. Run the home-button hold gesture and apply the recenter yaw offset
//! 6. Bucket the battery percentage
//!
//! ## Usage
//!
//! ```no_run
//! use daydream_bridge::controller::{ControllerStateNormalizer, NormalizedControllerState};
//! use daydream_bridge::driver::{LoggingReferenceFrame, ReplayDriver};
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let driver = ReplayDriver::from_path("recordings/session.jsonl", false)?;
//!     let mut normalizer = ControllerStateNormalizer::new(
//!         driver,
//!         LoggingReferenceFrame::new(),
//!         Duration::from_millis(1000),
//!     )?;
//!     normalizer.start()?;
//!
//!     let mut state = NormalizedControllerState::new();
//!     normalizer.read_state(&mut state)?;
//!     if state.recentered {
//!         println!("Forward direction reset");
//!     }
//!     Ok(())
//! }
//! ```

use std::time::Duration;

use nalgebra::Vector3;
use tracing::{debug, info, warn};

use super::events::EdgeTracker;
use super::pose;
use super::recenter::{RecenterState, RecenterTimer};
use super::state::{ApiStatus, BatteryLevel, ConnectionState, NormalizedControllerState};
use crate::driver::{ControllerDriver, ReferenceFrame};
use crate::error::{BridgeError, Result};

/// Normalizes polled controller state for one controller session.
///
/// # Thread Safety
///
/// `read_state` must be called from a single task. The recenter timer runs
/// on the tokio runtime the normalizer was created on.
pub struct ControllerStateNormalizer<D, F> {
    driver: D,
    reference_frame: F,
    started: bool,
    supports_battery_status: bool,

    touch: EdgeTracker,
    click_button: EdgeTracker,
    app_button: EdgeTracker,
    home_button: EdgeTracker,

    /// Yaw (degrees) captured at the last recenter.
    y_axis_rotation_offset: f32,
    recenter: RecenterTimer,
}

impl<D, F> std::fmt::Debug for ControllerStateNormalizer<D, F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ControllerStateNormalizer")
            .field("started", &self.started)
            .field("y_axis_rotation_offset", &self.y_axis_rotation_offset)
            .field("recenter", &self.recenter)
            .finish_non_exhaustive()
    }
}

impl<D: ControllerDriver, F: ReferenceFrame> ControllerStateNormalizer<D, F> {
    /// Creates a normalizer with the given recenter hold time.
    ///
    /// # Errors
    ///
    /// Returns `Runtime` if called outside a tokio runtime.
    pub fn new(driver: D, reference_frame: F, recenter_hold: Duration) -> Result<Self> {
        Ok(Self {
            driver,
            reference_frame,
            started: false,
            supports_battery_status: false,
            touch: EdgeTracker::new(),
            click_button: EdgeTracker::new(),
            app_button: EdgeTracker::new(),
            home_button: EdgeTracker::new(),
            y_axis_rotation_offset: 0.0,
            recenter: RecenterTimer::new(recenter_hold)?,
        })
    }

    /// Starts the driver session. Calling it again is a no-op.
    ///
    /// # Errors
    ///
    /// Propagates driver start failures; a failed start may be retried.
    pub fn start(&mut self) -> Result<()> {
        if self.started {
            debug!("Controller session already started");
            return Ok(());
        }
        self.driver.start()?;
        self.started = true;
        info!("Controller session started");
        Ok(())
    }

    /// Forwards an application pause to the driver.
    pub fn pause(&mut self) {
        debug!("Pausing controller driver");
        self.driver.pause();
    }

    /// Forwards an application resume to the driver.
    pub fn resume(&mut self) {
        debug!("Resuming controller driver");
        self.driver.resume();
    }

    /// Whether the last successful poll reported battery support.
    #[must_use]
    pub fn supports_battery_status(&self) -> bool {
        self.supports_battery_status
    }

    /// Current state of the home-button recenter gesture.
    #[must_use]
    pub fn recenter_state(&self) -> RecenterState {
        self.recenter.state()
    }

    /// Yaw offset (degrees) subtracted from every reported orientation.
    #[must_use]
    pub fn y_axis_rotation_offset(&self) -> f32 {
        self.y_axis_rotation_offset
    }

    /// The wrapped driver.
    #[must_use]
    pub fn driver(&self) -> &D {
        &self.driver
    }

    /// Mutable access to the wrapped driver, e.g. to feed
    /// [`PacketDriver::update_battery`](crate::driver::PacketDriver::update_battery)
    /// readings. They show up in `state` on the next [`read_state`](Self::read_state).
    pub fn driver_mut(&mut self) -> &mut D {
        &mut self.driver
    }

    #[must_use]
    pub fn reference_frame(&self) -> &F {
        &self.reference_frame
    }

    /// Polls the driver once and refreshes `state` in place.
    ///
    /// # Errors
    ///
    /// Returns `ProviderUnavailable` if the driver cannot supply a snapshot.
    /// `state` is then marked [`ApiStatus::ProviderUnavailable`] and
    /// Disconnected, its one-shot events are cleared, and every other field
    /// keeps its previous value. Edge tracking and a pending recenter are
    /// carried over to the next successful poll.
    pub fn read_state(&mut self, state: &mut NormalizedControllerState) -> Result<()> {
        let snapshot = match self.driver.poll() {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!("Controller poll failed: {}", e);
                state.api_status = ApiStatus::ProviderUnavailable;
                state.connection_state = ConnectionState::Disconnected;
                state.clear_events();
                return Err(match e {
                    BridgeError::ProviderUnavailable(reason) => BridgeError::ProviderUnavailable(reason),
                    other => BridgeError::ProviderUnavailable(other.to_string()),
                });
            }
        };

        state.api_status = ApiStatus::Ok;
        state.connection_state = ConnectionState::from_raw(snapshot.connection_state);

        let orientation = pose::right_handed_to_left_handed(&snapshot.orientation);
        let before_offset = pose::euler_angles(&orientation);

        // Driver Z points backwards, application Z points forward
        let accel = snapshot.accel;
        state.accel = Vector3::new(accel.x, accel.y, -accel.z);
        let gyro = snapshot.gyro;
        state.gyro = Vector3::new(-gyro.x, -gyro.y, gyro.z);

        state.touch_pos = snapshot.touch_pos;
        state.is_touching = snapshot.is_touching;
        state.click_button_state = snapshot.click_button_state;
        state.app_button_state = snapshot.app_button_state;
        state.home_button_state = snapshot.home_button_state;

        let touch = self.touch.update(state.is_touching);
        state.touch_down = touch.down;
        state.touch_up = touch.up;

        let click = self.click_button.update(state.click_button_state);
        state.click_button_down = click.down;
        state.click_button_up = click.up;

        let app = self.app_button.update(state.app_button_state);
        state.app_button_down = app.down;
        state.app_button_up = app.up;

        let home = self.home_button.update(state.home_button_state);
        state.home_button_down = home.down;
        state.home_button_up = home.up;

        if state.home_button_down {
            self.recenter.arm();
        }
        if state.home_button_up {
            self.recenter.cancel();
        }

        state.recentered = self.recenter.take_pending();
        if state.recentered {
            self.reference_frame.recenter();
            self.y_axis_rotation_offset = before_offset.y;
            info!("Controller recentered (yaw offset {:.1}°)", self.y_axis_rotation_offset);
        }

        state.orientation = pose::from_euler_angles(&Vector3::new(
            before_offset.x,
            before_offset.y - self.y_axis_rotation_offset,
            before_offset.z,
        ));

        self.supports_battery_status = snapshot.supports_battery_status;
        if self.supports_battery_status {
            state.battery_level = Some(BatteryLevel::from_percentage(snapshot.battery_level_percentage));
        }

        Ok(())
    }
}
