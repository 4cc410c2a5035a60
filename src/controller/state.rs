//! # Controller State Types
//!
//! Raw snapshots as reported by a controller driver, and the normalized,
//! event-annotated state handed to the application every poll.
//!
//! ## Raw Connection States
//!
//! | Value | State |
//! |-------|-------|
//! | 0 | Disconnected |
//! | 1 | Scanning |
//! | 2 | Connecting |
//! | 3 | Connected |
//!
//! Any other value is treated as Disconnected.

use nalgebra::{Quaternion, UnitQuaternion, Vector2, Vector3};
use serde::{Deserialize, Serialize};

/// Raw connection state: no controller.
pub const RAW_DISCONNECTED: i32 = 0;
/// Raw connection state: scanning for a controller.
pub const RAW_SCANNING: i32 = 1;
/// Raw connection state: controller found, connecting.
pub const RAW_CONNECTING: i32 = 2;
/// Raw connection state: controller connected and streaming.
pub const RAW_CONNECTED: i32 = 3;

/// Controller connection state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ConnectionState {
    #[default]
    Disconnected,
    Scanning,
    Connecting,
    Connected,
}

impl ConnectionState {
    /// Maps a raw driver value to a connection state.
    ///
    /// Unknown values map to [`ConnectionState::Disconnected`].
    ///
    /// # Examples
    ///
    /// ```
    /// use daydream_bridge::controller::state::ConnectionState;
    ///
    /// assert_eq!(ConnectionState::from_raw(3), ConnectionState::Connected);
    /// assert_eq!(ConnectionState::from_raw(42), ConnectionState::Disconnected);
    /// ```
    #[must_use]
    pub fn from_raw(value: i32) -> Self {
        match value {
            RAW_CONNECTED => Self::Connected,
            RAW_CONNECTING => Self::Connecting,
            RAW_SCANNING => Self::Scanning,
            _ => Self::Disconnected,
        }
    }
}

/// Whether the last `read_state` call obtained a snapshot from the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ApiStatus {
    #[default]
    Ok,
    /// The driver failed to deliver a snapshot; state is stale.
    ProviderUnavailable,
}

/// Controller battery level, bucketed from a 0-100 percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum BatteryLevel {
    CriticalLow,
    Low,
    Medium,
    AlmostFull,
    Full,
}

impl BatteryLevel {
    /// Buckets a battery percentage into one of five levels.
    ///
    /// Thresholds are inclusive: 80, 60, 40 and 20 map to the higher tier.
    ///
    /// # Examples
    ///
    /// ```
    /// use daydream_bridge::controller::state::BatteryLevel;
    ///
    /// assert_eq!(BatteryLevel::from_percentage(80), BatteryLevel::Full);
    /// assert_eq!(BatteryLevel::from_percentage(79), BatteryLevel::AlmostFull);
    /// assert_eq!(BatteryLevel::from_percentage(0), BatteryLevel::CriticalLow);
    /// ```
    #[must_use]
    pub fn from_percentage(percentage: u8) -> Self {
        if percentage >= 80 {
            Self::Full
        } else if percentage >= 60 {
            Self::AlmostFull
        } else if percentage >= 40 {
            Self::Medium
        } else if percentage >= 20 {
            Self::Low
        } else {
            Self::CriticalLow
        }
    }
}

/// One raw reading from a controller driver.
///
/// Orientation and motion vectors are in the driver's right-handed frame
/// (Z pointing backwards).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RawControllerSnapshot {
    /// Raw connection state value (see module docs).
    pub connection_state: i32,
    /// Orientation quaternion. Not required to be normalized.
    pub orientation: Quaternion<f32>,
    /// Linear acceleration in m/s².
    pub accel: Vector3<f32>,
    /// Angular velocity in rad/s.
    pub gyro: Vector3<f32>,
    /// Touch position, each axis in 0.0-1.0.
    pub touch_pos: Vector2<f32>,
    pub is_touching: bool,
    pub app_button_state: bool,
    pub home_button_state: bool,
    pub click_button_state: bool,
    pub plus_button_state: bool,
    pub minus_button_state: bool,
    pub supports_battery_status: bool,
    /// Battery charge, 0-100.
    pub battery_level_percentage: u8,
}

impl Default for RawControllerSnapshot {
    fn default() -> Self {
        Self {
            connection_state: RAW_DISCONNECTED,
            orientation: Quaternion::identity(),
            accel: Vector3::zeros(),
            gyro: Vector3::zeros(),
            touch_pos: Vector2::zeros(),
            is_touching: false,
            app_button_state: false,
            home_button_state: false,
            click_button_state: false,
            plus_button_state: false,
            minus_button_state: false,
            supports_battery_status: false,
            battery_level_percentage: 0,
        }
    }
}

/// Normalized controller state in the left-handed application frame.
///
/// Owned by the caller and overwritten in place by every
/// [`read_state`](crate::controller::ControllerStateNormalizer::read_state) call.
/// `*_down` / `*_up` fields are true for exactly the one poll on which the
/// corresponding level changed.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedControllerState {
    pub api_status: ApiStatus,
    pub connection_state: ConnectionState,

    /// Orientation with the recenter Y offset applied.
    pub orientation: UnitQuaternion<f32>,
    pub accel: Vector3<f32>,
    pub gyro: Vector3<f32>,

    pub touch_pos: Vector2<f32>,
    pub is_touching: bool,
    pub touch_down: bool,
    pub touch_up: bool,

    pub click_button_state: bool,
    pub click_button_down: bool,
    pub click_button_up: bool,

    pub app_button_state: bool,
    pub app_button_down: bool,
    pub app_button_up: bool,

    pub home_button_state: bool,
    pub home_button_down: bool,
    pub home_button_up: bool,

    /// True for the single poll on which a recenter was applied.
    pub recentered: bool,

    /// Last known battery level. `None` until a driver reports battery support.
    pub battery_level: Option<BatteryLevel>,
}

impl Default for NormalizedControllerState {
    fn default() -> Self {
        Self {
            api_status: ApiStatus::Ok,
            connection_state: ConnectionState::Disconnected,
            orientation: UnitQuaternion::identity(),
            accel: Vector3::zeros(),
            gyro: Vector3::zeros(),
            touch_pos: Vector2::zeros(),
            is_touching: false,
            touch_down: false,
            touch_up: false,
            click_button_state: false,
            click_button_down: false,
            click_button_up: false,
            app_button_state: false,
            app_button_down: false,
            app_button_up: false,
            home_button_state: false,
            home_button_down: false,
            home_button_up: false,
            recentered: false,
            battery_level: None,
        }
    }
}

impl NormalizedControllerState {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Clears every one-shot flag (edge events and `recentered`).
    ///
    /// Levels, orientation and motion vectors are left untouched.
    pub fn clear_events(&mut self) {
        self.touch_down = false;
        self.touch_up = false;
        self.click_button_down = false;
        self.click_button_up = false;
        self.app_button_down = false;
        self.app_button_up = false;
        self.home_button_down = false;
        self.home_button_up = false;
        self.recentered = false;
    }

    /// Checks if any edge event or a recenter happened on this poll.
    #[must_use]
    pub fn any_event(&self) -> bool {
        self.touch_down
            || self.touch_up
            || self.click_button_down
            || self.click_button_up
            || self.app_button_down
            || self.app_button_up
            || self.home_button_down
            || self.home_button_up
            || self.recentered
    }
}
