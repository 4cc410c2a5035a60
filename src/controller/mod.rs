//! # Controller Module
//!
//! Daydream controller state normalization.
//!
//! This module handles:
//! - Raw snapshot and normalized state types
//! - Right-handed to left-handed orientation conversion
//! - Button and touch edge detection
//! - The home-button hold recenter gesture
//! - Battery level bucketing

pub mod events;
pub mod normalizer;
pub mod pose;
pub mod recenter;
pub mod state;

pub use normalizer::ControllerStateNormalizer;
pub use recenter::RecenterState;
pub use state::{ApiStatus, BatteryLevel, ConnectionState, NormalizedControllerState, RawControllerSnapshot};
