//! # Daydream Bridge Library
//!
//! Normalizes the state of a Daydream VR controller for a left-handed,
//! Y-up application frame.
//!
//! This library polls raw controller snapshots from a driver, converts their
//! coordinate conventions, derives button edge events and applies the
//! home-button recenter gesture.

pub mod config;
pub mod error;
pub mod controller;
pub mod daydream;
pub mod driver;
