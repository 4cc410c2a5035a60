//! # Controller Driver Module
//!
//! Abstractions over the hardware side of a controller session.
//!
//! This module handles:
//! - The [`ControllerDriver`] trait polled by the normalizer
//! - The [`ReferenceFrame`] trait notified when the user recenters
//! - A BLE packet-fed driver and a recorded-session replay driver

pub mod packet;
pub mod replay;

use tracing::info;

use crate::controller::state::RawControllerSnapshot;
use crate::error::Result;

pub use packet::PacketDriver;
pub use replay::ReplayDriver;

/// Source of raw controller snapshots.
#[cfg_attr(test, mockall::automock)]
pub trait ControllerDriver {
    /// Begins the hardware session (scanning, connecting, streaming).
    fn start(&mut self) -> Result<()>;

    /// Host application moved to the background.
    fn pause(&mut self);

    /// Host application returned to the foreground.
    fn resume(&mut self);

    /// Returns the most recent controller snapshot.
    ///
    /// # Errors
    ///
    /// Returns `ProviderUnavailable` if no snapshot can be supplied.
    fn poll(&mut self) -> Result<RawControllerSnapshot>;
}

/// Receives recenter notifications so the rest of the system can reset its
/// forward direction.
#[cfg_attr(test, mockall::automock)]
pub trait ReferenceFrame {
    fn recenter(&mut self);
}

/// Reference frame that only logs recenter events.
#[derive(Debug, Default)]
pub struct LoggingReferenceFrame {
    recenter_count: u64,
}

impl LoggingReferenceFrame {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of recenters seen so far.
    #[must_use]
    pub fn recenter_count(&self) -> u64 {
        self.recenter_count
    }
}

impl ReferenceFrame for LoggingReferenceFrame {
    fn recenter(&mut self) {
        self.recenter_count += 1;
        info!("Reference frame recentered (#{})", self.recenter_count);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_reference_frame_counts() {
        let mut frame = LoggingReferenceFrame::new();
        assert_eq!(frame.recenter_count(), 0);

        frame.recenter();
        frame.recenter();
        assert_eq!(frame.recenter_count(), 2);
    }
}
