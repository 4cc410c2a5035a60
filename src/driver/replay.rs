//! # Replay Driver
//!
//! Plays back a recorded controller session from a JSON Lines file, one
//! [`RawControllerSnapshot`] per line. Fields missing from a line take their
//! default value, so hand-written recordings can stay short:
//!
//! ```text
//! {"connection_state": 3}
//! {"connection_state": 3, "home_button_state": true}
//! {"connection_state": 3, "orientation": [0.0, 0.38268343, 0.0, 0.9238795]}
//! ```
//!
//! Orientation is written as `[x, y, z, w]`.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use super::ControllerDriver;
use crate::controller::state::RawControllerSnapshot;
use crate::error::{BridgeError, Result};

/// Driver that returns recorded snapshots in order
#[derive(Debug)]
pub struct ReplayDriver {
    snapshots: Vec<RawControllerSnapshot>,
    cursor: usize,
    loop_playback: bool,
    paused: bool,
}

impl ReplayDriver {
    /// Creates a driver over in-memory snapshots.
    #[must_use]
    pub fn from_snapshots(snapshots: Vec<RawControllerSnapshot>, loop_playback: bool) -> Self {
        Self {
            snapshots,
            cursor: 0,
            loop_playback,
            paused: false,
        }
    }

    /// Loads a JSON Lines recording. Blank lines are skipped.
    ///
    /// # Errors
    ///
    /// Returns `Io` if the file cannot be read and `Replay` if a line is not
    /// a valid snapshot.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use daydream_bridge::driver::ReplayDriver;
    ///
    /// let driver = ReplayDriver::from_path("recordings/session.jsonl", false)?;
    /// println!("{} snapshots", driver.len());
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn from_path<P: AsRef<Path>>(path: P, loop_playback: bool) -> Result<Self> {
        let contents = fs::read_to_string(path.as_ref())?;
        let snapshots = Self::parse(&contents)?;
        info!(
            "Loaded {} snapshots from {}",
            snapshots.len(),
            path.as_ref().display()
        );
        Ok(Self::from_snapshots(snapshots, loop_playback))
    }

    fn parse(contents: &str) -> Result<Vec<RawControllerSnapshot>> {
        contents
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(|line| serde_json::from_str(line).map_err(BridgeError::from))
            .collect()
    }

    /// Number of recorded snapshots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.snapshots.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.snapshots.is_empty()
    }

    /// Index of the next snapshot to be returned.
    #[must_use]
    pub fn position(&self) -> usize {
        self.cursor
    }
}

impl ControllerDriver for ReplayDriver {
    fn start(&mut self) -> Result<()> {
        self.cursor = 0;
        info!("Replay started ({} snapshots, loop: {})", self.snapshots.len(), self.loop_playback);
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        debug!("Replay paused at snapshot {}", self.cursor);
    }

    fn resume(&mut self) {
        self.paused = false;
        debug!("Replay resumed at snapshot {}", self.cursor);
    }

    fn poll(&mut self) -> Result<RawControllerSnapshot> {
        if self.snapshots.is_empty() {
            return Err(BridgeError::ProviderUnavailable("replay recording is empty".to_string()));
        }

        if self.paused {
            // Hold the last delivered snapshot while paused
            let index = self.cursor.saturating_sub(1);
            return Ok(self.snapshots[index].clone());
        }

        if self.cursor >= self.snapshots.len() {
            if !self.loop_playback {
                return Err(BridgeError::ProviderUnavailable(format!(
                    "replay exhausted after {} snapshots",
                    self.snapshots.len()
                )));
            }
            debug!("Replay looping back to start");
            self.cursor = 0;
        }

        let snapshot = self.snapshots[self.cursor].clone();
        self.cursor += 1;
        Ok(snapshot)
    }
}
