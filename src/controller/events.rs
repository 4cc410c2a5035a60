//! # Edge Detection
//!
//! Derives press/release events from level-only button and touch readings.

/// Edge events for one input on one poll.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Edge {
    /// Level went from released to pressed.
    pub down: bool,
    /// Level went from pressed to released.
    pub up: bool,
}

/// Tracks the previous level of a single input.
///
/// # Examples
///
/// ```
/// use daydream_bridge::controller::events::EdgeTracker;
///
/// let mut home = EdgeTracker::new();
/// assert!(home.update(true).down);
/// assert_eq!(home.update(true), Default::default());
/// assert!(home.update(false).up);
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct EdgeTracker {
    previous: bool,
}

impl EdgeTracker {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Level seen on the previous update.
    #[must_use]
    pub fn previous(&self) -> bool {
        self.previous
    }

    /// Compares `current` with the previous level and records it.
    pub fn update(&mut self, current: bool) -> Edge {
        let edge = Edge {
            down: !self.previous && current,
            up: self.previous && !current,
        };
        self.previous = current;
        edge
    }
}
