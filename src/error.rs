//! # Error Types
//!
//! Custom error types for Daydream Bridge using `thiserror`.

use thiserror::Error;

/// Main error type for Daydream Bridge
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The controller driver could not supply a snapshot
    #[error("Controller provider unavailable: {0}")]
    ProviderUnavailable(String),

    /// Malformed BLE notification packet
    #[error("Packet error: {0}")]
    Packet(String),

    /// No async runtime available for the recenter timer
    #[error("Runtime error: {0}")]
    Runtime(String),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(#[from] toml::de::Error),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Replay recording errors
    #[error("Replay error: {0}")]
    Replay(#[from] serde_json::Error),
}

/// Result type alias for Daydream Bridge
pub type Result<T> = std::result::Result<T, BridgeError>;
