//! # Daydream Bridge
//!
//! Replays a recorded Daydream controller session through the state
//! normalizer and logs the derived events.

use anyhow::{Context, Result};
use tokio::time::interval;
use tracing::{debug, info};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use daydream_bridge::config::{Config, LoggingConfig};
use daydream_bridge::controller::pose::euler_angles;
use daydream_bridge::controller::{ConnectionState, ControllerStateNormalizer, NormalizedControllerState};
use daydream_bridge::driver::{LoggingReferenceFrame, ReplayDriver};

/// Config file used when none is given on the command line
const DEFAULT_CONFIG_PATH: &str = "config/default.toml";

/// Number of polls between status log messages
const LOG_INTERVAL_POLLS: u64 = 600;

/// Main entry point for Daydream Bridge
///
/// # Control Flow
///
/// 1. Load configuration (first argument, or `config/default.toml`)
/// 2. Set up logging to stdout and, if configured, a daily log file
/// 3. Poll the replay driver at `poll_rate_hz` until the recording ends
///    or Ctrl+C is pressed
///
/// # Examples
///
/// ```bash
/// cargo run --release -- config/default.toml
/// ```
#[tokio::main]
async fn main() -> Result<()> {
    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_CONFIG_PATH.to_string());
    let config = Config::load(&config_path)
        .with_context(|| format!("Failed to load configuration from {}", config_path))?;

    let _log_guard = init_logging(&config.logging);

    info!("Daydream Bridge v{} starting...", env!("CARGO_PKG_VERSION"));

    let driver = ReplayDriver::from_path(&config.replay.path, config.replay.loop_playback)
        .with_context(|| format!("Failed to load replay {}", config.replay.path))?;

    let mut normalizer = ControllerStateNormalizer::new(
        driver,
        LoggingReferenceFrame::new(),
        config.controller.recenter_hold(),
    )?;
    normalizer.start()?;

    let mut poll_interval = interval(config.controller.poll_interval());
    let mut state = NormalizedControllerState::new();
    let mut last_connection = state.connection_state;
    let mut poll_count: u64 = 0;

    info!("Polling controller at {}Hz", config.controller.poll_rate_hz);
    info!("Press Ctrl+C to exit");

    loop {
        tokio::select! {
            _ = poll_interval.tick() => {
                if let Err(e) = normalizer.read_state(&mut state) {
                    info!("Controller stream ended: {}", e);
                    break;
                }

                poll_count += 1;

                if state.connection_state != last_connection {
                    info!("Controller {:?} -> {:?}", last_connection, state.connection_state);
                    last_connection = state.connection_state;
                }
                if state.connection_state == ConnectionState::Connected {
                    log_events(&state);
                }

                if poll_count % LOG_INTERVAL_POLLS == 0 {
                    info!(
                        "Polled {} times, battery: {:?}, recenters: {}",
                        poll_count,
                        state.battery_level,
                        normalizer.reference_frame().recenter_count()
                    );
                }
            }

            _ = tokio::signal::ctrl_c() => {
                info!("Received Ctrl+C, shutting down...");
                break;
            }
        }
    }

    info!("Total polls: {}", poll_count);
    Ok(())
}

/// Installs the tracing subscriber.
///
/// The returned guard flushes the file writer when dropped and must be kept
/// alive for the whole run.
fn init_logging(config: &LoggingConfig) -> Option<WorkerGuard> {
    let filter = default_filter();

    if config.dir.is_empty() {
        tracing_subscriber::fmt().with_env_filter(filter).init();
        return None;
    }

    let appender = tracing_appender::rolling::daily(&config.dir, "daydream-bridge.log");
    let (writer, guard) = tracing_appender::non_blocking(appender);
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer())
        .with(fmt::layer().with_ansi(false).with_writer(writer))
        .init();
    Some(guard)
}

/// `RUST_LOG` if set, otherwise `info`.
fn default_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Logs the edge events of one poll.
fn log_events(state: &NormalizedControllerState) {
    if !state.any_event() {
        return;
    }

    for (name, down, up) in [
        ("touch", state.touch_down, state.touch_up),
        ("click", state.click_button_down, state.click_button_up),
        ("app", state.app_button_down, state.app_button_up),
        ("home", state.home_button_down, state.home_button_up),
    ] {
        if down {
            debug!("{} down", name);
        }
        if up {
            debug!("{} up", name);
        }
    }

    if state.recentered {
        let euler = euler_angles(&state.orientation);
        info!("Recentered, pitch {:.1}° yaw {:.1}° roll {:.1}°", euler.x, euler.y, euler.z);
    }
}
