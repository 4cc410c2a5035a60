//! # Packet Driver
//!
//! [`ControllerDriver`] fed by Daydream BLE notification packets.
//!
//! The BLE layer pushes each notification payload into a channel. Every poll
//! drains the channel, decoding the packets in order onto the latest
//! snapshot, and returns that snapshot.

use tokio::sync::mpsc::{self, error::TryRecvError};
use tracing::{debug, info, warn};

use super::ControllerDriver;
use crate::controller::state::{RawControllerSnapshot, RAW_DISCONNECTED, RAW_SCANNING};
use crate::daydream::decoder::{decode_header, decode_packet};
use crate::error::{BridgeError, Result};

/// Number of distinct sequence numbers before wrap-around
const SEQUENCE_MODULUS: u8 = 32;

/// Driver that decodes BLE notification packets from a channel
#[derive(Debug)]
pub struct PacketDriver {
    packets: mpsc::Receiver<Vec<u8>>,
    latest: RawControllerSnapshot,
    last_sequence: Option<u8>,
    started: bool,
    paused: bool,
}

impl PacketDriver {
    /// Creates a driver reading packets from `packets`.
    #[must_use]
    pub fn new(packets: mpsc::Receiver<Vec<u8>>) -> Self {
        Self {
            packets,
            latest: RawControllerSnapshot::default(),
            last_sequence: None,
            started: false,
            paused: false,
        }
    }

    /// Creates a bounded packet channel and a driver on its receiving end.
    ///
    /// # Examples
    ///
    /// ```
    /// use daydream_bridge::driver::{ControllerDriver, PacketDriver};
    ///
    /// let (tx, mut driver) = PacketDriver::channel(64);
    /// tx.try_send(vec![0u8; 20]).unwrap();
    ///
    /// let snapshot = driver.poll().unwrap();
    /// assert_eq!(snapshot.connection_state, 3);
    /// ```
    #[must_use]
    pub fn channel(capacity: usize) -> (mpsc::Sender<Vec<u8>>, Self) {
        let (tx, rx) = mpsc::channel(capacity);
        (tx, Self::new(rx))
    }

    /// Records a battery reading from the controller's battery service.
    ///
    /// Values above 100 are clamped.
    pub fn update_battery(&mut self, percentage: u8) {
        self.latest.supports_battery_status = true;
        self.latest.battery_level_percentage = percentage.min(100);
    }

    fn apply_packet(&mut self, packet: &[u8]) {
        let decoded = decode_header(packet).and_then(|header| {
            decode_packet(packet, &self.latest).map(|snapshot| (header, snapshot))
        });

        match decoded {
            Ok((header, snapshot)) => {
                if let Some(last) = self.last_sequence {
                    let expected = (last + 1) % SEQUENCE_MODULUS;
                    if header.sequence != expected {
                        debug!(
                            "Packet sequence gap: expected {}, got {}",
                            expected, header.sequence
                        );
                    }
                }
                self.last_sequence = Some(header.sequence);
                self.latest = snapshot;
            }
            Err(e) => warn!("Dropping controller packet: {}", e),
        }
    }

    fn drain_queued(&mut self) -> usize {
        let mut dropped = 0;
        while self.packets.try_recv().is_ok() {
            dropped += 1;
        }
        dropped
    }
}

impl ControllerDriver for PacketDriver {
    fn start(&mut self) -> Result<()> {
        if self.latest.connection_state == RAW_DISCONNECTED {
            self.latest.connection_state = RAW_SCANNING;
        }
        self.started = true;
        info!("Packet driver started, waiting for controller notifications");
        Ok(())
    }

    fn pause(&mut self) {
        self.paused = true;
        let dropped = self.drain_queued();
        self.latest.connection_state = RAW_DISCONNECTED;
        self.last_sequence = None;
        info!("Packet driver paused ({} queued packets dropped)", dropped);
    }

    fn resume(&mut self) {
        self.paused = false;
        // Scanning only begins once the driver has been started
        if self.started {
            self.latest.connection_state = RAW_SCANNING;
        }
        info!("Packet driver resumed");
    }

    fn poll(&mut self) -> Result<RawControllerSnapshot> {
        if self.paused {
            self.drain_queued();
            return Ok(self.latest.clone());
        }

        loop {
            match self.packets.try_recv() {
                Ok(packet) => self.apply_packet(&packet),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    return Err(BridgeError::ProviderUnavailable(
                        "controller packet channel closed".to_string(),
                    ));
                }
            }
        }

        Ok(self.latest.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controller::state::RAW_CONNECTED;
    use crate::daydream::decoder::test_packets::packet;
    use crate::daydream::protocol::{BUTTON_APP, BUTTON_HOME};

    #[test]
    fn test_initial_state_disconnected() {
        let (_tx, mut driver) = PacketDriver::channel(8);
        assert_eq!(driver.poll().unwrap().connection_state, RAW_DISCONNECTED);
    }

    #[test]
    fn test_start_scans_until_first_packet() {
        let (tx, mut driver) = PacketDriver::channel(8);
        driver.start().unwrap();
        assert_eq!(driver.poll().unwrap().connection_state, RAW_SCANNING);

        tx.try_send(packet(0, 0)).unwrap();
        assert_eq!(driver.poll().unwrap().connection_state, RAW_CONNECTED);
    }

    #[test]
    fn test_poll_returns_latest_packet() {
        let (tx, mut driver) = PacketDriver::channel(8);
        tx.try_send(packet(0, BUTTON_APP)).unwrap();
        tx.try_send(packet(1, BUTTON_HOME)).unwrap();

        let snapshot = driver.poll().unwrap();
        assert!(snapshot.home_button_state);
        assert!(!snapshot.app_button_state);

        // No new packets: same snapshot again
        assert_eq!(driver.poll().unwrap(), snapshot);
    }

    #[test]
    fn test_invalid_packet_is_skipped() {
        let (tx, mut driver) = PacketDriver::channel(8);
        tx.try_send(packet(0, BUTTON_HOME)).unwrap();
        tx.try_send(vec![0u8; 5]).unwrap();

        assert!(driver.poll().unwrap().home_button_state);
    }

    #[test]
    fn test_closed_channel_is_unavailable() {
        let (tx, mut driver) = PacketDriver::channel(8);
        tx.try_send(packet(0, 0)).unwrap();
        drop(tx);

        let result = driver.poll();
        assert!(matches!(result, Err(BridgeError::ProviderUnavailable(_))));
    }

    #[test]
    fn test_pause_drops_packets_and_disconnects() {
        let (tx, mut driver) = PacketDriver::channel(8);
        driver.start().unwrap();
        tx.try_send(packet(0, 0)).unwrap();
        assert_eq!(driver.poll().unwrap().connection_state, RAW_CONNECTED);

        driver.pause();
        tx.try_send(packet(1, BUTTON_HOME)).unwrap();
        let snapshot = driver.poll().unwrap();
        assert_eq!(snapshot.connection_state, RAW_DISCONNECTED);
        assert!(!snapshot.home_button_state);

        driver.resume();
        assert_eq!(driver.poll().unwrap().connection_state, RAW_SCANNING);

        tx.try_send(packet(2, BUTTON_HOME)).unwrap();
        let snapshot = driver.poll().unwrap();
        assert_eq!(snapshot.connection_state, RAW_CONNECTED);
        assert!(snapshot.home_button_state);
    }

    #[test]
    fn test_resume_without_start_stays_disconnected() {
        let (tx, mut driver) = PacketDriver::channel(8);
        driver.pause();
        driver.resume();
        assert_eq!(driver.poll().unwrap().connection_state, RAW_DISCONNECTED);

        driver.start().unwrap();
        assert_eq!(driver.poll().unwrap().connection_state, RAW_SCANNING);

        tx.try_send(packet(0, 0)).unwrap();
        assert_eq!(driver.poll().unwrap().connection_state, RAW_CONNECTED);
    }

    #[test]
    fn test_battery_update_survives_packets() {
        let (tx, mut driver) = PacketDriver::channel(8);
        driver.update_battery(150);
        tx.try_send(packet(0, 0)).unwrap();

        let snapshot = driver.poll().unwrap();
        assert!(snapshot.supports_battery_status);
        assert_eq!(snapshot.battery_level_percentage, 100);
    }
}
