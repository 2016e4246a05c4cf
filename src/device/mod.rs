//! Bridge device contract
//!
//! A bridge device is a networked IR/RF transceiver that can enter a
//! learning mode and report the next remote-control signal it receives.
//! The wire protocol lives in external drivers; this crate only consumes
//! the narrow contract below. Any implementation (real hardware driver,
//! the built-in simulator) satisfies the same trait, which keeps the
//! capture loop testable without network access.

pub mod simulator;

use thiserror::Error;

/// An opaque remote-control code reported by a bridge device.
///
/// Compared by value for deduplication only; the contents are never
/// decoded or mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LearnedCode(Vec<u8>);

impl LearnedCode {
    pub fn new(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for LearnedCode {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for LearnedCode {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

/// Faults raised by a bridge device operation
#[derive(Debug, Error)]
pub enum DeviceError {
    /// The device rejected the authentication handshake
    #[error("device rejected authentication: {0}")]
    Auth(String),

    /// I/O fault while talking to the device
    #[error("transport fault: {0}")]
    Transport(String),
}

/// Identity of a discovered bridge device
#[derive(Debug, Clone)]
pub struct DeviceInfo {
    /// Network address the device answers at
    pub host: String,
    /// Human-readable model/display name
    pub name: String,
}

/// Common trait for bridge devices
///
/// `authenticate` must succeed before the learning operations are used.
/// `enter_learning_mode` arms the device; `poll_learned_code` is
/// non-blocking and returns `None` until a signal has been buffered.
#[async_trait::async_trait]
pub trait BridgeDevice: Send {
    /// Perform the authentication handshake with the device
    async fn authenticate(&mut self) -> Result<(), DeviceError>;

    /// Arm the device: the next received remote signal is buffered
    async fn enter_learning_mode(&mut self) -> Result<(), DeviceError>;

    /// Ask the device for a buffered code, if any
    ///
    /// "Nothing captured yet" is `Ok(None)`, never an error, so the
    /// retry loop upstream can not mask real transport faults.
    async fn poll_learned_code(&mut self) -> Result<Option<LearnedCode>, DeviceError>;

    /// Identity of this device
    fn info(&self) -> &DeviceInfo;
}
