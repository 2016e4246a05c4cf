//! IR Scribe - bridge device code-learning library
//!
//! Discovers a networked IR/RF bridge device, interactively "teaches" it
//! button codes from a physical remote, and persists each learned code to a
//! per-appliance CSV record file.
//!
//! The core is [`capture::capture_one_code`]: a bounded-retry polling loop
//! that turns raw device polls into a single captured code, deduplicating
//! repeat reads. Everything around it is a narrow collaborator: the
//! [`device::BridgeDevice`] contract, the [`store::RecordStore`], and the
//! interactive shell.
//!
//! # Example
//!
//! ```ignore
//! use ir_scribe::capture::{capture_one_code, CaptureConfig, CaptureResult};
//! use ir_scribe::device::simulator::SimulatedBridge;
//! use ir_scribe::device::BridgeDevice;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let mut bridge = SimulatedBridge::new("192.168.0.42");
//!     bridge.authenticate().await?;
//!     bridge.enter_learning_mode().await?;
//!     if let CaptureResult::Captured(code) =
//!         capture_one_code(&mut bridge, &CaptureConfig::default()).await?
//!     {
//!         println!("learned {} bytes", code.as_bytes().len());
//!     }
//!     Ok(())
//! }
//! ```

pub mod capture;
pub mod cli;
pub mod config;
pub mod device;
pub mod shell;
pub mod store;

// Re-export commonly used types for convenience
pub use capture::{capture_one_code, CaptureConfig, CaptureResult, PollOutcome};
pub use config::Config;
pub use device::{BridgeDevice, DeviceError, DeviceInfo, LearnedCode};
pub use store::RecordStore;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
