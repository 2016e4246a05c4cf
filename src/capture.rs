//! Learning session controller
//!
//! Drives the bounded-retry polling loop that turns raw device polls into a
//! single captured code. The caller arms the device (`enter_learning_mode`)
//! before invoking [`capture_one_code`]; arming and capturing are separate
//! steps so a capture can be retried without re-arming semantics hidden in
//! the loop.
//!
//! "Nothing buffered yet" is represented by `Ok(None)` from the device, not
//! by an error, so transport faults are never retried or masked here: they
//! propagate unchanged to the caller.

use std::time::Duration;

use tracing::debug;

use crate::device::{BridgeDevice, DeviceError, LearnedCode};

/// Classification of one poll against the previous code in the same session
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PollOutcome {
    /// Device has nothing buffered
    NoData,
    /// A code that differs from the previous poll's code
    NewCode(LearnedCode),
    /// The same code as the previous poll
    RepeatCode(LearnedCode),
}

/// Terminal outcome of one capture attempt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureResult {
    /// A genuinely new code was read from the device
    Captured(LearnedCode),
    /// The retry budget ran out without a new code appearing
    TimedOut,
}

/// Tuning for the capture loop
#[derive(Debug, Clone)]
pub struct CaptureConfig {
    /// Upper bound on poll iterations per capture
    pub max_attempts: u32,
    /// Wait between polls
    pub poll_interval: Duration,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            poll_interval: Duration::from_secs(1),
        }
    }
}

/// Classify a fresh poll result against the previously seen code.
///
/// "No previous code" counts as differing from anything: the very first
/// signal of a session is always new, with no debounce.
fn classify(previous: Option<&LearnedCode>, polled: Option<LearnedCode>) -> PollOutcome {
    match polled {
        None => PollOutcome::NoData,
        Some(code) if previous == Some(&code) => PollOutcome::RepeatCode(code),
        Some(code) => PollOutcome::NewCode(code),
    }
}

/// Poll an armed device until a new code appears or the retry budget is
/// exhausted.
///
/// The device must already be in learning mode. The previous-code state is
/// local to this invocation, so consecutive captures never leak state into
/// each other. Device faults propagate unchanged; only the "no code yet"
/// case is retried.
pub async fn capture_one_code(
    device: &mut dyn BridgeDevice,
    config: &CaptureConfig,
) -> Result<CaptureResult, DeviceError> {
    let mut previous: Option<LearnedCode> = None;

    for attempt in 1..=config.max_attempts {
        let polled = device.poll_learned_code().await?;
        match classify(previous.as_ref(), polled) {
            PollOutcome::NewCode(code) => {
                debug!(attempt, bytes = code.as_bytes().len(), "captured new code");
                return Ok(CaptureResult::Captured(code));
            }
            PollOutcome::RepeatCode(code) => {
                previous = Some(code);
            }
            PollOutcome::NoData => {}
        }
        if attempt < config.max_attempts {
            tokio::time::sleep(config.poll_interval).await;
        }
    }

    debug!(max_attempts = config.max_attempts, "capture timed out");
    Ok(CaptureResult::TimedOut)
}
