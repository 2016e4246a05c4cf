//! Simulated bridge device
//!
//! A scripted, deterministic implementation of [`BridgeDevice`] used by the
//! `--simulate` CLI flag and by tests. Each arm of the learning mode replays
//! a scripted sequence of poll outcomes, so the full learn/store workflow can
//! be exercised without hardware on the network.

use std::collections::VecDeque;
use std::time::Duration;

use tracing::debug;

use super::{BridgeDevice, DeviceError, DeviceInfo, LearnedCode};

/// One scripted answer to a `poll_learned_code` call
#[derive(Debug, Clone)]
pub enum ScriptedPoll {
    /// Nothing buffered yet
    NoData,
    /// A buffered code
    Code(Vec<u8>),
    /// Injected transport fault
    Fault(String),
}

/// Scripted in-memory bridge device
pub struct SimulatedBridge {
    info: DeviceInfo,
    /// Replayed from the start on every `enter_learning_mode`
    template: Vec<ScriptedPoll>,
    script: VecDeque<ScriptedPoll>,
    authenticated: bool,
    armed: bool,
    reject_auth: bool,
    polls_issued: usize,
    sessions: u32,
}

impl SimulatedBridge {
    /// A bridge with the default demo script: two empty polls, then a code.
    ///
    /// The code bytes vary per learning session so consecutive learns in one
    /// sitting each yield a distinct code.
    pub fn new(host: &str) -> Self {
        Self::with_script(
            host,
            vec![
                ScriptedPoll::NoData,
                ScriptedPoll::NoData,
                ScriptedPoll::Code(vec![0x26, 0x00, 0x4c, 0x00]),
            ],
        )
    }

    /// A bridge that replays the given script on every arm
    pub fn with_script(host: &str, script: Vec<ScriptedPoll>) -> Self {
        Self {
            info: DeviceInfo {
                host: host.to_string(),
                name: "Simulated bridge".to_string(),
            },
            script: script.iter().cloned().collect(),
            template: script,
            authenticated: false,
            armed: false,
            reject_auth: false,
            polls_issued: 0,
            sessions: 0,
        }
    }

    /// A bridge whose authentication handshake always fails
    pub fn rejecting_auth(host: &str) -> Self {
        let mut bridge = Self::new(host);
        bridge.reject_auth = true;
        bridge
    }

    /// Number of polls issued since construction
    pub fn polls_issued(&self) -> usize {
        self.polls_issued
    }
}

#[async_trait::async_trait]
impl BridgeDevice for SimulatedBridge {
    async fn authenticate(&mut self) -> Result<(), DeviceError> {
        if self.reject_auth {
            return Err(DeviceError::Auth("simulated rejection".to_string()));
        }
        self.authenticated = true;
        Ok(())
    }

    async fn enter_learning_mode(&mut self) -> Result<(), DeviceError> {
        if !self.authenticated {
            return Err(DeviceError::Transport(
                "learning mode requested before authentication".to_string(),
            ));
        }
        self.sessions += 1;
        self.script = self.template.iter().cloned().collect();
        self.armed = true;
        debug!(session = self.sessions, "simulated bridge armed");
        Ok(())
    }

    async fn poll_learned_code(&mut self) -> Result<Option<LearnedCode>, DeviceError> {
        self.polls_issued += 1;
        if !self.armed {
            return Ok(None);
        }
        match self.script.pop_front() {
            None | Some(ScriptedPoll::NoData) => Ok(None),
            Some(ScriptedPoll::Code(mut bytes)) => {
                // Tag with the session counter so every learn in a sitting
                // produces a distinct code.
                bytes.push(self.sessions as u8);
                Ok(Some(LearnedCode::new(bytes)))
            }
            Some(ScriptedPoll::Fault(msg)) => Err(DeviceError::Transport(msg)),
        }
    }

    fn info(&self) -> &DeviceInfo {
        &self.info
    }
}

/// Scan for simulated bridges
///
/// The simulator answers at whatever address the operator asked for, so the
/// downstream host match always has a candidate to connect to.
pub async fn discover(host: &str, timeout: Duration) -> Vec<SimulatedBridge> {
    debug!(%host, ?timeout, "simulated discovery scan");
    vec![SimulatedBridge::new(host)]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn rearming_replays_the_script() {
        let mut bridge = SimulatedBridge::with_script(
            "10.0.0.9",
            vec![ScriptedPoll::NoData, ScriptedPoll::Code(vec![0x01])],
        );
        bridge.authenticate().await.unwrap();

        bridge.enter_learning_mode().await.unwrap();
        assert!(bridge.poll_learned_code().await.unwrap().is_none());
        assert!(bridge.poll_learned_code().await.unwrap().is_some());
        // Script exhausted: further polls report nothing
        assert!(bridge.poll_learned_code().await.unwrap().is_none());

        bridge.enter_learning_mode().await.unwrap();
        assert!(bridge.poll_learned_code().await.unwrap().is_none());
        assert!(bridge.poll_learned_code().await.unwrap().is_some());
    }

    #[tokio::test]
    async fn session_counter_varies_the_code() {
        let mut bridge =
            SimulatedBridge::with_script("10.0.0.9", vec![ScriptedPoll::Code(vec![0xAA])]);
        bridge.authenticate().await.unwrap();

        bridge.enter_learning_mode().await.unwrap();
        let first = bridge.poll_learned_code().await.unwrap().unwrap();
        bridge.enter_learning_mode().await.unwrap();
        let second = bridge.poll_learned_code().await.unwrap().unwrap();
        assert_ne!(first, second);
    }

    #[tokio::test]
    async fn arming_before_auth_is_a_fault() {
        let mut bridge = SimulatedBridge::new("10.0.0.9");
        let err = bridge.enter_learning_mode().await.unwrap_err();
        assert!(matches!(err, DeviceError::Transport(_)));
    }
}
