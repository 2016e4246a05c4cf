//! End-to-end learn flow: simulated bridge -> capture loop -> record store

use std::time::Duration;

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use ir_scribe::capture::{capture_one_code, CaptureConfig, CaptureResult};
use ir_scribe::device::simulator::{ScriptedPoll, SimulatedBridge};
use ir_scribe::device::BridgeDevice;
use ir_scribe::store::RecordStore;

fn fast_config() -> CaptureConfig {
    CaptureConfig {
        max_attempts: 10,
        poll_interval: Duration::from_millis(0),
    }
}

#[tokio::test]
async fn captured_code_lands_in_the_record_file() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let mut bridge = SimulatedBridge::with_script(
        "192.168.0.42",
        vec![
            ScriptedPoll::NoData,
            ScriptedPoll::NoData,
            ScriptedPoll::Code(vec![0x26, 0x00, 0x4c]),
        ],
    );
    bridge.authenticate().await?;
    bridge.enter_learning_mode().await?;

    let code = match capture_one_code(&mut bridge, &fast_config()).await? {
        CaptureResult::Captured(code) => code,
        CaptureResult::TimedOut => panic!("simulated bridge should produce a code"),
    };

    let mut store = RecordStore::open(dir.path(), "Living Room TV")?;
    store.append("power off", &code)?;

    let path = dir.path().join("living_room_tv.csv");
    assert_eq!(store.path(), path);

    let contents = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines[0], "Button Name,Button Code");
    assert_eq!(
        lines[1],
        format!("Power Off,{}", BASE64.encode(code.as_bytes()))
    );
    Ok(())
}

#[tokio::test]
async fn exhausted_bridge_times_out_and_leaves_no_record() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;

    let mut bridge = SimulatedBridge::with_script("192.168.0.42", vec![ScriptedPoll::NoData]);
    bridge.authenticate().await?;
    bridge.enter_learning_mode().await?;

    let result = capture_one_code(&mut bridge, &fast_config()).await?;
    assert_eq!(result, CaptureResult::TimedOut);

    let store = RecordStore::open(dir.path(), "Bedroom Fan")?;
    let contents = std::fs::read_to_string(store.path())?;
    assert_eq!(contents.lines().count(), 1, "header only, no records");
    Ok(())
}

#[tokio::test]
async fn two_learning_sessions_store_distinct_codes() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    let mut store = RecordStore::open(dir.path(), "AC Unit")?;

    let mut bridge = SimulatedBridge::new("192.168.0.42");
    bridge.authenticate().await?;

    let mut codes = Vec::new();
    for button in ["power", "temp up"] {
        bridge.enter_learning_mode().await?;
        match capture_one_code(&mut bridge, &fast_config()).await? {
            CaptureResult::Captured(code) => {
                store.append(button, &code)?;
                codes.push(code);
            }
            CaptureResult::TimedOut => panic!("demo script should always yield a code"),
        }
    }
    assert_ne!(codes[0], codes[1]);

    let contents = std::fs::read_to_string(store.path())?;
    assert_eq!(contents.lines().count(), 3);
    Ok(())
}
