//! Interactive shell - menu-driven front end for teaching button codes
//!
//! Pure glue around the capture controller and the record store: menu
//! rendering, name prompts, and the learn-one-button flow. Operator quits
//! and Ctrl-C are graceful exits distinct from device faults, which
//! propagate out and end the session with an error.

use std::time::Duration;

use anyhow::Result;
use indicatif::ProgressBar;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use tracing::debug;

use crate::capture::{capture_one_code, CaptureConfig, CaptureResult};
use crate::config::Config;
use crate::device::BridgeDevice;
use crate::store::RecordStore;

/// Why the shell loop ended
///
/// Both variants are graceful exits; faults leave the shell as errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShellExit {
    /// The operator chose Quit from a menu
    OperatorQuit,
    /// Ctrl-C / Ctrl-D during a prompt
    Interrupted,
}

const MAIN_MENU: &[(&str, &str)] = &[("0", "Quit"), ("1", "Create new appliance")];

const APPLIANCE_MENU: &[(&str, &str)] = &[
    ("0", "Quit"),
    ("1", "Learn new button"),
    ("2", "Return to main menu"),
];

/// Result of one line prompt
enum Prompted {
    Line(String),
    /// Ctrl-C or Ctrl-D
    Aborted,
}

/// What to do after an appliance session ends
enum SessionEnd {
    BackToMainMenu,
    Quit,
    Interrupted,
}

/// Outcome of one learn-button flow
enum LearnOutcome {
    Done,
    Interrupted,
}

/// Run the interactive shell against a connected, authenticated device
pub async fn run_shell(device: &mut dyn BridgeDevice, config: &Config) -> Result<ShellExit> {
    let mut editor = DefaultEditor::new()?;
    let capture_config = config.capture.capture_config();
    let output_dir = config.store.output_dir();

    loop {
        let choice = match show_menu(&mut editor, MAIN_MENU, None)? {
            Prompted::Line(choice) => choice,
            Prompted::Aborted => return Ok(ShellExit::Interrupted),
        };

        match choice.as_str() {
            "0" | "q" => return Ok(ShellExit::OperatorQuit),
            "1" => {
                let name = match request_appliance_name(&mut editor)? {
                    Prompted::Line(name) => name,
                    Prompted::Aborted => return Ok(ShellExit::Interrupted),
                };
                let mut store = RecordStore::open(&output_dir, &name)?;
                match appliance_session(&mut editor, device, &mut store, &capture_config, &name)
                    .await?
                {
                    SessionEnd::BackToMainMenu => continue,
                    SessionEnd::Quit => return Ok(ShellExit::OperatorQuit),
                    SessionEnd::Interrupted => return Ok(ShellExit::Interrupted),
                }
            }
            _ => unreachable!("show_menu only returns listed choices"),
        }
    }
}

/// Menu loop for one appliance: learn buttons until the operator leaves
async fn appliance_session(
    editor: &mut DefaultEditor,
    device: &mut dyn BridgeDevice,
    store: &mut RecordStore,
    capture_config: &CaptureConfig,
    appliance_name: &str,
) -> Result<SessionEnd> {
    debug!(appliance = appliance_name, path = %store.path().display(), "appliance session started");

    loop {
        let title = format!("Appliance: {}", appliance_name);
        let choice = match show_menu(editor, APPLIANCE_MENU, Some(&title))? {
            Prompted::Line(choice) => choice,
            Prompted::Aborted => return Ok(SessionEnd::Interrupted),
        };

        match choice.as_str() {
            "0" | "q" => return Ok(SessionEnd::Quit),
            "2" => return Ok(SessionEnd::BackToMainMenu),
            "1" => {
                if let LearnOutcome::Interrupted =
                    learn_one_button(editor, device, store, capture_config).await?
                {
                    return Ok(SessionEnd::Interrupted);
                }
            }
            _ => unreachable!("show_menu only returns listed choices"),
        }
    }
}

/// Arm the device, capture one code, and store it under an operator-chosen
/// button name. A capture timeout is a normal outcome: the menu loops again.
async fn learn_one_button(
    editor: &mut DefaultEditor,
    device: &mut dyn BridgeDevice,
    store: &mut RecordStore,
    capture_config: &CaptureConfig,
) -> Result<LearnOutcome> {
    device.enter_learning_mode().await?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_message("Press target button...");
    spinner.enable_steady_tick(Duration::from_millis(120));
    let result = capture_one_code(device, capture_config).await;
    spinner.finish_and_clear();

    match result? {
        CaptureResult::Captured(code) => {
            println!("Found new code!");
            let button = loop {
                match prompt(editor, "Enter button name: ")? {
                    Prompted::Line(name) if !name.is_empty() => break name,
                    Prompted::Line(name) => println!("Invalid button name: \"{}\"", name),
                    Prompted::Aborted => return Ok(LearnOutcome::Interrupted),
                }
            };
            store.append(&button, &code)?;
            println!("Code successfully stored\n");
        }
        CaptureResult::TimedOut => {
            println!("Sorry, can not find any codes, try again\n");
        }
    }

    Ok(LearnOutcome::Done)
}

/// Render a menu and prompt until the operator picks a listed choice.
///
/// `q` is accepted as an alias for Quit in every menu.
fn show_menu(
    editor: &mut DefaultEditor,
    items: &[(&str, &str)],
    title: Option<&str>,
) -> Result<Prompted> {
    if let Some(title) = title {
        println!("\n*** {} ***\n", title);
    }

    println!("What would you like to do:");
    println!("--------------------------");
    for (key, label) in items {
        println!("| {}: {}", key, label);
    }
    println!("--------------------------\n");

    loop {
        match prompt(editor, "#: ")? {
            Prompted::Line(choice) => {
                if choice == "q" || items.iter().any(|(key, _)| *key == choice) {
                    return Ok(Prompted::Line(choice));
                }
                let expected: Vec<&str> = items.iter().map(|(key, _)| *key).collect();
                println!(
                    "Invalid answer \"{}\"\nExpected one of: {}",
                    choice,
                    expected.join(", ")
                );
            }
            Prompted::Aborted => return Ok(Prompted::Aborted),
        }
    }
}

/// Prompt until a non-empty appliance name is entered
fn request_appliance_name(editor: &mut DefaultEditor) -> Result<Prompted> {
    loop {
        match prompt(editor, "Enter appliance name: ")? {
            Prompted::Line(name) if !name.is_empty() => return Ok(Prompted::Line(name)),
            Prompted::Line(name) => println!("Invalid appliance name: \"{}\"", name),
            Prompted::Aborted => return Ok(Prompted::Aborted),
        }
    }
}

/// Read one line, mapping Ctrl-C / Ctrl-D to a graceful abort
fn prompt(editor: &mut DefaultEditor, text: &str) -> Result<Prompted> {
    match editor.readline(text) {
        Ok(line) => Ok(Prompted::Line(line.trim().to_string())),
        Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => Ok(Prompted::Aborted),
        Err(e) => Err(e.into()),
    }
}
