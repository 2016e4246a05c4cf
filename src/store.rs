//! Record store - per-appliance CSV files of learned button codes
//!
//! One CSV file per appliance, named by the slugified appliance name, with a
//! fixed header row written once when the file is created. Each captured
//! code is appended as a (button name, base64 code) record and flushed so a
//! crash mid-session never loses already-stored buttons.

use std::borrow::Cow;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use tracing::info;

use crate::device::LearnedCode;

/// Fixed CSV column names
pub const FIELD_NAMES: [&str; 2] = ["Button Name", "Button Code"];

/// Append-only CSV store for one appliance
pub struct RecordStore {
    path: PathBuf,
}

impl RecordStore {
    /// Open the record file for an appliance, creating it with a header row
    /// if it does not exist yet. An existing file is appended to, so
    /// revisiting an appliance keeps its earlier buttons.
    pub fn open(output_dir: &Path, appliance_name: &str) -> Result<Self> {
        std::fs::create_dir_all(output_dir)
            .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;

        let path = output_dir.join(format!("{}.csv", slugify(appliance_name)));
        if !path.exists() {
            let mut file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&path)
                .with_context(|| format!("Failed to create record file {}", path.display()))?;
            writeln!(file, "{}", FIELD_NAMES.join(","))?;
            file.flush()?;
            info!(path = %path.display(), "created appliance record file");
        }

        Ok(Self { path })
    }

    /// Append one learned button record
    ///
    /// The button name is title-cased for display; the code bytes are stored
    /// as base64 text.
    pub fn append(&mut self, button_name: &str, code: &LearnedCode) -> Result<()> {
        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .with_context(|| format!("Failed to open record file {}", self.path.display()))?;

        let name = title_case(button_name);
        writeln!(
            file,
            "{},{}",
            csv_field(&name),
            BASE64.encode(code.as_bytes())
        )?;
        file.flush()?;
        info!(button = %name, path = %self.path.display(), "stored learned code");
        Ok(())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Derive a filesystem-safe identifier from a human-readable appliance name.
///
/// Lowercases, maps whitespace to underscores, and drops everything that is
/// not alphanumeric, `_` or `-`.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    for c in name.trim().chars() {
        if c.is_whitespace() {
            slug.push('_');
        } else if c.is_alphanumeric() || c == '_' || c == '-' {
            for lower in c.to_lowercase() {
                slug.push(lower);
            }
        }
    }
    if slug.is_empty() {
        slug.push_str("appliance");
    }
    slug
}

/// Title-case a button name: first letter of each word upper, rest lower
fn title_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut at_word_start = true;
    for c in s.trim().chars() {
        if c.is_whitespace() {
            at_word_start = true;
            out.push(c);
        } else if at_word_start {
            out.extend(c.to_uppercase());
            at_word_start = false;
        } else {
            out.extend(c.to_lowercase());
        }
    }
    out
}

/// Quote a CSV field when it contains a delimiter, quote or newline
fn csv_field(s: &str) -> Cow<'_, str> {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        Cow::Owned(format!("\"{}\"", s.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slugify_matches_reference_naming() {
        assert_eq!(slugify("Living Room TV"), "living_room_tv");
        assert_eq!(slugify("  AC unit  "), "ac_unit");
        assert_eq!(slugify("a/b:c"), "abc");
        assert_eq!(slugify("///"), "appliance");
    }

    #[test]
    fn title_case_button_names() {
        assert_eq!(title_case("power off"), "Power Off");
        assert_eq!(title_case("VOLUME up"), "Volume Up");
    }

    #[test]
    fn csv_field_quotes_when_needed() {
        assert_eq!(csv_field("Power"), "Power");
        assert_eq!(csv_field("Vol, Up"), "\"Vol, Up\"");
        assert_eq!(csv_field("say \"hi\""), "\"say \"\"hi\"\"\"");
    }

    #[test]
    fn header_written_once_and_records_appended() {
        let dir = tempfile::tempdir().unwrap();

        let mut store = RecordStore::open(dir.path(), "Living Room TV").unwrap();
        store
            .append("power", &LearnedCode::from(&[0x26, 0x00][..]))
            .unwrap();

        // Re-opening the same appliance must not write a second header
        let mut store = RecordStore::open(dir.path(), "Living Room TV").unwrap();
        store
            .append("volume up", &LearnedCode::from(&[0x26, 0x01][..]))
            .unwrap();

        let contents = std::fs::read_to_string(store.path()).unwrap();
        let lines: Vec<&str> = contents.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "Button Name,Button Code");
        assert_eq!(lines[1], format!("Power,{}", BASE64.encode([0x26, 0x00])));
        assert_eq!(
            lines[2],
            format!("Volume Up,{}", BASE64.encode([0x26, 0x01]))
        );
    }
}
