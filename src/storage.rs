use std::ffi::OsString;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use color_eyre::{Result, eyre::Context};
use log::debug;

use crate::fetcher::{Slot, Slots};

/// Durable state of the tracker between runs.
pub trait Storage {
    /// Available slots from the last successful run; empty on first run.
    fn load_snapshot(&self) -> Result<Slots>;
    /// Replaces the whole snapshot.
    fn save_snapshot(&mut self, slots: &[Slot]) -> Result<()>;
    fn write_report(&mut self, lines: &[String]) -> Result<()>;
}

pub struct FileStorage {
    snapshot_path: PathBuf,
    report_path: PathBuf,
}

impl FileStorage {
    pub fn new(snapshot_path: impl Into<PathBuf>, report_path: impl Into<PathBuf>) -> Self {
        Self {
            snapshot_path: snapshot_path.into(),
            report_path: report_path.into(),
        }
    }
}

impl Storage for FileStorage {
    fn load_snapshot(&self) -> Result<Slots> {
        match fs::read_to_string(&self.snapshot_path) {
            Ok(json) => serde_json::from_str(&json).wrap_err_with(|| {
                format!("corrupt snapshot at {}", self.snapshot_path.display())
            }),
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(
                    "No snapshot at {}, starting fresh",
                    self.snapshot_path.display()
                );
                Ok(Vec::new())
            }
            Err(err) => Err(err).wrap_err_with(|| {
                format!("failed to read snapshot {}", self.snapshot_path.display())
            }),
        }
    }

    fn save_snapshot(&mut self, slots: &[Slot]) -> Result<()> {
        replace_file(&self.snapshot_path, &serde_json::to_string_pretty(slots)?)
    }

    fn write_report(&mut self, lines: &[String]) -> Result<()> {
        let mut contents = lines.join("\n");
        contents.push('\n');
        replace_file(&self.report_path, &contents)
    }
}

/// Writes a sibling temp file and renames it over `path`.
fn replace_file(path: &Path, contents: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)
            .wrap_err_with(|| format!("failed to create {}", parent.display()))?;
    }

    let mut tmp_name = OsString::from(path.as_os_str());
    tmp_name.push(".tmp");
    let tmp_path = PathBuf::from(tmp_name);

    fs::write(&tmp_path, contents)
        .wrap_err_with(|| format!("failed to write {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .wrap_err_with(|| format!("failed to replace {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}
