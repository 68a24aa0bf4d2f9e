//! Size-capped log file writer with numbered backups.
//!
//! When a write would push the active file past `max_bytes`, the file is
//! closed and shifted: `app.log` becomes `app.log.1`, `app.log.1` becomes
//! `app.log.2`, and so on up to `backups`. The oldest backup is dropped.

use std::ffi::OsString;
use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use crate::config::FileSinkConfig;

/// Rotating file writer.
///
/// Each call to [`Write::write`] is treated as one record: rotation only
/// happens between writes, never inside one.
#[derive(Debug)]
pub struct RotatingFileWriter {
    path: PathBuf,
    max_bytes: u64,
    backups: usize,
    file: Option<File>,
    written: u64,
}

impl RotatingFileWriter {
    /// Open (or create) the active file in append mode.
    pub fn open(config: &FileSinkConfig) -> io::Result<Self> {
        if let Some(parent) = config.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let file = open_append(&config.path)?;
        let written = file.metadata()?.len();

        Ok(RotatingFileWriter {
            path: config.path.clone(),
            max_bytes: config.max_bytes,
            backups: config.backups,
            file: Some(file),
            written,
        })
    }

    /// Path of the active file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Bytes currently in the active file.
    pub fn written(&self) -> u64 {
        self.written
    }

    /// Path of the `index`-th backup (`1` is the most recent).
    pub fn backup_path(&self, index: usize) -> PathBuf {
        numbered(&self.path, index)
    }

    fn should_rotate(&self, incoming: usize) -> bool {
        if self.max_bytes == 0 || self.backups == 0 {
            return false;
        }
        self.written > 0 && self.written + incoming as u64 > self.max_bytes
    }

    /// Shift backups and start a fresh active file.
    pub fn rotate(&mut self) -> io::Result<()> {
        // Close current file
        if let Some(mut file) = self.file.take() {
            file.flush()?;
        }

        let oldest = numbered(&self.path, self.backups);
        if oldest.exists() {
            fs::remove_file(&oldest)?;
        }
        for index in (1..self.backups).rev() {
            let from = numbered(&self.path, index);
            if from.exists() {
                fs::rename(&from, numbered(&self.path, index + 1))?;
            }
        }
        if self.path.exists() {
            fs::rename(&self.path, numbered(&self.path, 1))?;
        }

        self.file = Some(open_append(&self.path)?);
        self.written = 0;
        Ok(())
    }
}

impl Write for RotatingFileWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if self.should_rotate(buf.len()) {
            self.rotate()?;
        }
        // A failed rotation leaves no open file; reattach to whatever is on disk.
        let file = match self.file.take() {
            Some(file) => file,
            None => {
                let file = open_append(&self.path)?;
                self.written = file.metadata()?.len();
                file
            }
        };
        let file = self.file.insert(file);
        file.write_all(buf)?;
        self.written += buf.len() as u64;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        match self.file.as_mut() {
            Some(file) => file.flush(),
            None => Ok(()),
        }
    }
}

fn open_append(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

fn numbered(path: &Path, index: usize) -> PathBuf {
    let mut name = OsString::from(path.as_os_str());
    name.push(format!(".{}", index));
    PathBuf::from(name)
}
