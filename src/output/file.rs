//! Buffered plain-text file sink.
//!
//! Destination problems surface once, at construction — per-record write
//! failures are not retried and never reach the caller.

use super::Sink;
use crate::channel::Channel;
use crate::error::Error;
use std::fs::{self, File, OpenOptions};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

/// Appends formatted lines to a file through a buffered writer.
pub struct FileSink {
    writer: BufWriter<File>,
    path: PathBuf,
}

impl FileSink {
    /// Opens (or creates) `path` for appending, expanding a leading `~` and
    /// creating missing parent directories.
    ///
    /// # Errors
    /// `Error::Io` if the destination cannot be opened.
    pub fn create(path: impl AsRef<Path>) -> Result<Self, Error> {
        let path = expand(path.as_ref());
        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
            && !parent.exists()
        {
            fs::create_dir_all(parent)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        Ok(Self {
            writer: BufWriter::new(file),
            path,
        })
    }

    /// The resolved destination path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

fn expand(path: &Path) -> PathBuf {
    path.to_str().map_or_else(
        || path.to_path_buf(),
        |s| PathBuf::from(shellexpand::tilde(s).into_owned()),
    )
}

impl Sink for FileSink {
    fn print(&mut self, _channels: Option<&[Channel]>, line: &str) -> io::Result<()> {
        self.writer.write_all(line.as_bytes())?;
        self.writer.flush()
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}
