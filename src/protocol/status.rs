//! Status indicator collaborator.
//!
//! After each dispatched request the server reports a single character
//! describing the outcome. Indicator failures are logged by the caller and
//! never change the reply.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Outcome reported to the indicator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    /// Server is bound and waiting
    Idle,
    MultiplyDone,
    DivideDone,
    /// Division rejected, divisor was zero
    DivideError,
    UnknownFunction,
}

impl Status {
    pub fn as_char(self) -> char {
        match self {
            Status::Idle => '0',
            Status::MultiplyDone => '1',
            Status::DivideDone => '2',
            Status::DivideError => 'E',
            Status::UnknownFunction => 'F',
        }
    }

    pub fn as_byte(self) -> u8 {
        // All status characters are ASCII
        self.as_char() as u8
    }
}

pub trait StatusIndicator {
    fn notify(&mut self, status: Status) -> io::Result<()>;
}

impl<T: StatusIndicator + ?Sized> StatusIndicator for Box<T> {
    fn notify(&mut self, status: Status) -> io::Result<()> {
        (**self).notify(status)
    }
}

/// Writes one byte per status to a character device such as a segment display
#[derive(Debug)]
pub struct DeviceIndicator {
    path: PathBuf,
    file: File,
}

impl DeviceIndicator {
    /// Open `path` write-only. The file must already exist.
    pub fn open<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = OpenOptions::new().write(true).open(path.as_ref())?;
        Ok(Self {
            path: path.as_ref().to_path_buf(),
            file,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatusIndicator for DeviceIndicator {
    fn notify(&mut self, status: Status) -> io::Result<()> {
        self.file.write_all(&[status.as_byte()])?;
        self.file.flush()
    }
}

/// Discards every status
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopIndicator;

impl StatusIndicator for NoopIndicator {
    fn notify(&mut self, _status: Status) -> io::Result<()> {
        Ok(())
    }
}

/// Keeps every status in memory. Clones share the same history.
#[derive(Debug, Default, Clone)]
pub struct RecordingIndicator {
    history: Arc<Mutex<Vec<Status>>>,
}

impl RecordingIndicator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn history(&self) -> Vec<Status> {
        self.history
            .lock()
            .map(|history| history.clone())
            .unwrap_or_default()
    }
}

impl StatusIndicator for RecordingIndicator {
    fn notify(&mut self, status: Status) -> io::Result<()> {
        let mut history = self
            .history
            .lock()
            .map_err(|_| io::Error::other("status history lock poisoned"))?;
        history.push(status);
        Ok(())
    }
}
